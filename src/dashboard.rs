//! Role-specific dashboard content: the signed-in profile, navigation menus
//! and the stat cards shown on the landing page.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often the stat cards are re-rolled.
pub const STATS_REFRESH: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Radiologist,
    Doctor,
    Specialist,
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Radiologist,
        Role::Doctor,
        Role::Specialist,
        Role::Receptionist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Radiologist => "radiologist",
            Role::Doctor => "doctor",
            Role::Specialist => "specialist",
            Role::Receptionist => "receptionist",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Radiologist => "Radiologist",
            Role::Doctor => "Doctor",
            Role::Specialist => "Medical Specialist",
            Role::Receptionist => "Receptionist",
        }
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        use Page::*;
        let pages: &[(&str, Page)] = match self {
            Role::Radiologist => &[
                ("Dashboard", Dashboard),
                ("Upload MRI", Upload),
                ("Scan Analysis", Placeholder("/analysis")),
                ("Reports", Placeholder("/reports")),
                ("Patient Records", Placeholder("/patients")),
            ],
            Role::Doctor => &[
                ("Dashboard", Dashboard),
                ("Patient Summaries", Placeholder("/patients")),
                ("Analysis Results", Placeholder("/results")),
                ("Treatment Plans", Placeholder("/treatments")),
            ],
            Role::Specialist => &[
                ("Dashboard", Dashboard),
                ("Advanced Analysis", Placeholder("/advanced")),
                ("Research Data", Placeholder("/research")),
                ("Comparative Studies", Placeholder("/comparative")),
                ("Publications", Placeholder("/publications")),
            ],
            Role::Receptionist => &[
                ("Dashboard", Dashboard),
                ("Patient Management", Placeholder("/patients")),
                ("Appointments", Placeholder("/appointments")),
                ("Workflow Monitor", Placeholder("/workflow")),
            ],
        };
        pages
            .iter()
            .chain(std::iter::once(&("Settings", Placeholder("/settings"))))
            .map(|&(title, page)| MenuItem { title, page })
            .collect()
    }

    pub fn can_upload(&self) -> bool {
        self.menu().iter().any(|item| item.page == Page::Upload)
    }

    fn base_stats(&self) -> [(&'static str, &'static str, &'static str); 4] {
        match self {
            Role::Radiologist => [
                ("Scans Analyzed Today", "24", "+12%"),
                ("Tumors Detected", "7", "+3"),
                ("Reports Generated", "18", "+5"),
                ("Avg. Processing Time", "28s", "-2s"),
            ],
            Role::Doctor => [
                ("Active Patients", "156", "+8"),
                ("Pending Reviews", "12", "-3"),
                ("Completed Cases", "89", "+15"),
                ("Critical Cases", "3", "0"),
            ],
            Role::Specialist => [
                ("Research Cases", "45", "+7"),
                ("Publications", "8", "+2"),
                ("Collaborations", "23", "+5"),
                ("Data Analysis", "127", "+18"),
            ],
            Role::Receptionist => [
                ("Today's Appointments", "32", "+6"),
                ("Pending Scans", "8", "-2"),
                ("Completed Today", "24", "+4"),
                ("Queue Status", "Low", "Optimal"),
            ],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProfileError::UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Upload,
    /// Listed in the menu but without content yet.
    Placeholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub page: Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Full name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("Unknown role '{0}'")]
    UnknownRole(String),
}

/// The authenticated principal as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub role: Role,
    pub email: String,
}

impl UserProfile {
    pub fn new(full_name: &str, email: &str, role: Role) -> Result<Self, ProfileError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(ProfileError::MissingName);
        }
        let email = email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty());
        if !valid {
            return Err(ProfileError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            full_name: full_name.to_string(),
            role,
            email: email.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        Self::new(&self.full_name, &self.email, self.role).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub change: String,
}

/// Stat cards for one role, jittered on each refresh to look live.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    role: Role,
    cards: Vec<StatCard>,
    refreshed_at: Option<Instant>,
}

impl DashboardStats {
    pub fn new(role: Role) -> Self {
        let cards = role
            .base_stats()
            .into_iter()
            .map(|(title, value, change)| StatCard {
                title,
                value: value.to_string(),
                change: change.to_string(),
            })
            .collect();
        Self {
            role,
            cards,
            refreshed_at: None,
        }
    }

    pub fn cards(&self) -> &[StatCard] {
        &self.cards
    }

    /// Re-rolls the cards from the role's base values. Timing cards and
    /// non-numeric values are left alone.
    pub fn refresh(&mut self, rng: &mut impl Rng) {
        for (card, (_, base_value, base_change)) in self.cards.iter_mut().zip(self.role.base_stats()) {
            if card.title.contains("Time") {
                continue;
            }
            let Ok(base) = base_value.parse::<f64>() else {
                card.change = base_change.to_string();
                continue;
            };
            let jittered = (base + (rng.random::<f64>() - 0.5) * 4.0).floor();
            card.value = format!("{}", jittered as i64);
            let delta = rng.random_range(0..10);
            card.change = if rng.random_bool(0.5) {
                format!("+{}", delta)
            } else {
                delta.to_string()
            };
        }
    }

    /// Refreshes when the interval elapsed; returns whether it did.
    pub fn refresh_if_due(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        let due = self
            .refreshed_at
            .map_or(true, |at| now.duration_since(at) >= STATS_REFRESH);
        if due {
            self.refresh(rng);
            self.refreshed_at = Some(now);
        }
        due
    }
}
