use crate::dashboard::{DashboardStats, Page, Role, UserProfile};
use crate::upload::{UnitId, UploadSession};
use rand::rngs::StdRng;

/// Fields of the sign-in screen.
#[derive(Debug, Default)]
pub struct SignInForm {
    pub full_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub error_message: Option<String>,
}

impl SignInForm {
    pub fn clear(&mut self) {
        *self = SignInForm::default();
    }

    /// Validates the form. On failure the message is kept for display.
    pub fn submit(&mut self) -> Option<UserProfile> {
        let Some(role) = self.role else {
            self.error_message = Some("Please select your role".to_string());
            return None;
        };
        match UserProfile::new(&self.full_name, &self.email, role) {
            Ok(profile) => {
                self.error_message = None;
                Some(profile)
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                None
            }
        }
    }
}

/// A user action collected while rendering the queue, applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    Remove(UnitId),
    View(UnitId),
    Download(UnitId),
}

/// Everything that lives while a user is signed in. Dropping it tears the
/// upload session down with it.
#[derive(Debug)]
pub struct Workspace {
    pub profile: UserProfile,
    pub page: Page,
    pub stats: DashboardStats,
    pub session: UploadSession,
    pub stats_rng: StdRng,
    pub show_details: bool,
    pub error_message: Option<String>,
}

impl Workspace {
    pub fn navigate(&mut self, page: Page) {
        if page == Page::Upload && !self.profile.role.can_upload() {
            tracing::warn!("{} cannot open the upload page", self.profile.role);
            return;
        }
        tracing::debug!("Navigating to {:?}", page);
        self.page = page;
    }

    /// Switches to the upload page so dropped files land in the queue.
    /// Returns false when the role may not upload.
    pub fn open_upload_for_drop(&mut self) -> bool {
        if !self.profile.role.can_upload() {
            return false;
        }
        if self.page != Page::Upload {
            self.navigate(Page::Upload);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardStats;
    use crate::upload::{NotificationLog, RandomClassifier, SimulationConfig};
    use rand::SeedableRng;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn workspace(role: Role) -> Workspace {
        let profile = UserProfile::new("Dr. Kim", "kim@clinic.org", role).expect("valid");
        let session = UploadSession::new(
            Handle::current(),
            SimulationConfig::default(),
            Arc::new(RandomClassifier::seeded(1)),
            Arc::new(NotificationLog::new()),
        )
        .expect("valid config");
        Workspace {
            stats: DashboardStats::new(role),
            profile,
            page: Page::Dashboard,
            session,
            stats_rng: StdRng::seed_from_u64(1),
            show_details: true,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn dropping_files_opens_the_upload_page() {
        let mut radiologist = workspace(Role::Radiologist);
        assert!(radiologist.open_upload_for_drop());
        assert_eq!(radiologist.page, Page::Upload);
        assert!(radiologist.open_upload_for_drop());
        assert_eq!(radiologist.page, Page::Upload);
    }

    #[tokio::test]
    async fn dropping_files_is_refused_without_upload_access() {
        let mut receptionist = workspace(Role::Receptionist);
        assert!(!receptionist.open_upload_for_drop());
        assert_eq!(receptionist.page, Page::Dashboard);

        receptionist.navigate(Page::Upload);
        assert_eq!(receptionist.page, Page::Dashboard);
    }

    #[test]
    fn sign_in_requires_a_role() {
        let mut form = SignInForm {
            full_name: "Dr. Kim".into(),
            email: "kim@clinic.org".into(),
            ..SignInForm::default()
        };
        assert!(form.submit().is_none());
        assert_eq!(form.error_message.as_deref(), Some("Please select your role"));

        form.role = Some(Role::Radiologist);
        let profile = form.submit().expect("valid");
        assert_eq!(profile.role, Role::Radiologist);
        assert!(form.error_message.is_none());
    }

    #[test]
    fn sign_in_reports_profile_errors() {
        let mut form = SignInForm {
            full_name: "Dr. Kim".into(),
            email: "kim".into(),
            role: Some(Role::Doctor),
            ..SignInForm::default()
        };
        assert!(form.submit().is_none());
        assert_eq!(
            form.error_message.as_deref(),
            Some("'kim' is not a valid email address")
        );
        form.clear();
        assert!(form.error_message.is_none());
    }
}
