use crate::dashboard::Role;
use crate::upload::{Classification, Severity, UnitStatus};
use eframe::egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
pub const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

const BLUE: Color32 = Color32::from_rgb(59, 130, 246);
const RED: Color32 = Color32::from_rgb(239, 68, 68);
const PURPLE: Color32 = Color32::from_rgb(168, 85, 247);
const GREEN: Color32 = Color32::from_rgb(34, 197, 94);
const TEAL: Color32 = Color32::from_rgb(20, 184, 166);
const AMBER: Color32 = Color32::from_rgb(245, 158, 11);

pub fn classification_color(classification: Classification) -> Color32 {
    match classification {
        Classification::Healthy => GREEN,
        Classification::Meningioma => BLUE,
        Classification::Glioma => RED,
        Classification::PituitaryTumor => PURPLE,
    }
}

pub fn role_color(role: Role) -> Color32 {
    match role {
        Role::Radiologist => BLUE,
        Role::Doctor => TEAL,
        Role::Specialist => GREEN,
        Role::Receptionist => AMBER,
    }
}

pub fn status_color(status: UnitStatus) -> Color32 {
    match status {
        UnitStatus::Uploading | UnitStatus::Processing => ACCENT,
        UnitStatus::Completed => SUCCESS,
        UnitStatus::Errored => DANGER,
    }
}

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Info => ACCENT,
        Severity::Error => DANGER,
    }
}
