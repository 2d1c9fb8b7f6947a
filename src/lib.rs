//! NeuroVision Assist: role-based MRI dashboard with a simulated
//! upload and analysis pipeline.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod upload;
pub mod utils;
