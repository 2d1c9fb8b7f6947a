mod state;
mod ui;

use crate::config::AppConfig;
use crate::dashboard::{DashboardStats, Page, UserProfile};
use crate::upload::{
    AnalysisReport, Classifier, NotificationLog, Notifier, Notification, RandomClassifier,
    ScanFile, SimulationRuntime, UnitId, UploadSession,
};
use eframe::{egui, App};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rfd::FileDialog;
pub use state::{QueueAction, SignInForm, Workspace};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the UI wakes up while units are in flight.
const ACTIVE_REPAINT: Duration = Duration::from_millis(100);

pub struct NeuroVisionApp {
    config: AppConfig,
    notifications: NotificationLog,
    sign_in: SignInForm,
    workspace: Option<Workspace>,
    // Declared last: sessions must be torn down before the runtime stops.
    runtime: SimulationRuntime,
}

impl NeuroVisionApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: SimulationRuntime) -> Self {
        tracing::info!("Initializing NeuroVision Assist");
        let mut app = Self {
            config,
            notifications: NotificationLog::new(),
            sign_in: SignInForm::default(),
            workspace: None,
            runtime,
        };
        if let Some(profile) = app.config.profile.clone() {
            app.sign_in_as(profile);
        }
        app
    }

    /// Mounts the dashboard for `profile` with a fresh upload session.
    pub fn sign_in_as(&mut self, profile: UserProfile) {
        tracing::info!("Signed in as {} ({})", profile.full_name, profile.role);
        let seed = self.config.simulation.seed;
        let classifier: Arc<dyn Classifier> = match seed {
            Some(seed) => Arc::new(RandomClassifier::seeded(seed)),
            None => Arc::new(RandomClassifier::new()),
        };
        let notifier: Arc<dyn Notifier> = Arc::new(self.notifications.clone());
        let session = match UploadSession::new(
            self.runtime.handle(),
            self.config.simulation.clone(),
            classifier,
            notifier,
        ) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Cannot start upload session: {}", e);
                self.sign_in.error_message = Some(e.to_string());
                return;
            }
        };
        let stats_rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        self.notifications.notify(Notification::info(
            "Login Successful",
            format!("Welcome to NeuroVision Assist, {}!", profile.role),
        ));
        self.workspace = Some(Workspace {
            stats: DashboardStats::new(profile.role),
            profile,
            page: Page::Dashboard,
            session,
            stats_rng,
            show_details: true,
            error_message: None,
        });
        self.sign_in.clear();
    }

    /// Unmounts the dashboard; dropping the workspace cancels its timers.
    pub fn sign_out(&mut self) {
        if let Some(mut workspace) = self.workspace.take() {
            workspace.session.shutdown();
            tracing::info!("Signed out {}", workspace.profile.full_name);
        }
        self.notifications.clear();
    }

    pub fn pick_files(&mut self) {
        if let Some(paths) = FileDialog::new()
            .add_filter("MRI scans", &["dcm", "nii", "gz", "png", "jpg", "jpeg"])
            .pick_files()
        {
            self.submit_files(paths.into_iter().map(ScanFile::from_path).collect());
        }
    }

    pub fn submit_files(&mut self, files: Vec<ScanFile>) {
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        if files.is_empty() {
            return;
        }
        let report = workspace.session.submit(files);
        tracing::info!(
            "Submitted batch: {} accepted, {} rejected",
            report.accepted.len(),
            report.rejected.len()
        );
    }

    /// Files dropped anywhere on the dashboard go to the upload page when
    /// the role may upload; otherwise the user is told why nothing happened.
    fn accept_dropped(&mut self, files: Vec<ScanFile>) {
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        if !workspace.open_upload_for_drop() {
            self.notifications.notify(Notification::info(
                "Uploads Unavailable",
                format!(
                    "{} cannot upload scans; {} dropped file(s) ignored.",
                    workspace.profile.role.display_name(),
                    files.len()
                ),
            ));
            return;
        }
        self.submit_files(files);
    }

    pub fn handle_queue_action(&mut self, action: QueueAction) {
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        match action {
            QueueAction::Remove(id) => {
                workspace.session.remove(id);
            }
            QueueAction::View(id) => Self::open_scan(workspace, id),
            QueueAction::Download(id) => Self::export_report(workspace, id),
        }
    }

    fn open_scan(workspace: &mut Workspace, id: UnitId) {
        let Some(path) = workspace.session.get(id).and_then(|u| u.path().cloned()) else {
            workspace.error_message = Some("This scan has no file on disk to open".to_string());
            return;
        };
        if let Err(e) = open::that(&path) {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            workspace.error_message = Some(format!("Could not open {}: {}", path.display(), e));
        }
    }

    fn export_report(workspace: &mut Workspace, id: UnitId) {
        let Some(unit) = workspace.session.get(id) else {
            return;
        };
        let report = match AnalysisReport::from_unit(unit) {
            Ok(report) => report,
            Err(e) => {
                workspace.error_message = Some(e.to_string());
                return;
            }
        };
        let Some(path) = FileDialog::new()
            .set_file_name(report.suggested_file_name())
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        if let Err(e) = report.write_to(&path) {
            tracing::error!("{}", e);
            workspace.error_message = Some(e.to_string());
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<ScanFile> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .map(|file| match &file.path {
                    Some(path) => ScanFile::from_path(path.clone()),
                    None => ScanFile::new(
                        file.name.clone(),
                        file.bytes.as_ref().map_or(0, |b| b.len() as u64),
                    ),
                })
                .collect()
        });
        if !dropped.is_empty() {
            self.accept_dropped(dropped);
        }

        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };

        if workspace.session.pump() > 0 {
            ctx.request_repaint();
        }
        workspace
            .stats
            .refresh_if_due(Instant::now(), &mut workspace.stats_rng);

        if workspace.session.has_active() {
            ctx.request_repaint_after(ACTIVE_REPAINT);
        } else {
            ctx.request_repaint_after(crate::dashboard::STATS_REFRESH);
        }
    }
}

impl App for NeuroVisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
