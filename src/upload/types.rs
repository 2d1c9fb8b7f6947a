use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Identifier of a unit of work. Generated once at intake, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for logs and labels.
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

/// A file handed to intake: name and size as reported by the host picker.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFile {
    pub name: String,
    pub size_bytes: u64,
    pub path: Option<PathBuf>,
}

impl ScanFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }

    /// Builds a descriptor from a path on disk. Unreadable metadata yields a
    /// size of zero; the file is never read.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let size_bytes = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!("Could not read metadata for {}: {}", path.display(), e);
                0
            }
        };
        Self {
            name,
            size_bytes,
            path: Some(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Meningioma,
    Glioma,
    #[serde(rename = "Pituitary Tumor")]
    PituitaryTumor,
    Healthy,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Meningioma,
        Classification::Glioma,
        Classification::PituitaryTumor,
        Classification::Healthy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Meningioma => "Meningioma",
            Classification::Glioma => "Glioma",
            Classification::PituitaryTumor => "Pituitary Tumor",
            Classification::Healthy => "Healthy",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub classification: Classification,
    pub confidence_score: f64,
    pub has_segmentation: bool,
}

impl AnalysisResult {
    /// Segmentation is available for every finding except a healthy scan.
    pub fn new(classification: Classification, confidence_score: f64) -> Self {
        Self {
            classification,
            confidence_score,
            has_segmentation: classification != Classification::Healthy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStatus {
    Uploading,
    Processing,
    Completed,
    Errored,
}

impl UnitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UnitStatus::Uploading => "uploading",
            UnitStatus::Processing => "processing",
            UnitStatus::Completed => "completed",
            UnitStatus::Errored => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitStatus::Completed | UnitStatus::Errored)
    }
}

/// The two timed stages a unit passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uploading,
    Processing,
}

#[derive(Debug, Clone, PartialEq)]
enum UnitState {
    Uploading { progress: f32 },
    Processing { progress: f32 },
    Completed(AnalysisResult),
    Errored(String),
}

/// What a unit's timer reports back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Progress { phase: Phase, progress: f32 },
    ProcessingStarted,
    Completed(AnalysisResult),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEvent {
    pub id: UnitId,
    pub kind: EventKind,
}

/// Outcome of applying one event to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced,
    EnteredProcessing,
    Completed,
    Failed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitOfWork {
    id: UnitId,
    name: String,
    size_bytes: u64,
    extension: String,
    path: Option<PathBuf>,
    state: UnitState,
}

impl UnitOfWork {
    pub(crate) fn new(file: ScanFile, extension: &str) -> Self {
        Self {
            id: UnitId::new(),
            name: file.name,
            size_bytes: file.size_bytes,
            extension: extension.to_string(),
            path: file.path,
            state: UnitState::Uploading { progress: 0.0 },
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// The metadata captured at intake, as handed to a classifier.
    pub fn scan_file(&self) -> ScanFile {
        ScanFile {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            path: self.path.clone(),
        }
    }

    pub fn status(&self) -> UnitStatus {
        match self.state {
            UnitState::Uploading { .. } => UnitStatus::Uploading,
            UnitState::Processing { .. } => UnitStatus::Processing,
            UnitState::Completed(_) => UnitStatus::Completed,
            UnitState::Errored(_) => UnitStatus::Errored,
        }
    }

    pub fn progress(&self) -> f32 {
        match self.state {
            UnitState::Uploading { progress } | UnitState::Processing { progress } => progress,
            UnitState::Completed(_) => 100.0,
            UnitState::Errored(_) => 0.0,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            UnitState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            UnitState::Errored(reason) => Some(reason),
            _ => None,
        }
    }

    /// Applies a timer event. Only legal transitions take effect: progress
    /// never decreases within a phase and terminal states never change.
    pub fn apply(&mut self, kind: EventKind) -> Transition {
        match kind {
            EventKind::Progress { phase, progress: next } => {
                let current = match (&mut self.state, phase) {
                    (UnitState::Uploading { progress }, Phase::Uploading)
                    | (UnitState::Processing { progress }, Phase::Processing) => progress,
                    _ => return Transition::Ignored,
                };
                let next = next.clamp(0.0, 100.0);
                if next < *current {
                    return Transition::Ignored;
                }
                *current = next;
                Transition::Advanced
            }
            EventKind::ProcessingStarted => {
                if !matches!(self.state, UnitState::Uploading { .. }) {
                    return Transition::Ignored;
                }
                self.state = UnitState::Processing { progress: 0.0 };
                Transition::EnteredProcessing
            }
            EventKind::Completed(result) => {
                if !matches!(self.state, UnitState::Processing { .. }) {
                    return Transition::Ignored;
                }
                self.state = UnitState::Completed(result);
                Transition::Completed
            }
            EventKind::Failed(reason) => {
                if self.status().is_terminal() {
                    return Transition::Ignored;
                }
                self.state = UnitState::Errored(reason);
                Transition::Failed
            }
        }
    }
}
