mod classifier;
mod error;
mod intake;
mod notify;
mod queue;
mod report;
mod runtime;
mod session;
mod simulator;
mod types;

pub use classifier::{Classifier, RandomClassifier, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use error::{IntakeError, PipelineError, SimulationError};
pub use intake::{accepted_extension, admit, ACCEPTED_EXTENSIONS};
pub use notify::{Notification, NotificationLog, Notifier, Severity};
pub use queue::{QueueSummary, WorkQueue};
pub use report::{AnalysisReport, ReportError};
pub use runtime::SimulationRuntime;
pub use session::{IntakeReport, UploadSession};
pub use simulator::{advance, IncrementRange, SimulationConfig, Simulator};
pub use types::{
    AnalysisResult, Classification, EventKind, Phase, ScanFile, SimulationEvent, Transition,
    UnitId, UnitOfWork, UnitStatus,
};
