use crate::extract::Extraction;
use crate::frame::{ScoredFrame, SelectionResult, SelectionWindow};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Planning,
    Scanning,
    Selecting,
    Extracting,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning segment"),
            Self::Scanning => write!(f, "Scoring frames"),
            Self::Selecting => write!(f, "Selecting sharpest frames"),
            Self::Extracting => write!(f, "Extracting frames"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frames to score), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// Work items completed so far within the current stage.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Everything one pipeline invocation produced.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    /// Scanned window; `None` for precomputed scores.
    pub window: Option<SelectionWindow>,
    /// All scores, ascending by index.
    pub scores: Vec<ScoredFrame>,
    pub selection: SelectionResult,
    pub extraction: Extraction,
}

impl RunOutput {
    pub fn manifest(&self) -> String {
        self.extraction.manifest()
    }
}
