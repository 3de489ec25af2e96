use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStage {
    Masking,
    Estimating,
    Correcting,
    Stitching,
    Cropping,
    Concatenating,
    Extracting,
}

impl std::fmt::Display for BatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Masking => write!(f, "Estimating masks"),
            Self::Estimating => write!(f, "Estimating illumination"),
            Self::Correcting => write!(f, "Correcting illumination"),
            Self::Stitching => write!(f, "Stitching quadrants"),
            Self::Cropping => write!(f, "Cropping"),
            Self::Concatenating => write!(f, "Concatenating channels"),
            Self::Extracting => write!(f, "Extracting features"),
        }
    }
}

/// Thread-safe progress reporting for batch drivers.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage (e.g., image count), if known.
    fn begin_stage(&self, _stage: BatchStage, _total_items: Option<usize>) {}

    /// Work items completed so far in the current stage.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Reporter that ignores all progress.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Counts completed items across rayon workers.
pub(super) struct Progress<'a> {
    reporter: &'a dyn ProgressReporter,
    done: AtomicUsize,
}

impl<'a> Progress<'a> {
    pub(super) fn begin(
        reporter: &'a dyn ProgressReporter,
        stage: BatchStage,
        total: usize,
    ) -> Self {
        reporter.begin_stage(stage, Some(total));
        Self {
            reporter,
            done: AtomicUsize::new(0),
        }
    }

    pub(super) fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.reporter.advance(done);
    }

    pub(super) fn finish(self) {
        self.reporter.finish_stage();
    }
}
