use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use screenprep_core::batch::{BatchStage, ProgressReporter};

/// Drives one indicatif bar per batch stage.
#[derive(Default)]
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:26} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: BatchStage, total_items: Option<usize>) {
        let bar = match total_items {
            Some(n) => ProgressBar::new(n as u64),
            None => ProgressBar::no_length(),
        };
        bar.set_style(bar_style());
        bar.set_message(stage.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn advance(&self, items_done: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                // Workers finish out of order; never move backwards.
                bar.set_position(bar.position().max(items_done as u64));
            }
        }
    }

    fn finish_stage(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish();
            }
        }
    }
}
