use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use multiview_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives a single terminal progress bar from pipeline stage events.
pub struct BarReporter {
    pb: ProgressBar,
    counted: ProgressStyle,
    spinner: ProgressStyle,
}

impl BarReporter {
    pub fn new() -> Result<Self> {
        let counted = ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> ");
        let spinner = ProgressStyle::default_spinner().template("{spinner} {msg:24} {elapsed}")?;
        Ok(Self {
            pb: ProgressBar::new(0),
            counted,
            spinner,
        })
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("Done");
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        match total_items {
            Some(total) => {
                self.pb.set_style(self.counted.clone());
                self.pb.disable_steady_tick();
                self.pb.set_length(total as u64);
            }
            None => {
                self.pb.set_style(self.spinner.clone());
                self.pb
                    .enable_steady_tick(std::time::Duration::from_millis(120));
            }
        }
        self.pb.set_position(0);
        self.pb.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }
}
