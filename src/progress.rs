//! Progress reporting for inspect and commit
//!
//! The library reports through [`ProgressReporter`]; the command line front
//! end draws it with indicatif, tests use [`SilentProgress`].

use indicatif::{ProgressBar, ProgressStyle};

/// Install pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Inspect,
    Fetch,
    Verify,
    Transform,
    Populate,
    Promote,
    Migrate,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Inspect => "Inspecting package",
            PipelineStage::Fetch => "Downloading payload",
            PipelineStage::Verify => "Verifying archive manifest",
            PipelineStage::Transform => "Transforming bytecode",
            PipelineStage::Populate => "Staging files",
            PipelineStage::Promote => "Promoting install",
            PipelineStage::Migrate => "Migrating user data",
        }
    }
}

/// Receiver of pipeline progress events
pub trait ProgressReporter {
    fn stage(&self, _stage: PipelineStage) {}

    fn download(&self, _received: u64, _total: Option<u64>) {}

    fn finish(&self) {}
}

/// Reporter that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Progress display on stderr
#[derive(Clone)]
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgress {
    fn stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.label());
        self.bar.tick();
    }

    fn download(&self, received: u64, total: Option<u64>) {
        match total {
            Some(total) if total > 0 => {
                if self.bar.length() != Some(total) {
                    self.bar.set_length(total);
                    self.bar.set_style(
                        ProgressStyle::default_bar()
                            .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("#>-"),
                    );
                }
                self.bar.set_position(received);
            }
            _ => {
                self.bar
                    .set_message(format!("{} ({received} bytes)", PipelineStage::Fetch.label()));
                self.bar.tick();
            }
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels_are_distinct() {
        let stages = [
            PipelineStage::Inspect,
            PipelineStage::Fetch,
            PipelineStage::Verify,
            PipelineStage::Transform,
            PipelineStage::Populate,
            PipelineStage::Promote,
            PipelineStage::Migrate,
        ];
        let mut labels: Vec<_> = stages.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), stages.len());
    }

    #[test]
    fn test_terminal_progress_accepts_events() {
        let progress = TerminalProgress::new();
        progress.stage(PipelineStage::Fetch);
        progress.download(10, Some(100));
        progress.download(20, None);
        progress.finish();
    }
}
