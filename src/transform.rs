//! Bytecode transformation seam
//!
//! The transformer that converts an archive's bytecode into the
//! platform-loadable artifact is an external tool. The pipeline hands it two
//! paths, waits for it, and only looks at the result status.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, transform_failed};

/// Placeholder replaced by the input archive path in command arguments
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the output artifact path in command arguments
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const STDERR_TAIL_CHARS: usize = 2000;

/// Converts a verified source archive into an executable artifact
pub trait Transformer {
    /// Convert `input` and write the artifact to `output`. Blocking.
    fn transform(&self, input: &Path, output: &Path) -> Result<()>;
}

impl<F> Transformer for F
where
    F: Fn(&Path, &Path) -> Result<()>,
{
    fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        self(input, output)
    }
}

/// Runs an external program as the transformer
///
/// Each argument may contain `{input}` and `{output}`. When no argument
/// mentions either placeholder the two paths are appended in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
}

impl CommandTransformer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        let templated = self
            .args
            .iter()
            .any(|a| a.contains(INPUT_PLACEHOLDER) || a.contains(OUTPUT_PLACEHOLDER));

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect();
        if !templated {
            args.push(input);
            args.push(output);
        }
        args
    }
}

fn tail(text: &str) -> &str {
    let text = text.trim();
    if text.len() <= STDERR_TAIL_CHARS {
        return text;
    }
    let mut start = text.len() - STDERR_TAIL_CHARS;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

impl Transformer for CommandTransformer {
    fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        let args = self.build_args(input, output);
        tracing::debug!(program = %self.program, ?args, "running transformer");

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| transform_failed(format!("failed to run '{}': {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(transform_failed(format!(
                "'{}' exited with {}: {}",
                self.program,
                result.status,
                tail(&stderr)
            )));
        }
        if !output.is_file() {
            return Err(transform_failed(format!(
                "'{}' produced no output at {}",
                self.program,
                output.display()
            )));
        }
        Ok(())
    }
}
