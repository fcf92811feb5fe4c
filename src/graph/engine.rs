use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::cli::ImageFormat;
use crate::constants::render::DEFAULT_GRAPHVIZ_BIN;
use crate::error::GomodGraphError;

/// Lays out a graph given as DOT text and rasterizes or vectorizes it
pub trait LayoutEngine: Send + Sync {
    /// Produce the complete image for `dot` in `format`
    ///
    /// Only `Svg` and `Png` reach an engine, DOT output is produced by the
    /// renderer itself.
    fn layout(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>, GomodGraphError>;
}

/// Layout engine backed by the Graphviz `dot` program
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    program: PathBuf,
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPHVIZ_BIN)
    }
}

impl GraphvizEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl LayoutEngine for GraphvizEngine {
    fn layout(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>, GomodGraphError> {
        let output_flag = match format {
            ImageFormat::Svg => "-Tsvg",
            ImageFormat::Png => "-Tpng",
            ImageFormat::Dot => return Ok(dot.as_bytes().to_vec()),
        };

        debug!(program = %self.program.display(), output_flag, "starting Graphviz");

        let mut child = Command::new(&self.program)
            .arg(output_flag)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GomodGraphError::LayoutEngineUnavailable {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| GomodGraphError::RenderError {
            message: "Graphviz stdin was not captured".to_string(),
        })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // deadlock against a full stdin pipe
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(dot.as_bytes()));
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("Graphviz input writer panicked"))
            });
            (output, written)
        });
        let output = output?;

        // A failing `dot` closes its stdin early, so its exit status and
        // stderr say more than the broken pipe
        if !output.status.success() {
            return Err(GomodGraphError::RenderError {
                message: format!(
                    "'{}' exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        written?;

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        assert_eq!(GraphvizEngine::default().program(), Path::new("dot"));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = GraphvizEngine::new("/nonexistent/gomodgraph-test/dot");
        let err = engine.layout("digraph {}", ImageFormat::Svg).unwrap_err();

        assert!(matches!(
            err,
            GomodGraphError::LayoutEngineUnavailable { .. }
        ));
    }

    #[test]
    fn test_dot_format_is_passed_through() {
        let engine = GraphvizEngine::new("/nonexistent/gomodgraph-test/dot");
        let out = engine.layout("digraph {}", ImageFormat::Dot).unwrap();
        assert_eq!(out, b"digraph {}");
    }
}
