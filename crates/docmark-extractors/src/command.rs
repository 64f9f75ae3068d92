//! Generic conversion through an external command-line tool.
//!
//! The tool receives the file path as its last argument and must print
//! Markdown to stdout (e.g. `markitdown`, `pandoc -t gfm`).

use std::path::Path;
use std::process::Command;

use crate::error::{ExtractError, ExtractResult};
use crate::GenericConverter;

/// Runs an external converter and captures its stdout.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// Create a converter for `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Create a converter from a whitespace-separated command line.
    ///
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The `markitdown` CLI.
    pub fn markitdown() -> Self {
        Self::new("markitdown")
    }

    /// Add an argument placed before the file path.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Check if the program can be spawned at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|_| true)
            .unwrap_or(false)
    }
}

impl GenericConverter for CommandConverter {
    fn convert(&self, path: &Path) -> ExtractResult<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| ExtractError::command(&self.program, format!("could not spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::command(
                &self.program,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line() {
        let converter = CommandConverter::from_command_line("pandoc -t gfm").unwrap();
        assert_eq!(converter.name(), "pandoc");
        assert_eq!(converter.args, vec!["-t", "gfm"]);
        assert!(CommandConverter::from_command_line("   ").is_none());
    }

    #[test]
    fn test_missing_program() {
        let converter = CommandConverter::new("docmark-no-such-tool-xyz");
        assert!(!converter.is_available());
        let result = converter.convert(Path::new("file.bin"));
        assert!(matches!(result, Err(ExtractError::Command { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.rtf");
        std::fs::write(&path, "converted body").unwrap();

        let text = CommandConverter::new("cat").convert(&path).unwrap();
        assert_eq!(text, "converted body");
    }
}
