use crate::config::EmptyLineConfig;

use super::{ensure_content_kept, NormalizationFailure, EMPTY_LINE_TARGET};

/// A line is blank when it trims to nothing.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Collapse and trim blank lines in free text.
///
/// With `remove_consecutive`, a blank line is kept only when
/// `preserve_single_empty` is set and the previous input line was not blank.
/// With `remove_trailing`, trailing blank lines are dropped. A disabled
/// configuration returns the text unchanged.
pub fn normalize_lines(text: &str, config: &EmptyLineConfig) -> String {
    if !config.enabled() {
        return text.to_string();
    }

    lines_or_original(text, try_normalize_lines(text, config))
}

fn lines_or_original(text: &str, attempt: Result<String, NormalizationFailure>) -> String {
    attempt.unwrap_or_else(|e| {
        tracing::warn!(
            target: EMPTY_LINE_TARGET,
            error = %e,
            "Empty line processing failed, returning original content"
        );
        text.to_string()
    })
}

fn try_normalize_lines(
    text: &str,
    config: &EmptyLineConfig,
) -> Result<String, NormalizationFailure> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let content_lines = lines.iter().filter(|l| !is_blank(l)).count();

    if config.remove_consecutive() {
        let mut kept = Vec::with_capacity(lines.len());
        let mut prev_blank = false;
        for line in lines {
            let blank = is_blank(line);
            if !blank || (config.preserve_single_empty() && !prev_blank) {
                kept.push(line);
            }
            prev_blank = blank;
        }
        lines = kept;
    }

    if config.remove_trailing() {
        while lines.last().is_some_and(|l| is_blank(l)) {
            lines.pop();
        }
    }

    let remaining = lines.iter().filter(|l| !is_blank(l)).count();
    ensure_content_kept(content_lines, remaining)?;

    Ok(lines.join("\n"))
}
