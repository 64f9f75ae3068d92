use crate::config::EmptyLineConfig;

use super::{ensure_content_kept, NormalizationFailure, EMPTY_LINE_TARGET};

/// A table line is empty when it is blank, or when it is pipe-delimited and
/// every interior cell trims to nothing.
pub fn is_empty_table_line(line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    if line.len() >= 2 && line.starts_with('|') && line.ends_with('|') {
        let interior = &line[1..line.len() - 1];
        return interior.split('|').all(|cell| cell.trim().is_empty());
    }

    line == "|"
}

/// Keep non-empty lines and the first line of every run of empty lines.
///
/// `preserve_single_empty` has no effect on tables.
fn collapse_empty_table_lines(lines: Vec<String>) -> Vec<String> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut prev_empty = false;
    for line in lines {
        let empty = is_empty_table_line(&line);
        if !empty || !prev_empty {
            kept.push(line);
        }
        prev_empty = empty;
    }
    kept
}

/// Pop empty lines off the end.
fn trim_trailing_table_lines(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|l| is_empty_table_line(l)) {
        lines.pop();
    }
    lines
}

/// Collapse and trim empty rows in a list of Markdown table lines.
///
/// A disabled configuration returns the lines unchanged; so does any
/// internal failure.
pub fn normalize_table_lines(lines: &[String], config: &EmptyLineConfig) -> Vec<String> {
    if !config.enabled() {
        return lines.to_vec();
    }

    table_or_original(lines, try_normalize_table_lines(lines, config))
}

fn table_or_original(
    lines: &[String],
    attempt: Result<Vec<String>, NormalizationFailure>,
) -> Vec<String> {
    attempt.unwrap_or_else(|e| {
        tracing::warn!(
            target: EMPTY_LINE_TARGET,
            error = %e,
            "Empty line table processing failed, returning original table"
        );
        lines.to_vec()
    })
}

pub(crate) fn try_normalize_table_lines(
    lines: &[String],
    config: &EmptyLineConfig,
) -> Result<Vec<String>, NormalizationFailure> {
    let content_lines = lines.iter().filter(|l| !is_empty_table_line(l)).count();

    let mut processed = lines.to_vec();
    if config.remove_consecutive() {
        processed = collapse_empty_table_lines(processed);
    }
    if config.remove_trailing() {
        processed = trim_trailing_table_lines(processed);
    }

    let remaining = processed
        .iter()
        .filter(|l| !is_empty_table_line(l))
        .count();
    ensure_content_kept(content_lines, remaining)?;

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_is_empty_table_line() {
        assert!(is_empty_table_line(""));
        assert!(is_empty_table_line("   "));
        assert!(is_empty_table_line("|  |  |"));
        assert!(is_empty_table_line("||"));
        assert!(is_empty_table_line("|"));
        assert!(!is_empty_table_line("| a |  |"));
        assert!(!is_empty_table_line("| --- | --- |"));
        assert!(!is_empty_table_line("plain text"));
        assert!(!is_empty_table_line("| open row"));
    }

    #[test]
    fn test_collapse_keeps_first_of_run() {
        let input = lines(&["| a |", "|  |", "|  |", "| b |", "|  |"]);
        let out = collapse_empty_table_lines(input);
        assert_eq!(out, lines(&["| a |", "|  |", "| b |", "|  |"]));
    }

    #[test]
    fn test_normalize_collapses_and_trims() {
        let input = lines(&["| a | b |", "|  |  |", "|  |  |", "| c | d |", "|  |  |", ""]);
        let out = normalize_table_lines(&input, &EmptyLineConfig::DEFAULT);
        assert_eq!(out, lines(&["| a | b |", "|  |  |", "| c | d |"]));
    }

    #[test]
    fn test_preserve_single_empty_ignored() {
        let config = EmptyLineConfig::new(true, true, false, false);
        let input = lines(&["| a |", "|  |", "| b |"]);
        assert_eq!(normalize_table_lines(&input, &config), input);
    }

    #[test]
    fn test_identity_without_empty_lines() {
        let input = lines(&["| h1 | h2 |", "| --- | --- |", "| x | y |"]);
        assert_eq!(normalize_table_lines(&input, &EmptyLineConfig::DEFAULT), input);
    }

    #[test]
    fn test_disabled_is_identity() {
        let input = lines(&["| a |", "|  |", "|  |", ""]);
        assert_eq!(normalize_table_lines(&input, &EmptyLineConfig::disabled()), input);
    }

    #[test]
    fn test_failure_returns_original_table() {
        let input = lines(&["| a |", "|  |", "|  |", ""]);
        let failed = Err(NormalizationFailure::ContentChanged {
            expected: 1,
            actual: 0,
        });
        assert_eq!(table_or_original(&input, failed), input);
    }

    #[test]
    fn test_trailing_only() {
        let config = EmptyLineConfig::new(true, false, true, true);
        let input = lines(&["| a |", "|  |", "|  |", "| b |", "|  |", "|  |"]);
        let out = normalize_table_lines(&input, &config);
        assert_eq!(out, lines(&["| a |", "|  |", "|  |", "| b |"]));
    }
}
