//! Grid to Markdown rendering.
//!
//! A grid where any row has more than one column becomes a Markdown table
//! with the first row as header. Anything narrower becomes a bullet list of
//! first cells. Empty rows are skipped and counted when normalization is
//! enabled, and the count is reported in an HTML comment after the block.

use docmark_extractors::{Row, Sheet};

use crate::config::EmptyLineConfig;
use crate::normalize::{try_normalize_table_lines, NormalizationFailure, EMPTY_LINE_TARGET};

/// How a grid is laid out in Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GridLayout {
    Table,
    Bullets,
}

impl GridLayout {
    /// Table when any row has more than one column.
    pub fn detect(rows: &[Row]) -> Self {
        if rows.iter().any(|r| r.len() > 1) {
            GridLayout::Table
        } else {
            GridLayout::Bullets
        }
    }
}

/// Row bookkeeping for one rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowStats {
    /// Rows considered (body rows for tables, all rows for bullets).
    pub original: usize,
    /// Rows emitted.
    pub processed: usize,
    /// Rows dropped.
    pub skipped: usize,
}

impl RowStats {
    /// The HTML comment reporting skipped rows.
    pub fn annotation(&self) -> String {
        format!(
            "<!-- 空白行処理: {}行 → {}行 (空白行{}行をスキップ) -->",
            self.original, self.processed, self.skipped
        )
    }
}

/// A rendered grid before the sheet heading is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    pub layout: GridLayout,
    /// Markdown lines joined with `\n`.
    pub body: String,
    /// Present only when rows were skipped and should be annotated.
    pub stats: Option<RowStats>,
}

impl RenderedGrid {
    /// Body plus the annotation line, if any.
    pub fn to_markdown(&self) -> String {
        match &self.stats {
            Some(stats) => format!("{}\n{}", self.body, stats.annotation()),
            None => self.body.clone(),
        }
    }
}

/// Renders row grids as Markdown tables or bullet lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularRenderer {
    config: EmptyLineConfig,
}

impl TabularRenderer {
    pub fn new(config: EmptyLineConfig) -> Self {
        Self { config }
    }

    /// Render one worksheet as `### <name>` followed by its grid.
    pub fn render_sheet(&self, sheet: &Sheet) -> String {
        let grid = self.render(&sheet.rows);
        tracing::debug!(
            target: EMPTY_LINE_TARGET,
            sheet = %sheet.name,
            layout = %grid.layout,
            skipped = grid.stats.map(|s| s.skipped).unwrap_or(0),
            "Rendered sheet"
        );
        format!("### {}\n\n{}", sheet.name, grid.to_markdown())
    }

    /// Render a grid, choosing the layout from its widest row.
    pub fn render(&self, rows: &[Row]) -> RenderedGrid {
        match GridLayout::detect(rows) {
            GridLayout::Table => self.render_table(rows),
            GridLayout::Bullets => self.render_bullets(rows),
        }
    }

    fn render_table(&self, rows: &[Row]) -> RenderedGrid {
        let (header, body) = match rows.split_first() {
            Some((header, body)) => (cell_strings(header), body),
            None => (Vec::new(), rows),
        };

        table_or_unfiltered(&header, body, self.try_render_table(&header, body))
    }

    fn try_render_table(&self, header: &[String], body: &[Row]) -> Attempt {
        let enabled = self.config.enabled();
        let width = header.len();
        let mut lines = header_lines(header);
        let mut skipped = 0;

        for row in body {
            let mut cells = fit_row(row, width);
            if enabled && cells.iter().all(|c| c.trim().is_empty()) {
                skipped += 1;
                continue;
            }
            cells.truncate(width);
            lines.push(table_line(&cells));
        }

        if !enabled {
            return Ok((lines, None));
        }

        let emitted = lines.len() - 2;
        let lines = try_normalize_table_lines(&lines, &self.config)?;
        if lines.len() < 2 {
            return Err(NormalizationFailure::HeaderLost);
        }
        skipped += emitted - (lines.len() - 2).min(emitted);

        let stats = RowStats {
            original: body.len(),
            processed: lines.len() - 2,
            skipped,
        };
        if stats.processed + stats.skipped != stats.original {
            return Err(NormalizationFailure::CountMismatch {
                original: stats.original,
                processed: stats.processed,
                skipped: stats.skipped,
            });
        }

        Ok((lines, Some(stats)))
    }

    fn render_bullets(&self, rows: &[Row]) -> RenderedGrid {
        bullets_or_unfiltered(rows, self.try_render_bullets(rows))
    }

    fn try_render_bullets(&self, rows: &[Row]) -> Attempt {
        let enabled = self.config.enabled();
        let items: Vec<String> = rows
            .iter()
            .filter_map(|r| r.first())
            .filter(|c| !c.is_null())
            .filter(|c| !(enabled && c.is_empty()))
            .map(ToString::to_string)
            .collect();

        if !enabled {
            return Ok((items, None));
        }

        if items.len() > rows.len() {
            return Err(NormalizationFailure::CountMismatch {
                original: rows.len(),
                processed: items.len(),
                skipped: 0,
            });
        }

        let stats = RowStats {
            original: rows.len(),
            processed: items.len(),
            skipped: rows.len() - items.len(),
        };
        Ok((items, Some(stats)))
    }
}

type Attempt = Result<(Vec<String>, Option<RowStats>), NormalizationFailure>;

/// The filtered table, or on failure every body row with no annotation.
fn table_or_unfiltered(header: &[String], body: &[Row], attempt: Attempt) -> RenderedGrid {
    match attempt {
        Ok((lines, stats)) => RenderedGrid {
            layout: GridLayout::Table,
            body: lines.join("\n"),
            stats: stats.filter(|s| s.skipped > 0),
        },
        Err(e) => {
            tracing::warn!(
                target: EMPTY_LINE_TARGET,
                error = %e,
                "Table empty row processing failed, rendering unfiltered"
            );
            let mut lines = header_lines(header);
            lines.extend(body.iter().map(|row| {
                let mut cells = fit_row(row, header.len());
                cells.truncate(header.len());
                table_line(&cells)
            }));
            RenderedGrid {
                layout: GridLayout::Table,
                body: lines.join("\n"),
                stats: None,
            }
        }
    }
}

/// The filtered list, or on failure every non-null first cell.
fn bullets_or_unfiltered(rows: &[Row], attempt: Attempt) -> RenderedGrid {
    match attempt {
        Ok((items, stats)) => RenderedGrid {
            layout: GridLayout::Bullets,
            body: bullet_list(&items),
            stats: stats.filter(|s| s.skipped > 0),
        },
        Err(e) => {
            tracing::warn!(
                target: EMPTY_LINE_TARGET,
                error = %e,
                "Bullet list empty row processing failed, rendering unfiltered"
            );
            let items: Vec<String> = rows
                .iter()
                .filter_map(|r| r.first())
                .filter(|c| !c.is_null())
                .map(ToString::to_string)
                .collect();
            RenderedGrid {
                layout: GridLayout::Bullets,
                body: bullet_list(&items),
                stats: None,
            }
        }
    }
}

fn cell_strings(row: &Row) -> Vec<String> {
    row.iter().map(ToString::to_string).collect()
}

/// Stringify a row and pad it to `width` cells. Longer rows are kept whole.
fn fit_row(row: &Row, width: usize) -> Vec<String> {
    let mut cells = cell_strings(row);
    if cells.len() < width {
        cells.resize(width, String::new());
    }
    cells
}

fn table_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn header_lines(header: &[String]) -> Vec<String> {
    vec![
        table_line(header),
        table_line(&vec!["---".to_string(); header.len()]),
    ]
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
