//! docmark-core - Conversion and normalization engine for docmark.
//!
//! Turns office documents into one canonical, whitespace-normalized Markdown
//! string per file, ready for indexing.
//!
//! # Architecture
//!
//! - [`config`] - validated value objects and the application configuration
//! - [`normalize`] - blank line and empty table row normalization (fail-open)
//! - [`tabular`] - row grids to Markdown tables or bullet lists
//! - [`markdown`] - frontmatter stripping and title extraction
//! - [`converter`] - per-extension dispatch to the extraction capabilities
//! - [`traits`] - change tracker, backup store and uploader collaborators
//! - [`batch`] - folder-level runs driving the collaborators
//!
//! # Example
//!
//! ```ignore
//! use docmark_core::{Converter, EmptyLineConfig};
//!
//! let converter = Converter::new(EmptyLineConfig::DEFAULT);
//! let markdown = converter.convert(Path::new("quarterly.xlsx"))?;
//! ```

pub mod batch;
pub mod config;
pub mod converter;
pub mod error;
pub mod markdown;
pub mod normalize;
pub mod tabular;
pub mod traits;

pub use batch::{BatchOptions, BatchRunner, BatchSummary};
pub use config::{AppConfig, ChunkSettings, EmptyLineConfig};
pub use converter::Converter;
pub use error::{DocmarkError, DocmarkResult, ErrorCode};
pub use normalize::{normalize_lines, normalize_table_lines};
pub use tabular::{GridLayout, RenderedGrid, RowStats, TabularRenderer};

// Re-export the extraction layer so callers need one dependency.
pub use docmark_extractors::{
    CellValue, CommandConverter, ExtractError, ExtractionPipeline, Extractor, ExtractorFactory,
    FileFormat, GenericConverter, Row, Sheet,
};
