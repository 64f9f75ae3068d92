//! Collaborator traits used by the batch runner.
//!
//! The conversion engine itself needs none of these. They describe the
//! change tracker, backup store and uploader a batch run drives, so callers
//! can plug in local, remote or mock implementations.

mod backup;
mod tracker;
mod uploader;

pub use backup::*;
pub use tracker::*;
pub use uploader::*;
