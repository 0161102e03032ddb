//! LRE Core Library
//!
//! Ingestion, analysis and presentation for Layout Reverse Engineering:
//! a marketing image goes in, a structured breakdown of its branding, copy
//! and layout comes out.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod presenter;
pub mod session;

pub use analysis::{AnalysisBackend, AnalysisOutcome};
pub use error::{LreError, LreResult};

#[cfg(test)]
pub(crate) mod test_support {
    /// Response used across the unit tests.
    pub const SAMPLE: &str = include_str!("../testdata/sample_analysis.json");
}
