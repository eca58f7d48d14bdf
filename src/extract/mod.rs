//! The extraction pipeline: lexical checks, page-content checks, network
//! probes, and the extractor that reduces them into the canonical
//! 30-feature vector.

pub mod api;
pub mod config;
pub mod content;
pub mod lexical;
pub mod probes;

pub use api::{extract, extract_batch, UrlFeatureExtractor};
pub use config::ExtractConfig;
pub use content::PageSnapshot;
