//! Configuration module for wavframe

mod analysis;

pub use analysis::{AnalysisConfig, MelConfig};
