//! Error types for skyroad

use thiserror::Error;

/// Main error type for the crate.
///
/// Only construction-time failures live here. Runtime narrative anomalies
/// (stale events, empty pools, clips without tracks) are absorbed where they
/// happen and logged instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Asset missing: {0}")]
    AssetMissing(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
