pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible failures. Problems with individual records are never reported here: those
/// records are dropped during the build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("feature disabled for this view: {feature}")]
    FeatureDisabled { feature: &'static str },

    #[error("no graph has been built yet")]
    NoGraph,

    #[error("nothing is rendered: {reason}")]
    NothingRendered { reason: String },
}
