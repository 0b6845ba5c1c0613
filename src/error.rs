//! Error types for the price predictor.

use std::path::PathBuf;

/// Failure to load a startup resource. Logged, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ResourceLoadError {
    #[error("file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse model metadata: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("failed to load model {}: {message}", path.display())]
    Model { path: PathBuf, message: String },

    #[error("model backend not compiled in (enable the `torch` feature)")]
    BackendDisabled,
}

/// Request-time failure. The display text is what the user sees on the form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("Model not loaded.")]
    ModelUnavailable,

    #[error("An error occurred during prediction: {0}")]
    PredictionFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_messages() {
        assert_eq!(PredictionError::ModelUnavailable.to_string(), "Model not loaded.");
        assert_eq!(
            PredictionError::PredictionFailed("bad input".into()).to_string(),
            "An error occurred during prediction: bad input"
        );
    }

    #[test]
    fn test_not_found_names_path() {
        let e = ResourceLoadError::NotFound {
            path: PathBuf::from("model.pt"),
        };
        assert_eq!(e.to_string(), "file not found at model.pt");
    }
}
