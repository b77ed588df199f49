use thiserror::Error;

/// Errors raised while loading vectors and dictionaries or scoring candidates.
#[derive(Debug, Error)]
pub enum SuggesterError {
    /// A query word has no vector.
    #[error("word {0:?} not in vocabulary")]
    OutOfVocabulary(String),

    /// A similarity query was given no words on one of its sides.
    #[error("cannot compute similarity with no input words")]
    EmptyQuery,

    /// The word vectors file could not be understood.
    #[error("invalid word vectors file {path}: {reason}")]
    InvalidVectors {
        /// The file (or directory) being loaded.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A `wordsLength` entry is not a number.
    #[error("invalid word length {0:?}")]
    InvalidWordLength(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl SuggesterError {
    pub fn is_out_of_vocabulary(&self) -> bool {
        matches!(self, SuggesterError::OutOfVocabulary(_))
    }
}

/// Result type alias for suggester operations.
pub type Result<T> = std::result::Result<T, SuggesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = SuggesterError::OutOfVocabulary("zmr".into());
        assert_eq!(err.to_string(), "word \"zmr\" not in vocabulary");
        assert!(err.is_out_of_vocabulary());

        let err = SuggesterError::InvalidVectors {
            path: "cc.he.300.vec".into(),
            reason: "missing header".into(),
        };
        assert!(err.to_string().contains("cc.he.300.vec"));
        assert!(!err.is_out_of_vocabulary());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SuggesterError>();
    }
}
