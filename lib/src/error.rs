//! Error types for loading, training and serving.

use std::fmt;

/// Error type for every fallible operation in the crate.
///
/// An unseen city at inference time and an empty search result are
/// not represented here: both are normal outcomes.
#[derive(Debug)]
pub enum EstateError {
    /// Input table is malformed: a required column is absent or a value does not parse.
    DataFormat(String),
    /// Feature vector width disagrees with the width the model was fitted on.
    SchemaMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// A prediction request carries a value outside the accepted domain.
    InvalidInput(String),
    /// Invalid hyperparameter or configuration value.
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// A model artifact has the wrong magic, version, task kind, or inconsistent contents.
    InvalidArtifact(String),
    /// Serialization or deserialization error.
    Serialization(String),
    /// I/O error during file operations.
    Io(String),
    /// Configuration file could not be parsed.
    Config(String),
}

impl fmt::Display for EstateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstateError::DataFormat(msg) => write!(f, "Data format error: {}", msg),
            EstateError::SchemaMismatch {
                expected_features,
                got_features,
            } => write!(
                f,
                "Schema mismatch: model expects {} features, got {}",
                expected_features, got_features
            ),
            EstateError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EstateError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            EstateError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            EstateError::InvalidArtifact(msg) => write!(f, "Invalid model artifact: {}", msg),
            EstateError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            EstateError::Io(msg) => write!(f, "I/O error: {}", msg),
            EstateError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EstateError {}

impl From<std::io::Error> for EstateError {
    fn from(err: std::io::Error) -> Self {
        EstateError::Io(err.to_string())
    }
}

impl From<bincode::Error> for EstateError {
    fn from(err: bincode::Error) -> Self {
        EstateError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for EstateError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            EstateError::Io(err.to_string())
        } else {
            EstateError::DataFormat(err.to_string())
        }
    }
}

impl From<toml::de::Error> for EstateError {
    fn from(err: toml::de::Error) -> Self {
        EstateError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = EstateError::SchemaMismatch {
            expected_features: 7,
            got_features: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("Schema mismatch"));
        assert!(msg.contains('7'));
        assert!(msg.contains('6'));
    }

    #[test]
    fn test_error_display_data_format() {
        let err = EstateError::DataFormat("missing column Baths".to_string());
        assert!(err.to_string().contains("missing column Baths"));
    }

    #[test]
    fn test_error_display_invalid_artifact() {
        let err = EstateError::InvalidArtifact("bad magic".to_string());
        assert!(err.to_string().contains("Invalid model artifact"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: EstateError = io_err.into();
        assert!(matches!(err, EstateError::Io(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = result {
            let err: EstateError = e.into();
            assert!(matches!(err, EstateError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_from_toml_error() {
        let result: Result<toml::Value, toml::de::Error> = toml::from_str("forest = [");
        let err: EstateError = result.unwrap_err().into();
        assert!(matches!(err, EstateError::Config(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = EstateError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
