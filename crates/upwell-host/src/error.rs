use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend unavailable: {details}")]
    Unavailable { details: String },

    #[error("cache read failed for {key}: {details}")]
    Read { key: String, details: String },

    #[error("cache write failed for {key}: {details}")]
    Write { key: String, details: String },
}

impl CacheError {
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self::Unavailable {
            details: details.into(),
        }
    }

    pub fn read(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Read {
            key: key.into(),
            details: details.into(),
        }
    }

    pub fn write(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CacheError;

    #[test]
    fn read_error_display_includes_key_and_details() {
        let error = CacheError::read("update-descriptor/my-plugin", "connection refused");

        assert_eq!(
            error.to_string(),
            "cache read failed for update-descriptor/my-plugin: connection refused"
        );
    }

    #[test]
    fn helper_constructors_set_expected_variants() {
        assert!(matches!(
            CacheError::unavailable("down"),
            CacheError::Unavailable { .. }
        ));
        assert!(matches!(
            CacheError::write("key", "full"),
            CacheError::Write { .. }
        ));
    }
}
