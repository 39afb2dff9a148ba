//! Error types for libjieba-core.
//!
//! Only conditions that make correct operation impossible are errors. A bad
//! line in a dictionary, an unseen emission or an empty input are absorbed
//! where they occur.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A required resource (main dictionary, HMM model) could not be used.
    #[error("failed to load {resource}: {reason}")]
    Construction {
        resource: &'static str,
        reason: String,
    },

    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8 after byte {valid_up_to}")]
    Decode {
        valid_up_to: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Lexicon snapshot could not be encoded or decoded.
    #[error("lexicon snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Building an immutable fst index failed.
    #[error("index build: {0}")]
    Index(#[from] fst::Error),
}

impl Error {
    /// Create a construction error for the named resource.
    pub fn construction(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::Construction {
            resource,
            reason: reason.into(),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::Decode {
            valid_up_to: source.valid_up_to(),
            source,
        }
    }
}

/// Decode a caller supplied byte buffer as UTF-8.
///
/// ```
/// use libjieba_core::{decode, Error};
///
/// assert_eq!(decode("北京".as_bytes()).unwrap(), "北京");
/// let err = decode(&[0xe5, 0x8c]).unwrap_err();
/// assert!(matches!(err, Error::Decode { valid_up_to: 0, .. }));
/// ```
pub fn decode(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reports_valid_prefix() {
        let mut bytes = "你好".as_bytes().to_vec();
        bytes.push(0xff);
        match decode(&bytes) {
            Err(Error::Decode { valid_up_to, .. }) => assert_eq!(valid_up_to, 6),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn construction_message_names_resource() {
        let err = Error::construction("main dictionary", "no valid entries");
        assert_eq!(
            err.to_string(),
            "failed to load main dictionary: no valid entries"
        );
    }
}
