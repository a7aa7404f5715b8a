//! Serialization of fitted model parameters.
//!
//! Parameters are plain serde structs encoded with `bincode`. On disk every
//! model is wrapped in a small fixed header so that a file from another
//! task, another format version, or plain garbage is rejected before any
//! prediction is attempted:
//!
//! ```text
//! +--------+-----------------+-----------+------------------+
//! | "ESTM" | version (u16 LE)| kind (u8) | bincode payload  |
//! +--------+-----------------+-----------+------------------+
//! ```

use crate::error::EstateError;
use bincode::Options;
use std::path::Path;

/// Magic bytes at the start of every model artifact.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"ESTM";

/// Current artifact format version. Bump on any change to persisted structs.
pub const ARTIFACT_VERSION: u16 = 1;

/// Upper bound on payload size accepted by the decoder.
pub const MAX_PAYLOAD_BYTES: u64 = 256 * 1024 * 1024;

const HEADER_LEN: usize = ARTIFACT_MAGIC.len() + 2 + 1;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (vectors, scalars, strings).
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, EstateError>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EstateError>;
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_PAYLOAD_BYTES)
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    fn to_bytes(&self) -> Result<Vec<u8>, EstateError> {
        Ok(codec().serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, EstateError> {
        Ok(codec().deserialize(bytes)?)
    }
}

/// Which task an artifact was trained for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Price regression.
    Regression,
    /// Luxury/Budget classification.
    Classification,
}

impl ArtifactKind {
    fn tag(self) -> u8 {
        match self {
            ArtifactKind::Regression => 1,
            ArtifactKind::Classification => 2,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ArtifactKind::Regression),
            2 => Some(ArtifactKind::Classification),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Regression => write!(f, "regression"),
            ArtifactKind::Classification => write!(f, "classification"),
        }
    }
}

/// Wrap encoded parameters into a self-describing artifact.
pub fn encode_artifact<P: SerializableParams>(
    kind: ArtifactKind,
    params: &P,
) -> Result<Vec<u8>, EstateError> {
    let payload = params.to_bytes()?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&ARTIFACT_MAGIC);
    bytes.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
    bytes.push(kind.tag());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Check the artifact header and decode its payload.
///
/// # Errors
/// [`EstateError::InvalidArtifact`] for a short buffer, wrong magic, unknown
/// version or a kind different from `expected`; [`EstateError::Serialization`]
/// when the payload does not decode.
pub fn decode_artifact<P: SerializableParams>(
    expected: ArtifactKind,
    bytes: &[u8],
) -> Result<P, EstateError> {
    if bytes.len() < HEADER_LEN {
        return Err(EstateError::InvalidArtifact(format!(
            "artifact is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    if bytes[..4] != ARTIFACT_MAGIC {
        return Err(EstateError::InvalidArtifact(
            "missing ESTM magic bytes".to_string(),
        ));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != ARTIFACT_VERSION {
        return Err(EstateError::InvalidArtifact(format!(
            "unsupported format version {} (this build reads version {})",
            version, ARTIFACT_VERSION
        )));
    }
    let kind = ArtifactKind::from_tag(bytes[6]).ok_or_else(|| {
        EstateError::InvalidArtifact(format!("unknown task kind tag {}", bytes[6]))
    })?;
    if kind != expected {
        return Err(EstateError::InvalidArtifact(format!(
            "artifact holds a {} model, expected {}",
            kind, expected
        )));
    }
    P::from_bytes(&bytes[HEADER_LEN..])
}

/// Write an artifact to disk.
pub fn save_artifact<P: SerializableParams, Q: AsRef<Path>>(
    path: Q,
    kind: ArtifactKind,
    params: &P,
) -> Result<(), EstateError> {
    let bytes = encode_artifact(kind, params)?;
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.as_ref().display(), %kind, "model artifact saved");
    Ok(())
}

/// Read an artifact from disk.
pub fn load_artifact<P: SerializableParams, Q: AsRef<Path>>(
    path: Q,
    kind: ArtifactKind,
) -> Result<P, EstateError> {
    let bytes = std::fs::read(&path)?;
    let params = decode_artifact(kind, &bytes)?;
    tracing::info!(path = %path.as_ref().display(), %kind, "model artifact loaded");
    Ok(params)
}
