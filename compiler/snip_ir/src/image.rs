//! Binary module image format.
//!
//! Layout:
//! - 4 bytes: magic `SNIP`
//! - 2 bytes: format version (little endian)
//! - rest: `bincode` encoding of a [`ModuleDef`]

use crate::bytecode::ModuleDef;

/// Leading bytes of every module image.
pub const MAGIC: [u8; 4] = *b"SNIP";

/// Current image format version. Bump on any change to the bytecode types.
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2;

/// Failure to encode or decode a module image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("module image is truncated ({0} bytes)")]
    Truncated(usize),
    #[error("not a module image (bad magic)")]
    BadMagic,
    #[error("unsupported module image version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: u16 },
    #[error("malformed module image: {0}")]
    Malformed(#[from] bincode::Error),
}

/// Encode a module into an image buffer.
pub fn encode(module: &ModuleDef) -> Result<Vec<u8>, ImageError> {
    let body = bincode::serialize(module)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode an image buffer back into a module.
pub fn decode(bytes: &[u8]) -> Result<ModuleDef, ImageError> {
    if bytes.len() < HEADER_LEN {
        return Err(ImageError::Truncated(bytes.len()));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    let (magic, version) = header.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(ImageError::BadMagic);
    }
    let found = u16::from_le_bytes([version[0], version[1]]);
    if found != FORMAT_VERSION {
        return Err(ImageError::UnsupportedVersion { found });
    }
    Ok(bincode::deserialize(body)?)
}
