//! Storage blob codec.
//!
//! A stored blob is one payload's byte image: a header (schema version,
//! variant name, key, element count), the element or raw-byte body, and a
//! SHA-256 checksum over the framed header and body. Decode verifies the
//! frame, the checksum, the schema, the variant, and the element count, in
//! that order, before any value reaches a payload. Empty payloads have no
//! stored form at all; encode reports nothing-to-write instead of emitting
//! an empty frame.

use std::io::{Read, Write};

use ehm_core::{EhmError, ErrorInfo, SchemaVersion, Variant};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::NodeConfig;
use crate::payload::Payload;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobHeader {
    schema: SchemaVersion,
    variant: String,
    key: String,
    element_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum BlobBody {
    Elements(Vec<f64>),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredBlob {
    header: BlobHeader,
    body: BlobBody,
    checksum: [u8; 32],
}

fn frame_checksum(header: &BlobHeader, body: &BlobBody) -> Result<[u8; 32], EhmError> {
    let framed = bincode::serialize(&(header, body))
        .map_err(|err| EhmError::IoFailure(ErrorInfo::new("blob-frame", err.to_string())))?;
    let digest = Sha256::digest(&framed);
    let mut checksum = [0u8; 32];
    checksum.copy_from_slice(&digest);
    Ok(checksum)
}

/// Encodes a payload into its stored byte image.
///
/// Returns `None` when the payload has no stored form (no elements and no
/// raw bytes); the caller may discard any backing file in that case.
pub fn encode_payload(payload: &Payload, key: &str) -> Result<Option<Vec<u8>>, EhmError> {
    if !payload.has_stored_form() {
        return Ok(None);
    }
    let body = match payload {
        Payload::StaticKeyword(raw) => BlobBody::Raw(raw.bytes().to_vec()),
        other => match other.elements() {
            Some(store) => BlobBody::Elements(store.as_slice().to_vec()),
            None => return Ok(None),
        },
    };
    let header = BlobHeader {
        schema: SchemaVersion::default(),
        variant: payload.variant().name().to_string(),
        key: key.to_string(),
        element_count: payload.element_count() as u64,
    };
    let checksum = frame_checksum(&header, &body)?;
    let blob = StoredBlob {
        header,
        body,
        checksum,
    };
    bincode::serialize(&blob)
        .map(Some)
        .map_err(|err| EhmError::IoFailure(ErrorInfo::new("blob-encode", err.to_string())))
}

/// Writes a payload's stored image to `writer`.
///
/// Returns `false` without touching the writer when the payload has no
/// stored form.
pub fn write_payload(
    writer: &mut dyn Write,
    payload: &Payload,
    key: &str,
) -> Result<bool, EhmError> {
    match encode_payload(payload, key)? {
        Some(bytes) => {
            writer.write_all(&bytes).map_err(|err| {
                EhmError::IoFailure(
                    ErrorInfo::new("blob-write", err.to_string())
                        .with_context("key", key.to_string()),
                )
            })?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Decodes a stored byte image into a payload shaped by `config`.
pub fn decode_payload(bytes: &[u8], config: &NodeConfig) -> Result<Payload, EhmError> {
    let blob: StoredBlob = bincode::deserialize(bytes).map_err(|err| {
        EhmError::IoFailure(
            ErrorInfo::new("blob-decode", "stored blob is truncated or malformed")
                .with_context("key", config.key.clone())
                .with_context("cause", err.to_string()),
        )
    })?;
    let expected_checksum = frame_checksum(&blob.header, &blob.body)?;
    if expected_checksum != blob.checksum {
        return Err(EhmError::IoFailure(
            ErrorInfo::new("checksum-mismatch", "stored blob failed checksum verification")
                .with_context("key", config.key.clone()),
        ));
    }
    let supported = SchemaVersion::default();
    if !supported.is_compatible_with(&blob.header.schema) {
        return Err(EhmError::IoFailure(
            ErrorInfo::new("schema-incompatible", "stored blob schema is not readable")
                .with_context("found", blob.header.schema.to_string())
                .with_context("supported", supported.to_string()),
        ));
    }
    let stored_variant = Variant::from_name(&blob.header.variant)?;
    if stored_variant != config.variant() {
        return Err(EhmError::IoFailure(
            ErrorInfo::new("variant-mismatch", "stored blob belongs to a different variant")
                .with_context("key", config.key.clone())
                .with_context("expected", config.variant().name())
                .with_context("actual", stored_variant.name()),
        ));
    }
    if blob.header.element_count != config.element_count() as u64 {
        return Err(EhmError::IoFailure(
            ErrorInfo::new("short-read", "stored element count does not match configuration")
                .with_context("key", config.key.clone())
                .with_context("expected", config.element_count().to_string())
                .with_context("actual", blob.header.element_count.to_string()),
        ));
    }

    let mut payload = Payload::allocate(&config.spec);
    match blob.body {
        BlobBody::Raw(raw) => match &mut payload {
            Payload::StaticKeyword(keyword) => keyword.set_bytes(raw),
            _ => {
                return Err(EhmError::IoFailure(
                    ErrorInfo::new("body-shape", "raw body stored for an element variant")
                        .with_context("key", config.key.clone()),
                ))
            }
        },
        BlobBody::Elements(values) => match payload.elements_mut() {
            Some(store) => store.fill_from(&values)?,
            None => {
                return Err(EhmError::IoFailure(
                    ErrorInfo::new("body-shape", "element body stored for a raw variant")
                        .with_context("key", config.key.clone()),
                ))
            }
        },
    }
    Ok(payload)
}

/// Reads and decodes one payload image from `reader`.
pub fn read_payload(reader: &mut dyn Read, config: &NodeConfig) -> Result<Payload, EhmError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|err| {
        EhmError::IoFailure(
            ErrorInfo::new("blob-read", err.to_string())
                .with_context("key", config.key.clone()),
        )
    })?;
    decode_payload(&bytes, config)
}
