//! GLB container packaging.
//!
//! Layout (all integers little-endian):
//! ```text
//! header : magic "glTF" | version 2 | total length
//! chunk 0: length | "JSON" | JSON text padded with spaces to 4 bytes
//! chunk 1: length | "BIN\0" | buffer data padded with zeros (optional)
//! ```

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde_json::Map;

use crate::convert::adapter::{ConversionAdapter, ConvertError, EncodeOptions};
use crate::model::{Buffer, ModelDocument};

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Packs customized documents into GLB on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlbPackager;

#[async_trait]
impl ConversionAdapter for GlbPackager {
    async fn encode(&self, model: ModelDocument, options: EncodeOptions) -> Result<Bytes, ConvertError> {
        if options.compression {
            return Err(ConvertError::Unsupported("mesh compression"));
        }

        tokio::task::spawn_blocking(move || pack_glb(model))
            .await
            .map_err(|e| ConvertError::Worker(e.to_string()))?
    }
}

fn pad_to_four(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

/// Decode a `data:...;base64,` buffer, truncated to its declared length.
fn decode_buffer(index: usize, buffer: &Buffer) -> Result<Vec<u8>, ConvertError> {
    let payload = buffer
        .uri
        .as_deref()
        .filter(|uri| uri.starts_with("data:"))
        .and_then(|uri| uri.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or(ConvertError::ExternalBuffer { index })?;

    let mut data = STANDARD
        .decode(payload)
        .map_err(|source| ConvertError::Base64 { index, source })?;

    if data.len() < buffer.byte_length {
        return Err(ConvertError::BufferLength {
            index,
            expected: buffer.byte_length,
            actual: data.len(),
        });
    }
    data.truncate(buffer.byte_length);
    Ok(data)
}

/// Convert a document with embedded buffers into a GLB container.
///
/// All buffers are merged into one BIN chunk, each starting on a 4-byte
/// boundary, and every buffer view is rebased onto buffer 0.
pub fn pack_glb(mut document: ModelDocument) -> Result<Bytes, ConvertError> {
    let mut bin = Vec::new();
    let mut offsets = Vec::with_capacity(document.buffers.len());
    for (index, buffer) in document.buffers.iter().enumerate() {
        let data = decode_buffer(index, buffer)?;
        offsets.push(bin.len());
        bin.extend_from_slice(&data);
        pad_to_four(&mut bin, 0);
    }

    for (view_index, view) in document.buffer_views.iter_mut().enumerate() {
        let base = *offsets
            .get(view.buffer)
            .ok_or(ConvertError::DanglingBufferView {
                view: view_index,
                buffer: view.buffer,
            })?;
        view.byte_offset = Some(base + view.byte_offset.unwrap_or(0));
        view.buffer = 0;
    }

    if !document.buffers.is_empty() {
        document.buffers = vec![Buffer {
            byte_length: bin.len(),
            uri: None,
            extra: Map::new(),
        }];
    }

    let mut json = serde_json::to_vec(&document)?;
    pad_to_four(&mut json, b' ');

    let mut total = HEADER_LEN + CHUNK_HEADER_LEN + json.len();
    if !bin.is_empty() {
        total += CHUNK_HEADER_LEN + bin.len();
    }
    let total_u32 = u32::try_from(total).map_err(|_| ConvertError::TooLarge)?;

    let mut out = BytesMut::with_capacity(total);
    out.put_u32_le(GLB_MAGIC);
    out.put_u32_le(GLB_VERSION);
    out.put_u32_le(total_u32);

    out.put_u32_le(json.len() as u32);
    out.put_u32_le(CHUNK_JSON);
    out.put_slice(&json);

    if !bin.is_empty() {
        out.put_u32_le(bin.len() as u32);
        out.put_u32_le(CHUNK_BIN);
        out.put_slice(&bin);
    }

    Ok(out.freeze())
}

/// Split a GLB container back into its document and binary chunk.
pub fn unpack_glb(mut glb: &[u8]) -> Result<(ModelDocument, Vec<u8>), ConvertError> {
    if glb.remaining() < HEADER_LEN {
        return Err(ConvertError::InvalidContainer("truncated header"));
    }
    if glb.get_u32_le() != GLB_MAGIC {
        return Err(ConvertError::InvalidContainer("bad magic"));
    }
    if glb.get_u32_le() != GLB_VERSION {
        return Err(ConvertError::InvalidContainer("unsupported version"));
    }
    let declared = glb.get_u32_le() as usize;
    if declared != HEADER_LEN + glb.remaining() {
        return Err(ConvertError::InvalidContainer("length mismatch"));
    }

    let mut document = None;
    let mut bin = Vec::new();
    while glb.has_remaining() {
        if glb.remaining() < CHUNK_HEADER_LEN {
            return Err(ConvertError::InvalidContainer("truncated chunk header"));
        }
        let len = glb.get_u32_le() as usize;
        let kind = glb.get_u32_le();
        if glb.remaining() < len {
            return Err(ConvertError::InvalidContainer("truncated chunk"));
        }
        let (data, rest) = glb.split_at(len);
        match kind {
            CHUNK_JSON => document = Some(serde_json::from_slice(data)?),
            CHUNK_BIN => bin = data.to_vec(),
            _ => {}
        }
        glb = rest;
    }

    let document = document.ok_or(ConvertError::InvalidContainer("missing JSON chunk"))?;
    Ok((document, bin))
}
