// ---------------------------------------------------------------------------
// file_header – Scenario file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (24 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "CPLN"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4 compressed)
//   [12..16] Raw (uncompressed) JSON size (u32)
//   [16..20] Payload size (u32)
//   [20..24] xxHash32 checksum of the payload (everything after the header)
//
// Legacy: a file that does not start with "CPLN" is plain JSON.

use xxhash_rust::xxh32::xxh32;

use crate::scenario_error::ScenarioError;

/// Magic bytes identifying a scenario file.
pub const MAGIC: [u8; 4] = *b"CPLN";

pub const HEADER_SIZE: usize = 24;

/// Tracks the header layout, not the snapshot schema.
pub const HEADER_FORMAT_VERSION: u32 = 1;

pub const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub raw_size: u32,
    pub payload_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    fn for_payload(payload: &[u8], raw_size: usize, flags: u32) -> Self {
        Self {
            format_version: HEADER_FORMAT_VERSION,
            flags,
            raw_size: raw_size as u32,
            payload_size: payload.len() as u32,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.raw_size.to_le_bytes());
        out.extend_from_slice(&self.payload_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }
}

fn wrap(payload: &[u8], raw_size: usize, flags: u32) -> Vec<u8> {
    let header = FileHeader::for_payload(payload, raw_size, flags);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(payload);
    out
}

/// Prepend a header to an uncompressed payload.
pub fn wrap_with_header(data: &[u8]) -> Vec<u8> {
    wrap(data, data.len(), 0)
}

/// Compress `data` with LZ4 and prepend a header with the compressed flag.
pub fn wrap_with_header_compressed(data: &[u8]) -> Vec<u8> {
    let compressed = lz4_flex::compress_prepend_size(data);
    wrap(&compressed, data.len(), FLAG_COMPRESSED)
}

/// Upper bound on the LZ4 expansion ratio. A header claiming more than this
/// is rejected before anything is allocated.
const MAX_LZ4_RATIO: usize = 255;

/// Inverse of the compression in [`wrap_with_header_compressed`].
///
/// The size prefix inside the payload must agree with the header's
/// `raw_size`, and `raw_size` must be reachable from the payload length.
pub fn decompress_payload(payload: &[u8], raw_size: u32) -> Result<Vec<u8>, ScenarioError> {
    if payload.len() < 4 {
        return Err(ScenarioError::Decode(format!(
            "compressed payload is {} bytes, too short for its size prefix",
            payload.len()
        )));
    }
    let prefix = read_u32(payload, 0);
    if prefix != raw_size {
        return Err(ScenarioError::Decode(format!(
            "compressed payload claims {prefix} bytes, header says {raw_size}"
        )));
    }
    let raw_size = raw_size as usize;
    if raw_size > payload.len().saturating_mul(MAX_LZ4_RATIO) {
        return Err(ScenarioError::Decode(format!(
            "header size {raw_size} is not reachable from a {} byte payload",
            payload.len()
        )));
    }
    Ok(lz4_flex::decompress(&payload[4..], raw_size)?)
}

pub enum UnwrapResult<'a> {
    WithHeader {
        header: FileHeader,
        payload: &'a [u8],
    },
    /// No header; the whole buffer is plain JSON.
    Legacy(&'a [u8]),
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the header.
///
/// # Errors
///
/// `Decode` for a truncated file or a newer header format, `Checksum` when the
/// payload does not match the stored hash.
pub fn unwrap_header(bytes: &[u8]) -> Result<UnwrapResult<'_>, ScenarioError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Ok(UnwrapResult::Legacy(bytes));
    }

    if bytes.len() < HEADER_SIZE {
        return Err(ScenarioError::Decode(format!(
            "scenario file has CPLN magic but is too short ({} bytes, need {})",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let header = FileHeader {
        format_version: read_u32(bytes, 4),
        flags: read_u32(bytes, 8),
        raw_size: read_u32(bytes, 12),
        payload_size: read_u32(bytes, 16),
        checksum: read_u32(bytes, 20),
    };

    if header.format_version > HEADER_FORMAT_VERSION {
        return Err(ScenarioError::Decode(format!(
            "scenario file uses header format {}, this build supports up to {}",
            header.format_version, HEADER_FORMAT_VERSION
        )));
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != header.payload_size as usize {
        return Err(ScenarioError::Decode(format!(
            "scenario payload is {} bytes, header says {}",
            payload.len(),
            header.payload_size
        )));
    }

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(ScenarioError::Checksum {
            expected: header.checksum,
            found: computed,
        });
    }

    Ok(UnwrapResult::WithHeader { header, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap_roundtrip() {
        let data = br#"{"version":3}"#;
        let wrapped = wrap_with_header(data);
        assert_eq!(&wrapped[..4], b"CPLN");
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        match unwrap_header(&wrapped).unwrap() {
            UnwrapResult::WithHeader { header, payload } => {
                assert!(!header.is_compressed());
                assert_eq!(header.raw_size, data.len() as u32);
                assert_eq!(payload, data);
            }
            UnwrapResult::Legacy(_) => panic!("expected WithHeader, got Legacy"),
        }
    }

    #[test]
    fn test_compressed_payload_decompresses() {
        let data = br#"{"rawInputs":{"electricity":"1000","electricity_2":"1000"}}"#;
        let wrapped = wrap_with_header_compressed(data);
        match unwrap_header(&wrapped).unwrap() {
            UnwrapResult::WithHeader { header, payload } => {
                assert!(header.is_compressed());
                assert_eq!(header.raw_size, data.len() as u32);
                assert_eq!(decompress_payload(payload, header.raw_size).unwrap(), data);
            }
            UnwrapResult::Legacy(_) => panic!("expected WithHeader, got Legacy"),
        }
    }

    #[test]
    fn test_size_prefix_must_match_header() {
        let data = br#"{"reductionTarget": 25}"#;
        let mut compressed = lz4_flex::compress_prepend_size(data);
        compressed[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let wrapped = wrap(&compressed, data.len(), FLAG_COMPRESSED);
        match unwrap_header(&wrapped).unwrap() {
            UnwrapResult::WithHeader { header, payload } => {
                assert!(matches!(
                    decompress_payload(payload, header.raw_size),
                    Err(ScenarioError::Decode(_))
                ));
            }
            UnwrapResult::Legacy(_) => panic!("expected WithHeader, got Legacy"),
        }
    }

    #[test]
    fn test_oversized_raw_size_is_rejected() {
        let claimed = u32::MAX;
        let mut compressed = lz4_flex::compress_prepend_size(b"{}");
        compressed[..4].copy_from_slice(&claimed.to_le_bytes());
        assert!(matches!(
            decompress_payload(&compressed, claimed),
            Err(ScenarioError::Decode(_))
        ));
        assert!(matches!(
            decompress_payload(&[1, 0], 1),
            Err(ScenarioError::Decode(_))
        ));
    }

    #[test]
    fn test_plain_json_is_legacy() {
        let data = br#"{"reductionTarget": 25}"#;
        assert!(matches!(
            unwrap_header(data).unwrap(),
            UnwrapResult::Legacy(p) if p == data
        ));
        assert!(matches!(unwrap_header(b"").unwrap(), UnwrapResult::Legacy(_)));
    }

    #[test]
    fn test_corrupted_payload_fails_checksum() {
        let mut wrapped = wrap_with_header(b"some scenario payload");
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(ScenarioError::Checksum { .. })
        ));
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let wrapped = wrap_with_header(b"payload");
        assert!(matches!(
            unwrap_header(&wrapped[..10]),
            Err(ScenarioError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let wrapped = wrap_with_header(b"payload bytes");
        assert!(matches!(
            unwrap_header(&wrapped[..wrapped.len() - 3]),
            Err(ScenarioError::Decode(_))
        ));
    }

    #[test]
    fn test_future_header_version_is_rejected() {
        let mut wrapped = wrap_with_header(b"{}");
        wrapped[4..8].copy_from_slice(&(HEADER_FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(unwrap_header(&wrapped), Err(ScenarioError::Decode(_))));
    }
}
