// ---------------------------------------------------------------------------
// scenario_codec – snapshot <-> file bytes
// ---------------------------------------------------------------------------
//
// Save: snapshot -> JSON -> lz4 -> header. Load accepts both headered files
// and plain JSON written by older builds or by hand.

use serde_json::Value;

use crate::file_header::{
    decompress_payload, unwrap_header, wrap_with_header_compressed, UnwrapResult,
};
use crate::scenario_error::ScenarioError;
use crate::scenario_types::ScenarioSnapshot;
use crate::serialization::parse_snapshot;

/// Encode a snapshot as a compressed, checksummed scenario file.
pub fn encode_scenario(snapshot: &ScenarioSnapshot) -> Result<Vec<u8>, ScenarioError> {
    let json = serde_json::to_vec(snapshot)?;
    Ok(wrap_with_header_compressed(&json))
}

/// Recover the raw JSON payload of a scenario file.
pub fn decode_scenario_json(bytes: &[u8]) -> Result<Value, ScenarioError> {
    let json = match unwrap_header(bytes)? {
        UnwrapResult::WithHeader { header, payload } => {
            let raw = if header.is_compressed() {
                decompress_payload(payload, header.raw_size)?
            } else {
                payload.to_vec()
            };
            if raw.len() != header.raw_size as usize {
                return Err(ScenarioError::Decode(format!(
                    "decoded scenario is {} bytes, header says {}",
                    raw.len(),
                    header.raw_size
                )));
            }
            raw
        }
        UnwrapResult::Legacy(plain) => plain.to_vec(),
    };
    Ok(serde_json::from_slice(&json)?)
}

/// Decode and upgrade a scenario file to the current snapshot version.
pub fn decode_scenario(bytes: &[u8]) -> Result<ScenarioSnapshot, ScenarioError> {
    parse_snapshot(decode_scenario_json(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_header::{wrap_with_header, MAGIC};

    #[test]
    fn test_encoded_file_has_header() {
        let bytes = encode_scenario(&ScenarioSnapshot::default()).unwrap();
        assert_eq!(&bytes[..4], &MAGIC);
        assert_eq!(decode_scenario(&bytes).unwrap(), ScenarioSnapshot::default());
    }

    #[test]
    fn test_plain_json_file_loads() {
        let snapshot = decode_scenario(br#"{"reductionTarget": 35}"#).unwrap();
        assert_eq!(snapshot.reduction_target, 35.0);
    }

    #[test]
    fn test_uncompressed_headered_file_loads() {
        let bytes = wrap_with_header(br#"{"version": 3, "horizonYears": 15}"#);
        assert_eq!(decode_scenario(&bytes).unwrap().horizon_years, 15);
    }

    #[test]
    fn test_garbage_is_a_json_error() {
        assert!(matches!(
            decode_scenario(b"not json at all"),
            Err(ScenarioError::Json(_))
        ));
    }

    #[test]
    fn test_compressed_flag_on_plain_payload_fails_decode() {
        let mut bytes = wrap_with_header(b"{}");
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            decode_scenario(&bytes),
            Err(ScenarioError::Decode(_))
        ));
    }
}
