//! Hex and byte-order helpers.
//!
//! Hash digests are kept in internal byte order (as produced by the hash
//! function); every externally visible hex string — txid, block hash,
//! merkle root — is the byte-reversed "display" order. The conversion must
//! be applied exactly once when crossing that boundary.

use crate::error::SpvError;
use crate::sha256::hash256;

/// Decode a hex string into bytes.
///
/// Accepts mixed case and an optional `0x` prefix. An odd-length input is
/// left-padded with one zero nibble before decoding.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, SpvError> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    let padded;
    let normalized = if stripped.len() % 2 != 0 {
        padded = format!("0{stripped}");
        &padded
    } else {
        stripped
    };
    hex::decode(normalized).map_err(|e| SpvError::Format(format!("invalid hex: {e}")))
}

/// Encode bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Reverse a hex string at byte granularity.
pub fn reverse_hex(input: &str) -> Result<String, SpvError> {
    let mut bytes = decode_hex(input)?;
    bytes.reverse();
    Ok(hex::encode(bytes))
}

/// Render an internal-order digest in display order.
pub fn to_display_hex(digest: &[u8]) -> String {
    let mut bytes = digest.to_vec();
    bytes.reverse();
    hex::encode(bytes)
}

/// Decode a display-order hex string into internal-order bytes.
pub fn from_display_hex(input: &str) -> Result<Vec<u8>, SpvError> {
    let mut bytes = decode_hex(input)?;
    bytes.reverse();
    Ok(bytes)
}

/// hash256 of hex-encoded data, rendered in display order.
///
/// The common txid / block-hash derivation: decode the hex, double
/// SHA-256, byte-reverse for display.
pub fn hash256_display(raw_hex: &str) -> Result<String, SpvError> {
    let bytes = decode_hex(raw_hex)?;
    Ok(to_display_hex(&hash256(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain() {
        assert_eq!(decode_hex("00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode_hex("AbCd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_decode_0x_prefix() {
        assert_eq!(decode_hex("0x0f").unwrap(), vec![0x0f]);
    }

    #[test]
    fn test_decode_odd_length_left_pads() {
        assert_eq!(decode_hex("f").unwrap(), vec![0x0f]);
        assert_eq!(decode_hex("fff").unwrap(), vec![0x0f, 0xff]);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(matches!(decode_hex("zz"), Err(SpvError::Format(_))));
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&[0x00, 0xff, 0x10]), "00ff10");
    }

    #[test]
    fn test_reverse_hex() {
        assert_eq!(reverse_hex("001122").unwrap(), "221100");
    }

    #[test]
    fn test_display_conversion_is_involution() {
        let digest = hash256(b"involution");
        let display = to_display_hex(&digest);
        let back = from_display_hex(&display).unwrap();
        assert_eq!(back, digest.to_vec());
        // Reversing twice at the hex level is the identity as well.
        assert_eq!(reverse_hex(&reverse_hex(&display).unwrap()).unwrap(), display);
    }

    #[test]
    fn test_hash256_display() {
        // hash256 of the empty byte sequence, byte-reversed.
        assert_eq!(
            hash256_display("").unwrap(),
            "56944c5d3f98413ef45cf54545538103cc9f298e0575820ad3591376e2e0f65d"
        );
    }
}
