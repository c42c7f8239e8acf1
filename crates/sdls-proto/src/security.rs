//! Reading and writing the variable-length security header/trailer fields.
//!
//! Field lengths (`shivf_len`, `shsnf_len`, `shplf_len`, `stmacf_len`) are a
//! property of the Security Association that owns the frame, not of this
//! crate, so every function here takes them as explicit parameters.

use crate::errors::ProtocolError;

/// Borrowed view over a parsed security header: `SPI(2) || IV || ARC ||
/// PAD_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityHeaderFields<'a> {
    /// Security Parameter Index.
    pub spi: u16,
    /// Initialization vector, `shivf_len` octets.
    pub iv: &'a [u8],
    /// Anti-replay counter (or sequence number), `shsnf_len` octets.
    pub arc: &'a [u8],
    /// Pad length field, `shplf_len` octets.
    pub pad_length: &'a [u8],
}

/// Append a security header (`SPI || IV || ARC || PAD_LEN`) to `out`.
pub fn write_security_header(out: &mut Vec<u8>, spi: u16, iv: &[u8], arc: &[u8], pad_length: &[u8]) {
    out.extend_from_slice(&spi.to_be_bytes());
    out.extend_from_slice(iv);
    out.extend_from_slice(arc);
    out.extend_from_slice(pad_length);
}

/// Read a security header from the front of `bytes`, given the SA's field
/// lengths. Returns the parsed fields (borrowing from `bytes`) and the
/// remaining slice after the security header.
///
/// # Errors
///
/// Returns [`ProtocolError::SecurityFieldTooShort`] if `bytes` does not hold
/// at least `2 + shivf_len + shsnf_len + shplf_len` octets.
pub fn read_security_header(
    bytes: &[u8],
    shivf_len: usize,
    shsnf_len: usize,
    shplf_len: usize,
) -> Result<(SecurityHeaderFields<'_>, &[u8]), ProtocolError> {
    let needed = 2 + shivf_len + shsnf_len + shplf_len;
    if bytes.len() < needed {
        return Err(ProtocolError::SecurityFieldTooShort { expected: needed, actual: bytes.len() });
    }

    let spi = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut offset = 2;

    let iv = &bytes[offset..offset + shivf_len];
    offset += shivf_len;

    let arc = &bytes[offset..offset + shsnf_len];
    offset += shsnf_len;

    let pad_length = &bytes[offset..offset + shplf_len];
    offset += shplf_len;

    Ok((SecurityHeaderFields { spi, iv, arc, pad_length }, &bytes[offset..]))
}

/// Read the trailing MAC field of `stmacf_len` octets from `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError::SecurityFieldTooShort`] if fewer than
/// `stmacf_len` octets are available.
pub fn read_mac(bytes: &[u8], stmacf_len: usize) -> Result<&[u8], ProtocolError> {
    if bytes.len() < stmacf_len {
        return Err(ProtocolError::SecurityFieldTooShort {
            expected: stmacf_len,
            actual: bytes.len(),
        });
    }
    Ok(&bytes[..stmacf_len])
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn round_trip(
            spi in any::<u16>(),
            iv in prop::collection::vec(any::<u8>(), 0..=16),
            arc in prop::collection::vec(any::<u8>(), 0..=4),
            pad_length in prop::collection::vec(any::<u8>(), 0..=1),
        ) {
            let mut buf = Vec::new();
            write_security_header(&mut buf, spi, &iv, &arc, &pad_length);
            buf.extend_from_slice(b"trailing payload bytes");

            let (fields, rest) = read_security_header(&buf, iv.len(), arc.len(), pad_length.len())
                .expect("should parse");
            prop_assert_eq!(fields.spi, spi);
            prop_assert_eq!(fields.iv, iv.as_slice());
            prop_assert_eq!(fields.arc, arc.as_slice());
            prop_assert_eq!(fields.pad_length, pad_length.as_slice());
            prop_assert_eq!(rest, b"trailing payload bytes".as_slice());
        }
    }

    #[test]
    fn reject_truncated_security_header() {
        let buf = [0u8, 1, 2];
        let result = read_security_header(&buf, 4, 0, 0);
        assert_eq!(result, Err(ProtocolError::SecurityFieldTooShort { expected: 6, actual: 3 }));
    }
}
