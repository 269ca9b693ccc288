//! Compressed integers as used by the `#Blob`/`#US` heaps and by signatures.

/// # II.23.2 Blobs and signatures
///
/// [...]
///
/// * If the first one byte of the 'blob' is *0bbbbbbb*, then the rest of the
///   'blob' contains the *bbbbbbb* bytes of actual data.
/// * If the first two bytes of the 'blob' are *10bbbbbb* and *x*, then the rest
///   of the 'blob' contains the (*bbbbbb* << 8 + *x*) bytes of actual data.
/// * If the first four bytes of the 'blob' are *110bbbbb*, *x*, *y*, and *z*,
///   then the rest of the 'blob' contains the
///   (*bbbbb* << 24 + *x* << 16 + *y* << 8 + *z*) bytes of actual data.
///
/// Returns the value and the number of bytes read, or `None` when the leading
/// byte matches none of the three patterns or the data is too short.
pub fn read_compressed_u32(data: &[u8]) -> Option<(u32, usize)> {
    let first = *data.first()?;

    if first & 0b1000_0000 == 0 {
        Some(((first & 0x7F) as u32, 1))
    } else if first & 0b0100_0000 == 0 {
        let value = ((first & 0x3F) as u32) << 8 | *data.get(1)? as u32;
        Some((value, 2))
    } else if first & 0b0010_0000 == 0 {
        let value = ((first & 0x1F) as u32) << 24
            | (*data.get(1)? as u32) << 16
            | (*data.get(2)? as u32) << 8
            | *data.get(3)? as u32;
        Some((value, 4))
    } else {
        None
    }
}

/// Signed variant: the same three wire widths, holding an N-bit integer
/// (N = 7, 14 or 29) that has been rotated left by one within its width.
/// Decoding rotates right by one and sign-extends.
pub fn read_compressed_i32(data: &[u8]) -> Option<(i32, usize)> {
    let (value, size) = read_compressed_u32(data)?;
    let bits = match size {
        1 => 7,
        2 => 14,
        _ => 29,
    };

    // Rotate right by one within the encoded width.
    let rotated = (value >> 1) | ((value & 1) << (bits - 1));

    // Sign-extend from `bits` to 32.
    let signed = if rotated & (1 << (bits - 1)) != 0 {
        (rotated | (u32::MAX << bits)) as i32
    } else {
        rotated as i32
    };

    Some((signed, size))
}

/// Inverse of [`read_compressed_u32`]; values above `0x1FFFFFFF` are not
/// representable.
pub fn encode_compressed_u32(value: u32) -> Option<Vec<u8>> {
    if value < 0x80 {
        Some(vec![value as u8])
    } else if value < 0x4000 {
        Some((0x8000u16 | value as u16).to_be_bytes().to_vec())
    } else if value <= 0x1FFF_FFFF {
        Some((0xC000_0000u32 | value).to_be_bytes().to_vec())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_widths() {
        assert_eq!(read_compressed_u32(&[0x03]), Some((0x03, 1)));
        assert_eq!(read_compressed_u32(&[0x7F]), Some((0x7F, 1)));
        assert_eq!(read_compressed_u32(&[0x80, 0x80]), Some((0x80, 2)));
        assert_eq!(read_compressed_u32(&[0xAE, 0x57]), Some((0x2E57, 2)));
        assert_eq!(read_compressed_u32(&[0xBF, 0xFF]), Some((0x3FFF, 2)));
        assert_eq!(read_compressed_u32(&[0xC0, 0x00, 0x40, 0x00]), Some((0x4000, 4)));
        assert_eq!(
            read_compressed_u32(&[0xDF, 0xFF, 0xFF, 0xFF]),
            Some((0x1FFF_FFFF, 4))
        );
    }

    #[test]
    fn unsigned_invalid() {
        assert_eq!(read_compressed_u32(&[]), None);
        // 111xxxxx is not a defined width.
        assert_eq!(read_compressed_u32(&[0xE0, 0x00, 0x00, 0x00]), None);
        assert_eq!(read_compressed_u32(&[0xFF]), None);
        // truncated multi-byte forms
        assert_eq!(read_compressed_u32(&[0x80]), None);
        assert_eq!(read_compressed_u32(&[0xC0, 0x00]), None);
    }

    #[test]
    fn unsigned_round_trip() {
        for value in [0u32, 1, 0x7F, 0x80, 0x2E57, 0x3FFF, 0x4000, 0x1234_5678, 0x1FFF_FFFF] {
            let encoded = encode_compressed_u32(value).unwrap();
            assert_eq!(
                read_compressed_u32(&encoded),
                Some((value, encoded.len())),
                "value 0x{:x}",
                value
            );
        }
        assert_eq!(encode_compressed_u32(0x2000_0000), None);
    }

    /// The example pairs listed in ECMA-335 II.23.2.
    #[test]
    fn signed_ecma_vectors() {
        assert_eq!(read_compressed_i32(&[0x06]), Some((3, 1)));
        assert_eq!(read_compressed_i32(&[0x7B]), Some((-3, 1)));
        assert_eq!(read_compressed_i32(&[0x80, 0x80]), Some((64, 2)));
        assert_eq!(read_compressed_i32(&[0x01]), Some((-64, 1)));
        assert_eq!(read_compressed_i32(&[0xC0, 0x00, 0x40, 0x00]), Some((8192, 4)));
        assert_eq!(read_compressed_i32(&[0x80, 0x01]), Some((-8192, 2)));
        assert_eq!(
            read_compressed_i32(&[0xDF, 0xFF, 0xFF, 0xFE]),
            Some((268435455, 4))
        );
        assert_eq!(
            read_compressed_i32(&[0xC0, 0x00, 0x00, 0x01]),
            Some((-268435456, 4))
        );
    }
}
