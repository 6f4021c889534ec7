//! Content hashing utilities.

use xxhash_rust::xxh3::xxh3_128;

/// Derive a stable `urn:uuid:` serial number from content.
///
/// The 128-bit content hash is laid out as a UUID with the version nibble set
/// to 5 and the RFC 4122 variant bits set, so the result matches the
/// CycloneDX `serialNumber` pattern while staying identical for identical
/// content.
#[must_use]
pub fn content_serial_number(data: &[u8]) -> String {
    let mut bits = xxh3_128(data);
    bits = (bits & !(0xF_u128 << 76)) | (0x5_u128 << 76);
    bits = (bits & !(0x3_u128 << 62)) | (0x2_u128 << 62);
    let hex = format!("{bits:032x}");
    format!(
        "urn:uuid:{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_number_shape() {
        let serial = content_serial_number(b"{}");
        let uuid = serial.strip_prefix("urn:uuid:").unwrap();
        let groups: Vec<&str> = uuid.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('5'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn test_serial_number_is_stable() {
        assert_eq!(content_serial_number(b"abc"), content_serial_number(b"abc"));
        assert_ne!(content_serial_number(b"abc"), content_serial_number(b"abd"));
    }
}
