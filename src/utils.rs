use rand::Rng;

/// Format a nonce count for the `nc` parameter: eight lowercase hex digits, zero padded.
///
/// Returns `None` for counts that are not positive. Counts above `0xffffffff` are
/// not truncated and format to more than eight digits.
pub fn format_nonce_count(n: i64) -> Option<String> {
    if n <= 0 {
        return None;
    }
    Some(format!("{:08x}", n))
}

/// Read an `nc` value back. Only the form [`format_nonce_count`] produces is accepted:
/// exactly eight lowercase hex digits.
pub(crate) fn parse_nonce_count(nc: &str) -> Option<i64> {
    if nc.len() != 8 || !nc.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }
    i64::from_str_radix(nc, 16).ok()
}

/// Encode a string as ISO-8859-1 bytes, substituting `?` for characters outside it.
pub(crate) fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) => b,
            Err(_) => b'?',
        })
        .collect()
}

/// Generate a random client nonce: 16 random bytes, hex encoded.
pub fn generate_client_nonce() -> String {
    let mut rng = rand::thread_rng();
    let nonce_bytes: [u8; 16] = rng.gen();
    hex::encode(nonce_bytes)
}

/// Compare without short-circuiting on the first differing byte
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nonce_count() {
        assert_eq!(format_nonce_count(1).as_deref(), Some("00000001"));
        assert_eq!(format_nonce_count(255).as_deref(), Some("000000ff"));
        assert_eq!(format_nonce_count(0xdeadbeef).as_deref(), Some("deadbeef"));
        assert_eq!(format_nonce_count(0), None);
        assert_eq!(format_nonce_count(-5), None);

        // not range checked
        assert_eq!(format_nonce_count(0x1_0000_0000).as_deref(), Some("100000000"));
    }

    #[test]
    fn test_parse_nonce_count() {
        assert_eq!(parse_nonce_count("00000001"), Some(1));
        assert_eq!(parse_nonce_count("deadbeef"), Some(0xdeadbeef));
        assert_eq!(parse_nonce_count("00000000"), Some(0));
        assert_eq!(parse_nonce_count("1"), None);
        assert_eq!(parse_nonce_count("+0000001"), None);
        assert_eq!(parse_nonce_count("0000000A"), None);
        assert_eq!(parse_nonce_count("000000001"), None);
        assert_eq!(parse_nonce_count(""), None);
    }

    #[test]
    fn test_latin1_bytes() {
        assert_eq!(latin1_bytes("Mufasa"), b"Mufasa".to_vec());
        assert_eq!(latin1_bytes("caf\u{e9}"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(latin1_bytes("\u{263a}x"), vec![b'?', b'x']);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"6629fae4", b"6629fae4"));
        assert!(!constant_time_eq(b"6629fae4", b"6629fae5"));
        assert!(!constant_time_eq(b"6629fae4", b"6629fae"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_client_nonce() {
        let a = generate_client_nonce();
        let b = generate_client_nonce();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
