use md5::{Digest, Md5};

/// Computes the packet checksum: a 32-character lowercase hex MD5 digest of `bytes`.
///
/// The caller is responsible for feeding in exactly the bytes the wire format specifies
/// (`KIND|SEQ|PAYLOAD|`, trailing pipe included) — this function has no opinion on framing.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    result.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_and_fixed_width() {
        let a = digest(b"data|0|join 1 alice|");
        let b = digest(b"data|0|join 1 alice|");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn digest_is_sensitive_to_every_field() {
        let base = digest(b"data|0|join 1 alice|");
        let diff_seq = digest(b"data|1|join 1 alice|");
        let diff_payload = digest(b"data|0|join 1 bob|");
        let diff_kind = digest(b"ack|0|join 1 alice|");
        assert_ne!(base, diff_seq);
        assert_ne!(base, diff_payload);
        assert_ne!(base, diff_kind);
    }
}
