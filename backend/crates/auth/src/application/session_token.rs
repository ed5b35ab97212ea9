//! Signed session token carried in the cookie: `<session uuid>.<signature>`
//! where the signature is base64url HMAC-SHA256 of the uuid text.

use kernel::id::SessionId;
use platform::crypto::{sign, verify_signature};

pub fn encode(secret: &[u8], session_id: SessionId) -> String {
    let id = session_id.to_string();
    let signature = sign(secret, id.as_bytes());
    format!("{id}.{signature}")
}

/// `None` for malformed tokens and bad signatures
pub fn decode(secret: &[u8], token: &str) -> Option<SessionId> {
    let (id, signature) = token.split_once('.')?;
    if !verify_signature(secret, id.as_bytes(), signature) {
        return None;
    }
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_decode_accepts_own_tokens() {
        let id = SessionId::new();
        let token = encode(SECRET, id);
        assert_eq!(decode(SECRET, &token), Some(id));
    }

    #[test]
    fn test_decode_rejects_tampering() {
        let token = encode(SECRET, SessionId::new());
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", SessionId::new(), signature);

        assert_eq!(decode(SECRET, &forged), None);
        assert_eq!(decode(b"other-secret", &token), None);
        assert_eq!(decode(SECRET, "no-dot-here"), None);
        assert_eq!(decode(SECRET, ""), None);
    }

    #[test]
    fn test_signature_over_non_uuid_is_rejected() {
        let signature = sign(SECRET, b"not-a-uuid");
        assert_eq!(decode(SECRET, &format!("not-a-uuid.{signature}")), None);
    }
}
