//! Password hashing and signed session tokens.
//!
//! Passwords are stored as hex-encoded PBKDF2-HMAC-SHA256 output over the
//! per-user salt.
//!
//! A session token is `<user_id>.<password_version>.<signature>` where the
//! signature is an HMAC-SHA256 over the first two parts, URL-safe base64
//! encoded. The token itself never expires; it stops working as soon as the
//! user's password version moves on.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[cfg(not(test))]
const PBKDF2_ROUNDS: u32 = 100_000;
#[cfg(test)]
const PBKDF2_ROUNDS: u32 = 1_000;

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut key = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut key);
    key.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compares in time independent of where the hashes first differ.
pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    let actual = hash_password(salt, password);
    actual.len() == expected_hash.len()
        && actual
            .bytes()
            .zip(expected_hash.bytes())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

fn mac(secret: &str, payload: &str) -> HmacSha256 {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 takes keys of any size"),
    };
    mac.update(payload.as_bytes());
    mac
}

pub fn issue_token(secret: &str, user_id: &str, password_version: u32) -> String {
    let payload = format!("{}.{}", user_id, password_version);
    let signature = URL_SAFE_NO_PAD.encode(mac(secret, &payload).finalize().into_bytes());
    format!("{}.{}", payload, signature)
}

/// Returns `(user_id, password_version)` when the signature checks out.
pub fn verify_token(secret: &str, token: &str) -> Option<(String, u32)> {
    let mut parts = token.rsplitn(2, '.');
    let signature = URL_SAFE_NO_PAD.decode(parts.next()?).ok()?;
    let payload = parts.next()?;
    mac(secret, payload).verify_slice(&signature).ok()?;

    let (user_id, version) = payload.rsplit_once('.')?;
    Some((user_id.to_string(), version.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_depends_on_salt() {
        let hash = hash_password("s1", "hunter2");
        assert!(verify_password("s1", "hunter2", &hash));
        assert!(!verify_password("s2", "hunter2", &hash));
        assert!(!verify_password("s1", "hunter3", &hash));
        assert!(!verify_password("s1", "hunter2", &hash[..hash.len() - 1]));
    }

    #[test]
    fn password_hash_is_a_stretched_key() {
        let hash = hash_password("s1", "hunter2");
        assert_eq!(hash.len(), 64);
        assert!(hash.bytes().all(|b| b.is_ascii_hexdigit()));

        let mut single_round = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"hunter2", b"s1", 1, &mut single_round);
        let single_round: String = single_round.iter().map(|b| format!("{:02x}", b)).collect();
        assert_ne!(hash, single_round);
    }

    #[test]
    fn tokens_round_trip_and_reject_tampering() {
        let token = issue_token("secret", "rec123", 4);
        assert_eq!(verify_token("secret", &token), Some(("rec123".to_string(), 4)));
        assert_eq!(verify_token("other", &token), None);

        let forged = token.replacen("rec123.4", "rec123.5", 1);
        assert_eq!(verify_token("secret", &forged), None);
        assert_eq!(verify_token("secret", "garbage"), None);
    }
}
