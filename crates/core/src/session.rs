//! Session check values.
//!
//! A session cookie carries the claimed email together with a check value:
//! an HMAC-SHA256 of the email keyed by a server secret that lives in the
//! document store. A cookie whose check value does not match is treated as
//! anonymous.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

/// Number of random bytes in a freshly generated login secret.
pub const SECRET_BYTES: usize = 64;

type HmacSha256 = Hmac<Sha256>;

/// Generate a new random login secret, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Compute the check value for `email` under `secret`.
pub fn check_value(secret: &str, email: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(email.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a presented check value in constant time.
pub fn verify_check_value(secret: &str, email: &str, presented: &str) -> bool {
    let Some(presented) = hex::decode(presented) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(email.as_bytes());
    mac.verify_slice(&presented).is_ok()
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
            .collect()
    }
}
