//! Framer webhook signature verification.
//!
//! Framer signs each form submission with HMAC-SHA256 over the raw request
//! body followed by the submission id, and sends it as
//! `framer-signature: sha256=<64 hex chars>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Prefix of every Framer signature.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// `sha256=` plus 64 hex characters.
pub const SIGNATURE_LENGTH: usize = SIGNATURE_PREFIX.len() + 64;

/// Verify a Framer webhook signature.
///
/// # Arguments
///
/// * `secret` - The webhook signing secret configured in Framer
/// * `submission_id` - The `framer-webhook-submission-id` header value
/// * `payload` - The raw, undecoded request body
/// * `signature` - The `framer-signature` header value
///
/// # Returns
///
/// `true` only if the signature is well formed and matches.
pub fn verify_framer_signature(
    secret: &str,
    submission_id: &str,
    payload: &[u8],
    signature: &str,
) -> bool {
    verify_with(signature, || {
        compute_framer_signature(secret, submission_id, payload)
    })
}

/// Compute the signature Framer would send for this body and submission id.
pub fn compute_framer_signature(secret: &str, submission_id: &str, payload: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            // An empty result never matches a well formed signature.
            warn!("framer_signature_invalid_key");
            return String::new();
        }
    };

    mac.update(payload);
    mac.update(submission_id.as_bytes());

    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Check the signature shape, then compare it against the expected value.
///
/// `expected` is only invoked for well formed signatures.
fn verify_with<F>(signature: &str, expected: F) -> bool
where
    F: FnOnce() -> String,
{
    if !is_well_formed(signature) {
        warn!(
            actual_length = signature.len(),
            has_prefix = signature.starts_with(SIGNATURE_PREFIX),
            "framer_signature_malformed"
        );
        return false;
    }

    let expected_signature = expected();

    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!("framer_signature_mismatch");
    }

    valid
}

fn is_well_formed(signature: &str) -> bool {
    signature.len() == SIGNATURE_LENGTH && signature.starts_with(SIGNATURE_PREFIX)
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Every byte is visited once lengths agree; the result does not depend on
/// where the first difference is.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const SECRET: &str = "framer-test-secret";
    const SUBMISSION_ID: &str = "sub_7f3a9c";
    const BODY: &[u8] = br#"{"registration":"ab12cde","name":"Jo"}"#;

    #[test]
    fn test_signature_shape() {
        let signature = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);

        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        assert_eq!(SIGNATURE_LENGTH, 71);
        assert!(signature.starts_with("sha256="));
        assert!(signature[7..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_is_hmac_of_body_then_submission_id() {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        let mut concatenated = BODY.to_vec();
        concatenated.extend_from_slice(SUBMISSION_ID.as_bytes());
        mac.update(&concatenated);
        let expected = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert_eq!(compute_framer_signature(SECRET, SUBMISSION_ID, BODY), expected);
    }

    #[test]
    fn test_verify_signature_valid() {
        let signature = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);

        assert!(verify_framer_signature(SECRET, SUBMISSION_ID, BODY, &signature));
    }

    #[test]
    fn test_verify_signature_any_bit_flip_rejected() {
        let signature = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);

        for index in 0..signature.len() {
            for bit in 0..8 {
                let mut bytes = signature.clone().into_bytes();
                bytes[index] ^= 1 << bit;
                // High-bit flips are not UTF-8; the lossy replacement changes the length.
                let tampered = String::from_utf8_lossy(&bytes).into_owned();
                assert!(
                    !verify_framer_signature(SECRET, SUBMISSION_ID, BODY, &tampered),
                    "flip at byte {index} bit {bit} accepted"
                );
            }
        }
    }

    #[test]
    fn test_verify_signature_wrong_inputs() {
        let signature = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);

        assert!(!verify_framer_signature("other-secret", SUBMISSION_ID, BODY, &signature));
        assert!(!verify_framer_signature(SECRET, "sub_other", BODY, &signature));
        assert!(!verify_framer_signature(SECRET, SUBMISSION_ID, b"{}", &signature));
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        let signature = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);
        let upper = format!("sha256={}", signature[7..].to_uppercase());

        assert!(!verify_framer_signature(SECRET, SUBMISSION_ID, BODY, &upper));
    }

    #[test]
    fn test_malformed_signature_skips_hmac() {
        let calls = Cell::new(0);
        let expected = || {
            calls.set(calls.get() + 1);
            compute_framer_signature(SECRET, SUBMISSION_ID, BODY)
        };

        let valid = compute_framer_signature(SECRET, SUBMISSION_ID, BODY);
        let malformed = [
            String::new(),
            valid[7..].to_string(),
            format!("sha1={}", &valid[7..]),
            format!("{valid}0"),
            valid[..70].to_string(),
            format!("SHA256={}", &valid[7..]),
        ];

        for signature in &malformed {
            assert!(!verify_with(signature, expected));
        }
        assert_eq!(calls.get(), 0);

        assert!(verify_with(&valid, expected));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "xbc"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(constant_time_compare("", ""));
    }
}
