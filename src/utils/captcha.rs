// src/utils/captcha.rs

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const LENGTH: usize = 6;

/// Generates a six-character alphanumeric challenge.
///
/// This is a mock hurdle carried over from the demo UI, not a security
/// device: the client holds the challenge and echoes it back on submit.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Compares the typed answer against the challenge, ignoring case.
pub fn verify(challenge: &str, answer: &str) -> bool {
    !challenge.is_empty() && challenge.eq_ignore_ascii_case(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_is_six_alphanumeric_chars() {
        for _ in 0..50 {
            let challenge = generate();
            assert_eq!(challenge.len(), LENGTH);
            assert!(challenge.bytes().all(|b| CHARSET.contains(&b)));
        }
    }

    #[test]
    fn verification_ignores_case() {
        assert!(verify("Ab3dEf", "aB3DeF"));
        assert!(verify("XYZ123", "xyz123"));
    }

    #[test]
    fn mismatch_and_empty_are_rejected() {
        assert!(!verify("Ab3dEf", "Ab3dEg"));
        assert!(!verify("Ab3dEf", ""));
        assert!(!verify("", ""));
    }
}
