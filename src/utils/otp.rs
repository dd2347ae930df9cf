//! Time-step one-time codes for password resets.
//!
//! HMAC-SHA256 over the current time-step counter, truncated to six digits
//! (the HOTP dynamic-truncation scheme). Verification accepts codes from a
//! configurable number of steps on either side of the current one, so a code
//! stays usable for clock skew and delivery delay.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of digits in a generated code.
const CODE_DIGITS: u32 = 6;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Derives the code for one counter value.
fn hotp(secret: &[u8], counter: u64) -> u32 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation: low nibble of the last byte picks the offset.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let code = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    code % 10u32.pow(CODE_DIGITS)
}

/// Generates the code for the current time step.
pub fn generate(secret: &str, step_seconds: u64) -> String {
    generate_at(secret, step_seconds, unix_now())
}

/// Generates the code for the time step containing `unix_seconds`.
pub fn generate_at(secret: &str, step_seconds: u64, unix_seconds: u64) -> String {
    let counter = unix_seconds / step_seconds.max(1);
    format!("{:06}", hotp(secret.as_bytes(), counter))
}

/// Verifies a code against the current time, accepting `window` steps of
/// drift on either side.
pub fn verify(secret: &str, step_seconds: u64, window: u64, code: &str) -> bool {
    verify_at(secret, step_seconds, window, code, unix_now())
}

/// Verifies a code against the time step containing `unix_seconds`.
pub fn verify_at(
    secret: &str,
    step_seconds: u64,
    window: u64,
    code: &str,
    unix_seconds: u64,
) -> bool {
    let current = (unix_seconds / step_seconds.max(1)) as i64;
    let window = window as i64;

    (-window..=window).any(|delta| {
        let counter = current + delta;
        counter >= 0 && format!("{:06}", hotp(secret.as_bytes(), counter as u64)) == code
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "shared-otp-secret";
    const STEP: u64 = 30;

    #[test]
    fn test_code_is_six_digits() {
        let code = generate_at(SECRET, STEP, 1_700_000_000);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_same_step_same_code() {
        // Both timestamps fall in the same 30s step
        let a = generate_at(SECRET, STEP, 1_700_000_010);
        let b = generate_at(SECRET, STEP, 1_700_000_020);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_secret_different_code() {
        let a = generate_at(SECRET, STEP, 1_700_000_000);
        let b = generate_at("another-secret", STEP, 1_700_000_000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_current_step() {
        let now = 1_700_000_000;
        let code = generate_at(SECRET, STEP, now);
        assert!(verify_at(SECRET, STEP, 0, &code, now));
    }

    #[test]
    fn test_verify_within_window() {
        let issued = 1_700_000_000;
        let code = generate_at(SECRET, STEP, issued);

        // Three steps later, still inside a window of five
        assert!(verify_at(SECRET, STEP, 5, &code, issued + 3 * STEP));
    }

    #[test]
    fn test_verify_outside_window() {
        let issued = 1_700_000_000;
        let code = generate_at(SECRET, STEP, issued);

        // Six steps later, outside a window of five
        assert!(!verify_at(SECRET, STEP, 5, &code, issued + 6 * STEP));
    }

    #[test]
    fn test_verify_rejects_wrong_code() {
        assert!(!verify_at(SECRET, STEP, 5, "000000", 1_700_000_000)
            || generate_at(SECRET, STEP, 1_700_000_000) == "000000");
    }
}
