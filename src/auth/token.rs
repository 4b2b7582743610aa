use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;

/// Cosmetic marker on issued tokens; nothing parses it back out.
pub const TOKEN_PREFIX: &str = "session_";

/// Generate an opaque session token: `length` characters drawn uniformly
/// from the 62-symbol alphanumeric alphabet, sourced from the OS CSPRNG.
///
/// Uniqueness is not guaranteed here; the unique index on the users table
/// rejects the (vanishingly unlikely) collision at save time.
pub fn generate_session_token(length: usize) -> String {
    let body = Alphanumeric.sample_string(&mut OsRng, length);
    format!("{TOKEN_PREFIX}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_prefix_and_requested_length() {
        let token = generate_session_token(192);
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + 192);

        let short = generate_session_token(16);
        assert_eq!(short.len(), TOKEN_PREFIX.len() + 16);
    }

    #[test]
    fn token_body_is_alphanumeric() {
        let token = generate_session_token(256);
        let body = token.strip_prefix(TOKEN_PREFIX).unwrap();
        assert!(body.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let first = generate_session_token(192);
        let second = generate_session_token(192);
        assert_ne!(first, second);
    }
}
