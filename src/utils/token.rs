use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Bearer tokens are opaque to clients: a random alphanumeric string handed
/// out once, persisted only as a SHA-256 digest. Resolving a request token is
/// a hash-then-lookup, never a decode.
pub const TOKEN_LENGTH: usize = 48;

pub fn mint() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn hash(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());

    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_produces_alphanumeric_tokens() {
        let token = mint();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_mint_is_not_repeatable() {
        assert_ne!(mint(), mint());
    }

    #[test]
    fn test_hash_is_deterministic_hex() {
        let token = "abc123";

        let first = hash(token);
        let second = hash(token);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_differs_per_token() {
        assert_ne!(hash("token-a"), hash("token-b"));
    }

    #[test]
    fn test_hash_known_vector() {
        // sha256("") — guards against accidental digest or encoding changes.
        assert_eq!(
            hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
