use log::*;
use rand::{distributions::Uniform, Rng};

use crate::db_types::ReferenceToken;

pub const TOKEN_LENGTH: usize = 8;
pub const MAX_TOKEN_ATTEMPTS: usize = 100;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Returns a random `TOKEN_LENGTH` character token drawn from `[A-Z0-9]`.
pub fn random_reference() -> ReferenceToken {
    let mut rng = rand::thread_rng();
    let dist = Uniform::from(0..ALPHABET.len());
    let token = (0..TOKEN_LENGTH).map(|_| ALPHABET[rng.sample(dist)] as char).collect::<String>();
    ReferenceToken::new(token)
}

/// Generates a token that `is_taken` does not reject.
///
/// After `MAX_TOKEN_ATTEMPTS` collisions the last candidate is returned anyway. With 36^8 possible tokens and a
/// pending set of at most a few thousand orders, reaching that limit is practically impossible.
pub fn generate_reference<F>(is_taken: F) -> ReferenceToken
where F: Fn(&ReferenceToken) -> bool {
    let mut candidate = random_reference();
    for attempt in 1..MAX_TOKEN_ATTEMPTS {
        if !is_taken(&candidate) {
            return candidate;
        }
        trace!("🔄️ Reference token collision on attempt {attempt}");
        candidate = random_reference();
    }
    if is_taken(&candidate) {
        warn!("🔄️ Could not find a free reference token after {MAX_TOKEN_ATTEMPTS} attempts. Using {candidate}");
    }
    candidate
}
