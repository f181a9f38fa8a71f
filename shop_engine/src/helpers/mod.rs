mod reference_token;

pub use reference_token::{generate_reference, random_reference, MAX_TOKEN_ATTEMPTS, TOKEN_LENGTH};
