pub mod url_validator;

/// Shortest and longest acceptable short code.
pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 50;

// Ambiguous characters (0/O, 1/l/I) are left out of generated codes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Generate a random short code of the given length.
pub fn generate_random_code(length: usize) -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Check a caller-supplied code against `^[A-Za-z0-9-]{3,50}$`.
pub fn is_valid_code(code: &str) -> bool {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return false;
    }
    code.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
