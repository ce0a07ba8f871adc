/// Alphabet for generated short codes
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Uniform draw with replacement from [`CODE_ALPHABET`]
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Joins the public origin and a short code into a shareable link
pub fn build_short_url(base_origin: &str, code: &str) -> String {
    format!("{}/{}", base_origin.trim_end_matches('/'), code)
}
