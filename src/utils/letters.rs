use rand::Rng;

/// Letters used to fill cells that no word occupies
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pick a letter uniformly from A-Z
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}

/// Trim surrounding whitespace and upper-case a word
pub fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}
