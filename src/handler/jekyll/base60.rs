//! NewBase60 encoding.
//!
//! Sexagesimal numbering with an alphabet that avoids look-alike characters
//! (no `I`, `O` or `l`), as used by WordPress-era shortlinks.

const ALPHABET: &[u8; 60] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ_abcdefghijkmnopqrstuvwxyz";

/// Encode `n` in NewBase60.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 60) as usize] as char);
        n /= 60;
    }
    digits.iter().rev().collect()
}
