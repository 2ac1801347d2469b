//! Masking of tokens and secrets for logs.

/// Returns a log-safe form of a token: first 7 chars + `***` + last 4 chars.
/// Values of 11 chars or fewer are fully masked as `***`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
