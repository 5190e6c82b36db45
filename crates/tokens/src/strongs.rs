//! Strong's number normalization.
//!
//! Strong's codes arrive in many spellings (`"G0191"`, `"191"`, `"1886j|2050b"`,
//! `"G29620"`). Normalized form is a language prefix (`A`, `G` or `H`), a
//! four-digit zero-padded number and an optional `a`–`d` disambiguation suffix.

use tracing::debug;

use crate::error::TokenError;

const SPECIALS: &[(&str, &str)] = &[
    ("1537+4053", "G4053b"),
    ("5228+1537+4053", "G4053c"),
    ("1417+3461", "G3461b"),
];

/// Returns the normalized form of `code`.
///
/// `prefix` is used only when the code carries no prefix of its own. With
/// `strict`, a bare `"H"` (an empty Hebrew code) is rejected explicitly.
pub fn normalize_strongs(code: &str, prefix: Option<char>, strict: bool) -> Result<String, TokenError> {
    // WLCM has values like "1886j|2050b": the part after the bar wins.
    let mut code = code.rsplit('|').next().unwrap_or(code);
    // unfoldingWord KeyTerms pads to six characters with a trailing zero.
    if code.len() == 6 && code.starts_with('G') && code.ends_with('0') {
        code = &code[..5];
    }
    if code.ends_with(|c: char| ('e'..='z').contains(&c)) {
        code = &code[..code.len() - 1];
    }
    if let Some((_, mapped)) = SPECIALS.iter().find(|(raw, _)| *raw == code) {
        return Ok((*mapped).to_string());
    }
    if strict && code == "H" {
        return Err(TokenError::InvalidStrongs("Strong's code must not be empty".into()));
    }

    let (own_prefix, rest) = match code.chars().next() {
        Some(c @ ('A' | 'G' | 'H')) => (Some(c), &code[1..]),
        _ => (None, code),
    };
    let (number, suffix) = match rest.chars().last() {
        Some(c @ 'a'..='d') => (&rest[..rest.len() - 1], Some(c)),
        _ => (rest, None),
    };
    let well_formed = (1..=4).contains(&number.len()) && number.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(TokenError::InvalidStrongs(code.to_string()));
    }

    let prefix = match (own_prefix, prefix) {
        (Some(own), Some(param)) if own != param => {
            debug!(code, param = %param, "strongs_prefix_overridden");
            own
        }
        (Some(own), _) => own,
        (None, Some(param)) => param,
        (None, None) => {
            return Err(TokenError::InvalidStrongs(format!(
                "prefix must be specified: {code}"
            )))
        }
    };

    let mut normed = format!("{prefix}{number:0>4}");
    if let Some(suffix) = suffix {
        normed.push(suffix);
    }
    Ok(normed)
}
