//! Positional BCVWP identifiers.
//!
//! Token identifiers encode book, chapter, verse, word and (optionally) a
//! sub-word part as fixed-width digits: `BBCCCVVVWWW` or `BBCCCVVVWWWP`.
//! Manuscript identifiers may carry a single-letter canon prefix such as
//! `n41004003001`. The verse portion (`BBCCCVVV`) is the grouping key used
//! everywhere else in the workspace.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

const BCV_LEN: usize = 8;
const BCVW_LEN: usize = 11;
const BCVWP_LEN: usize = 12;

/// First NT book number.
pub const FIRST_NT_BOOK: u8 = 40;
/// Last book of the protestant canon.
pub const LAST_NT_BOOK: u8 = 66;

/// A parsed token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BcvwpId {
    prefix: Option<char>,
    digits: String,
}

impl BcvwpId {
    /// Parses `raw`, which must be an optional ASCII letter followed by 11 or
    /// 12 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let mut chars = raw.chars();
        let prefix = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => Some(c),
            Some(_) => None,
            None => return Err(TokenError::InvalidIdentifier(raw.to_string())),
        };
        let digits = if prefix.is_some() { &raw[1..] } else { raw };
        let well_formed = matches!(digits.len(), BCVW_LEN | BCVWP_LEN)
            && digits.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(TokenError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self {
            prefix,
            digits: digits.to_string(),
        })
    }

    pub fn prefix(&self) -> Option<char> {
        self.prefix
    }

    /// The identifier without any canon prefix.
    pub fn bare(&self) -> &str {
        &self.digits
    }

    pub fn book(&self) -> u8 {
        parse_digits(&self.digits[0..2]) as u8
    }

    pub fn chapter(&self) -> u16 {
        parse_digits(&self.digits[2..5]) as u16
    }

    pub fn verse(&self) -> u16 {
        parse_digits(&self.digits[5..8]) as u16
    }

    pub fn word(&self) -> u16 {
        parse_digits(&self.digits[8..11]) as u16
    }

    /// Sub-word part index, only present on 12-digit identifiers.
    pub fn part(&self) -> Option<u8> {
        (self.digits.len() == BCVWP_LEN).then(|| parse_digits(&self.digits[11..12]) as u8)
    }

    pub fn is_nt(&self) -> bool {
        (FIRST_NT_BOOK..=LAST_NT_BOOK).contains(&self.book())
    }

    pub fn verse_ref(&self) -> VerseRef {
        VerseRef(self.digits[..BCV_LEN].to_string())
    }
}

impl fmt::Display for BcvwpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}")?;
        }
        f.write_str(&self.digits)
    }
}

fn parse_digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Verse reference for a token identifier, e.g. `"41004003"` for
/// `"n41004003001"`.
pub fn to_bcv(identifier: &str) -> Result<VerseRef, TokenError> {
    BcvwpId::parse(identifier).map(|id| id.verse_ref())
}

/// A fixed-width `BBCCCVVV` verse reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseRef(String);

impl VerseRef {
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        if raw.len() == BCV_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TokenError::InvalidVerseRef(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn book(&self) -> u8 {
        parse_digits(&self.0[0..2]) as u8
    }
}

impl TryFrom<String> for VerseRef {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VerseRef> for String {
    fn from(value: VerseRef) -> Self {
        value.0
    }
}

impl Borrow<str> for VerseRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VerseRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
