//! Token inventories for word-alignment data.
//!
//! Every alignment selector points at a token in one of two inventories: the
//! manuscript side ([`Source`]) and the translation side ([`Target`]). This
//! crate owns those tokens, the positional identifiers they are keyed by, and
//! the TSV loaders that build them.
//!
//! ```text
//! TSV ──▶ Row ──Token::from_row──▶ Source / Target ──▶ TokenInventory
//!                                      │
//!                                      └─ BcvwpId ──▶ VerseRef (grouping key)
//! ```
//!
//! Inventories are read-only once built and are exposed through the
//! [`Keyed`] trait, which is all the validation and aggregation stages need.

mod bcvwp;
mod config;
mod error;
mod inventory;
mod keyed;
mod strongs;
mod token;

pub use crate::bcvwp::{to_bcv, BcvwpId, VerseRef, FIRST_NT_BOOK, LAST_NT_BOOK};
pub use crate::config::InventoryConfig;
pub use crate::error::{InventoryError, TokenError};
pub use crate::inventory::{CaseSensitivity, Row, TokenInventory};
pub use crate::keyed::Keyed;
pub use crate::strongs::normalize_strongs;
pub use crate::token::{parse_flag, RawSource, RawTarget, Source, Target, Token};

/// Inventory of manuscript tokens.
pub type SourceInventory = TokenInventory<Source>;
/// Inventory of translation tokens.
pub type TargetInventory = TokenInventory<Target>;
