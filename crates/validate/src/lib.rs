//! Referential validation of alignment records.
//!
//! Every selector of a record must name a token in the matching inventory.
//! [`classify`] gives the first reason a record fails; [`partition`] splits a
//! record set into clean records and an audit trail of [`BadRecord`]s.

mod classify;
mod config;
mod reason;

pub use crate::classify::{classify, partition, Partition};
pub use crate::config::ValidateConfig;
pub use crate::reason::{BadRecord, Finding, Reason};
