//! Audit logging for Fatura
//!
//! Every create, update and delete performed through the services is recorded
//! in an append-only JSONL file with before/after values. Marking an invoice
//! paid is a create (or an update when it replaces an earlier payment);
//! unmarking is a delete.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
