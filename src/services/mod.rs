//! Service layer for Fatura
//!
//! Business rules on top of the storage layer: validation, cross-record
//! cascades, audit logging and running the invoice engine over fresh
//! snapshots.

pub mod card;
pub mod installment;
pub mod invoice;
pub mod purchase;

pub use card::{CardDeletion, CardService, CardUpdate};
pub use installment::InstallmentService;
pub use invoice::InvoiceService;
pub use purchase::{plan_installments, NewPurchase, PurchaseService, RecordedPurchase};
