//! Core data models for Fatura
//!
//! This module contains the records the invoice engine consumes: cards,
//! purchases, installments, paid invoice records and recurring markers.

pub mod card;
pub mod ids;
pub mod installment;
pub mod money;
pub mod paid_invoice;
pub mod period;
pub mod purchase;
pub mod recurring;

pub use card::{Card, CardValidationError};
pub use ids::{CardId, InstallmentId, PaidInvoiceId, PurchaseId};
pub use installment::Installment;
pub use money::Money;
pub use paid_invoice::PaidInvoiceRecord;
pub use period::{InvoicePeriod, PeriodParseError};
pub use purchase::Purchase;
pub use recurring::RecurringMarker;
