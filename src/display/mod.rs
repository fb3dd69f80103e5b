//! Display formatting for terminal output
//!
//! Every formatter returns a `String`; the CLI decides where it goes.

pub mod card;
pub mod credit;
pub mod invoice;
pub mod purchase;

pub use card::{format_card_details, format_card_list};
pub use credit::{format_credit_details, format_credit_summaries};
pub use invoice::{format_invoice_details, format_invoice_list};
pub use purchase::{format_installment_list, format_purchase_list};
