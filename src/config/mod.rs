//! Configuration module for Fatura
//!
//! - Path resolution for config, data and the audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FaturaPaths;
pub use settings::Settings;
