//! Storage layer for Fatura
//!
//! JSON files with atomic writes, one repository per record type. Every
//! mutation made through the services is also appended to the audit log.

pub mod cards;
pub mod file_io;
pub mod init;
pub mod installments;
pub mod paid_invoices;
pub mod purchases;
pub mod recurring;

pub use cards::CardRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use installments::InstallmentRepository;
pub use paid_invoices::PaidInvoiceRepository;
pub use purchases::PurchaseRepository;
pub use recurring::RecurringRepository;

use std::collections::HashMap;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FaturaPaths;
use crate::engine::{PaidInvoiceRegister, Snapshot};
use crate::error::FaturaResult;
use crate::models::{Card, Installment, Purchase, PurchaseId, RecurringMarker};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FaturaPaths,
    audit: AuditLogger,
    pub cards: CardRepository,
    pub purchases: PurchaseRepository,
    pub installments: InstallmentRepository,
    pub paid_invoices: PaidInvoiceRepository,
    pub recurring: RecurringRepository,
}

/// Owned copy of every record, from which engine snapshots are borrowed
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub cards: Vec<Card>,
    pub purchases: Vec<Purchase>,
    pub installments: Vec<Installment>,
    pub paid_invoices: PaidInvoiceRegister,
    pub recurring: HashMap<PurchaseId, RecurringMarker>,
}

impl Records {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            cards: &self.cards,
            purchases: &self.purchases,
            installments: &self.installments,
            paid_invoices: &self.paid_invoices,
            recurring: &self.recurring,
        }
    }
}

impl Storage {
    pub fn new(paths: FaturaPaths) -> FaturaResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            cards: CardRepository::new(paths.cards_file()),
            purchases: PurchaseRepository::new(paths.purchases_file()),
            installments: InstallmentRepository::new(paths.installments_file()),
            paid_invoices: PaidInvoiceRepository::new(paths.paid_invoices_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FaturaPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> FaturaResult<()> {
        self.cards.load()?;
        self.purchases.load()?;
        self.installments.load()?;
        self.paid_invoices.load()?;
        self.recurring.load()?;
        tracing::debug!(
            cards = self.cards.count()?,
            purchases = self.purchases.count()?,
            installments = self.installments.count()?,
            "loaded records"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> FaturaResult<()> {
        self.cards.save()?;
        self.purchases.save()?;
        self.installments.save()?;
        self.paid_invoices.save()?;
        self.recurring.save()?;
        Ok(())
    }

    /// Copy the current state of every repository
    pub fn records(&self) -> FaturaResult<Records> {
        Ok(Records {
            cards: self.cards.get_all()?,
            purchases: self.purchases.get_all()?,
            installments: self.installments.get_all()?,
            paid_invoices: self.paid_invoices.register()?,
            recurring: self.recurring.get_all()?,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FaturaResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> FaturaResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FaturaResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
