//! Credit card model
//!
//! A card carries the billing configuration the invoice engine needs: the day
//! the invoice closes, the day it is due (in the following month) and the
//! credit limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CardId;
use super::money::Money;

/// A credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    /// Display name (e.g., "Nubank")
    #[serde(rename = "nome")]
    pub name: String,

    /// Card network (e.g., "Visa", "Mastercard")
    #[serde(rename = "bandeira", default)]
    pub brand: String,

    /// Total credit limit
    #[serde(rename = "limite")]
    pub limit: Money,

    /// Day of month the invoice closes (1-31)
    #[serde(rename = "fechamento")]
    pub closing_day: u32,

    /// Day of month the invoice is due, in the month after closing (1-31)
    #[serde(rename = "vencimento")]
    pub due_day: u32,

    /// Display color, free-form (e.g., "#8a05be")
    #[serde(rename = "cor", default)]
    pub color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card
    pub fn new(name: impl Into<String>, limit: Money, closing_day: u32, due_day: u32) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            name: name.into(),
            brand: String::new(),
            limit,
            closing_day,
            due_day,
            color: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the billing configuration
    pub fn set_billing_days(&mut self, closing_day: u32, due_day: u32) {
        self.closing_day = closing_day;
        self.due_day = due_day;
        self.updated_at = Utc::now();
    }

    /// Update the credit limit
    pub fn set_limit(&mut self, limit: Money) {
        self.limit = limit;
        self.updated_at = Utc::now();
    }

    /// Validate the card
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(CardValidationError::NameTooLong(self.name.len()));
        }

        if !(1..=31).contains(&self.closing_day) {
            return Err(CardValidationError::InvalidClosingDay(self.closing_day));
        }

        if !(1..=31).contains(&self.due_day) {
            return Err(CardValidationError::InvalidDueDay(self.due_day));
        }

        if self.limit.is_negative() {
            return Err(CardValidationError::NegativeLimit);
        }

        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.brand.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.brand)
        }
    }
}

/// Validation errors for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidClosingDay(u32),
    InvalidDueDay(u32),
    NegativeLimit,
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Card name too long ({} chars, max 100)", len),
            Self::InvalidClosingDay(day) => {
                write!(f, "Closing day must be between 1 and 31, got {}", day)
            }
            Self::InvalidDueDay(day) => write!(f, "Due day must be between 1 and 31, got {}", day),
            Self::NegativeLimit => write!(f, "Credit limit cannot be negative"),
        }
    }
}

impl std::error::Error for CardValidationError {}
