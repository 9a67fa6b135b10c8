//! Core data models for the transaction bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account used when a message names no account at all
pub const DEFAULT_ACCOUNT: &str = "CASH";

/// Category used when no category keyword is found
pub const OTHER_CATEGORY: &str = "lainnya";

//
// ================= Enums =================
//

/// Direction of money movement implied by a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    /// Label used in ledger rows and chat replies
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Expense => "pengeluaran",
            TransactionType::Income => "pemasukan",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Accepts both the Indonesian labels and the English names
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pengeluaran" | "expense" => Some(TransactionType::Expense),
            "pemasukan" | "income" => Some(TransactionType::Income),
            "transfer" => Some(TransactionType::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

//
// ================= Classification Result =================
//

/// Structured reading of one chat message.
///
/// Created fresh per classification and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// `None` means the message carried no numeric evidence at all
    pub amount: Option<u64>,
    pub raw_text: String,
    pub normalized_description: String,
    pub category: String,
    /// Reserved; the category resolver leaves it empty
    pub subcategory: String,
    pub source_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account: Option<String>,
    /// Additive reliability score in `0..=50`
    pub confidence: u8,
}

impl ParsedTransaction {
    pub fn has_category(&self) -> bool {
        self.category != OTHER_CATEGORY
    }

    /// Note shown to the user; falls back to the raw text when
    /// normalization stripped everything
    pub fn display_note(&self) -> &str {
        if self.normalized_description.is_empty() {
            self.raw_text.trim()
        } else {
            &self.normalized_description
        }
    }
}

//
// ================= Ledger =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub row_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub tx_type: TransactionType,
    pub category: String,
    pub subcategory: String,
    pub source_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account: Option<String>,
    pub amount: u64,
    pub note: String,
}

impl LedgerRow {
    /// Build a row from a classification. Returns `None` when the
    /// message carried no amount, since such a row cannot be booked.
    pub fn from_parsed(parsed: &ParsedTransaction, recorded_at: DateTime<Utc>) -> Option<Self> {
        let amount = parsed.amount?;
        let subcategory = if parsed.subcategory.is_empty() {
            "umum".to_string()
        } else {
            parsed.subcategory.clone()
        };

        Some(Self {
            row_id: Uuid::new_v4(),
            recorded_at,
            tx_type: parsed.tx_type,
            category: parsed.category.clone(),
            subcategory,
            source_account: parsed.source_account.clone(),
            target_account: parsed.target_account.clone(),
            amount,
            note: parsed.display_note().to_string(),
        })
    }
}

/// Running balance of one account. Negative when overspent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountBalance {
    pub account: String,
    pub balance: i64,
}

/// Summary of the rows that fall into a recap period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recap {
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_filter: Option<TransactionType>,
    pub rows: Vec<LedgerRow>,
    pub total_expense: u64,
    pub total_income: u64,
    pub total_transfer: u64,
}
