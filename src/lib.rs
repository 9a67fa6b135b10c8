//! Catat Keuangan
//!
//! Turns Indonesian chat messages about money ("Beli nasi gudeg 35rb",
//! "Gaji masuk 2jt di BCA") into structured transactions:
//! - Deterministic keyword classifier, no learned model
//! - Locale-aware amounts (`20.000`, `35rb`, `2.5jt`)
//! - Account aliases and transfer direction ("ke"/"dari")
//! - Confidence score used to book directly or ask first
//!
//! PIPELINE:
//! MESSAGE → INTAKE → CLASSIFY → (BOOK | CONFIRM | IGNORE) → REPLY

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod intake;
pub mod ledger;
pub mod lexicon;
pub mod models;
pub mod reply;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::TransactionClassifier;
pub use lexicon::LexiconConfig;
