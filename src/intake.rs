//! Message intake
//!
//! The caller side of the classifier: decides what to do with one inbound
//! chat message.
//!
//! FLOW:
//! "/..." → COMMAND
//! too short → IGNORE
//! CLASSIFY → no amount → IGNORE
//!          → confidence ≥ threshold → BOOK (ledger row + balances)
//!          → otherwise → ASK FOR CONFIRMATION

use crate::classifier::TransactionClassifier;
use crate::config::IntakePolicy;
use crate::error::CatatError;
use crate::ledger::{Ledger, RecapPeriod};
use crate::models::{AccountBalance, LedgerRow, ParsedTransaction, TransactionType};
use crate::reply;
use crate::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

//
// ================= Commands =================
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Balance,
    Recap {
        period: Option<String>,
        type_filter: Option<String>,
    },
    Help,
    Demo,
}

impl Command {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();

        match name.as_str() {
            "/saldo" => Ok(Command::Balance),
            "/rekap" => Ok(Command::Recap {
                period: parts.next().map(str::to_string),
                type_filter: parts.next().map(str::to_string),
            }),
            "/help" => Ok(Command::Help),
            "/demo" => Ok(Command::Demo),
            _ => Err(CatatError::UnknownCommand(name)),
        }
    }
}

//
// ================= Outcomes =================
//

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    TooShort,
    NoAmount,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntakeOutcome {
    Ignored {
        reason: IgnoreReason,
    },
    Command {
        reply: String,
    },
    Recorded {
        transaction: ParsedTransaction,
        balances: Vec<AccountBalance>,
        reply: String,
    },
    NeedsConfirmation {
        transaction: ParsedTransaction,
        reply: String,
    },
    StorageFailed {
        transaction: ParsedTransaction,
        reply: String,
    },
}

impl IntakeOutcome {
    /// Text to send back to the user, if any
    pub fn reply(&self) -> Option<&str> {
        match self {
            IntakeOutcome::Ignored { .. } => None,
            IntakeOutcome::Command { reply }
            | IntakeOutcome::Recorded { reply, .. }
            | IntakeOutcome::NeedsConfirmation { reply, .. }
            | IntakeOutcome::StorageFailed { reply, .. } => Some(reply),
        }
    }
}

//
// ================= Intake =================
//

pub struct MessageIntake {
    /// Swapped whole when the lexicon changes; never mutated in place
    classifier: RwLock<Arc<TransactionClassifier>>,
    ledger: Arc<dyn Ledger>,
    policy: IntakePolicy,
}

impl MessageIntake {
    pub fn new(
        classifier: TransactionClassifier,
        ledger: Arc<dyn Ledger>,
        policy: IntakePolicy,
    ) -> Self {
        Self {
            classifier: RwLock::new(Arc::new(classifier)),
            ledger,
            policy,
        }
    }

    pub fn policy(&self) -> IntakePolicy {
        self.policy
    }

    pub fn ledger(&self) -> Arc<dyn Ledger> {
        Arc::clone(&self.ledger)
    }

    /// Snapshot of the current classifier. Calls already in flight keep
    /// the one they started with.
    pub async fn classifier(&self) -> Arc<TransactionClassifier> {
        Arc::clone(&*self.classifier.read().await)
    }

    pub async fn replace_classifier(&self, classifier: TransactionClassifier) {
        let mut current = self.classifier.write().await;
        *current = Arc::new(classifier);
        info!("Classifier replaced");
    }

    pub async fn classify(&self, text: &str) -> ParsedTransaction {
        self.classifier().await.classify(text)
    }

    pub async fn handle(&self, message: &str) -> IntakeOutcome {
        let text = message.trim();

        if text.starts_with('/') {
            let reply = match Command::parse(text) {
                Ok(command) => self.run_command(command).await,
                Err(_) => reply::unknown_command(),
            };
            info!(command = %text, "Command handled");
            return IntakeOutcome::Command { reply };
        }

        if text.chars().count() < self.policy.min_message_len {
            info!(len = text.len(), "Message ignored: too short");
            return IntakeOutcome::Ignored {
                reason: IgnoreReason::TooShort,
            };
        }

        let parsed = self.classify(text).await;

        if parsed.amount.is_none() {
            info!("Message ignored: no amount");
            return IntakeOutcome::Ignored {
                reason: IgnoreReason::NoAmount,
            };
        }

        if parsed.confidence < self.policy.auto_commit_threshold {
            info!(
                confidence = parsed.confidence,
                threshold = self.policy.auto_commit_threshold,
                "Asking for confirmation"
            );
            let reply = reply::confirmation(&parsed);
            return IntakeOutcome::NeedsConfirmation {
                transaction: parsed,
                reply,
            };
        }

        self.book(parsed).await
    }

    /// Write an accepted reading to the ledger
    pub async fn book(&self, parsed: ParsedTransaction) -> IntakeOutcome {
        match self.try_book(&parsed).await {
            Ok(balances) => {
                info!(
                    tx_type = %parsed.tx_type,
                    amount = ?parsed.amount,
                    source = %parsed.source_account,
                    "Transaction recorded"
                );
                let reply = reply::receipt(&parsed, &balances);
                IntakeOutcome::Recorded {
                    transaction: parsed,
                    balances,
                    reply,
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to record transaction");
                let reply = reply::storage_failure(&parsed);
                IntakeOutcome::StorageFailed {
                    transaction: parsed,
                    reply,
                }
            }
        }
    }

    async fn try_book(&self, parsed: &ParsedTransaction) -> Result<Vec<AccountBalance>> {
        let row = LedgerRow::from_parsed(parsed, Utc::now())
            .ok_or_else(|| CatatError::Ledger("transaction has no amount".into()))?;
        self.ledger.record(row).await
    }

    pub async fn run_command(&self, command: Command) -> String {
        match command {
            Command::Help => reply::help(),
            Command::Demo => {
                let classifier = self.classifier().await;
                let readings: Vec<ParsedTransaction> = reply::DEMO_MESSAGES
                    .iter()
                    .map(|sample| classifier.classify(sample))
                    .collect();
                reply::demo(&readings)
            }
            Command::Balance => match self.ledger.balances().await {
                Ok(balances) => reply::balances(&balances),
                Err(e) => {
                    warn!(error = %e, "Failed to read balances");
                    "❌ Error menjalankan command.".to_string()
                }
            },
            Command::Recap {
                period,
                type_filter,
            } => self.recap(period.as_deref(), type_filter.as_deref()).await,
        }
    }

    async fn recap(&self, period: Option<&str>, type_filter: Option<&str>) -> String {
        let period = match period {
            Some(value) => match RecapPeriod::parse(value) {
                Ok(period) => period,
                Err(_) => return reply::invalid_period(value),
            },
            None => RecapPeriod::current_month(Utc::now()),
        };
        let type_filter = match type_filter {
            Some(value) => match TransactionType::parse(value) {
                Some(ty) => Some(ty),
                None => return reply::invalid_type_filter(value),
            },
            None => None,
        };

        match self.ledger.recap(&period, type_filter).await {
            Ok(recap) => reply::recap(&recap),
            Err(e) => {
                warn!(error = %e, "Failed to build recap");
                "❌ Error saat membuat rekap.".to_string()
            }
        }
    }
}
