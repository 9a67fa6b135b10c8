//! Transaction Classifier
//!
//! Turns a free-form Indonesian chat message ("Beli nasi gudeg 35rb",
//! "Gaji masuk 2jt di BCA") into a [`ParsedTransaction`]:
//! - Type: expense, income or transfer from keyword counts
//! - Amount: largest number found, with `rb`/`jt` style suffixes applied
//! - Category: substring keyword scoring
//! - Accounts: alias lookup, with "ke"/"dari" for transfers
//! - Confidence: additive score in `0..=50`
//! - Description: the message with amounts, aliases and fillers removed
//!
//! Classification is total and side-effect free. The classifier only reads
//! its lexicon, so one instance can be shared across threads; refreshing the
//! lexicon means building a new classifier and swapping the `Arc`.

pub mod accounts;
pub mod amount;
pub mod category;
pub mod description;

use crate::lexicon::LexiconConfig;
use crate::models::{ParsedTransaction, TransactionType, DEFAULT_ACCOUNT};
use crate::Result;
use amount::AmountExtractor;
use description::DescriptionNormalizer;
use std::sync::Arc;
use tracing::debug;

//
// ================= Confidence weights =================
//

pub const AMOUNT_WEIGHT: u8 = 20;
pub const CATEGORY_WEIGHT: u8 = 15;
pub const TYPE_WEIGHT: u8 = 10;
pub const ACCOUNT_WEIGHT: u8 = 5;
pub const MAX_CONFIDENCE: u8 = 50;

pub struct TransactionClassifier {
    lexicon: Arc<LexiconConfig>,
    amounts: AmountExtractor,
    descriptions: DescriptionNormalizer,
}

impl TransactionClassifier {
    /// Compile the lexicon's patterns. The lexicon is not validated here;
    /// see [`LexiconConfig::validate`].
    pub fn new(lexicon: impl Into<Arc<LexiconConfig>>) -> Result<Self> {
        let lexicon = lexicon.into();
        let amounts = AmountExtractor::new(&lexicon.amount_suffixes)?;
        let descriptions = DescriptionNormalizer::new(&lexicon)?;

        Ok(Self {
            lexicon,
            amounts,
            descriptions,
        })
    }

    pub fn lexicon(&self) -> &LexiconConfig {
        &self.lexicon
    }

    /// Classify one message. Never fails; unreadable input degrades to an
    /// expense of unknown amount in the "lainnya" category paid from CASH.
    pub fn classify(&self, message: &str) -> ParsedTransaction {
        let text = message.trim().to_lowercase();
        let tokens = tokenize(&text);

        let tx_type = TypeScores::count(&tokens, &self.lexicon).decide();
        let amount = self.amounts.extract(&text);
        let category = category::resolve(&text, &self.lexicon);

        let mentions = accounts::find_mentions(&tokens, &self.lexicon);
        let (source_account, target_account) = match tx_type {
            TransactionType::Transfer => accounts::resolve_transfer(&mentions),
            _ => (accounts::resolve_source(&mentions), None),
        };

        let confidence = score_confidence(
            amount.is_some(),
            category.score > 0,
            source_account != DEFAULT_ACCOUNT,
        );

        let parsed = ParsedTransaction {
            tx_type,
            amount,
            raw_text: message.to_string(),
            normalized_description: self.descriptions.normalize(message, &self.amounts),
            category: category.category,
            subcategory: category.subcategory,
            source_account,
            target_account,
            confidence,
        };

        debug!(
            tx_type = %parsed.tx_type,
            amount = ?parsed.amount,
            category = %parsed.category,
            source = %parsed.source_account,
            target = ?parsed.target_account,
            confidence = parsed.confidence,
            "Message classified"
        );

        parsed
    }

    /// Strip amounts, aliases and fillers from a note
    pub fn normalize_description(&self, text: &str) -> String {
        self.descriptions.normalize(text, &self.amounts)
    }

    /// Amount the classifier would read from `text`
    pub fn extract_amount(&self, text: &str) -> Option<u64> {
        self.amounts.extract(&text.to_lowercase())
    }
}

/// Whitespace tokenization, order preserved, no deduplication
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Keyword hits per transaction type. Repeated tokens count every time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeScores {
    pub expense: usize,
    pub income: usize,
    pub transfer: usize,
    pub has_direction: bool,
}

impl TypeScores {
    pub fn count(tokens: &[&str], lexicon: &LexiconConfig) -> Self {
        let mut scores = Self::default();

        for token in tokens {
            if lexicon.expense_keywords.contains(*token) {
                scores.expense += 1;
            }
            if lexicon.income_keywords.contains(*token) {
                scores.income += 1;
            }
            if lexicon.transfer_keywords.contains(*token) {
                scores.transfer += 1;
            }
            if lexicon.direction_words.is_direction(token) {
                scores.has_direction = true;
            }
        }

        scores
    }

    /// Transfer needs a directional word; expense is the default, ties included
    pub fn decide(&self) -> TransactionType {
        if self.transfer > 0 && self.has_direction {
            TransactionType::Transfer
        } else if self.income > self.expense {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }
}

/// Additive confidence, capped at [`MAX_CONFIDENCE`].
///
/// The type is always decided, but it only earns its weight when at least
/// one other signal backs the reading; a message with no amount, no
/// category and the default account scores zero.
pub fn score_confidence(has_amount: bool, has_category: bool, has_account: bool) -> u8 {
    let mut score = 0u8;

    if has_amount {
        score += AMOUNT_WEIGHT;
    }
    if has_category {
        score += CATEGORY_WEIGHT;
    }
    if has_account {
        score += ACCOUNT_WEIGHT;
    }
    if score > 0 {
        score += TYPE_WEIGHT;
    }

    score.min(MAX_CONFIDENCE)
}
