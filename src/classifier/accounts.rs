//! Account resolution
//!
//! Tokens are matched exactly against the alias table. The source account
//! is the alias at the lowest token position; `CASH` when nothing matches.
//! The target of a transfer is the first alias, in token order, that names
//! a different account.
//!
//! One exception for transfers: the first alias after "ke" names the
//! destination and is never taken as the source, so "transfer ke bca" moves
//! money out of the default account into BCA.

use crate::lexicon::LexiconConfig;
use crate::models::DEFAULT_ACCOUNT;

/// An alias token found in the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMention {
    pub position: usize,
    pub account: String,
    /// First alias after a "ke" word
    pub destination: bool,
}

/// Scan tokens left to right and collect every alias hit
pub fn find_mentions(tokens: &[&str], lexicon: &LexiconConfig) -> Vec<AccountMention> {
    let mut mentions = Vec::new();
    let mut after_to = false;

    for (position, token) in tokens.iter().enumerate() {
        if lexicon.direction_words.is_direction(token) {
            after_to = lexicon.direction_words.is_to(token);
            continue;
        }

        if let Some(account) = lexicon.account_for_alias(token) {
            mentions.push(AccountMention {
                position,
                account,
                destination: after_to,
            });
            after_to = false;
        }
    }

    mentions
}

/// First-occurring account, or the default account
pub fn resolve_source(mentions: &[AccountMention]) -> String {
    mentions
        .first()
        .map(|m| m.account.clone())
        .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string())
}

/// Source and destination of a transfer.
///
/// The target is never equal to the source; a transfer whose destination
/// cannot be found keeps `None`.
pub fn resolve_transfer(mentions: &[AccountMention]) -> (String, Option<String>) {
    let source = mentions
        .iter()
        .find(|m| !m.destination)
        .map(|m| m.account.clone())
        .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

    let target = mentions
        .iter()
        .find(|m| m.account != source)
        .map(|m| m.account.clone());

    (source, target)
}
