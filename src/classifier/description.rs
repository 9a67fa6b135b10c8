//! Description normalization
//!
//! Produces the human-readable note for a transaction: amounts, account
//! aliases and filler words are removed from the original text, then
//! whitespace is collapsed. The result may be empty.

use super::amount::AmountExtractor;
use crate::lexicon::LexiconConfig;
use crate::Result;
use regex::Regex;

pub struct DescriptionNormalizer {
    aliases: Option<Regex>,
    fillers: Option<Regex>,
    whitespace: Regex,
}

impl DescriptionNormalizer {
    pub fn new(lexicon: &LexiconConfig) -> Result<Self> {
        Ok(Self {
            aliases: whole_word_pattern(lexicon.all_aliases())?,
            fillers: whole_word_pattern(lexicon.filler_words.iter().map(String::as_str))?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Apply to the original-case text. Running it on its own output is a no-op.
    pub fn normalize(&self, text: &str, amounts: &AmountExtractor) -> String {
        let mut cleaned = amounts.strip_mentions(text).into_owned();

        for pattern in [&self.aliases, &self.fillers].into_iter().flatten() {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }

        self.whitespace.replace_all(&cleaned, " ").trim().to_string()
    }
}

/// Case-insensitive `\b(?:w1|w2|...)\b`, longest word first
fn whole_word_pattern<'a>(words: impl Iterator<Item = &'a str>) -> Result<Option<Regex>> {
    let mut words: Vec<&str> = words.filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return Ok(None);
    }
    words.sort_by(|a, b| b.len().cmp(&a.len()));

    let escaped: Vec<String> = words.into_iter().map(regex::escape).collect();
    let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|")))?;
    Ok(Some(pattern))
}
