//! Category resolution
//!
//! Keywords match as substrings of the lowercase message, so "kopi"
//! also fires inside "ngopi". Each keyword present adds a fixed weight.

use crate::lexicon::LexiconConfig;
use crate::models::OTHER_CATEGORY;

/// Points awarded per matching keyword
pub const KEYWORD_WEIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    pub category: String,
    /// Always empty for now; kept so ledger rows carry the column
    pub subcategory: String,
    pub score: u32,
}

impl CategoryMatch {
    fn other() -> Self {
        Self {
            category: OTHER_CATEGORY.to_string(),
            subcategory: String::new(),
            score: 0,
        }
    }
}

/// Highest-scoring category; earlier categories win ties
pub fn resolve(text: &str, lexicon: &LexiconConfig) -> CategoryMatch {
    let mut best = CategoryMatch::other();

    for entry in &lexicon.categories {
        let hits = entry
            .keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count() as u32;
        let score = hits * KEYWORD_WEIGHT;

        if score > best.score {
            best = CategoryMatch {
                category: entry.name.clone(),
                subcategory: String::new(),
                score,
            };
        }
    }

    best
}
