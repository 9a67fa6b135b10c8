//! Lexicon store
//!
//! Immutable keyword, alias and multiplier tables that drive every
//! classification decision. Built once (either the built-in Indonesian
//! lexicon or a JSON file) and shared read-only afterwards.
//!
//! Tables whose order matters for tie-breaking (categories, accounts) are
//! kept as ordered lists instead of maps.

use crate::error::{CatatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A named category and the substrings that trigger it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Canonical account identifier and the tokens that refer to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountAliases {
    pub account: String,
    pub aliases: Vec<String>,
}

/// Amount suffix such as `rb` (x1.000) or `jt` (x1.000.000)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuffixMultiplier {
    pub suffix: String,
    pub multiplier: u64,
}

/// Suffixes at or above this multiplier belong to the long-form amount rule
pub const LONG_FORM_THRESHOLD: u64 = 1_000_000;

/// An alias token claimed by more than one account.
/// The first account keeps it during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCollision {
    pub alias: String,
    pub kept_by: String,
    pub shadowed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LexiconConfig {
    pub expense_keywords: HashSet<String>,
    pub income_keywords: HashSet<String>,
    pub transfer_keywords: HashSet<String>,
    /// Tokens that make a transfer keyword count ("ke", "dari")
    #[serde(default = "default_direction_words")]
    pub direction_words: DirectionWords,
    pub categories: Vec<CategoryKeywords>,
    pub accounts: Vec<AccountAliases>,
    pub amount_suffixes: Vec<SuffixMultiplier>,
    /// Connectives stripped from the normalized description
    #[serde(default = "default_filler_words")]
    pub filler_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectionWords {
    /// Marks the destination ("ke")
    pub to: Vec<String>,
    /// Marks the origin ("dari")
    pub from: Vec<String>,
}

impl DirectionWords {
    pub fn is_direction(&self, token: &str) -> bool {
        self.is_to(token) || self.is_from(token)
    }

    pub fn is_to(&self, token: &str) -> bool {
        self.to.iter().any(|w| w == token)
    }

    pub fn is_from(&self, token: &str) -> bool {
        self.from.iter().any(|w| w == token)
    }
}

fn default_direction_words() -> DirectionWords {
    DirectionWords {
        to: vec!["ke".to_string()],
        from: vec!["dari".to_string()],
    }
}

fn default_filler_words() -> Vec<String> {
    to_strings(&["ke", "dari", "di", "untuk", "dengan", "pakai", "pake", "dan"])
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

//
// ================= Built-in Indonesian lexicon =================
//

const EXPENSE_KEYWORDS: &[&str] = &[
    "beli", "bayar", "buat", "isi", "belanja", "makan", "minum",
    "bensin", "pulsa", "listrik", "air", "internet", "sewa",
    "transport", "ojek", "taxi", "bus", "parkir", "tol",
    "obat", "dokter", "laundry", "print", "fotokopi", "cetak",
    "jajan", "warteg", "ngopi", "warung", "tugas", "kos", "kontrakan",
    "dapur", "beras", "telur", "minyak", "sayur", "buah", "token",
];

const INCOME_KEYWORDS: &[&str] = &[
    "gaji", "masuk", "terima", "dapat", "bonus", "thr",
    "freelance", "proyek", "komisi", "hadiah", "cashback",
    "refund", "kembalian", "untung", "profit",
];

const TRANSFER_KEYWORDS: &[&str] = &["pindah", "transfer", "tarik", "setor", "kirim", "ambil"];

const CATEGORIES: &[(&str, &[&str])] = &[
    ("makan", &["makan", "sarapan", "minum", "kopi", "teh", "jajan", "warteg"]),
    ("transport", &["bensin", "ojek", "taxi", "bus", "kereta", "parkir", "tol"]),
    ("belanja", &["beli", "belanja", "baju", "elektronik", "hp", "laptop", "sabun"]),
    ("kebutuhan dapur", &["dapur", "beras", "telur", "minyak", "sayur", "buah"]),
    (
        "tagihan",
        &["listrik", "air", "pdam", "internet", "wifi", "pulsa", "sewa", "kontrakan", "kos", "token"],
    ),
];

const ACCOUNTS: &[(&str, &[&str])] = &[
    ("CASH", &["cash", "tunai", "uang", "duit"]),
    ("BRI", &["bri", "britama"]),
    ("BNI", &["bni", "taplus"]),
    ("BCA", &["bca"]),
    ("MANDIRI", &["mandiri"]),
    ("DANA", &["dana"]),
    ("OVO", &["ovo"]),
    ("GOPAY", &["gopay", "gojek"]),
    ("SHOPEEPAY", &["shopeepay", "shopee"]),
    ("LINKAJA", &["linkaja"]),
    ("BRK", &["brk"]),
];

const AMOUNT_SUFFIXES: &[(&str, u64)] = &[
    ("ribu", 1_000),
    ("rb", 1_000),
    ("k", 1_000),
    ("juta", 1_000_000),
    ("jt", 1_000_000),
    ("m", 1_000_000),
];

impl LexiconConfig {
    /// The built-in lexicon for Indonesian chat messages
    pub fn indonesian() -> Self {
        Self {
            expense_keywords: to_set(EXPENSE_KEYWORDS),
            income_keywords: to_set(INCOME_KEYWORDS),
            transfer_keywords: to_set(TRANSFER_KEYWORDS),
            direction_words: default_direction_words(),
            categories: CATEGORIES
                .iter()
                .map(|(name, keywords)| CategoryKeywords {
                    name: name.to_string(),
                    keywords: to_strings(keywords),
                })
                .collect(),
            accounts: ACCOUNTS
                .iter()
                .map(|(account, aliases)| AccountAliases {
                    account: account.to_string(),
                    aliases: to_strings(aliases),
                })
                .collect(),
            amount_suffixes: AMOUNT_SUFFIXES
                .iter()
                .map(|(suffix, multiplier)| SuffixMultiplier {
                    suffix: suffix.to_string(),
                    multiplier: *multiplier,
                })
                .collect(),
            filler_words: default_filler_words(),
        }
    }

    /// Load a lexicon from a JSON file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let lexicon: LexiconConfig = serde_json::from_str(&content)?;
        lexicon.validate()?;

        info!(
            path = %path.display(),
            categories = lexicon.categories.len(),
            accounts = lexicon.accounts.len(),
            suffixes = lexicon.amount_suffixes.len(),
            "Lexicon loaded"
        );

        Ok(lexicon)
    }

    /// Reject tables that cannot be matched against lowercase input.
    ///
    /// Alias collisions are reported but not rejected: resolution keeps the
    /// first account in table order.
    pub fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(CatatError::Lexicon("no accounts defined".into()));
        }

        let keyword_tables = [
            ("expense_keywords", self.expense_keywords.iter().collect::<Vec<_>>()),
            ("income_keywords", self.income_keywords.iter().collect()),
            ("transfer_keywords", self.transfer_keywords.iter().collect()),
            ("filler_words", self.filler_words.iter().collect()),
        ];
        for (table, words) in keyword_tables {
            for word in words {
                check_token(table, word)?;
            }
        }

        for category in &self.categories {
            for keyword in &category.keywords {
                check_token(&category.name, keyword)?;
            }
        }

        for account in &self.accounts {
            if account.account.trim().is_empty() {
                return Err(CatatError::Lexicon("account with empty identifier".into()));
            }
            for alias in &account.aliases {
                check_token(&account.account, alias)?;
                if alias.chars().any(char::is_whitespace) {
                    return Err(CatatError::Lexicon(format!(
                        "alias '{}' of {} contains whitespace and can never match a token",
                        alias, account.account
                    )));
                }
            }
        }

        for suffix in &self.amount_suffixes {
            check_token("amount_suffixes", &suffix.suffix)?;
            if suffix.multiplier == 0 {
                return Err(CatatError::Lexicon(format!(
                    "suffix '{}' has a zero multiplier",
                    suffix.suffix
                )));
            }
        }

        for collision in self.alias_collisions() {
            warn!(
                alias = %collision.alias,
                kept_by = %collision.kept_by,
                shadowed = %collision.shadowed,
                "Alias claimed by more than one account; first definition wins"
            );
        }

        Ok(())
    }

    /// Every alias token defined for more than one account
    pub fn alias_collisions(&self) -> Vec<AliasCollision> {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        let mut collisions = Vec::new();

        for entry in &self.accounts {
            for alias in &entry.aliases {
                match owner.get(alias.as_str()) {
                    Some(first) if *first != entry.account.as_str() => {
                        collisions.push(AliasCollision {
                            alias: alias.clone(),
                            kept_by: first.to_string(),
                            shadowed: entry.account.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(alias.as_str(), entry.account.as_str());
                    }
                }
            }
        }

        collisions
    }

    /// Canonical (upper-cased) account for an exact alias token
    pub fn account_for_alias(&self, token: &str) -> Option<String> {
        self.accounts
            .iter()
            .find(|entry| entry.aliases.iter().any(|alias| alias == token))
            .map(|entry| entry.account.to_uppercase())
    }

    pub fn all_aliases(&self) -> impl Iterator<Item = &str> {
        self.accounts
            .iter()
            .flat_map(|entry| entry.aliases.iter().map(String::as_str))
    }
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self::indonesian()
    }
}

fn check_token(table: &str, word: &str) -> Result<()> {
    if word.trim().is_empty() {
        return Err(CatatError::Lexicon(format!("empty entry in {}", table)));
    }
    if word.to_lowercase() != *word {
        return Err(CatatError::Lexicon(format!(
            "entry '{}' in {} must be lowercase",
            word, table
        )));
    }
    Ok(())
}
