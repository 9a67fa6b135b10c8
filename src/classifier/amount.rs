//! Amount extraction
//!
//! Three named pattern rules scan the lowercase message independently:
//! bare digit groups, digits with a short-form suffix (`rb`, `ribu`, `k`)
//! and digits with a long-form suffix (`jt`, `juta`, `m`). Every match is a
//! candidate and the largest candidate wins.
//!
//! Taking the maximum is a deliberate heuristic: in a message such as
//! "beli tiket 2 orang 50rb" the dominant figure is the total, and an
//! overestimate is easier for the user to spot than a missing zero.

use crate::lexicon::{SuffixMultiplier, LONG_FORM_THRESHOLD};
use crate::Result;
use regex::Regex;
use std::borrow::Cow;

/// Digit group with optional thousand separators (`20.000`, `150000`)
const BARE_NUMBER: &str = r"[0-9]+(?:[.,][0-9]{3})*";

/// Digit group in front of a suffix; a short trailing group is a decimal
/// fraction (`2.5jt`)
const SUFFIXED_NUMBER: &str = r"[0-9]+(?:[.,][0-9]+)*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    BareNumber,
    ShortSuffix,
    LongSuffix,
}

/// One parsed number found in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountCandidate {
    pub rule: AmountRule,
    pub matched: String,
    pub value: u64,
}

struct CompiledRule {
    rule: AmountRule,
    pattern: Regex,
}

pub struct AmountExtractor {
    rules: Vec<CompiledRule>,
    /// Longest suffix first so `juta` is preferred over a shorter key
    suffixes: Vec<SuffixMultiplier>,
    /// Case-insensitive union of all rules, used to strip amounts from the
    /// original text
    mentions: Regex,
}

impl AmountExtractor {
    pub fn new(suffixes: &[SuffixMultiplier]) -> Result<Self> {
        let mut suffixes = suffixes.to_vec();
        suffixes.sort_by(|a, b| b.suffix.len().cmp(&a.suffix.len()));

        let (long, short): (Vec<&SuffixMultiplier>, Vec<&SuffixMultiplier>) = suffixes
            .iter()
            .partition(|s| s.multiplier >= LONG_FORM_THRESHOLD);

        let mut rules = vec![CompiledRule {
            rule: AmountRule::BareNumber,
            pattern: Regex::new(BARE_NUMBER)?,
        }];

        for (rule, group) in [(AmountRule::ShortSuffix, &short), (AmountRule::LongSuffix, &long)] {
            if let Some(alternation) = alternation(group.iter().map(|s| s.suffix.as_str())) {
                rules.push(CompiledRule {
                    rule,
                    pattern: Regex::new(&format!(r"{}\s*{}\b", SUFFIXED_NUMBER, alternation))?,
                });
            }
        }

        // Unanchored on the left, like the extraction rules: "Rp20.000" is a mention
        let mentions = match alternation(suffixes.iter().map(|s| s.suffix.as_str())) {
            Some(alternation) => format!(
                r"(?i){num}\s*{alt}\b|{num}",
                num = SUFFIXED_NUMBER,
                alt = alternation
            ),
            None => SUFFIXED_NUMBER.to_string(),
        };

        Ok(Self {
            rules,
            suffixes,
            mentions: Regex::new(&mentions)?,
        })
    }

    /// Every positive amount found by every rule, in rule order
    pub fn candidates(&self, text: &str) -> Vec<AmountCandidate> {
        let mut found = Vec::new();

        for compiled in &self.rules {
            for m in compiled.pattern.find_iter(text) {
                let value = match compiled.rule {
                    AmountRule::BareNumber => parse_plain(m.as_str()),
                    AmountRule::ShortSuffix | AmountRule::LongSuffix => {
                        self.parse_suffixed(m.as_str())
                    }
                };

                if let Some(value) = value.filter(|v| *v > 0) {
                    found.push(AmountCandidate {
                        rule: compiled.rule,
                        matched: m.as_str().to_string(),
                        value,
                    });
                }
            }
        }

        found
    }

    /// Largest candidate, or `None` when the text has no numeric evidence
    pub fn extract(&self, text: &str) -> Option<u64> {
        self.candidates(text).into_iter().map(|c| c.value).max()
    }

    /// Remove every amount mention from (original-case) text
    pub fn strip_mentions<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.mentions.replace_all(text, "")
    }

    fn parse_suffixed(&self, matched: &str) -> Option<u64> {
        match self
            .suffixes
            .iter()
            .find(|s| matched.ends_with(s.suffix.as_str()))
        {
            Some(suffix) => {
                let number = matched[..matched.len() - suffix.suffix.len()].trim_end();
                scale(number, suffix.multiplier)
            }
            None => parse_plain(matched),
        }
    }
}

fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> Option<String> {
    let escaped: Vec<String> = words.map(regex::escape).collect();
    if escaped.is_empty() {
        None
    } else {
        Some(format!("(?:{})", escaped.join("|")))
    }
}

fn strip_separators(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

fn parse_plain(number: &str) -> Option<u64> {
    strip_separators(number).parse().ok()
}

/// Apply a multiplier, reading a trailing group of one or two digits as a
/// decimal fraction and anything longer as thousand separators
fn scale(number: &str, multiplier: u64) -> Option<u64> {
    match number.rfind(&['.', ','][..]) {
        Some(pos) if number.len() - pos - 1 < 3 => {
            let whole: u64 = strip_separators(&number[..pos]).parse().ok()?;
            let fraction_digits = &number[pos + 1..];
            let fraction: u64 = fraction_digits.parse().ok()?;
            let denominator = 10u64.checked_pow(fraction_digits.len() as u32)?;

            whole
                .checked_mul(multiplier)?
                .checked_add(fraction.checked_mul(multiplier)? / denominator)
        }
        _ => parse_plain(number)?.checked_mul(multiplier),
    }
}
