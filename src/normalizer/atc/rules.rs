//! Individual rewrite steps of the ATC normalizer.
//!
//! Each rule sees the output of the rule before it. Patterns use `[0-9]`
//! rather than `\d` so only ASCII digits are spelled out.

use anyhow::Result;
use regex::{Captures, Regex};

use super::spelling::{cardinal, phonetic_word, spell_code, spell_digits};

/// A single text rewrite applied by the ATC normalizer.
pub trait RewriteRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str) -> String;
}

/// `FL350` -> `flight level three five zero`
pub struct FlightLevelRule {
    pattern: Regex,
}

impl FlightLevelRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)\bFL([0-9]+)\b")?,
        })
    }
}

impl RewriteRule for FlightLevelRule {
    fn name(&self) -> &'static str {
        "flight_level"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                format!("flight level {}", spell_digits(&caps[1]))
            })
            .into_owned()
    }
}

/// `5,000 feet` -> `five thousand feet`
pub struct AltitudeRule {
    pattern: Regex,
}

impl AltitudeRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)\b([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s*(feet)\b")?,
        })
    }
}

impl RewriteRule for AltitudeRule {
    fn name(&self) -> &'static str {
        "altitude"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let digits = caps[1].replace(',', "");
                let words = match digits.parse::<i64>() {
                    Ok(number) => cardinal(number),
                    Err(_) => spell_digits(&digits),
                };
                format!("{} {}", words, &caps[2])
            })
            .into_owned()
    }
}

/// `N-123` -> `november one two three`
pub struct HyphenatedCodeRule {
    pattern: Regex,
}

impl HyphenatedCodeRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"\b[A-Za-z0-9]+(?:-[A-Za-z0-9]+)+\b")?,
        })
    }
}

impl RewriteRule for HyphenatedCodeRule {
    fn name(&self) -> &'static str {
        "hyphenated_code"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                caps[0]
                    .split('-')
                    .map(spell_code)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .into_owned()
    }
}

/// Runway designators (`24L` -> `two four left`) and other codes mixing
/// letters and digits (`KLM123` -> `kilo lima mike one two three`).
/// Tokens without a digit, or without a letter, are left alone.
pub struct AlphanumericRule {
    token: Regex,
    runway: Regex,
}

impl AlphanumericRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            token: Regex::new(r"\b[A-Za-z0-9]+\b")?,
            runway: Regex::new(r"(?i)^([0-9]{1,2})([LR])$")?,
        })
    }

    fn rewrite_token(&self, token: &str) -> String {
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if !has_digit {
            return token.to_string();
        }

        if let Some(caps) = self.runway.captures(token) {
            let side = if caps[2].eq_ignore_ascii_case("l") {
                "left"
            } else {
                "right"
            };
            return format!("{} {}", spell_digits(&caps[1]), side);
        }

        if token.chars().any(|c| c.is_ascii_alphabetic()) {
            spell_code(token)
        } else {
            token.to_string()
        }
    }
}

impl RewriteRule for AlphanumericRule {
    fn name(&self) -> &'static str {
        "alphanumeric"
    }

    fn apply(&self, text: &str) -> String {
        self.token
            .replace_all(text, |caps: &Captures| self.rewrite_token(&caps[0]))
            .into_owned()
    }
}

/// `123.45` -> `one two three decimal four five`, `42` -> `four two`
pub struct NumberRule {
    pattern: Regex,
}

impl NumberRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"[0-9]+(?:\.[0-9]+)?")?,
        })
    }
}

impl RewriteRule for NumberRule {
    fn name(&self) -> &'static str {
        "number"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| match caps[0].split_once('.') {
                Some((integer, fraction)) => format!(
                    "{} decimal {}",
                    spell_digits(integer),
                    spell_digits(fraction)
                ),
                None => spell_digits(&caps[0]),
            })
            .into_owned()
    }
}

/// A lone letter with whitespace on both sides becomes its phonetic word.
/// `a` and `i` are skipped since they are ordinary English words.
pub struct SingleLetterRule;

impl SingleLetterRule {
    const EXCLUDED: [char; 2] = ['a', 'i'];
}

impl RewriteRule for SingleLetterRule {
    fn name(&self) -> &'static str {
        "single_letter"
    }

    fn apply(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());

        for (i, &c) in chars.iter().enumerate() {
            let isolated = i > 0
                && chars[i - 1].is_whitespace()
                && chars.get(i + 1).is_some_and(|next| next.is_whitespace());
            let eligible = !Self::EXCLUDED.contains(&c.to_ascii_lowercase());

            match phonetic_word(c) {
                Some(word) if isolated && eligible => out.push_str(word),
                _ => out.push(c),
            }
        }

        out
    }
}

/// Drop periods that do not sit next to a digit.
pub struct StrayPeriodRule;

impl RewriteRule for StrayPeriodRule {
    fn name(&self) -> &'static str {
        "stray_period"
    }

    fn apply(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        chars
            .iter()
            .enumerate()
            .filter(|&(i, &c)| {
                if c != '.' {
                    return true;
                }
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());
                digit_before || digit_after
            })
            .map(|(_, &c)| c)
            .collect()
    }
}

/// Reference transcripts spell the compound as one word.
pub struct TakeoffRule;

impl RewriteRule for TakeoffRule {
    fn name(&self) -> &'static str {
        "takeoff"
    }

    fn apply(&self, text: &str) -> String {
        text.replace("take off", "takeoff")
    }
}

pub struct StripPunctuationRule;

impl RewriteRule for StripPunctuationRule {
    fn name(&self) -> &'static str {
        "strip_punctuation"
    }

    fn apply(&self, text: &str) -> String {
        text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
    }
}

pub struct LowercaseRule;

impl RewriteRule for LowercaseRule {
    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn apply(&self, text: &str) -> String {
        text.to_lowercase()
    }
}
