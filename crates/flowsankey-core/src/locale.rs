//! Display text lookup and locale-aware number formatting.

use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Message lookup injected into the view and the exporters.
pub trait Localizer {
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str>;
}

/// Returns every message id unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Localizer for Untranslated {
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(msgid)
    }
}

/// A flat `msgid -> translation` table, typically loaded from a JSON object.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: FxHashMap<String, String>,
}

impl Catalog {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let messages: FxHashMap<String, String> = serde_json::from_str(text)?;
        Ok(Self { messages })
    }

    pub fn insert(&mut self, msgid: impl Into<String>, translation: impl Into<String>) {
        self.messages.insert(msgid.into(), translation.into());
    }
}

impl Localizer for Catalog {
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str> {
        match self.messages.get(msgid) {
            Some(t) => Cow::Borrowed(t.as_str()),
            None => Cow::Borrowed(msgid),
        }
    }
}

/// Formats numbers the way `Number.prototype.toLocaleString` does with default options:
/// at most three fraction digits, language-specific separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimal: char,
    group: Option<char>,
    /// Some locales only group from five integer digits on (`1234` but `12 345`).
    min_grouping_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::for_language("en")
    }
}

impl NumberFormat {
    pub fn for_language(language: &str) -> Self {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal, group, min_grouping_digits) = match primary.as_str() {
            "de" | "nl" | "it" | "id" | "da" => (',', Some('.'), 4),
            "es" | "pt" => (',', Some('.'), 5),
            "fr" => (',', Some('\u{202f}'), 4),
            "pl" | "sv" | "hu" | "cs" | "fi" => (',', Some('\u{a0}'), 5),
            _ => ('.', Some(','), 4),
        };
        Self {
            decimal,
            group,
            min_grouping_digits,
        }
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        // Near f64::MAX scaling overflows; such values have no fraction digits anyway.
        let scaled = value * 1000.0;
        let rounded = if scaled.is_finite() {
            scaled.round() / 1000.0
        } else {
            value
        };
        let negative = rounded < 0.0;
        let abs = rounded.abs();

        let mut buf = ryu_js::Buffer::new();
        let repr = buf.format(abs);
        let (int_part, frac_part) = if repr.contains(['e', 'E']) {
            // Beyond 1e21 ryu-js switches to exponent notation; spell the integer out.
            (format!("{abs:.0}"), String::new())
        } else {
            match repr.split_once('.') {
                Some((i, f)) => (i.to_string(), f.chars().take(3).collect::<String>()),
                None => (repr.to_string(), String::new()),
            }
        };
        let frac_part = frac_part.trim_end_matches('0');

        let mut out = String::with_capacity(int_part.len() + frac_part.len() + 4);
        if negative {
            out.push('-');
        }
        out.push_str(&self.group_digits(&int_part));
        if !frac_part.is_empty() {
            out.push(self.decimal);
            out.push_str(frac_part);
        }
        out
    }

    /// Reads back a number written by [`NumberFormat::format`].
    pub fn parse(&self, text: &str) -> Option<f64> {
        let mut plain = String::with_capacity(text.len());
        for ch in text.trim().chars() {
            if Some(ch) == self.group {
                continue;
            }
            plain.push(if ch == self.decimal { '.' } else { ch });
        }
        plain.parse().ok()
    }

    fn group_digits(&self, digits: &str) -> String {
        let Some(sep) = self.group else {
            return digits.to_string();
        };
        if digits.len() < self.min_grouping_digits {
            return digits.to_string();
        }
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        let lead = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - lead) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}
