//! Core types for xamldict.
//! The format parser decodes into these; the store serializes them back.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single localized string entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translation {
    /// The literal translation content; may contain newline characters.
    pub text: String,

    /// Whether leading/trailing/internal whitespace must be kept verbatim
    /// when the entry is written back. Set when the source document carried
    /// an explicit `xml:space="preserve"` marker, or when `text` contains a
    /// newline or leading/trailing whitespace that trimming would lose.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub preserve_space: bool,
}

impl Translation {
    /// Creates a translation, inferring `preserve_space` from the text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let preserve_space = text_needs_preserving(&text);
        Translation {
            text,
            preserve_space,
        }
    }

    /// Creates a translation whose whitespace must be kept verbatim.
    pub fn preserved(text: impl Into<String>) -> Self {
        Translation {
            text: text.into(),
            preserve_space: true,
        }
    }
}

/// True when `text` would not survive the document format's whitespace
/// trimming: it contains a newline or leading/trailing whitespace.
pub(crate) fn text_needs_preserving(text: &str) -> bool {
    text.contains('\n') || text.trim() != text
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Locales the consuming application ships resource dictionaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Locale {
    ZhCn,
    ZhTw,
    EnUs,
    JaJp,
    KoKr,
}

impl Locale {
    /// All supported locales, in display order.
    pub const ALL: [Locale; 5] = [
        Locale::ZhCn,
        Locale::ZhTw,
        Locale::EnUs,
        Locale::JaJp,
        Locale::KoKr,
    ];

    /// The locale code used in resource file names (e.g. `enUS.axaml`).
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zhCN",
            Locale::ZhTw => "zhTW",
            Locale::EnUs => "enUS",
            Locale::JaJp => "jaJP",
            Locale::KoKr => "koKR",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zhCN" => Ok(Locale::ZhCn),
            "zhTW" => Ok(Locale::ZhTw),
            "enUS" => Ok(Locale::EnUs),
            "jaJP" => Ok(Locale::JaJp),
            "koKR" => Ok(Locale::KoKr),
            other => Err(Error::UnknownLocale(other.to_string())),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
