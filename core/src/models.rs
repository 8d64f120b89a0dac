use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LocaleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Ja, Locale::ZhTw, Locale::ZhCn]
    }

    /// Code as used in `data-lang` attributes and the `html lang` attribute.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
            Locale::ZhTw => "zh-TW",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// Name of the language written in the language itself
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ja => "日本語",
            Locale::ZhTw => "繁體中文",
            Locale::ZhCn => "简体中文",
        }
    }

    pub fn from_code(code: &str) -> Result<Locale, LocaleError> {
        match code.trim() {
            "en" | "en-US" | "en-GB" => Ok(Locale::En),
            "ja" | "ja-JP" => Ok(Locale::Ja),
            "zh-TW" | "zh-Hant" => Ok(Locale::ZhTw),
            "zh-CN" | "zh-Hans" | "zh" => Ok(Locale::ZhCn),
            other => Err(LocaleError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel: String,
    #[serde(default)]
    pub is_verified: bool,
    pub thumbnail: String,
    pub views: String,
    pub upload_time: String,
    pub category: String,
    #[serde(default)]
    pub is_live: bool,
    // opaque id for the embedded third-party player
    #[serde(default, alias = "youtubeId")]
    pub player_ref: Option<String>,
}

/// Markup value of the "everything" category tag.
pub const ALL_CATEGORIES: &str = "All Data";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn from_tag(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES || value == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, video: &Video) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => video.category == *c,
        }
    }

    /// Value carried by the matching `data-category` attribute.
    pub fn tag_value(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    #[default]
    Closed,
    Open,
}

impl Toggle {
    pub fn is_open(self) -> bool {
        self == Toggle::Open
    }

    pub fn flip(&mut self) {
        *self = match self {
            Toggle::Closed => Toggle::Open,
            Toggle::Open => Toggle::Closed,
        };
    }

    pub fn open(&mut self) {
        *self = Toggle::Open;
    }

    pub fn close(&mut self) {
        *self = Toggle::Closed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    FragmentLoad,
    MissingTarget,
    MissingTranslation,
    VideoNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}
