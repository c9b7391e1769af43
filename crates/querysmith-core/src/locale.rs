//! Display languages, themes and localized UI strings.

use crate::types::OperatorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Tr,
            Language::Tr => Language::En,
        }
    }

    /// Strings for this language
    pub fn strings(&self) -> &'static UiStrings {
        match self {
            Language::En => &UI_STRINGS_EN,
            Language::Tr => &UI_STRINGS_TR,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Localized labels used by the terminal surfaces.
#[derive(Debug)]
pub struct UiStrings {
    pub app_title: &'static str,
    pub query_builder: &'static str,
    pub live_preview: &'static str,
    pub query_placeholder: &'static str,
    pub operator_library: &'static str,
    pub all_categories: &'static str,
    pub enter_search_term: &'static str,
    pub search_preset: &'static str,
    pub standard_mode: &'static str,
    pub ai_assistant: &'static str,
    pub ai_prompt_placeholder: &'static str,
    pub generating: &'static str,
    pub ai_error_title: &'static str,
    pub ai_error_body: &'static str,
    pub ai_timeout: &'static str,
    pub busy_generating: &'static str,
    pub search_action: &'static str,
    pub reset: &'static str,
    pub locked: &'static str,
    pub category_basic: &'static str,
    pub category_content: &'static str,
    pub category_location: &'static str,
    pub category_time: &'static str,
    pub category_advanced: &'static str,
}

impl UiStrings {
    /// Localized name of an operator category
    pub fn category(&self, category: OperatorCategory) -> &'static str {
        match category {
            OperatorCategory::Basic => self.category_basic,
            OperatorCategory::Content => self.category_content,
            OperatorCategory::Location => self.category_location,
            OperatorCategory::Time => self.category_time,
            OperatorCategory::Advanced => self.category_advanced,
        }
    }
}

pub static UI_STRINGS_EN: UiStrings = UiStrings {
    app_title: "Querysmith",
    query_builder: "Query Builder",
    live_preview: "Live Preview",
    query_placeholder: "Your query will appear here...",
    operator_library: "Operator Library",
    all_categories: "All",
    enter_search_term: "Enter search term...",
    search_preset: "Search Preset",
    standard_mode: "Standard Mode",
    ai_assistant: "AI Query Assistant",
    ai_prompt_placeholder: "Describe the search you want, e.g. 'a pdf about PESTLE analysis'",
    generating: "Generating...",
    ai_error_title: "AI Generation Failed",
    ai_error_body: "The AI could not generate a query. Please try again or rephrase your request.",
    ai_timeout: "Timeout: the AI did not finish generating the query in time.",
    busy_generating: "A generation request is already running.",
    search_action: "Search",
    reset: "Reset",
    locked: "locked",
    category_basic: "Basic",
    category_content: "Content",
    category_location: "Location",
    category_time: "Time",
    category_advanced: "Advanced",
};

pub static UI_STRINGS_TR: UiStrings = UiStrings {
    app_title: "Querysmith",
    query_builder: "Sorgu Oluşturucu",
    live_preview: "Canlı Önizleme",
    query_placeholder: "Sorgunuz burada görünecek...",
    operator_library: "Operatör Kütüphanesi",
    all_categories: "Tümü",
    enter_search_term: "Arama terimi girin...",
    search_preset: "Arama Şablonu",
    standard_mode: "Standart Mod",
    ai_assistant: "Yapay Zeka Sorgu Asistanı",
    ai_prompt_placeholder: "Yapmak istediğiniz aramayı açıklayın, örn. 'PESTLE analizi hakkında pdf'",
    generating: "Oluşturuluyor...",
    ai_error_title: "Yapay Zeka Hatası",
    ai_error_body: "Yapay zeka bir sorgu oluşturamadı. Lütfen tekrar deneyin veya isteğinizi farklı ifade edin.",
    ai_timeout: "Zaman aşımı: yapay zeka sorguyu zamanında oluşturamadı.",
    busy_generating: "Zaten bir oluşturma isteği çalışıyor.",
    search_action: "Ara",
    reset: "Sıfırla",
    locked: "kilitli",
    category_basic: "Temel",
    category_content: "İçerik",
    category_location: "Konum",
    category_time: "Zaman",
    category_advanced: "Gelişmiş",
};
