//! Notice data structure.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::utils::{dates, links};

/// Days after publication during which a notice counts as new when the
/// backend did not send a freshness flag.
const CLIENT_FRESHNESS_DAYS: i64 = 2;

/// Stable notice identifier in canonical string form.
///
/// The backend may send ids as JSON strings or numbers; both stringify to the
/// same key so that dedup and bookmarks never see `1` and `"1"` as different.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoticeId(String);

impl NoticeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoticeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NoticeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NoticeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for NoticeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NoticeId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => NoticeId(s),
            RawId::Unsigned(n) => NoticeId::from(n),
            RawId::Signed(n) => NoticeId::from(n),
        })
    }
}

/// Issuing body category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Bank,
    Ssc,
    Railways,
    Upsc,
    Psu,
    State,
    Medical,
    Defence,
    #[serde(other)]
    Others,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Bank,
        Category::Ssc,
        Category::Railways,
        Category::Upsc,
        Category::Psu,
        Category::State,
        Category::Medical,
        Category::Defence,
        Category::Others,
    ];

    /// Wire value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bank => "BANK",
            Category::Ssc => "SSC",
            Category::Railways => "RAILWAYS",
            Category::Upsc => "UPSC",
            Category::Psu => "PSU",
            Category::State => "STATE",
            Category::Medical => "MEDICAL",
            Category::Defence => "DEFENCE",
            Category::Others => "OTHERS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("unknown category '{s}'")))
    }
}

/// Kind of announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeType {
    Recruitment,
    Apprenticeship,
    ExamAdmitCard,
    Result,
    Calendar,
    #[serde(other)]
    GeneralInfo,
}

impl NoticeType {
    pub const ALL: [NoticeType; 6] = [
        NoticeType::Recruitment,
        NoticeType::Apprenticeship,
        NoticeType::ExamAdmitCard,
        NoticeType::Result,
        NoticeType::Calendar,
        NoticeType::GeneralInfo,
    ];

    /// Wire value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeType::Recruitment => "RECRUITMENT",
            NoticeType::Apprenticeship => "APPRENTICESHIP",
            NoticeType::ExamAdmitCard => "EXAM_ADMIT_CARD",
            NoticeType::Result => "RESULT",
            NoticeType::Calendar => "CALENDAR",
            NoticeType::GeneralInfo => "GENERAL_INFO",
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NoticeType::Recruitment => "Recruitment",
            NoticeType::Apprenticeship => "Apprenticeship",
            NoticeType::ExamAdmitCard => "Admit Card",
            NoticeType::Result => "Result",
            NoticeType::Calendar => "Calendar",
            NoticeType::GeneralInfo => "General Info",
        }
    }
}

impl fmt::Display for NoticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeType {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        NoticeType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("unknown notice type '{s}'")))
    }
}

/// A government job notice as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Stable identifier, the dedup and bookmark key
    pub id: NoticeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub notice_type: Option<NoticeType>,

    /// State name or "Central"
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub published_date: Option<NaiveDate>,

    /// Application deadline; absent means "not mentioned"
    #[serde(default)]
    pub last_date: Option<NaiveDate>,

    #[serde(default)]
    pub fetched_at: Option<NaiveDateTime>,

    /// Server-side freshness flag (`isNew` or `new` on the wire)
    #[serde(default, rename = "isNew", alias = "new")]
    pub is_new: Option<bool>,

    /// Server-side deadline flag (`isDeadlineSoon` or `deadlineSoon`)
    #[serde(default, rename = "isDeadlineSoon", alias = "deadlineSoon")]
    pub is_deadline_soon: Option<bool>,

    #[serde(default)]
    pub source_name: Option<String>,

    #[serde(default)]
    pub source_domain: Option<String>,

    #[serde(default)]
    pub source_url: Option<String>,

    #[serde(default)]
    pub apply_url: Option<String>,

    /// Comma-separated engineering branch codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineering_branches: Option<String>,
}

impl Notice {
    /// Minimal notice with only an id and a title.
    pub fn new(id: impl Into<NoticeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            notice_type: None,
            state: None,
            published_date: None,
            last_date: None,
            fetched_at: None,
            is_new: None,
            is_deadline_soon: None,
            source_name: None,
            source_domain: None,
            source_url: None,
            apply_url: None,
            engineering_branches: None,
        }
    }

    /// Whether the notice counts as new on `today`.
    ///
    /// The server flag wins. Only when it is absent does the publication date
    /// decide.
    pub fn is_new_on(&self, today: NaiveDate) -> bool {
        match self.is_new {
            Some(flag) => flag,
            None => self
                .published_date
                .map(|d| (today - d).num_days() <= CLIENT_FRESHNESS_DAYS)
                .unwrap_or(false),
        }
    }

    /// The server flag alone, without the publication-date fallback.
    pub fn flagged_new(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    pub fn is_deadline_soon(&self) -> bool {
        self.is_deadline_soon.unwrap_or(false)
    }

    /// True once the last date has passed.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.last_date.is_some_and(|d| d < today)
    }

    /// Hostname of the source, preferring the server-provided value.
    pub fn source_domain(&self) -> Option<String> {
        self.source_domain
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| self.source_url.as_deref().and_then(links::get_domain))
    }

    /// Outbound link: apply page if known, otherwise the source page.
    pub fn link(&self) -> Option<&str> {
        self.apply_url
            .as_deref()
            .or(self.source_url.as_deref())
            .filter(|l| !l.is_empty())
    }

    /// Format notice for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{title}`, `{category}`, `{type}`, `{state}`, `{source}`
    /// - `{published}`, `{last_date}`, `{link}`, `{new}`
    pub fn format(&self, template: &str) -> String {
        let category = self.category.map(|c| c.as_str()).unwrap_or("");
        let kind = self.notice_type.map(|t| t.label()).unwrap_or("");
        let published = self
            .published_date
            .map(dates::format_date)
            .unwrap_or_default();
        let last_date = self
            .last_date
            .map(dates::format_date)
            .unwrap_or_else(|| "Not mentioned".to_string());
        let source = self
            .source_name
            .clone()
            .or_else(|| self.source_domain())
            .unwrap_or_default();
        let new = if self.flagged_new() { "NEW" } else { "" };

        template
            .replace("{id}", self.id.as_str())
            .replace("{title}", &self.title)
            .replace("{category}", category)
            .replace("{type}", kind)
            .replace("{state}", self.state.as_deref().unwrap_or(""))
            .replace("{source}", &source)
            .replace("{published}", &published)
            .replace("{last_date}", &last_date)
            .replace("{link}", self.link().unwrap_or(""))
            .replace("{new}", new)
    }
}
