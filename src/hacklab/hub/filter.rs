use std::fmt;
use std::str::FromStr;

use crate::hacklab::hub::error::HubError;
use crate::hacklab::hub::model::{ProgressLevel, Tool};
use crate::hacklab::hub::progress::ProgressStore;

/// Progress criterion of the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressFilter {
    #[default]
    All,
    Level(ProgressLevel),
}

impl fmt::Display for ProgressFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressFilter::All => f.write_str("all"),
            ProgressFilter::Level(level) => write!(f, "{level}"),
        }
    }
}

impl FromStr for ProgressFilter {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ProgressFilter::All);
        }
        s.parse().map(ProgressFilter::Level)
    }
}

/// Active list filters. The default matches every visible tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Category to keep; empty means any.
    pub category_id: String,
    pub progress: ProgressFilter,
    /// Free-text query, matched case-insensitively.
    pub search: String,
}

impl FilterCriteria {
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressFilter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Returns the tools passing every predicate, in their original order.
pub fn filter_tools<'a, S>(tools: &'a [Tool], criteria: &FilterCriteria, store: &S) -> Vec<&'a Tool>
where
    S: ProgressStore + ?Sized,
{
    let query = criteria.search.to_lowercase();
    tools
        .iter()
        .filter(|tool| is_visible(tool))
        .filter(|tool| matches_category(tool, &criteria.category_id))
        .filter(|tool| matches_progress(tool, criteria.progress, store))
        .filter(|tool| matches_search(tool, &query))
        .collect()
}

pub fn is_visible(tool: &Tool) -> bool {
    tool.is_visible()
}

pub fn matches_category(tool: &Tool, category_id: &str) -> bool {
    category_id.is_empty() || tool.has_category(category_id)
}

pub fn matches_progress<S>(tool: &Tool, progress: ProgressFilter, store: &S) -> bool
where
    S: ProgressStore + ?Sized,
{
    match progress {
        ProgressFilter::All => true,
        ProgressFilter::Level(level) => store.get(&tool.slug) == level,
    }
}

/// Case-insensitive substring match over the tool's text fields and tags.
pub fn matches_search(tool: &Tool, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    search_text(tool).contains(&query.to_lowercase())
}

fn search_text(tool: &Tool) -> String {
    [
        tool.title.as_str(),
        tool.subtitle_ja.as_str(),
        tool.subtitle_en.as_str(),
        tool.description_ja.as_str(),
        tool.description_en.as_str(),
    ]
    .into_iter()
    .chain(tool.tags.iter().map(String::as_str))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}
