use crate::hacklab::hub::i18n::Language;
use crate::hacklab::hub::model::{Category, ProgressLevel, Tool};

/// Maximum number of characters of description shown on a card.
pub const DESCRIPTION_BUDGET: usize = 120;
const ELLIPSIS: char = '…';
const STAR: &str = "★";
/// Upper bound on the stars drawn for a difficulty.
pub const MAX_STARS: u32 = 5;

/// Display fields of one tool card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub slug: String,
    pub day_label: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub difficulty: String,
    pub categories: Vec<String>,
    pub progress_level: ProgressLevel,
    pub progress_label: String,
    pub demo_url: String,
    pub repo_url: String,
    pub demo_button: String,
    pub repo_button: String,
}

/// Projects a tool into the fields shown on its card.
pub fn card_view(
    tool: &Tool,
    categories: &[Category],
    language: Language,
    level: ProgressLevel,
) -> CardView {
    CardView {
        slug: tool.slug.clone(),
        day_label: day_label(&tool.id),
        title: tool.title.clone(),
        subtitle: language
            .pick(&tool.subtitle_ja, &tool.subtitle_en)
            .to_string(),
        description: short_description(language.pick(&tool.description_ja, &tool.description_en)),
        difficulty: language.difficulty_line(&stars(tool.difficulty)),
        categories: category_labels(tool, categories, language),
        progress_level: level,
        progress_label: language.progress_button(level),
        demo_url: link_or_placeholder(&tool.demo_url),
        repo_url: link_or_placeholder(&tool.repo_url),
        demo_button: language.demo_button().to_string(),
        repo_button: language.repo_button().to_string(),
    }
}

/// `day102` becomes `Day102`; other ids are appended as-is.
pub fn day_label(id: &str) -> String {
    format!("Day{}", id.strip_prefix("day").unwrap_or(id))
}

pub fn short_description(full: &str) -> String {
    if full.chars().count() <= DESCRIPTION_BUDGET {
        return full.to_string();
    }
    let mut short: String = full.chars().take(DESCRIPTION_BUDGET).collect();
    short.push(ELLIPSIS);
    short
}

/// One star per difficulty level, between 1 and [`MAX_STARS`].
pub fn stars(difficulty: u32) -> String {
    STAR.repeat(difficulty.clamp(1, MAX_STARS) as usize)
}

/// Resolves category ids to labels, skipping unknown ids and empty labels.
pub fn category_labels(tool: &Tool, categories: &[Category], language: Language) -> Vec<String> {
    tool.category_ids
        .iter()
        .filter_map(|id| categories.iter().find(|category| &category.id == id))
        .map(|category| language.category_label(category))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

fn link_or_placeholder(url: &str) -> String {
    if url.is_empty() {
        "#".to_string()
    } else {
        url.to_string()
    }
}
