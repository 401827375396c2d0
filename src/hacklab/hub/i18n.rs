//! Localized labels for the two supported display languages.
//!
//! Language only ever changes labels; counts and filter results are computed
//! independently of it.

use std::fmt;
use std::str::FromStr;

use crate::hacklab::hub::error::HubError;
use crate::hacklab::hub::model::{Category, ProgressLevel};

/// Display language of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    /// Picks the text matching this language.
    pub fn pick<'a>(self, ja: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Ja => ja,
            Language::En => en,
        }
    }

    pub fn progress_label(self, level: ProgressLevel) -> &'static str {
        let labels = match self {
            Language::Ja => ["未着手", "学習中", "一周完了", "定着済み"],
            Language::En => ["Not started", "In progress", "First pass", "Mastered"],
        };
        labels[level.index()]
    }

    pub fn category_label(self, category: &Category) -> &str {
        self.pick(&category.ja, &category.en)
    }

    pub fn all_option(self) -> &'static str {
        self.pick("すべて", "All")
    }

    pub fn no_match(self) -> &'static str {
        self.pick(
            "条件に一致するツールがありません。",
            "No tools match the current filters.",
        )
    }

    pub fn search_placeholder(self) -> &'static str {
        self.pick(
            "タイトル・説明・タグで検索",
            "Search by title / description / tags",
        )
    }

    pub fn difficulty_line(self, stars: &str) -> String {
        match self {
            Language::Ja => format!("難易度: {stars}"),
            Language::En => format!("Level: {stars}"),
        }
    }

    pub fn progress_button(self, level: ProgressLevel) -> String {
        let label = self.progress_label(level);
        match self {
            Language::Ja => format!("進捗: {label}"),
            Language::En => format!("Progress: {label}"),
        }
    }

    pub fn demo_button(self) -> &'static str {
        self.pick("デモを開く", "Open demo")
    }

    pub fn repo_button(self) -> &'static str {
        "GitHub"
    }

    pub fn total_line(self, total: usize) -> String {
        match self {
            Language::Ja => format!("全ツール数: {total}"),
            Language::En => format!("Total tools: {total}"),
        }
    }

    pub fn bucket_line(self, level: ProgressLevel, count: usize) -> String {
        format!("{}: {count}", self.progress_label(level))
    }

    pub fn last_updated(self, generated_at: &str) -> String {
        let value = if generated_at.is_empty() {
            "-"
        } else {
            generated_at
        };
        match self {
            Language::Ja => format!("最終更新: {value}"),
            Language::En => format!("Last updated: {value}"),
        }
    }

    pub fn overall_heading(self) -> &'static str {
        self.pick("全体の進捗", "Overall progress")
    }

    pub fn category_heading(self) -> &'static str {
        self.pick("カテゴリ別の進捗", "Progress by category")
    }

    pub fn reset_confirmation(self) -> &'static str {
        self.pick(
            "本当にすべてのツールの進捗を「未着手」にリセットしますか？",
            "Are you sure you want to reset all tools to \"Not started\"?",
        )
    }

    pub fn reset_done(self) -> &'static str {
        self.pick(
            "すべてのツールの進捗を「未着手」にリセットしました。",
            "All tools have been reset to \"Not started\".",
        )
    }

    pub fn category_filter_label(self) -> &'static str {
        self.pick("カテゴリ", "Category")
    }

    pub fn progress_filter_label(self) -> &'static str {
        self.pick("進捗", "Progress")
    }

    pub fn help_text(self) -> &'static str {
        match self {
            Language::Ja => {
                "使い方\n\
                 - 一覧タブでカテゴリ・進捗・キーワードでツールを絞り込めます。\n\
                 - 進捗ボタンを押すたびに 未着手 → 学習中 → 一周完了 → 定着済み と切り替わります。\n\
                 - 進捗はこの端末にのみ保存されます。\n\
                 - ダッシュボードでは全体とカテゴリ別の進捗を確認できます。"
            }
            Language::En => {
                "How to use\n\
                 - Filter tools on the catalog tab by category, progress, or keyword.\n\
                 - Each press of the progress button cycles Not started → In progress → First pass → Mastered.\n\
                 - Progress is stored on this device only.\n\
                 - The dashboard shows overall and per-category progress."
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" => Ok(Language::Ja),
            "en" => Ok(Language::En),
            _ => Err(HubError::InvalidLanguage(s.to_string())),
        }
    }
}
