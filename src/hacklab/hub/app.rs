//! Explicit application state and the events that change it.
//!
//! Every user action is an [`AppEvent`]. Applying one mutates the state (and,
//! for progress actions, the store) and reports which sections need a repaint.
//! Views are derived on demand from the state; nothing is cached between events.

use tracing::{debug, info};

use crate::hacklab::hub::card::{CardView, card_view};
use crate::hacklab::hub::dashboard::{self, ChartSegment, Dashboard};
use crate::hacklab::hub::error::{HubError, Result};
use crate::hacklab::hub::filter::{FilterCriteria, ProgressFilter, filter_tools};
use crate::hacklab::hub::i18n::Language;
use crate::hacklab::hub::loader::Catalog;
use crate::hacklab::hub::model::ProgressLevel;
use crate::hacklab::hub::progress::{self, ProgressStore};
use crate::hacklab::hub::share;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Catalog,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SetLanguage(Language),
    SwitchTab(Tab),
    SetCategory(String),
    SetProgressFilter(ProgressFilter),
    SetSearch(String),
    /// Advances a tool's progress by one level, wrapping after mastered.
    CycleProgress(String),
    SetProgress(String, ProgressLevel),
    ResetAll,
    OpenHelp,
    CloseHelp,
}

/// Sections to repaint after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refresh {
    pub list: bool,
    pub dashboard: bool,
    pub chrome: bool,
}

impl Refresh {
    pub const NONE: Refresh = Refresh {
        list: false,
        dashboard: false,
        chrome: false,
    };
    pub const ALL: Refresh = Refresh {
        list: true,
        dashboard: true,
        chrome: true,
    };
    const LIST: Refresh = Refresh {
        list: true,
        dashboard: false,
        chrome: false,
    };
    const PROGRESS: Refresh = Refresh {
        list: true,
        dashboard: true,
        chrome: false,
    };
    const CHROME: Refresh = Refresh {
        list: false,
        dashboard: false,
        chrome: true,
    };
}

/// The visible tool list, or the placeholder when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Cards(Vec<CardView>),
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Choices offered by the category and progress filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub categories: Vec<SelectOption>,
    pub progress: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub label: String,
    pub counts: [usize; 4],
    pub total: usize,
    pub percentages: [f64; 4],
}

/// Localized dashboard, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_line: String,
    pub bucket_lines: Vec<String>,
    pub chart: Vec<ChartSegment>,
    pub chart_labels: Vec<String>,
    pub categories: Vec<CategoryBar>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub language: Language,
    pub tab: Tab,
    pub filters: FilterCriteria,
    pub help_open: bool,
    catalog: Catalog,
}

impl AppState {
    pub fn new(catalog: Catalog, language: Language) -> Self {
        Self {
            language,
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn apply<S>(&mut self, event: AppEvent, store: &mut S) -> Result<Refresh>
    where
        S: ProgressStore + ?Sized,
    {
        debug!(?event, "applying event");
        let refresh = match event {
            AppEvent::SetLanguage(language) => {
                self.language = language;
                Refresh::ALL
            }
            AppEvent::SwitchTab(tab) => {
                self.tab = tab;
                Refresh::CHROME
            }
            AppEvent::SetCategory(category_id) => {
                self.filters.category_id = category_id;
                Refresh::LIST
            }
            AppEvent::SetProgressFilter(progress) => {
                self.filters.progress = progress;
                Refresh::LIST
            }
            AppEvent::SetSearch(search) => {
                self.filters.search = search.to_lowercase();
                Refresh::LIST
            }
            AppEvent::CycleProgress(slug) => {
                self.require_tool(&slug)?;
                let level = store.get(&slug).next();
                store.set(&slug, level)?;
                info!(%slug, %level, "progress advanced");
                Refresh::PROGRESS
            }
            AppEvent::SetProgress(slug, level) => {
                self.require_tool(&slug)?;
                store.set(&slug, level)?;
                info!(%slug, %level, "progress set");
                Refresh::PROGRESS
            }
            AppEvent::ResetAll => {
                let reset = progress::reset_all(store, &self.catalog.tools)?;
                info!(reset, "all progress reset");
                Refresh::PROGRESS
            }
            AppEvent::OpenHelp => {
                self.help_open = true;
                Refresh::CHROME
            }
            AppEvent::CloseHelp => {
                self.help_open = false;
                Refresh::CHROME
            }
        };
        Ok(refresh)
    }

    fn require_tool(&self, slug: &str) -> Result<()> {
        match self.catalog.tool(slug) {
            Some(tool) if tool.is_visible() => Ok(()),
            _ => Err(HubError::UnknownTool(slug.to_string())),
        }
    }

    pub fn list_view<S>(&self, store: &S) -> ListView
    where
        S: ProgressStore + ?Sized,
    {
        let cards: Vec<CardView> = filter_tools(&self.catalog.tools, &self.filters, store)
            .into_iter()
            .map(|tool| {
                card_view(
                    tool,
                    &self.catalog.categories,
                    self.language,
                    store.get(&tool.slug),
                )
            })
            .collect();

        if cards.is_empty() {
            ListView::Empty(self.language.no_match().to_string())
        } else {
            ListView::Cards(cards)
        }
    }

    /// Card for a single visible tool, regardless of the active filters.
    pub fn card<S>(&self, slug: &str, store: &S) -> Option<CardView>
    where
        S: ProgressStore + ?Sized,
    {
        self.catalog
            .tool(slug)
            .filter(|tool| tool.is_visible())
            .map(|tool| {
                card_view(
                    tool,
                    &self.catalog.categories,
                    self.language,
                    store.get(slug),
                )
            })
    }

    pub fn dashboard<S>(&self, store: &S) -> Dashboard
    where
        S: ProgressStore + ?Sized,
    {
        dashboard::aggregate(&self.catalog.tools, &self.catalog.categories, store)
    }

    pub fn dashboard_view<S>(&self, store: &S) -> DashboardView
    where
        S: ProgressStore + ?Sized,
    {
        let language = self.language;
        let summary = self.dashboard(store);
        let overall = summary.overall;

        DashboardView {
            total_line: language.total_line(overall.total),
            bucket_lines: ProgressLevel::ALL
                .iter()
                .map(|level| language.bucket_line(*level, overall.count(*level)))
                .collect(),
            chart: dashboard::chart_segments(&overall),
            chart_labels: ProgressLevel::ALL
                .iter()
                .map(|level| language.progress_label(*level).to_string())
                .collect(),
            categories: summary
                .categories
                .iter()
                .map(|category| CategoryBar {
                    label: language
                        .pick(&category.label_ja, &category.label_en)
                        .to_string(),
                    counts: category.counts.counts,
                    total: category.counts.total,
                    percentages: dashboard::bar_percentages(&category.counts),
                })
                .collect(),
            last_updated: language.last_updated(&self.catalog.generated_at),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        let language = self.language;
        let all = |value: &str| SelectOption {
            value: value.to_string(),
            label: language.all_option().to_string(),
        };

        let mut categories = vec![all("")];
        categories.extend(self.catalog.categories.iter().map(|category| SelectOption {
            value: category.id.clone(),
            label: language.category_label(category).to_string(),
        }));

        let mut progress = vec![all("all")];
        progress.extend(ProgressLevel::ALL.iter().map(|level| SelectOption {
            value: level.to_string(),
            label: language.progress_label(*level).to_string(),
        }));

        FilterOptions {
            categories,
            progress,
        }
    }

    pub fn share_url<S>(&self, store: &S, page_url: &str) -> String
    where
        S: ProgressStore + ?Sized,
    {
        let overall = self.dashboard(store).overall;
        share::share_intent_url(&share::share_text(self.language, &overall, page_url))
    }
}
