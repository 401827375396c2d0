//! Progress aggregation over the full catalog.
//!
//! The dashboard always reflects every visible tool; list filters never apply.

use crate::hacklab::hub::model::{Category, CategoryId, ProgressLevel, Tool};
use crate::hacklab::hub::progress::ProgressStore;

/// Tool counts per progress bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressCounts {
    pub counts: [usize; 4],
    pub total: usize,
}

impl ProgressCounts {
    pub fn record(&mut self, level: ProgressLevel) {
        self.counts[level.index()] += 1;
        self.total += 1;
    }

    pub fn count(&self, level: ProgressLevel) -> usize {
        self.counts[level.index()]
    }
}

/// Aggregate for one category with at least one visible member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProgress {
    pub category_id: CategoryId,
    pub label_ja: String,
    pub label_en: String,
    pub counts: ProgressCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dashboard {
    pub overall: ProgressCounts,
    /// Ordered like the categories document; empty categories are omitted.
    pub categories: Vec<CategoryProgress>,
}

/// One slice of the circular breakdown, bounded in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSegment {
    pub level: ProgressLevel,
    pub percent: f64,
    pub start: f64,
    pub end: f64,
}

/// Counts the visible tools, overall and per category.
pub fn aggregate<S>(tools: &[Tool], categories: &[Category], store: &S) -> Dashboard
where
    S: ProgressStore + ?Sized,
{
    let mut overall = ProgressCounts::default();
    let mut per_category = vec![ProgressCounts::default(); categories.len()];

    for tool in tools.iter().filter(|tool| tool.is_visible()) {
        let level = store.get(&tool.slug);
        overall.record(level);
        for (index, category) in categories.iter().enumerate() {
            if tool.has_category(&category.id) {
                per_category[index].record(level);
            }
        }
    }

    let categories = categories
        .iter()
        .zip(per_category)
        .filter(|(_, counts)| counts.total > 0)
        .map(|(category, counts)| CategoryProgress {
            category_id: category.id.clone(),
            label_ja: category.ja.clone(),
            label_en: category.en.clone(),
            counts,
        })
        .collect();

    Dashboard {
        overall,
        categories,
    }
}

/// Maps counts onto cumulative percentage boundaries for a four-segment
/// circular chart. Returns no segments when there is nothing to chart.
pub fn chart_segments(counts: &ProgressCounts) -> Vec<ChartSegment> {
    if counts.total == 0 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(ProgressLevel::ALL.len());
    let mut cumulative = 0usize;
    for level in ProgressLevel::ALL {
        let start = percent_of(cumulative, counts.total);
        cumulative += counts.count(level);
        let end = percent_of(cumulative, counts.total);
        segments.push(ChartSegment {
            level,
            percent: percent_of(counts.count(level), counts.total),
            start,
            end,
        });
    }
    segments
}

/// Per-level share in percent, for the per-category progress bars.
pub fn bar_percentages(counts: &ProgressCounts) -> [f64; 4] {
    let mut percentages = [0.0; 4];
    if counts.total == 0 {
        return percentages;
    }
    for level in ProgressLevel::ALL {
        percentages[level.index()] = percent_of(counts.count(level), counts.total);
    }
    percentages
}

fn percent_of(count: usize, total: usize) -> f64 {
    // Exact at the boundaries: count == total yields 100.0.
    (count as f64) * 100.0 / (total as f64)
}
