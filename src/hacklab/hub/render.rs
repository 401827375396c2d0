//! Plain-text painter for the derived views.

use std::fmt::Write;

use crate::hacklab::hub::app::{DashboardView, FilterOptions, ListView};
use crate::hacklab::hub::card::CardView;
use crate::hacklab::hub::i18n::Language;

const CHART_WIDTH: usize = 40;
const BAR_WIDTH: usize = 20;
const LEVEL_GLYPHS: [char; 4] = ['·', '░', '▒', '█'];

pub fn render_card(card: &CardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", card.day_label, card.title);
    if !card.subtitle.is_empty() {
        let _ = writeln!(out, "  {}", card.subtitle);
    }
    if !card.description.is_empty() {
        let _ = writeln!(out, "  {}", card.description);
    }
    let _ = write!(out, "  {}", card.difficulty);
    if !card.categories.is_empty() {
        let _ = write!(out, "  {}", card.categories.join(", "));
    }
    out.push('\n');
    let _ = writeln!(out, "  {}: {}", card.demo_button, card.demo_url);
    let _ = writeln!(out, "  {}: {}", card.repo_button, card.repo_url);
    let _ = writeln!(out, "  {} ({})", card.progress_label, card.slug);
    out
}

pub fn render_list(list: &ListView) -> String {
    match list {
        ListView::Empty(placeholder) => format!("{placeholder}\n"),
        ListView::Cards(cards) => cards
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn render_dashboard(view: &DashboardView, language: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", language.overall_heading());
    let _ = writeln!(out, "  {}", view.total_line);
    for line in &view.bucket_lines {
        let _ = writeln!(out, "  {line}");
    }

    // An empty catalog paints no chart at all.
    if !view.chart.is_empty() {
        let mut chart = String::with_capacity(CHART_WIDTH);
        for segment in &view.chart {
            let from = scale(segment.start, CHART_WIDTH);
            let to = scale(segment.end, CHART_WIDTH);
            for _ in from..to {
                chart.push(LEVEL_GLYPHS[segment.level.index()]);
            }
        }
        let _ = writeln!(out, "  [{chart}]");
        let legend: Vec<String> = view
            .chart
            .iter()
            .zip(&view.chart_labels)
            .map(|(segment, label)| {
                format!(
                    "{} {label} {:.0}%",
                    LEVEL_GLYPHS[segment.level.index()],
                    segment.percent
                )
            })
            .collect();
        let _ = writeln!(out, "  {}", legend.join("  "));
    }

    if !view.categories.is_empty() {
        let _ = writeln!(out, "\n{}", language.category_heading());
        for bar in &view.categories {
            let mut cells = String::with_capacity(BAR_WIDTH);
            let mut cumulative = 0.0;
            for (index, percent) in bar.percentages.iter().enumerate() {
                let from = scale(cumulative, BAR_WIDTH);
                cumulative += percent;
                let to = scale(cumulative, BAR_WIDTH);
                for _ in from..to {
                    cells.push(LEVEL_GLYPHS[index]);
                }
            }
            let counts = bar
                .counts
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join("/");
            let _ = writeln!(
                out,
                "  {:<24} [{cells:<width$}] {counts} ({})",
                bar.label,
                bar.total,
                width = BAR_WIDTH
            );
        }
    }

    let _ = writeln!(out, "\n{}", view.last_updated);
    out
}

pub fn render_filter_options(options: &FilterOptions, language: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}:", language.category_filter_label());
    for option in &options.categories {
        let value = if option.value.is_empty() {
            "\"\""
        } else {
            option.value.as_str()
        };
        let _ = writeln!(out, "  {value:<16} {}", option.label);
    }
    let _ = writeln!(out, "{}:", language.progress_filter_label());
    for option in &options.progress {
        let _ = writeln!(out, "  {:<16} {}", option.value, option.label);
    }
    let _ = writeln!(out, "\n{}", language.search_placeholder());
    out
}

fn scale(percent: f64, width: usize) -> usize {
    ((percent / 100.0) * width as f64).round() as usize
}
