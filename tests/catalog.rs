use hacklab_hub::card::{self, DESCRIPTION_BUDGET};
use hacklab_hub::dashboard::{self, ProgressCounts};
use hacklab_hub::filter::{self, FilterCriteria, ProgressFilter};
use hacklab_hub::i18n::Language;
use hacklab_hub::loader::Catalog;
use hacklab_hub::model::{Category, ProgressLevel, Tool, ToolsDocument};
use hacklab_hub::progress::{MemoryProgressStore, ProgressStore};

fn sample_catalog() -> Catalog {
    let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
        {"id": "web", "ja": "Web", "en": "Web"},
        {"id": "crypto", "ja": "暗号", "en": "Cryptography"},
        {"id": "forensics", "ja": "フォレンジック", "en": "Forensics"}
    ]))
    .expect("categories parsed");

    let document: ToolsDocument = serde_json::from_value(serde_json::json!({
        "generated_at": "2025-01-01T00:00:00Z",
        "tools": [
            {
                "id": "day001",
                "slug": "xss-lab",
                "title": "XSS Lab",
                "subtitle_ja": "XSS体験",
                "subtitle_en": "Hands-on XSS",
                "description_en": "Play with reflected payloads.",
                "category_ids": ["web"],
                "tags": ["SQL injection", "XSS"],
                "difficulty": 2
            },
            {
                "id": "day002",
                "slug": "caesar",
                "title": "Caesar Wheel",
                "category_ids": ["crypto"],
                "tags": ["classic"]
            },
            {
                "id": "day003",
                "slug": "hidden-tool",
                "title": "Hidden SQL helper",
                "category_ids": ["web", "forensics"],
                "hub": false
            },
            {
                "id": "day004",
                "slug": "hash-check",
                "title": "Hash Check",
                "category_ids": ["crypto", "web"],
                "tags": []
            }
        ]
    }))
    .expect("tools parsed");

    Catalog::new(categories, document)
}

fn slugs<'a>(tools: &[&'a Tool]) -> Vec<&'a str> {
    tools.iter().map(|tool| tool.slug.as_str()).collect()
}

#[test]
fn default_criteria_return_visible_tools_in_order() {
    let catalog = sample_catalog();
    let store = MemoryProgressStore::new();

    let visible = filter::filter_tools(&catalog.tools, &FilterCriteria::default(), &store);

    assert_eq!(slugs(&visible), vec!["xss-lab", "caesar", "hash-check"]);
}

#[test]
fn hidden_tools_never_appear() {
    let catalog = sample_catalog();
    let store = MemoryProgressStore::new();

    let criteria = FilterCriteria::default()
        .with_category("forensics")
        .with_search("hidden");
    let visible = filter::filter_tools(&catalog.tools, &criteria, &store);
    assert!(visible.is_empty());

    let summary = dashboard::aggregate(&catalog.tools, &catalog.categories, &store);
    assert_eq!(summary.overall.total, 3);
    assert!(
        summary
            .categories
            .iter()
            .all(|category| category.category_id != "forensics")
    );
}

#[test]
fn search_is_case_insensitive_over_tags() {
    let catalog = sample_catalog();
    let store = MemoryProgressStore::new();

    let visible = filter::filter_tools(
        &catalog.tools,
        &FilterCriteria::default().with_search("sql"),
        &store,
    );
    assert_eq!(slugs(&visible), vec!["xss-lab"]);

    let visible = filter::filter_tools(
        &catalog.tools,
        &FilterCriteria::default().with_search("HANDS-ON"),
        &store,
    );
    assert_eq!(slugs(&visible), vec!["xss-lab"]);

    let visible = filter::filter_tools(
        &catalog.tools,
        &FilterCriteria::default().with_search("quantum"),
        &store,
    );
    assert!(visible.is_empty());
}

#[test]
fn predicates_combine() {
    let catalog = sample_catalog();
    let mut store = MemoryProgressStore::new();
    store
        .set("hash-check", ProgressLevel::FirstPass)
        .expect("progress stored");

    let criteria = FilterCriteria::default()
        .with_category("crypto")
        .with_progress(ProgressFilter::Level(ProgressLevel::FirstPass));
    let visible = filter::filter_tools(&catalog.tools, &criteria, &store);
    assert_eq!(slugs(&visible), vec!["hash-check"]);

    let criteria = FilterCriteria::default()
        .with_category("crypto")
        .with_progress(ProgressFilter::Level(ProgressLevel::NotStarted));
    let visible = filter::filter_tools(&catalog.tools, &criteria, &store);
    assert_eq!(slugs(&visible), vec!["caesar"]);
}

#[test]
fn progress_filter_parses_all_and_levels() {
    assert_eq!("all".parse::<ProgressFilter>().expect("all"), ProgressFilter::All);
    assert_eq!(
        "3".parse::<ProgressFilter>().expect("level"),
        ProgressFilter::Level(ProgressLevel::Mastered)
    );
    assert!("4".parse::<ProgressFilter>().is_err());
}

#[test]
fn dashboard_buckets_sum_to_totals() {
    let catalog = sample_catalog();
    let mut store = MemoryProgressStore::new();
    store.set("xss-lab", ProgressLevel::Mastered).expect("set");
    store.set("caesar", ProgressLevel::InProgress).expect("set");
    store.set("hidden-tool", ProgressLevel::Mastered).expect("set");

    let summary = dashboard::aggregate(&catalog.tools, &catalog.categories, &store);

    assert_eq!(summary.overall.counts, [1, 1, 0, 1]);
    assert_eq!(summary.overall.total, 3);
    assert_eq!(summary.overall.counts.iter().sum::<usize>(), summary.overall.total);

    let ids: Vec<&str> = summary
        .categories
        .iter()
        .map(|category| category.category_id.as_str())
        .collect();
    assert_eq!(ids, vec!["web", "crypto"]);

    for category in &summary.categories {
        assert_eq!(category.counts.counts.iter().sum::<usize>(), category.counts.total);
    }
    let web = &summary.categories[0];
    assert_eq!(web.counts.counts, [1, 0, 0, 1]);
    assert_eq!(web.label_en, "Web");
}

#[test]
fn chart_is_empty_without_tools() {
    assert!(dashboard::chart_segments(&ProgressCounts::default()).is_empty());
    assert_eq!(dashboard::bar_percentages(&ProgressCounts::default()), [0.0; 4]);
}

#[test]
fn chart_segments_are_cumulative() {
    let counts = ProgressCounts {
        counts: [1, 1, 0, 2],
        total: 4,
    };

    let segments = dashboard::chart_segments(&counts);

    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0].start, 0.0);
    assert_eq!(segments[0].end, 25.0);
    assert_eq!(segments[1].end, 50.0);
    assert_eq!(segments[2].start, segments[2].end);
    assert_eq!(segments[3].percent, 50.0);
    assert_eq!(segments[3].end, 100.0);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn card_projection_is_localized() {
    let catalog = sample_catalog();
    let tool = &catalog.tools[0];

    let ja = card::card_view(tool, &catalog.categories, Language::Ja, ProgressLevel::InProgress);
    assert_eq!(ja.day_label, "Day001");
    assert_eq!(ja.subtitle, "XSS体験");
    assert_eq!(ja.difficulty, "難易度: ★★");
    assert_eq!(ja.categories, vec!["Web".to_string()]);
    assert_eq!(ja.progress_label, "進捗: 学習中");

    let en = card::card_view(tool, &catalog.categories, Language::En, ProgressLevel::Mastered);
    assert_eq!(en.subtitle, "Hands-on XSS");
    assert_eq!(en.difficulty, "Level: ★★");
    assert_eq!(en.progress_label, "Progress: Mastered");
    assert_eq!(en.demo_url, "#");
    assert_eq!(en.demo_button, "Open demo");
}

#[test]
fn long_descriptions_are_truncated() {
    let long: String = "あ".repeat(DESCRIPTION_BUDGET + 5);
    let short = card::short_description(&long);

    assert_eq!(short.chars().count(), DESCRIPTION_BUDGET + 1);
    assert!(short.ends_with('…'));

    let exact: String = "a".repeat(DESCRIPTION_BUDGET);
    assert_eq!(card::short_description(&exact), exact);
}

#[test]
fn card_helpers_handle_odd_ids_and_unknown_categories() {
    assert_eq!(card::day_label("day102"), "Day102");
    assert_eq!(card::day_label("special"), "Dayspecial");
    assert_eq!(card::stars(0), "★");
    assert_eq!(card::stars(u32::MAX), "★".repeat(card::MAX_STARS as usize));

    let mut tool = Tool::new("day009", "odd");
    tool.category_ids = vec!["missing".to_string(), "crypto".to_string()];
    let categories = vec![Category::new("crypto", "暗号", "")];

    assert!(card::category_labels(&tool, &categories, Language::En).is_empty());
    assert_eq!(
        card::category_labels(&tool, &categories, Language::Ja),
        vec!["暗号".to_string()]
    );
}

#[test]
fn missing_tool_fields_take_defaults() {
    let document: ToolsDocument = serde_json::from_value(serde_json::json!({
        "tools": [
            {"id": "day010", "slug": "bare", "tags": null, "difficulty": null},
            {"id": "day011", "slug": "flagged", "hub": null, "difficulty": "3"}
        ]
    }))
    .expect("document parsed");

    assert_eq!(document.generated_at, "");
    let bare = &document.tools[0];
    assert_eq!(bare.title, "");
    assert!(bare.tags.is_empty());
    assert_eq!(bare.difficulty, 1);
    assert!(bare.hub);

    let flagged = &document.tools[1];
    assert!(flagged.hub);
    assert_eq!(flagged.difficulty, 3);
}

#[test]
fn whole_float_difficulty_is_accepted() {
    let document: ToolsDocument = serde_json::from_value(serde_json::json!({
        "tools": [
            {"id": "day012", "slug": "float", "difficulty": 2.0},
            {"id": "day013", "slug": "fraction", "difficulty": 2.5},
            {"id": "day014", "slug": "huge", "difficulty": 4294967295u64}
        ]
    }))
    .expect("document parsed");

    let difficulties: Vec<u32> = document.tools.iter().map(|tool| tool.difficulty).collect();
    assert_eq!(difficulties, vec![2, 1, u32::MAX]);

    let huge = card::card_view(
        &document.tools[2],
        &[],
        Language::En,
        ProgressLevel::NotStarted,
    );
    assert_eq!(huge.difficulty, "Level: ★★★★★");
}

#[test]
fn non_array_tools_field_yields_empty_catalog() {
    let document: ToolsDocument = serde_json::from_value(serde_json::json!({
        "generated_at": "x",
        "tools": {"unexpected": true}
    }))
    .expect("document parsed");

    assert!(document.tools.is_empty());
}
