use crate::hacklab::hub::dashboard::ProgressCounts;
use crate::hacklab::hub::i18n::Language;
use crate::hacklab::hub::model::ProgressLevel;

pub const SHARE_INTENT_BASE: &str = "https://twitter.com/intent/tweet?text=";

/// Builds the localized progress summary posted by the share action.
/// An empty `page_url` leaves the link line out.
pub fn share_text(language: Language, counts: &ProgressCounts, page_url: &str) -> String {
    let total = counts.total;
    let n0 = counts.count(ProgressLevel::NotStarted);
    let n1 = counts.count(ProgressLevel::InProgress);
    let n2 = counts.count(ProgressLevel::FirstPass);
    let n3 = counts.count(ProgressLevel::Mastered);

    let (headline, summary, hashtags) = match language {
        Language::Ja => (
            "「ハッキング・ラボ・オンライン」で学習進捗を管理中🔬📚".to_string(),
            format!("全 {total} ツール：未着手{n0}／学習中{n1}／一周完了{n2}／定着済み{n3}"),
            "#生成AIセキュリティツール #ハッキングラボオンライン",
        ),
        Language::En => (
            format!("Tracking my progress on {total}+ tools at Hacking Lab Online 🔬"),
            format!("Not started {n0} / In progress {n1} / First pass {n2} / Mastered {n3}"),
            "#GenAI #SecurityTools #HackingLabOnline",
        ),
    };

    let mut lines = vec![headline, summary];
    if !page_url.is_empty() {
        lines.push(page_url.to_string());
    }
    lines.push(hashtags.to_string());
    lines.join("\n")
}

/// Share intent URL carrying the given text.
pub fn share_intent_url(text: &str) -> String {
    format!("{SHARE_INTENT_BASE}{}", urlencoding::encode(text))
}
