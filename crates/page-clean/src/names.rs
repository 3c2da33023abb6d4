//! Personal-name and research-theme normalization.
//!
//! Faculty listings wrap names in titles, brackets and inconsistent spacing;
//! this module reduces them to a canonical `surname given-name` form and
//! splits free-form theme text into a bounded, deduplicated topic list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// Academic titles stripped from name text.
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "(教授|准教授|助教|講師|助教授|特任教授|特任准教授|特任講師|非常勤講師|客員教授|客員准教授|客員講師|名誉教授|研究員|特別研究員|助手|主任)",
    )
    .expect("title pattern")
});

/// Surname/given-name pair separated by ASCII or ideographic space.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("([\\p{Han}々〆ヵヶ]{1,4})[ \u{3000}]+([\\p{Han}々〆ヵヶ]{1,6})").expect("name pattern")
});

/// Bracketed annotations (kana readings, affiliations, ...).
static BRACKETED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[（(【\\[][^)）】\\]]+[）)】\\]]").expect("bracket pattern"));

/// Standalone ideograph blocks, used when no spaced pair is present.
static HAN_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\\p{Han}々〆ヵヶ]{2,4}").expect("block pattern"));

/// Unspaced 4-6 ideograph run split into a surname/given-name guess.
static UNSPACED_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("([\\p{Han}々〆ヵヶ]{2,3})([\\p{Han}々〆ヵヶ]{2,4})").expect("pair pattern")
});

/// Normalize raw name text to `surname given-name`.
///
/// `cleanup` is an optional site-specific pattern removed before matching.
/// Returns `None` when no plausible CJK name can be recovered.
#[must_use]
pub fn normalize_name(text: &str, cleanup: Option<&Regex>) -> Option<String> {
    let mut s = text.replace('\u{3000}', " ").replace('・', " ");
    s = TITLE_RE.replace_all(&s, " ").into_owned();
    if let Some(pattern) = cleanup {
        s = pattern.replace_all(&s, " ").into_owned();
    }
    s = crate::text::compress_ws(&s);
    // titles again: stripping can expose a second occurrence
    s = TITLE_RE.replace_all(&s, " ").into_owned();
    s = crate::text::compress_ws(&s);
    s = BRACKETED_RE.replace_all(&s, " ").into_owned();
    s = crate::text::compress_ws(&s);

    if let Some(caps) = NAME_RE.captures(&s) {
        let g1 = caps.get(1).map_or("", |m| m.as_str());
        let g2 = caps.get(2).map_or("", |m| m.as_str());
        // 白井美由 里 -> 白井 美由里: a long first run with a short remainder
        // means the split landed inside the given name
        let g1_len = g1.chars().count();
        let g2_len = g2.chars().count();
        if g1_len >= 3 && g2_len <= 2 {
            let surname: String = g1.chars().take(2).collect();
            let given: String = g1.chars().skip(2).collect();
            return Some(format!("{surname} {given}{g2}"));
        }
        return Some(format!("{g1} {g2}"));
    }

    let blocks: Vec<&str> = HAN_BLOCK_RE.find_iter(&s).map(|m| m.as_str()).collect();
    if blocks.len() >= 2 {
        return Some(format!("{} {}", blocks[0], blocks[1]));
    }

    if let Some(caps) = UNSPACED_PAIR_RE.captures(&s) {
        let g1 = caps.get(1).map_or("", |m| m.as_str());
        let g2 = caps.get(2).map_or("", |m| m.as_str());
        return Some(format!("{g1} {g2}"));
    }

    None
}

/// True when `text` contains a spaced surname/given-name pair.
#[must_use]
pub fn looks_like_name(text: &str) -> bool {
    NAME_RE.is_match(text)
}

/// Rules for splitting free-form theme text into topics.
#[derive(Debug, Clone)]
pub struct ThemeRules {
    /// Delimiter pattern between topics.
    pub split: Regex,
    /// Topics matching this pattern are dropped (citations, publishers, ...).
    pub exclude: Option<Regex>,
    /// Maximum number of topics kept.
    pub max_topics: usize,
    /// Topics longer than this (in chars) are dropped as prose.
    pub max_topic_len: usize,
}

impl Default for ThemeRules {
    fn default() -> Self {
        Self {
            split: Regex::new("[、，,/／・\\n]+").expect("split pattern"),
            exclude: None,
            max_topics: 12,
            max_topic_len: 30,
        }
    }
}

impl ThemeRules {
    /// Default rules plus an exclusion pattern.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] when the pattern does not compile.
    pub fn with_exclude(pattern: &str) -> Result<Self> {
        Ok(Self {
            exclude: Some(Regex::new(pattern)?),
            ..Self::default()
        })
    }
}

/// Bracket characters flattened to spaces before splitting themes.
static THEME_BRACKETS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[（）()\\[\\]【】]").expect("theme bracket pattern"));

/// Split theme text into a deduplicated `" / "`-joined topic list.
#[must_use]
pub fn split_themes(raw: &str, rules: &ThemeRules) -> String {
    let flattened = THEME_BRACKETS_RE.replace_all(raw, " ");
    let mut seen = Vec::new();
    for part in rules.split.split(&flattened) {
        let part = part.trim_matches([' ', '\u{3000}']);
        if part.is_empty() {
            continue;
        }
        if rules
            .exclude
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(part))
        {
            continue;
        }
        if part.chars().count() > rules.max_topic_len {
            continue;
        }
        if !seen.iter().any(|p| p == part) {
            seen.push(part.to_string());
        }
    }
    seen.truncate(rules.max_topics);
    seen.join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_titles_and_pairs_name() {
        assert_eq!(
            normalize_name("教授　田中 太郎", None).as_deref(),
            Some("田中 太郎")
        );
    }

    #[test]
    fn corrects_misplaced_split() {
        assert_eq!(
            normalize_name("白井美由 里", None).as_deref(),
            Some("白井 美由里")
        );
    }

    #[test]
    fn splits_unspaced_four_char_name() {
        assert_eq!(
            normalize_name("山田太郎（経済学）", None).as_deref(),
            Some("山田 太郎")
        );
    }

    #[test]
    fn middle_dot_is_a_separator() {
        assert_eq!(
            normalize_name("佐藤・花子", None).as_deref(),
            Some("佐藤 花子")
        );
    }

    #[test]
    fn rejects_text_without_cjk_name() {
        assert_eq!(normalize_name("Faculty of Economics", None), None);
    }

    #[test]
    fn cleanup_pattern_is_applied() {
        let cleanup = Regex::new("〈.*〉").unwrap();
        assert_eq!(
            normalize_name("田中 太郎〈副学長〉", Some(&cleanup)).as_deref(),
            Some("田中 太郎")
        );
    }

    #[test]
    fn themes_split_dedupe_and_cap() {
        let rules = ThemeRules::default();
        assert_eq!(
            split_themes("マーケティング、消費者行動／マーケティング・ブランド論", &rules),
            "マーケティング / 消費者行動 / ブランド論"
        );
    }

    #[test]
    fn themes_exclude_and_length_filter() {
        let rules = ThemeRules::with_exclude("(Journal|Vol\\.)").unwrap();
        let long = "あ".repeat(31);
        let input = format!("統計学、Journal of Marketing、{long}");
        assert_eq!(split_themes(&input, &rules), "統計学");
    }
}
