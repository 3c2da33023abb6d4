//! Selector-free record extraction from cleaned listings.
//!
//! Works on the cleaned scope, so links are already absolute and chrome is
//! gone. Tables are tried first: candidates are scored by header keywords and
//! row count, then the name and theme columns are elected by per-column
//! pattern hits. Listings without a usable table fall back to a card/list
//! scan.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::cleaner;
use crate::error::Result;
use crate::names::{self, ThemeRules};
use crate::options::CleanOptions;
use crate::tree::{Element, Node};

/// One extracted person row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Normalized `surname given-name`.
    pub name: String,
    /// `" / "`-joined research themes (may be empty).
    pub theme: String,
    /// Absolute URL of the person page (may be empty).
    pub link: String,
}

/// Options for record extraction.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Cleaning options applied before extraction.
    pub clean: CleanOptions,
    /// Site-specific pattern removed from name text before matching.
    pub name_cleanup: Option<Regex>,
    /// Theme splitting rules.
    pub theme_rules: ThemeRules,
}

impl RecordOptions {
    /// Default options plus a name-cleanup pattern.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] when the pattern does not compile.
    pub fn with_name_cleanup(pattern: &str) -> Result<Self> {
        Ok(Self {
            name_cleanup: Some(Regex::new(pattern)?),
            ..Self::default()
        })
    }
}

/// Header keywords marking a faculty table.
static HEADER_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(専門|研究|担当)").expect("header pattern"));

/// Cell text hinting at a theme/field column.
static THEME_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)(専門|研究|分野|担当|research|field)").expect("theme pattern"));

/// Row count at which a table starts looking like a roster.
const MIN_ROSTER_ROWS: usize = 5;

/// Class tokens marking a card/list container in the fallback scan.
const CONTAINER_CLASSES: &[&str] = &["card", "profile", "teacher", "member", "list"];

/// Class tokens marking an item within a container.
const ITEM_CLASSES: &[&str] = &["card", "profile", "teacher", "member"];

/// Theme-bearing element candidates inside an item, tried in order.
const THEME_CLASSES: &[&str] = &["field", "expertise", "desc", "tags"];

/// Extract `(name, theme, link)` records from a captured listing page.
///
/// Rows are deduplicated by name: themes merge, the first non-empty link
/// wins. The result order follows document order of first appearance.
#[must_use]
pub fn extract_records(html: &str, source_url: &str, options: &RecordOptions) -> Vec<Record> {
    let scope = cleaner::clean_tree(html, source_url, &options.clean);

    let mut records = Vec::new();
    for table in table_candidates(&scope) {
        extract_from_table(table, options, &mut records);
        if !records.is_empty() {
            tracing::debug!(rows = records.len(), "extracted records from table");
            return records;
        }
    }

    extract_from_cards(&scope, options, &mut records);
    tracing::debug!(rows = records.len(), "extracted records from cards/lists");
    records
}

/// Tables scored by header keywords and row count; only positive scores
/// qualify, best first.
fn table_candidates(scope: &Element) -> Vec<&Element> {
    let mut scored: Vec<(i32, &Element)> = Vec::new();
    let mut tables = Vec::new();
    collect_elements(scope, &|e| e.name == "table", &mut tables);
    for table in tables {
        let mut headers = Vec::new();
        collect_elements(table, &|e| e.name == "th", &mut headers);
        let header_text = headers
            .iter()
            .map(|th| th.collapsed_text())
            .collect::<Vec<_>>()
            .join(" ");
        let mut score = 0;
        if HEADER_HINT_RE.is_match(&header_text) {
            score += 2;
        }
        let mut rows = Vec::new();
        collect_elements(table, &|e| e.name == "tr", &mut rows);
        if rows.len() >= MIN_ROSTER_ROWS {
            score += 1;
        }
        if score > 0 {
            scored.push((score, table));
        }
    }
    scored.sort_by_key(|(score, _)| -score);
    scored.into_iter().map(|(_, table)| table).collect()
}

fn extract_from_table(table: &Element, options: &RecordOptions, records: &mut Vec<Record>) {
    let mut rows = Vec::new();
    collect_elements(table, &|e| e.name == "tr", &mut rows);
    if rows.is_empty() {
        return;
    }

    let cells_per_row: Vec<Vec<&Element>> = rows
        .iter()
        .map(|tr| {
            let mut cells = Vec::new();
            collect_elements(tr, &|e| e.name == "td" || e.name == "th", &mut cells);
            cells
        })
        .collect();

    let max_cols = cells_per_row.iter().map(Vec::len).max().unwrap_or(0);
    if max_cols == 0 {
        return;
    }

    // elect the name and theme columns by pattern hit counts
    let mut name_hits = vec![0_usize; max_cols];
    let mut theme_hits = vec![0_usize; max_cols];
    for cells in &cells_per_row {
        for (ci, cell) in cells.iter().enumerate() {
            let text = cell.collapsed_text();
            if names::looks_like_name(&text) {
                name_hits[ci] += 1;
            }
            if THEME_HINT_RE.is_match(&text) {
                theme_hits[ci] += 1;
            }
        }
    }
    let name_idx = argmax_first(&name_hits);
    let theme_idx = argmax_first(&theme_hits);

    for cells in &cells_per_row {
        if cells.len() <= name_idx.max(theme_idx) {
            continue;
        }
        let Some(name) =
            names::normalize_name(&cells[name_idx].collapsed_text(), options.name_cleanup.as_ref())
        else {
            continue;
        };
        let theme = names::split_themes(&cells[theme_idx].collapsed_text(), &options.theme_rules);
        let link = first_link(cells[name_idx]).unwrap_or_default();
        merge_record(records, Record { name, theme, link }, &options.theme_rules);
    }
}

fn extract_from_cards(scope: &Element, options: &RecordOptions, records: &mut Vec<Record>) {
    let mut containers = Vec::new();
    collect_elements(
        scope,
        &|e| {
            e.name == "ul" || e.name == "ol" || has_class_token(e, CONTAINER_CLASSES)
        },
        &mut containers,
    );

    for container in containers {
        let mut items = Vec::new();
        collect_elements(
            container,
            &|e| e.name == "li" || has_class_token(e, ITEM_CLASSES),
            &mut items,
        );
        if items.is_empty() {
            items.push(container);
        }

        for item in items {
            let text = item.collapsed_text();
            if !names::looks_like_name(&text) {
                continue;
            }
            let Some(name) = names::normalize_name(&text, options.name_cleanup.as_ref()) else {
                continue;
            };
            let theme_text = find_first(item, &|e| {
                (has_class_token(e, THEME_CLASSES) || e.name == "p" || e.name == "li")
                    && THEME_HINT_RE.is_match(&e.collapsed_text())
            })
            .map(Element::collapsed_text)
            .unwrap_or_default();
            let theme = names::split_themes(&theme_text, &options.theme_rules);
            let link = first_link(item).unwrap_or_default();
            merge_record(records, Record { name, theme, link }, &options.theme_rules);
        }
    }
}

/// Merge a row into the result set, deduplicating by name.
fn merge_record(records: &mut Vec<Record>, incoming: Record, rules: &ThemeRules) {
    if let Some(existing) = records.iter_mut().find(|r| r.name == incoming.name) {
        if !incoming.theme.is_empty() {
            let mut unique: Vec<&str> = Vec::new();
            for topic in existing
                .theme
                .split(" / ")
                .chain(incoming.theme.split(" / "))
                .filter(|t| !t.is_empty())
            {
                if !unique.contains(&topic) {
                    unique.push(topic);
                }
            }
            unique.truncate(rules.max_topics);
            existing.theme = unique.join(" / ");
        }
        if existing.link.is_empty() && !incoming.link.is_empty() {
            existing.link = incoming.link;
        }
    } else {
        records.push(incoming);
    }
}

/// Index of the first maximum, matching how ties are broken upstream.
fn argmax_first(hits: &[usize]) -> usize {
    let mut best = 0;
    for (i, &count) in hits.iter().enumerate() {
        if count > hits[best] {
            best = i;
        }
    }
    best
}

fn collect_elements<'a>(
    el: &'a Element,
    pred: &impl Fn(&Element) -> bool,
    out: &mut Vec<&'a Element>,
) {
    for child in &el.children {
        if let Node::Element(e) = child {
            if pred(e) {
                out.push(e);
            }
            collect_elements(e, pred, out);
        }
    }
}

fn find_first<'a>(el: &'a Element, pred: &impl Fn(&Element) -> bool) -> Option<&'a Element> {
    for child in &el.children {
        if let Node::Element(e) = child {
            if pred(e) {
                return Some(e);
            }
            if let Some(found) = find_first(e, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn first_link(el: &Element) -> Option<String> {
    find_first(el, &|e| {
        e.name == "a" && e.attr("href").is_some_and(|h| !h.is_empty())
    })
    .and_then(|a| a.attr("href").map(str::to_string))
}

fn has_class_token(el: &Element, tokens: &[&str]) -> bool {
    el.attr("class").is_some_and(|class| {
        class
            .split_whitespace()
            .any(|token| tokens.iter().any(|t| token.eq_ignore_ascii_case(t)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.ac.jp/faculty/";

    #[test]
    fn extracts_rows_from_scored_table() {
        let html = "<main><table>\
            <tr><th>氏名</th><th>専門分野</th></tr>\
            <tr><td><a href=\"/staff/tanaka\">田中 太郎</a></td><td>マーケティング、消費者行動</td></tr>\
            <tr><td>佐藤 花子</td><td>統計学</td></tr>\
            </table></main>";
        let records = extract_records(html, BASE, &RecordOptions::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "田中 太郎");
        assert_eq!(records[0].theme, "マーケティング / 消費者行動");
        assert_eq!(records[0].link, "https://example.ac.jp/staff/tanaka");
        assert_eq!(records[1].name, "佐藤 花子");
        assert_eq!(records[1].link, "");
    }

    #[test]
    fn falls_back_to_card_scan() {
        let html = "<main>\
            <div class=\"card\">田中 太郎<p>研究分野: 経済学</p><a href=\"/people/tanaka\">Profile</a></div>\
            </main>";
        let records = extract_records(html, BASE, &RecordOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "田中 太郎");
        // the theme element's full text is kept, label included
        assert_eq!(records[0].theme, "研究分野: 経済学");
        assert!(records[0].link.ends_with("/people/tanaka"));
    }

    #[test]
    fn duplicate_names_merge() {
        let html = "<main><ul>\
            <li>田中 太郎 経済学</li>\
            <li>田中 太郎 <a href=\"/people/t\">Profile</a></li>\
            </ul></main>";
        let records = extract_records(html, BASE, &RecordOptions::default());
        assert_eq!(records.len(), 1);
        assert!(records[0].link.ends_with("/people/t"));
    }
}
