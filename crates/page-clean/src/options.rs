//! Configuration for the cleaning pipeline.
//!
//! All heuristic word lists are plain owned data so tests can substitute
//! their own; the defaults are tuned for university faculty-listing pages,
//! which mix English and Japanese chrome.

/// Options controlling a single cleaning invocation.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Hard output budget for markup mode, in bytes of serialized output.
    ///
    /// Best-effort near the edge: pure markup with no text to trim can stay
    /// above the budget.
    pub max_output_len: usize,
    /// Noise classification lists and content guards.
    pub noise: NoiseOptions,
    /// Field labels that force a line break between label and value.
    pub field_labels: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            max_output_len: 30_000,
            noise: NoiseOptions::default(),
            field_labels: to_owned(&[
                "氏名",
                "名前",
                "専門",
                "研究分野",
                "Research field",
                "Field(s)",
            ]),
        }
    }
}

/// Lists driving the noise classifier and its keep guards.
#[derive(Debug, Clone)]
pub struct NoiseOptions {
    /// Tag names that are chrome wherever they appear.
    pub tags: Vec<String>,
    /// Class/id tokens matched exactly (case-insensitive).
    pub class_selectors: Vec<String>,
    /// Tokens matched as substrings of the `class` or `id` attribute value.
    pub substrings: Vec<String>,
    /// Path fragments that mark an anchor as a person-page link.
    pub profile_path_hints: Vec<String>,
    /// Anchor labels that mark a link as a profile/homepage link.
    pub profile_labels: Vec<String>,
    /// Academic role keywords satisfying the name/role guard.
    pub role_keywords: Vec<String>,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            tags: to_owned(&["header", "nav", "footer", "aside"]),
            class_selectors: to_owned(&[
                "global-nav",
                "globalnav",
                "global-header",
                "global-footer",
                "site-header",
                "site-footer",
                "sidenav",
                "side-nav",
                "side",
                "sidebar",
                "breadcrumb",
                "breadcrumbs",
                "pagination",
                "pager",
                "cookie",
                "cookie-banner",
                "cookie-consent",
                "consent",
                "social",
                "share",
                "sns",
                "modal",
                "overlay",
                "drawer",
                "hamburger",
                "skip-link",
                "search-form",
                "searchbox",
                "search-box",
                "filter",
                "facet",
            ]),
            substrings: to_owned(&[
                "nav",
                "menu",
                "footer",
                "header",
                "banner",
                "cookie",
                "consent",
                "share",
                "social",
                "modal",
                "popup",
                "pagination",
                "pager",
                "breadcrumb",
                "search",
                "filter",
                "facet",
                "sidebar",
                "tracking",
            ]),
            profile_path_hints: to_owned(&[
                "/staff/",
                "/people/",
                "/person/",
                "/profile",
                "/researcher",
                "/faculty/",
                "/faculty-member/",
                "/r/lab/",
            ]),
            profile_labels: to_owned(&[
                "profile",
                "homepage",
                "プロフィール",
                "ホームページ",
                "研究者総覧",
                "研究者情報",
                "個人ページ",
                "researchmap",
            ]),
            role_keywords: to_owned(&[
                "教授",
                "准教授",
                "特任教授",
                "客員教授",
                "名誉教授",
                "助教",
                "助教授",
                "講師",
                "非常勤講師",
                "研究員",
                "特別研究員",
                "助手",
                "professor",
                "associate professor",
                "assistant professor",
                "lecturer",
                "research fellow",
            ]),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
