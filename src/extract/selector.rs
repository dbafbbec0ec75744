use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::patterns;

/// Upper bound on candidates handed to the record builder.
pub const MAX_CANDIDATES: usize = 15;

/// Structural card hints, then test/ARIA hints, then job-looking links.
const SELECTOR_GROUPS: [(&str, &str); 3] = [
    (
        "structural",
        ".job-item, .job-card, .job-posting, [data-job], .posting",
    ),
    (
        "semantic",
        "[data-qa='job'], [data-testid*='job'], .opening, .position",
    ),
    (
        "job-links",
        "a[href*='/job/'], a[href*='/position/'], a[href*='/career/']",
    ),
];

/// One way of locating job elements in a document.
///
/// An empty result means "no match, try the next strategy".
pub trait CandidateStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;
}

/// A CSS selector group; matches come back in document order.
pub struct SelectorGroup {
    name: &'static str,
    css: &'static str,
}

impl SelectorGroup {
    pub const fn new(name: &'static str, css: &'static str) -> Self {
        Self { name, css }
    }
}

impl CandidateStrategy for SelectorGroup {
    fn name(&self) -> &str {
        self.name
    }

    fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        match Selector::parse(self.css) {
            Ok(selector) => document.select(&selector).collect(),
            Err(e) => {
                warn!("Skipping selector group {}: {:?}", self.name, e);
                Vec::new()
            }
        }
    }
}

/// Walks every element and keeps those whose own text, link or class
/// looks job related.
pub struct KeywordScan;

impl KeywordScan {
    fn qualifies(element: &ElementRef<'_>) -> bool {
        let value = element.value();
        let href = value.attr("href").unwrap_or_default();
        let class_name = value.attr("class").unwrap_or_default();

        patterns::has_job_keywords(&own_text(element))
            || patterns::has_job_url(href)
            || patterns::has_job_class(class_name)
    }
}

impl CandidateStrategy for KeywordScan {
    fn name(&self) -> &str {
        "keyword-scan"
    }

    fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(Self::qualifies)
            .take(MAX_CANDIDATES)
            .collect()
    }
}

/// Ordered cascade of strategies; the first one that finds anything wins.
pub struct CandidateSelector {
    strategies: Vec<Box<dyn CandidateStrategy>>,
}

impl CandidateSelector {
    pub fn new(strategies: Vec<Box<dyn CandidateStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for strategy in &self.strategies {
            let mut found = strategy.select(document);
            if !found.is_empty() {
                debug!(
                    "Strategy {} found {} candidate elements",
                    strategy.name(),
                    found.len()
                );
                found.truncate(MAX_CANDIDATES);
                return found;
            }
            debug!("Strategy {} found nothing", strategy.name());
        }
        Vec::new()
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        let mut strategies: Vec<Box<dyn CandidateStrategy>> = SELECTOR_GROUPS
            .iter()
            .map(|&(name, css)| Box::new(SelectorGroup::new(name, css)) as Box<dyn CandidateStrategy>)
            .collect();
        strategies.push(Box::new(KeywordScan));
        Self::new(strategies)
    }
}

/// Text of the element's direct text children, whitespace collapsed.
pub fn own_text(element: &ElementRef<'_>) -> String {
    let joined = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Full descendant text of the element, whitespace collapsed.
pub fn full_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(found: &[ElementRef<'_>]) -> Vec<String> {
        found.iter().map(full_text).collect()
    }

    #[test]
    fn structural_group_wins_over_later_groups() {
        let doc = Html::parse_document(
            r#"<div class="job-card">Backend Engineer</div>
               <div class="opening">Sales Lead</div>
               <a href="/job/9">Platform Engineer</a>"#,
        );
        let found = CandidateSelector::default().select(&doc);
        assert_eq!(names(&found), vec!["Backend Engineer"]);
    }

    #[test]
    fn semantic_group_used_when_no_structural_match() {
        let doc = Html::parse_document(
            r#"<li data-testid="job-row">Frontend Developer</li>
               <a href="/job/9">Platform Engineer</a>"#,
        );
        let found = CandidateSelector::default().select(&doc);
        assert_eq!(names(&found), vec!["Frontend Developer"]);
    }

    #[test]
    fn link_group_matches_job_paths() {
        let doc = Html::parse_document(
            r#"<a href="/about">About</a>
               <a href="https://x.io/position/4">DevOps Engineer</a>"#,
        );
        let found = CandidateSelector::default().select(&doc);
        assert_eq!(names(&found), vec!["DevOps Engineer"]);
    }

    #[test]
    fn keyword_scan_uses_own_text_and_caps_results() {
        let rows: String = (0..20)
            .map(|i| format!("<p>We are hiring engineer number {}</p>", i))
            .collect();
        let doc = Html::parse_document(&format!("<section>{}</section>", rows));
        let found = CandidateSelector::default().select(&doc);

        assert_eq!(found.len(), MAX_CANDIDATES);
        assert!(found.iter().all(|el| el.value().name() == "p"));
    }

    #[test]
    fn nothing_job_like_yields_no_candidates() {
        let doc = Html::parse_document("<p>Quarterly newsletter</p><span>Hi</span>");
        assert!(CandidateSelector::default().select(&doc).is_empty());
    }

    #[test]
    fn own_text_ignores_descendants() {
        let doc = Html::parse_document("<div>Hello <b>software engineer</b> there</div>");
        let div = doc
            .select(&Selector::parse("div").unwrap())
            .next()
            .unwrap();
        assert_eq!(own_text(&div), "Hello there");
        assert_eq!(full_text(&div), "Hello software engineer there");
    }
}
