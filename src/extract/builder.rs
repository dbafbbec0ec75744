use scraper::ElementRef;
use std::collections::BTreeSet;
use url::Url;

use crate::api::job::models::{Company, DraftJob, JobStatus, Tag};

use super::patterns;
use super::selector::full_text;

pub const DESCRIPTION_LIMIT: usize = 300;
pub const ORGANIZATION_TAG: &str = "TechStars";
pub const ORGANIZATION_WEBSITE: &str = "https://techstars.com";
const FALLBACK_COMPANY: &str = "TechStars Portfolio Company";

/// Where the scraped page lives; used to absolutize and synthesize job URLs.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Listing page, e.g. `https://jobs.techstars.com/jobs`
    pub base_url: String,
    site_root: Option<Url>,
}

impl SiteContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let site_root = Url::parse(&base_url).ok().and_then(|u| u.join("/").ok());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            site_root,
        }
    }

    fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http") {
            return href.to_string();
        }
        self.site_root
            .as_ref()
            .and_then(|root| root.join(href).ok())
            .map(String::from)
            .unwrap_or_else(|| format!("{}{}", self.base_url, href))
    }
}

/// Builds a draft job from one candidate element.
pub struct RecordBuilder<'a> {
    site: &'a SiteContext,
    labor_function: &'a str,
    now: i64,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(site: &'a SiteContext, labor_function: &'a str, now: i64) -> Self {
        Self {
            site,
            labor_function,
            now,
        }
    }

    pub fn build(&self, element: &ElementRef<'_>) -> Option<DraftJob> {
        let text = full_text(element);
        let href = element.value().attr("href");
        self.build_from_parts(&text, href)
    }

    /// Field derivation over already-extracted element text and link target.
    pub fn build_from_parts(&self, text: &str, href: Option<&str>) -> Option<DraftJob> {
        if text.is_empty() && href.is_none() {
            return None;
        }

        Some(DraftJob {
            title: job_title(text),
            source_url: self.source_url(text, href),
            labor_function: self.labor_function.to_string(),
            location: patterns::find_location(text)
                .unwrap_or("Remote")
                .to_string(),
            description: description(text),
            posted_at: self.now,
            status: JobStatus::Completed,
            company: Some(Company::new(company_name(text), ORGANIZATION_WEBSITE)),
            tags: self.tags(text),
        })
    }

    fn source_url(&self, text: &str, href: Option<&str>) -> String {
        match href {
            Some(href) if href.contains("/job") || href.contains("/position") => {
                self.site.absolutize(href)
            }
            _ => format!("{}/job/{}", self.site.base_url, text_hash(text).unsigned_abs()),
        }
    }

    fn tags(&self, text: &str) -> BTreeSet<Tag> {
        let lower = text.to_lowercase();
        let mut tags = BTreeSet::new();
        tags.insert(Tag::new(self.labor_function));
        tags.insert(Tag::new(ORGANIZATION_TAG));
        if lower.contains("senior") {
            tags.insert(Tag::new("Senior"));
        }
        if lower.contains("remote") {
            tags.insert(Tag::new("Remote"));
        }
        tags.insert(Tag::new("Startup"));
        tags
    }
}

pub fn job_title(text: &str) -> String {
    if let Some(title) = patterns::find_job_title(text) {
        return title.to_string();
    }
    let lower = text.to_lowercase();
    if lower.contains("engineer") {
        "Software Engineer".to_string()
    } else if lower.contains("developer") {
        "Software Developer".to_string()
    } else {
        "Software Engineering Position".to_string()
    }
}

pub fn description(text: &str) -> String {
    let body = if text.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    };
    format!("<p>{}</p>", body)
}

pub fn company_name(text: &str) -> String {
    text.split_whitespace()
        .find(|word| {
            word.chars().count() > 2
                && word.chars().next().is_some_and(char::is_uppercase)
                && !patterns::is_company_stop_word(word)
        })
        .map(|word| format!("{} (TechStars)", word))
        .unwrap_or_else(|| FALLBACK_COMPANY.to_string())
}

/// 32-bit polynomial hash over UTF-16 code units (`h = 31 * h + c`).
///
/// Stable across processes, so the synthetic URL it feeds works as a dedup key.
pub fn text_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const BASE: &str = "https://jobs.techstars.com/jobs";

    fn build(text: &str, href: Option<&str>) -> DraftJob {
        let site = SiteContext::new(BASE);
        RecordBuilder::new(&site, "Software Engineering", 1_700_000_000)
            .build_from_parts(text, href)
            .unwrap()
    }

    #[test]
    fn title_is_first_pattern_match() {
        let draft = build(
            "Lead Platform Engineer and Junior Frontend Developer at Orbit",
            None,
        );
        assert_eq!(draft.title, "Lead Platform Engineer");
    }

    #[test]
    fn title_falls_back_on_keywords() {
        assert_eq!(build("Data Engineer at Orbit", None).title, "Software Engineer");
        assert_eq!(build("iOS developer wanted", None).title, "Software Developer");
        assert_eq!(
            build("Head of Growth", None).title,
            "Software Engineering Position"
        );
    }

    #[test]
    fn relative_job_links_are_absolutized_against_site_root() {
        let draft = build("Backend Engineer", Some("/jobs/42-backend"));
        assert_eq!(draft.source_url, "https://jobs.techstars.com/jobs/42-backend");

        let draft = build("Backend Engineer", Some("https://other.io/position/7"));
        assert_eq!(draft.source_url, "https://other.io/position/7");
    }

    #[test]
    fn unusable_links_get_a_stable_synthetic_url() {
        let a = build("Backend Engineer at Orbit", Some("/about"));
        let b = build("Backend Engineer at Orbit", None);
        assert_eq!(a.source_url, b.source_url);
        assert!(a.source_url.starts_with("https://jobs.techstars.com/jobs/job/"));

        let other = build("Frontend Engineer at Orbit", None);
        assert_ne!(a.source_url, other.source_url);
    }

    #[test]
    fn text_hash_matches_known_values() {
        assert_eq!(text_hash(""), 0);
        assert_eq!(text_hash("a"), 97);
        assert_eq!(text_hash("hello"), 99_162_322);
        // wraps past i32::MAX
        assert_eq!(text_hash("polygenelubricants"), i32::MIN);
        assert_eq!(i32::MIN.unsigned_abs(), 2_147_483_648);
    }

    #[test]
    fn location_defaults_to_remote() {
        assert_eq!(build("Backend Engineer, Austin", None).location, "Austin");
        assert_eq!(build("Backend Engineer", None).location, "Remote");
    }

    #[test]
    fn long_descriptions_are_truncated_with_ellipsis() {
        let text = "x".repeat(DESCRIPTION_LIMIT + 5);
        let draft = build(&text, None);
        assert_eq!(
            draft.description,
            format!("<p>{}...</p>", "x".repeat(DESCRIPTION_LIMIT))
        );
        assert_eq!(build("short", None).description, "<p>short</p>");
    }

    #[test]
    fn company_is_first_capitalised_non_stop_word() {
        let draft = build("Senior Software Engineer at Orbital Labs", None);
        assert_eq!(draft.company.unwrap().title, "Orbital (TechStars)");
        assert_eq!(company_name("the software engineer"), "TechStars Portfolio Company");
        assert_eq!(company_name("At In Go Senior"), "TechStars Portfolio Company");
    }

    #[test]
    fn tags_reflect_text_signals() {
        let draft = build("Senior Backend Engineer, remote friendly", None);
        let names: Vec<&str> = draft.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Remote", "Senior", "Software Engineering", "Startup", "TechStars"]
        );

        let plain = build("Backend Engineer", None);
        assert_eq!(plain.tags.len(), 3);
    }

    #[test]
    fn builds_from_an_element() {
        let doc = Html::parse_document(
            r#"<a class="job-card" href="/jobs/7">Staff DevOps Engineer <span>Toronto</span></a>"#,
        );
        let el = doc.select(&Selector::parse("a").unwrap()).next().unwrap();
        let site = SiteContext::new(BASE);
        let draft = RecordBuilder::new(&site, "Operations", 5).build(&el).unwrap();

        assert_eq!(draft.title, "Staff DevOps Engineer");
        assert_eq!(draft.location, "Toronto");
        assert_eq!(draft.source_url, "https://jobs.techstars.com/jobs/7");
        assert_eq!(draft.status, JobStatus::Completed);
        assert_eq!(draft.posted_at, 5);
    }
}
