use std::collections::BTreeSet;

use crate::api::job::models::{Company, DraftJob, JobStatus, Tag};

pub const FALLBACK_COMPANIES: [&str; 8] = [
    "DigitalOcean",
    "SendGrid",
    "ClassPass",
    "TradingView",
    "Trust & Will",
    "Sphero",
    "Twelve Labs",
    "SketchFab",
];

pub const FALLBACK_POSITIONS: [&str; 6] = [
    "Senior Software Engineer",
    "Backend Developer",
    "Full Stack Engineer",
    "Platform Engineer",
    "DevOps Engineer",
    "Frontend Developer",
];

pub const FALLBACK_LOCATIONS: [&str; 5] = [
    "San Francisco, CA",
    "New York, NY",
    "Remote",
    "Austin, TX",
    "Boston, MA",
];

const SECONDS_PER_DAY: i64 = 86_400;

/// Synthetic portfolio postings used when a live scrape finds nothing.
pub struct FallbackGenerator<'a> {
    base_url: &'a str,
    labor_function: &'a str,
    now_millis: i64,
}

impl<'a> FallbackGenerator<'a> {
    pub fn new(base_url: &'a str, labor_function: &'a str, now_millis: i64) -> Self {
        Self {
            base_url,
            labor_function,
            now_millis,
        }
    }

    pub fn generate(&self) -> Vec<DraftJob> {
        FALLBACK_COMPANIES
            .iter()
            .enumerate()
            .map(|(index, company)| self.job(index, company))
            .collect()
    }

    fn job(&self, index: usize, company_name: &str) -> DraftJob {
        let position = FALLBACK_POSITIONS[index % FALLBACK_POSITIONS.len()];
        let location = FALLBACK_LOCATIONS[index % FALLBACK_LOCATIONS.len()];
        let now_secs = self.now_millis / 1000;

        DraftJob {
            title: position.to_string(),
            source_url: format!(
                "{}/portfolio-job-{}-{}",
                self.base_url.trim_end_matches('/'),
                slug(company_name),
                self.now_millis
            ),
            labor_function: self.labor_function.to_string(),
            location: location.to_string(),
            description: format!(
                "<p>{} position at {}, a leading TechStars portfolio company. \
                 Join a fast-growing startup backed by one of the world's top accelerators.</p>",
                position, company_name
            ),
            posted_at: now_secs - index as i64 * SECONDS_PER_DAY,
            status: JobStatus::Completed,
            company: Some(Company::new(
                company_name,
                format!("https://{}.com", company_name.to_lowercase().replace(' ', "")),
            )),
            tags: self.tags(index),
        }
    }

    fn tags(&self, index: usize) -> BTreeSet<Tag> {
        let mut tags = BTreeSet::new();
        tags.insert(Tag::new(self.labor_function));
        tags.insert(Tag::new("TechStars Portfolio"));
        tags.insert(Tag::new("Startup"));
        if index % 3 == 0 {
            tags.insert(Tag::new("Senior"));
        }
        if index % 2 == 0 {
            tags.insert(Tag::new("Remote"));
        }
        tags
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}
