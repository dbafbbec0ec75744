use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use validator::Validate;

/// Processing status of a job record
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "COMPLETED" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// Employer, identified by its title.
///
/// `id` is `None` while the company is only a proposal built from page text
/// and becomes `Some` once resolved against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
}

impl Company {
    pub fn new(title: impl Into<String>, website_url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            website_url: Some(website_url.into()),
            logo_url: None,
        }
    }
}

impl PartialEq for Company {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for Company {}

impl Hash for Company {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
    }
}

/// Label attached to jobs, identified by its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A job built from page markup or the fallback roster, not yet persisted.
///
/// Its company and tags are proposals; [`ResolvedJob`] carries the stored ones.
#[derive(Debug, Clone, Validate)]
pub struct DraftJob {
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Source URL must be present"))]
    pub source_url: String,
    pub labor_function: String,
    pub location: String,
    pub description: String,
    pub posted_at: i64,
    pub status: JobStatus,
    pub company: Option<Company>,
    pub tags: BTreeSet<Tag>,
}

/// A draft whose company and tags have been exchanged for canonical rows.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub title: String,
    pub source_url: String,
    pub labor_function: String,
    pub location: String,
    pub description: String,
    pub posted_at: i64,
    pub status: JobStatus,
    pub company: Company,
    pub tags: BTreeSet<Tag>,
}

impl ResolvedJob {
    /// The stored form of this job under surrogate `id`.
    pub fn to_record(&self, id: i64) -> JobRecord {
        JobRecord {
            id,
            title: self.title.clone(),
            source_url: self.source_url.clone(),
            labor_function: self.labor_function.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            posted_at: self.posted_at,
            status: self.status,
            company: self.company.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Persisted job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub source_url: String,
    pub labor_function: String,
    pub location: String,
    pub description: String,
    pub posted_at: i64,
    pub status: JobStatus,
    pub company: Company,
    pub tags: BTreeSet<Tag>,
}

impl PartialEq for JobRecord {
    fn eq(&self, other: &Self) -> bool {
        self.source_url == other.source_url
    }
}

impl Eq for JobRecord {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn company_identity_is_title_only() {
        let mut a = Company::new("Acme (TechStars)", "https://techstars.com");
        let b = Company {
            id: Some(7),
            title: "Acme (TechStars)".to_string(),
            website_url: None,
            logo_url: Some("logo.png".to_string()),
        };
        assert_eq!(a, b);

        let set: HashSet<Company> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);

        a.title = "acme (TechStars)".to_string();
        assert_ne!(a, Company::new("Acme (TechStars)", ""));
    }

    #[test]
    fn tags_collapse_by_name() {
        let tags: BTreeSet<Tag> = [
            Tag::new("Startup"),
            Tag {
                id: Some(3),
                name: "Startup".to_string(),
            },
            Tag::new("Remote"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Remote", "Startup"]);
    }

    #[test]
    fn status_round_trips_through_its_column_text() {
        for status in [JobStatus::Pending, JobStatus::Completed, JobStatus::Failed] {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
        assert!("done".parse::<JobStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn draft_validation_rejects_short_titles_and_missing_urls() {
        let mut draft = DraftJob {
            title: "Software Engineer".to_string(),
            source_url: "https://jobs.techstars.com/jobs/1".to_string(),
            labor_function: "Marketing".to_string(),
            location: "Remote".to_string(),
            description: "<p></p>".to_string(),
            posted_at: 0,
            status: JobStatus::Completed,
            company: None,
            tags: BTreeSet::new(),
        };
        assert!(draft.validate().is_ok());

        draft.title = "Dev".to_string();
        assert!(draft.validate().is_err());

        draft.title = "Software Engineer".to_string();
        draft.source_url.clear();
        assert!(draft.validate().is_err());
    }
}
