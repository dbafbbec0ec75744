use serde::{Deserialize, Serialize};
use validator::Validate;

use super::models::JobRecord;
use super::service::{ScrapeOutcome, ServiceError};

/// Query string of `POST /api/jobs/scrape`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeQuery {
    #[validate(length(max = 255, message = "jobFunction must be at most 255 characters"))]
    pub job_function: String,
}

/// Result of one scrape, successful or not
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub record_count: usize,
    pub job_function: String,
    pub message: String,
    /// Records are synthetic portfolio postings, not scraped ones
    pub fallback: bool,
    pub records: Vec<JobRecord>,
}

impl ScrapeResponse {
    pub fn success(job_function: &str, outcome: ScrapeOutcome) -> Self {
        let record_count = outcome.records.len();
        Self {
            success: true,
            record_count,
            job_function: job_function.to_string(),
            message: format!("Successfully scraped {} jobs", record_count),
            fallback: outcome.fallback,
            records: outcome.records,
        }
    }

    pub fn failure(job_function: &str, error: &ServiceError) -> Self {
        Self {
            success: false,
            record_count: 0,
            job_function: job_function.to_string(),
            message: format!("Failed to scrape jobs: {}", error),
            fallback: false,
            records: Vec::new(),
        }
    }
}
