use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::store::{JobStore, StoreError};
use crate::export::SqlExporter;
use crate::extract::validate::{self, MAX_JOBS_PER_SCRAPE};
use crate::extract::{self, CandidateSelector, FallbackGenerator, PageFetcher, RecordBuilder, SiteContext};
use super::models::{DraftJob, JobRecord, JobStatus};
use super::resolver::EntityResolver;

/// Labor functions offered to callers. Not enforced by [`JobService::scrape`].
pub const AVAILABLE_FUNCTIONS: [&str; 10] = [
    "Software Engineering",
    "Product Management",
    "Marketing",
    "Sales",
    "Operations",
    "Data Science",
    "Design",
    "Business Development",
    "Finance",
    "Customer Success",
];

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Store(e) => {
                error!("Storage error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Storage error occurred"}),
                })
            }
        }
    }
}

/// What a scrape produced
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub records: Vec<JobRecord>,
    /// True when the records came from the synthetic roster
    pub fallback: bool,
}

/// Job service containing the scrape pipeline and read operations
pub struct JobService {
    store: Arc<dyn JobStore>,
    fetcher: Arc<dyn PageFetcher>,
    site: SiteContext,
    selector: CandidateSelector,
    /// Last millisecond stamp handed to the fallback roster
    fallback_clock: AtomicI64,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, fetcher: Arc<dyn PageFetcher>, target_url: &str) -> Self {
        Self {
            store,
            fetcher,
            site: SiteContext::new(target_url),
            selector: CandidateSelector::default(),
            fallback_clock: AtomicI64::new(0),
        }
    }

    /// Scrape the listing page for one labor function
    ///
    /// # Business Logic
    /// - Fetches and parses the listing page
    /// - Builds, validates and deduplicates up to 15 records
    /// - Falls back to the synthetic roster when nothing live survives
    /// - Every kept record is resolved and persisted one at a time
    ///
    /// # Returns
    /// - `Ok(ScrapeOutcome)` - never empty for a working store
    /// - `Err(ServiceError)` - the store could not be queried
    pub async fn scrape(&self, labor_function: &str) -> Result<ScrapeOutcome, ServiceError> {
        info!("Service: Starting job scraping for function={}", labor_function);

        let records = self.scrape_live(labor_function).await?;
        if !records.is_empty() {
            info!(
                "Service: Scraped {} live jobs for function={}",
                records.len(),
                labor_function
            );
            return Ok(ScrapeOutcome {
                records,
                fallback: false,
            });
        }

        warn!(
            "Service: Live scrape found no new jobs for function={}, using fallback roster",
            labor_function
        );
        let drafts = FallbackGenerator::new(
            &self.site.base_url,
            labor_function,
            self.next_fallback_millis(),
        )
        .generate();

        let mut records = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            if let Some(record) = self.persist(draft).await {
                records.push(record);
            }
        }

        Ok(ScrapeOutcome {
            records,
            fallback: true,
        })
    }

    /// Wall-clock millis, bumped past the previous stamp so back-to-back
    /// fallback runs never mint the same URLs.
    fn next_fallback_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .fallback_clock
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1)
    }

    async fn scrape_live(&self, labor_function: &str) -> Result<Vec<JobRecord>, ServiceError> {
        let html = match self.fetcher.fetch(&self.site.base_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Service: Fetch failed, treating as empty extraction: {}", e);
                return Ok(Vec::new());
            }
        };

        let drafts = {
            let builder = RecordBuilder::new(&self.site, labor_function, Utc::now().timestamp());
            extract::extract_drafts(&html, &self.selector, &builder)
        };

        let mut records = Vec::new();
        for draft in &drafts {
            if records.len() >= MAX_JOBS_PER_SCRAPE {
                break;
            }
            if !validate::admit(self.store.as_ref(), draft).await? {
                continue;
            }
            if let Some(record) = self.persist(draft).await {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Save a draft; on failure retry once marked FAILED, else drop it.
    async fn persist(&self, draft: &DraftJob) -> Option<JobRecord> {
        let err = match self.resolve_and_save(draft, draft.status).await {
            Ok(record) => return Some(record),
            Err(e) => e,
        };
        error!("Service: Failed to save job {}: {}", draft.title, err);

        match self.resolve_and_save(draft, JobStatus::Failed).await {
            Ok(record) => {
                warn!("Service: Saved job {} with FAILED status", draft.source_url);
                Some(record)
            }
            Err(e) => {
                error!(
                    "Critical: Failed to save job {} with FAILED status: {}",
                    draft.source_url, e
                );
                None
            }
        }
    }

    async fn resolve_and_save(
        &self,
        draft: &DraftJob,
        status: JobStatus,
    ) -> Result<JobRecord, StoreError> {
        let resolved = EntityResolver::new(self.store.as_ref())
            .resolve(draft, status)
            .await?;
        self.store.save_job(&resolved).await
    }

    pub async fn list_all(&self) -> Result<Vec<JobRecord>, ServiceError> {
        Ok(self.store.find_all_jobs().await?)
    }

    pub async fn list_by_function(&self, labor_function: &str) -> Result<Vec<JobRecord>, ServiceError> {
        Ok(self.store.find_jobs_by_function(labor_function).await?)
    }

    /// SQL dump of every stored job
    pub async fn export_sql(&self) -> Result<String, ServiceError> {
        let jobs = self.store.find_all_jobs().await?;
        info!("Service: Exporting {} jobs as SQL", jobs.len());
        Ok(SqlExporter::new(&jobs).generate(Utc::now()))
    }

    pub fn available_functions(&self) -> &'static [&'static str] {
        &AVAILABLE_FUNCTIONS
    }
}
