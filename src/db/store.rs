use async_trait::async_trait;
use thiserror::Error;

use crate::api::job::models::{Company, JobRecord, ResolvedJob, Tag};

/// Storage failures surfaced to the pipeline
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} is not resolved: {key}")]
    Unresolved { entity: &'static str, key: String },

    #[error("job already stored for {0}")]
    DuplicateSourceUrl(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Persistence boundary for jobs, companies and tags.
///
/// Companies and tags are addressed by natural key. `find_or_create_*` must be
/// atomic per key: two racing callers end up with the same stored row.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_company_by_title(&self, title: &str) -> Result<Option<Company>, StoreError>;

    async fn find_or_create_company(&self, company: &Company) -> Result<Company, StoreError>;

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError>;

    async fn find_or_create_tag(&self, tag: &Tag) -> Result<Tag, StoreError>;

    async fn exists_by_source_url(&self, source_url: &str) -> Result<bool, StoreError>;

    /// Persist a job with its tag links as one unit.
    async fn save_job(&self, job: &ResolvedJob) -> Result<JobRecord, StoreError>;

    async fn find_all_jobs(&self) -> Result<Vec<JobRecord>, StoreError>;

    async fn find_jobs_by_function(&self, labor_function: &str)
        -> Result<Vec<JobRecord>, StoreError>;

    /// Cheap connectivity check for health probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
