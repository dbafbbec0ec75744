use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::api::job::models::{Company, JobRecord, ResolvedJob, Tag};
use crate::db::company_repository::{CompanyRepository, TagRepository};
use crate::db::job_repository::JobRepository;
use crate::db::store::{JobStore, StoreError};

/// [`JobStore`] over a Postgres pool
#[derive(Clone)]
pub struct PgJobStore {
    pool: Pool<Postgres>,
}

impl PgJobStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_company_by_title(&self, title: &str) -> Result<Option<Company>, StoreError> {
        let row = CompanyRepository::find_by_title(&self.pool, title).await?;
        Ok(row.map(Company::from))
    }

    async fn find_or_create_company(&self, company: &Company) -> Result<Company, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = CompanyRepository::find_or_create(&mut conn, company).await?;
        Ok(row.into())
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let row = TagRepository::find_by_name(&self.pool, name).await?;
        Ok(row.map(Tag::from))
    }

    async fn find_or_create_tag(&self, tag: &Tag) -> Result<Tag, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = TagRepository::find_or_create(&mut conn, tag).await?;
        Ok(row.into())
    }

    async fn exists_by_source_url(&self, source_url: &str) -> Result<bool, StoreError> {
        Ok(JobRepository::exists_by_job_page_url(&self.pool, source_url).await?)
    }

    async fn save_job(&self, job: &ResolvedJob) -> Result<JobRecord, StoreError> {
        let id = JobRepository::create(&self.pool, job).await?;
        Ok(job.to_record(id))
    }

    async fn find_all_jobs(&self) -> Result<Vec<JobRecord>, StoreError> {
        JobRepository::find_all(&self.pool).await
    }

    async fn find_jobs_by_function(
        &self,
        labor_function: &str,
    ) -> Result<Vec<JobRecord>, StoreError> {
        JobRepository::find_by_labor_function(&self.pool, labor_function).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
