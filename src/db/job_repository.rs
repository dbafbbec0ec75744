use sqlx::{Pool, Postgres};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::api::job::models::{Company, JobRecord, JobStatus, ResolvedJob, Tag};
use crate::db::models::{JobRow, JobTagRow};
use crate::db::store::StoreError;

const SELECT_JOBS: &str = r#"
    SELECT j.id, j.position_name, j.job_page_url, j.labor_function, j.location,
           j.posted_date_unix, j.description, j.status,
           c.id AS company_id, c.title AS company_title,
           c.website_url AS company_website_url, c.logo_url AS company_logo_url
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
"#;

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    pub async fn exists_by_job_page_url(
        pool: &Pool<Postgres>,
        job_page_url: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE job_page_url = $1)")
            .bind(job_page_url)
            .fetch_one(pool)
            .await
    }

    /// Insert the job and its tag links in one transaction.
    /// Returns the new job id.
    pub async fn create(pool: &Pool<Postgres>, job: &ResolvedJob) -> Result<i64, StoreError> {
        let company_id = job.company.id.ok_or_else(|| StoreError::Unresolved {
            entity: "company",
            key: job.company.title.clone(),
        })?;
        let tag_ids = job
            .tags
            .iter()
            .map(|tag| {
                tag.id.ok_or_else(|| StoreError::Unresolved {
                    entity: "tag",
                    key: tag.name.clone(),
                })
            })
            .collect::<Result<Vec<i64>, StoreError>>()?;

        debug!(
            "Creating job: title={}, url={}, status={}",
            job.title, job.source_url, job.status
        );

        let mut tx = pool.begin().await?;

        let job_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO jobs (position_name, job_page_url, labor_function, location,
                              posted_date_unix, description, status, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.source_url)
        .bind(&job.labor_function)
        .bind(&job.location)
        .bind(job.posted_at)
        .bind(&job.description)
        .bind(job.status.as_str())
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .is_some_and(|d| d.is_unique_violation());
            if unique_violation {
                StoreError::DuplicateSourceUrl(job.source_url.clone())
            } else {
                StoreError::Database(e)
            }
        })?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO job_tags (job_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(job_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!("Job created with id={}", job_id);
        Ok(job_id)
    }

    pub async fn find_all(pool: &Pool<Postgres>) -> Result<Vec<JobRecord>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!("{} ORDER BY j.id", SELECT_JOBS))
            .fetch_all(pool)
            .await?;
        Self::with_tags(pool, rows).await
    }

    pub async fn find_by_labor_function(
        pool: &Pool<Postgres>,
        labor_function: &str,
    ) -> Result<Vec<JobRecord>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "{} WHERE j.labor_function = $1 ORDER BY j.id",
            SELECT_JOBS
        ))
        .bind(labor_function)
        .fetch_all(pool)
        .await?;
        Self::with_tags(pool, rows).await
    }

    async fn with_tags(
        pool: &Pool<Postgres>,
        rows: Vec<JobRow>,
    ) -> Result<Vec<JobRecord>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let job_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, JobTagRow>(
            r#"
            SELECT jt.job_id, t.id AS tag_id, t.name
            FROM job_tags jt
            JOIN tags t ON t.id = jt.tag_id
            WHERE jt.job_id = ANY($1)
            "#,
        )
        .bind(&job_ids)
        .fetch_all(pool)
        .await?;

        let mut tags_by_job: HashMap<i64, BTreeSet<Tag>> = HashMap::new();
        for link in links {
            tags_by_job.entry(link.job_id).or_default().insert(Tag {
                id: Some(link.tag_id),
                name: link.name,
            });
        }

        rows.into_iter()
            .map(|row| {
                let tags = tags_by_job.remove(&row.id).unwrap_or_default();
                Self::into_record(row, tags)
            })
            .collect()
    }

    fn into_record(row: JobRow, tags: BTreeSet<Tag>) -> Result<JobRecord, StoreError> {
        let status = match row.status.as_deref() {
            Some(s) => s.parse::<JobStatus>().map_err(StoreError::Corrupt)?,
            None => JobStatus::Pending,
        };
        let source_url = row
            .job_page_url
            .ok_or_else(|| StoreError::Corrupt(format!("job {} has no job_page_url", row.id)))?;

        Ok(JobRecord {
            id: row.id,
            title: row.position_name.unwrap_or_default(),
            source_url,
            labor_function: row.labor_function.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            posted_at: row.posted_date_unix.unwrap_or_default(),
            status,
            company: Company {
                id: Some(row.company_id),
                title: row.company_title,
                website_url: row.company_website_url,
                logo_url: row.company_logo_url,
            },
            tags,
        })
    }
}
