use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::job::models::{Company, JobRecord, ResolvedJob, Tag};
use crate::db::store::{JobStore, StoreError};

#[derive(Default)]
struct Tables {
    companies: Vec<Company>,
    tags: Vec<Tag>,
    jobs: Vec<JobRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store used when no database is configured.
///
/// Every operation runs under one lock, which also makes find-or-create
/// atomic per key.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn company_count(&self) -> usize {
        self.tables.lock().await.companies.len()
    }

    #[cfg(test)]
    pub async fn tag_count(&self) -> usize {
        self.tables.lock().await.tags.len()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn find_company_by_title(&self, title: &str) -> Result<Option<Company>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.companies.iter().find(|c| c.title == title).cloned())
    }

    async fn find_or_create_company(&self, company: &Company) -> Result<Company, StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.companies.iter().find(|c| *c == company) {
            return Ok(existing.clone());
        }
        let stored = Company {
            id: Some(tables.next_id()),
            ..company.clone()
        };
        tables.companies.push(stored.clone());
        Ok(stored)
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn find_or_create_tag(&self, tag: &Tag) -> Result<Tag, StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.tags.iter().find(|t| *t == tag) {
            return Ok(existing.clone());
        }
        let stored = Tag {
            id: Some(tables.next_id()),
            name: tag.name.clone(),
        };
        tables.tags.push(stored.clone());
        Ok(stored)
    }

    async fn exists_by_source_url(&self, source_url: &str) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.jobs.iter().any(|j| j.source_url == source_url))
    }

    async fn save_job(&self, job: &ResolvedJob) -> Result<JobRecord, StoreError> {
        let mut tables = self.tables.lock().await;

        let company_known = job.company.id.is_some()
            && tables
                .companies
                .iter()
                .any(|c| c.id == job.company.id && *c == job.company);
        if !company_known {
            return Err(StoreError::Unresolved {
                entity: "company",
                key: job.company.title.clone(),
            });
        }
        if let Some(tag) = job
            .tags
            .iter()
            .find(|t| t.id.is_none() || !tables.tags.iter().any(|s| s.id == t.id))
        {
            return Err(StoreError::Unresolved {
                entity: "tag",
                key: tag.name.clone(),
            });
        }
        if tables.jobs.iter().any(|j| j.source_url == job.source_url) {
            return Err(StoreError::DuplicateSourceUrl(job.source_url.clone()));
        }

        let id = tables.next_id();
        let record = job.to_record(id);
        tables.jobs.push(record.clone());
        Ok(record)
    }

    async fn find_all_jobs(&self) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self.tables.lock().await.jobs.clone())
    }

    async fn find_jobs_by_function(
        &self,
        labor_function: &str,
    ) -> Result<Vec<JobRecord>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .jobs
            .iter()
            .filter(|j| j.labor_function == labor_function)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
