use std::collections::BTreeSet;
use tracing::debug;

use crate::api::job::models::{Company, DraftJob, JobStatus, ResolvedJob, Tag};
use crate::db::store::{JobStore, StoreError};

/// Exchanges a draft's proposed company and tags for their stored rows,
/// creating rows on first sight.
pub struct EntityResolver<'a> {
    store: &'a dyn JobStore,
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a dyn JobStore) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, draft: &DraftJob, status: JobStatus) -> Result<ResolvedJob, StoreError> {
        let proposed = draft.company.as_ref().ok_or_else(|| StoreError::Unresolved {
            entity: "company",
            key: draft.source_url.clone(),
        })?;
        let company = self.resolve_company(proposed).await?;
        debug!(
            "Resolved company {} to id={:?}",
            company.title, company.id
        );

        let mut tags = BTreeSet::new();
        for tag in &draft.tags {
            tags.insert(self.resolve_tag(tag).await?);
        }

        Ok(ResolvedJob {
            title: draft.title.clone(),
            source_url: draft.source_url.clone(),
            labor_function: draft.labor_function.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            posted_at: draft.posted_at,
            status,
            company,
            tags,
        })
    }

    async fn resolve_company(&self, company: &Company) -> Result<Company, StoreError> {
        match self.store.find_company_by_title(&company.title).await? {
            Some(existing) => Ok(existing),
            None => self.store.find_or_create_company(company).await,
        }
    }

    async fn resolve_tag(&self, tag: &Tag) -> Result<Tag, StoreError> {
        match self.store.find_tag_by_name(&tag.name).await? {
            Some(existing) => Ok(existing),
            None => self.store.find_or_create_tag(tag).await,
        }
    }
}
