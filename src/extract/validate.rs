use tracing::debug;
use validator::Validate;

use crate::api::job::models::DraftJob;
use crate::db::store::{JobStore, StoreError};

/// Most records a single scrape may accept.
pub const MAX_JOBS_PER_SCRAPE: usize = 15;

/// Whether a draft is complete enough to keep: title of five or more
/// characters, a source URL and a company.
pub fn is_complete(draft: &DraftJob) -> bool {
    if let Err(errors) = draft.validate() {
        debug!("Dropping draft {:?}: {}", draft.title, errors);
        return false;
    }
    if draft.company.is_none() {
        debug!("Dropping draft {:?}: no company", draft.title);
        return false;
    }
    true
}

/// Complete and not yet stored under its source URL.
pub async fn admit(store: &dyn JobStore, draft: &DraftJob) -> Result<bool, StoreError> {
    if !is_complete(draft) {
        return Ok(false);
    }
    if store.exists_by_source_url(&draft.source_url).await? {
        debug!("Dropping draft {}: already stored", draft.source_url);
        return Ok(false);
    }
    Ok(true)
}
