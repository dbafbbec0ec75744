pub mod builder;
pub mod fallback;
pub mod fetch;
pub mod patterns;
pub mod selector;
pub mod validate;

pub use builder::{RecordBuilder, SiteContext};
pub use fallback::FallbackGenerator;
pub use fetch::{HttpFetcher, PageFetcher};
pub use selector::CandidateSelector;

use scraper::Html;
use tracing::debug;

use crate::api::job::models::DraftJob;

/// Parse `html`, pick candidate elements and build a draft for each.
///
/// Synchronous on purpose: the parsed document never outlives this call.
pub fn extract_drafts(
    html: &str,
    selector: &CandidateSelector,
    builder: &RecordBuilder<'_>,
) -> Vec<DraftJob> {
    let document = Html::parse_document(html);
    let candidates = selector.select(&document);
    debug!("Selected {} candidate elements", candidates.len());

    candidates
        .iter()
        .filter_map(|element| {
            let draft = builder.build(element);
            if draft.is_none() {
                debug!("Skipping candidate <{}>: nothing to build from", element.value().name());
            }
            draft
        })
        .collect()
}
