//! Citation extraction from grounding metadata

use crate::llm_providers::RawResponse;
use crate::types::{GroundingAttribution, UNTITLED_WEB_RESOURCE};

/// Web citations in encounter order, one per chunk that carries a uri
///
/// Duplicates are kept; deduplication happens when lanes merge.
pub fn extract_attributions(response: &RawResponse) -> Vec<GroundingAttribution> {
    response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.grounding_metadata.as_ref())
        .flat_map(|metadata| metadata.grounding_chunks.iter())
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            Some(GroundingAttribution {
                uri: uri.to_string(),
                title: web
                    .title
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(UNTITLED_WEB_RESOURCE)
                    .to_string(),
                source: web.domain.clone(),
            })
        })
        .collect()
}
