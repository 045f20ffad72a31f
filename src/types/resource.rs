use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Title used when a web citation arrives without one
pub const UNTITLED_WEB_RESOURCE: &str = "Untitled Web Resource";

/// A resource the model explicitly suggested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResource {
    pub title: String,
    pub uri: String,
    /// Category such as "Article" or "YouTube Channel"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A citation taken from the response's grounding metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingAttribution {
    pub uri: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Where an entry of the merged resource view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum Provenance {
    #[strum(to_string = "AI Suggested")]
    Suggested,
    #[strum(to_string = "Web Search Result")]
    WebSearchResult,
}

/// One row of the merged resources view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedResource {
    pub title: String,
    pub uri: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub provenance: Provenance,
}

/// Keyed insert: a new key is appended, an existing key keeps its position and
/// takes the new value
fn upsert_by_uri<T>(items: &mut Vec<T>, incoming: impl IntoIterator<Item = T>, uri: impl Fn(&T) -> &str) {
    let mut index: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (uri(item).to_string(), i))
        .collect();

    for item in incoming {
        let key = uri(&item).to_string();
        if let Some(&position) = index.get(&key) {
            items[position] = item;
        } else {
            index.insert(key, items.len());
            items.push(item);
        }
    }
}

/// Merge citations into the accumulated set, deduplicating by `uri`
///
/// The resulting key set does not depend on the order lanes complete in; for a
/// duplicated uri the last merged value wins.
pub fn merge_attributions(
    accumulated: &mut Vec<GroundingAttribution>,
    incoming: impl IntoIterator<Item = GroundingAttribution>,
) {
    upsert_by_uri(accumulated, incoming, |a| a.uri.as_str());
}

/// Union of suggested resources and web citations, deduplicated by `uri`
///
/// Citations are applied after suggestions, so a uri present in both is shown
/// as a web search result.
pub fn merged_resources(
    resources: &[ExternalResource],
    attributions: &[GroundingAttribution],
) -> Vec<MergedResource> {
    let suggested = resources.iter().map(|r| MergedResource {
        title: r.title.clone(),
        uri: r.uri.clone(),
        kind: r.kind.clone(),
        provenance: Provenance::Suggested,
    });
    let cited = attributions.iter().map(|a| MergedResource {
        title: a.title.clone(),
        uri: a.uri.clone(),
        kind: None,
        provenance: Provenance::WebSearchResult,
    });

    let mut merged = Vec::with_capacity(resources.len() + attributions.len());
    upsert_by_uri(&mut merged, suggested.chain(cited), |m| m.uri.as_str());
    merged
}
