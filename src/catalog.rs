//! Docs pages → deduplicated, sorted action `Catalog`
//!
//! Pages are fetched one after another through a [`DocsSource`], decoded, and
//! merged by `METHOD path`. Ids are made unique only after sorting, so the
//! result never depends on fetch order.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CatalogError, LookupError};
use crate::extract::extract_ssr_props;
use crate::spec::{build_actions, slugify, Action};

/// Public Holded reference docs.
pub const DEFAULT_DOCS_BASE_URL: &str = "https://developers.holded.com";

/// One representative page per top-level Holded API family.
pub const DEFAULT_SEED_SLUGS: [&str; 5] = [
    "list-contacts-1",
    "list-funnels-1",
    "list-projects",
    "listemployees",
    "listaccounts",
];

/// Where the catalog is built from.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CatalogConfig {
    /// Docs site root (e.g. "https://developers.holded.com")
    pub base_url: String,
    /// Reference page slugs, fetched in order
    pub seed_slugs: Vec<String>,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            seed_slugs: DEFAULT_SEED_SLUGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the seed page list.
    pub fn seed_slugs<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    fn source_url(&self) -> String {
        format!("{}/reference/api-key", self.base_url.trim_end_matches('/'))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOCS_BASE_URL)
    }
}

/// Fetches raw HTML for a reference page.
pub trait DocsSource {
    fn fetch_page(&self, slug: &str) -> Result<String, CatalogError>;
}

/// [`DocsSource`] backed by plain GET requests to `<base>/reference/<slug>`.
#[derive(Debug, Clone)]
pub struct HttpDocsSource {
    client: Client,
    base_url: String,
}

impl HttpDocsSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl DocsSource for HttpDocsSource {
    fn fetch_page(&self, slug: &str) -> Result<String, CatalogError> {
        let url = format!("{}/reference/{}", self.base_url.trim_end_matches('/'), slug);
        debug!(%url, "fetching docs page");

        let fetch_err = |source| CatalogError::Fetch {
            slug: slug.to_string(),
            source,
        };
        let resp = self.client.get(&url).send().map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                slug: slug.to_string(),
                status,
            });
        }
        resp.text().map_err(fetch_err)
    }
}

/// Immutable snapshot of every known action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Catalog {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    /// Sorted by api, path, method, operation id; ids are unique
    pub actions: Vec<Action>,
    /// Operations dropped because their schema object could not be decoded
    #[serde(default)]
    pub skipped_operations: usize,
}

/// Fetch every seed page and assemble the catalog. Any page failure aborts.
pub fn load_catalog(
    source: &dyn DocsSource,
    config: &CatalogConfig,
) -> Result<Catalog, CatalogError> {
    let mut actions_by_key: HashMap<String, Action> = HashMap::new();
    let mut skipped = 0;

    for slug in &config.seed_slugs {
        let html = source.fetch_page(slug)?;
        let props = extract_ssr_props(&html).map_err(|source| CatalogError::Extract {
            slug: slug.clone(),
            source,
        })?;
        let page = build_actions(props).map_err(|source| CatalogError::Schema {
            slug: slug.clone(),
            source,
        })?;

        debug!(%slug, actions = page.actions.len(), skipped = page.skipped, "decoded docs page");
        skipped += page.skipped;
        for action in page.actions {
            actions_by_key.insert(format!("{} {}", action.method, action.path), action);
        }
    }

    let mut actions: Vec<Action> = actions_by_key.into_values().collect();
    sort_actions(&mut actions);
    ensure_unique_ids(&mut actions);

    info!(actions = actions.len(), skipped, "action catalog loaded");

    Ok(Catalog {
        generated_at: Utc::now(),
        source: config.source_url(),
        actions,
        skipped_operations: skipped,
    })
}

fn sort_actions(actions: &mut [Action]) {
    actions.sort_by(|a, b| {
        (&a.api, &a.path, &a.method, &a.operation_id).cmp(&(
            &b.api,
            &b.path,
            &b.method,
            &b.operation_id,
        ))
    });
}

/// Suffix repeated ids with `-2`, `-3`, … in current order, skipping any
/// suffixed form that is already some action's own id.
fn ensure_unique_ids(actions: &mut [Action]) {
    let base_ids: HashSet<String> = actions.iter().map(|a| a.id.clone()).collect();
    let mut assigned: HashSet<String> = HashSet::with_capacity(actions.len());
    let mut counters: HashMap<String, usize> = HashMap::new();

    for action in actions.iter_mut() {
        if assigned.insert(action.id.clone()) {
            continue;
        }
        let counter = counters.entry(action.id.clone()).or_insert(1);
        let unique = loop {
            *counter += 1;
            let candidate = format!("{}-{}", action.id, counter);
            if !base_ids.contains(&candidate) && !assigned.contains(&candidate) {
                break candidate;
            }
        };
        assigned.insert(unique.clone());
        action.id = unique;
    }
}

impl Catalog {
    /// Resolve an action by canonical id, or by operation id when no id
    /// matches. Matching ignores case and punctuation.
    pub fn find(&self, reference: &str) -> Result<&Action, LookupError> {
        let needle = slugify(reference);
        if needle.is_empty() {
            return Err(LookupError::EmptyReference);
        }

        if let Some(action) = self.actions.iter().find(|a| slugify(&a.id) == needle) {
            return Ok(action);
        }

        let matches: Vec<&Action> = self
            .actions
            .iter()
            .filter(|a| a.operation_id.as_deref().is_some_and(|op| slugify(op) == needle))
            .collect();

        match matches.as_slice() {
            [] => Err(LookupError::NotFound {
                reference: reference.to_string(),
            }),
            [action] => Ok(*action),
            many => {
                let mut candidates: Vec<String> = many.iter().map(|a| a.id.clone()).collect();
                candidates.sort();
                Err(LookupError::Ambiguous {
                    reference: reference.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Actions whose id, operation id, method, path or api contain `needle`
    /// (case-insensitive). An empty needle matches everything.
    pub fn filter(&self, needle: &str) -> Vec<&Action> {
        let needle = needle.trim().to_lowercase();
        self.actions
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || [
                        a.id.as_str(),
                        a.operation_id.as_deref().unwrap_or_default(),
                        a.method.as_str(),
                        a.path.as_str(),
                        a.api.as_str(),
                    ]
                    .join(" ")
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect()
    }
}
