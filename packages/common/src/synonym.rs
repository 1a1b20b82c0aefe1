//! Tag enrichment from a word-association service.
//!
//! Every word of an entry title is looked up with the Datamuse `rel_trg`
//! ("triggered by") relation. Lookups are best effort: a failed word simply
//! contributes no synonyms.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::SynonymConfig;
use crate::content::{ContentStore, EntryId};
use crate::naming::slugify;

#[derive(Debug, Error)]
pub enum SynonymError {
    #[error("synonym request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("synonym service returned status {0}")]
    Status(u16),

    #[error("malformed synonym payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of words associated with a given word.
#[async_trait]
pub trait SynonymSource: Send + Sync {
    async fn related_words(&self, word: &str) -> Result<Vec<String>, SynonymError>;
}

/// A source that never returns anything. Used when enrichment is disabled.
pub struct NoSynonyms;

#[async_trait]
impl SynonymSource for NoSynonyms {
    async fn related_words(&self, _word: &str) -> Result<Vec<String>, SynonymError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RelatedWord {
    word: String,
}

/// HTTP client for the Datamuse words API.
pub struct DatamuseClient {
    http: reqwest::Client,
    base_url: String,
}

impl DatamuseClient {
    pub fn new(config: &SynonymConfig) -> Result<Self, SynonymError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SynonymSource for DatamuseClient {
    async fn related_words(&self, word: &str) -> Result<Vec<String>, SynonymError> {
        let response = self
            .http
            .get(format!("{}/words", self.base_url))
            .query(&[("rel_trg", word)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynonymError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let words: Vec<RelatedWord> = serde_json::from_str(&body)?;
        Ok(words.into_iter().map(|w| w.word).collect())
    }
}

/// Build the synonym source described by `config`.
pub fn source_from_config(config: &SynonymConfig) -> Result<Arc<dyn SynonymSource>, SynonymError> {
    if config.enabled {
        Ok(Arc::new(DatamuseClient::new(config)?))
    } else {
        Ok(Arc::new(NoSynonyms))
    }
}

/// Attaches synonym tags to freshly created entries.
#[derive(Clone)]
pub struct Enricher {
    store: Arc<dyn ContentStore>,
    source: Arc<dyn SynonymSource>,
}

impl Enricher {
    pub fn new(store: Arc<dyn ContentStore>, source: Arc<dyn SynonymSource>) -> Self {
        Self { store, source }
    }

    /// Look up every word of `title` and tag the entry with the results.
    ///
    /// Returns the number of tags attached. Never fails: any upstream or
    /// store error degrades to fewer (or zero) tags.
    #[instrument(skip(self))]
    pub async fn enrich(&self, entry_id: EntryId, title: &str) -> usize {
        let synonyms = self.collect_synonyms(title).await;
        if synonyms.is_empty() {
            debug!("No synonyms found, leaving tags untouched");
            return 0;
        }

        let tags = build_tags(title, &synonyms);
        match self.store.add_tags(entry_id, &tags).await {
            Ok(added) => added,
            Err(e) => {
                warn!(error = %e, "Failed to attach synonym tags");
                0
            }
        }
    }

    /// Related words for every whitespace-separated word of `title`, in query
    /// order. Words whose lookup fails are skipped.
    pub async fn collect_synonyms(&self, title: &str) -> Vec<String> {
        let mut all = Vec::new();

        for word in title.split_whitespace() {
            match self.source.related_words(word).await {
                Ok(words) => all.extend(words),
                Err(e) => warn!(word, error = %e, "Synonym lookup failed, skipping word"),
            }
        }

        all
    }
}

/// The entry's own title slug followed by one slug per synonym.
pub fn build_tags(title: &str, synonyms: &[String]) -> Vec<String> {
    std::iter::once(title)
        .chain(synonyms.iter().map(String::as_str))
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .collect()
}
