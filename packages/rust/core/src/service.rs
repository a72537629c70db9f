//! Cached document conversion.
//!
//! [`DocService`] fetches a document from its [`DocumentSource`], converts it,
//! and keeps the Markdown and the example list in separate TTL caches keyed
//! by document id. A missing document is not an error: it converts to empty
//! output, which is cached like any other result.

use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use podlens_cache::{CacheStats, TtlCache};
use podlens_shared::{CacheConfig, Heading, ModuleName, PodlensError, Result, UsageExample};

use crate::source::DocumentSource;

const MARKDOWN_KIND: &str = "markdown";
const EXAMPLES_KIND: &str = "examples";

/// Statistics for both caches owned by a [`DocService`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceStats {
    pub markdown: CacheStats,
    pub examples: CacheStats,
}

/// Converts documents from a source, caching the results.
pub struct DocService<S> {
    source: S,
    markdown: TtlCache<String>,
    examples: TtlCache<Vec<UsageExample>>,
}

impl<S: DocumentSource> DocService<S> {
    pub fn new(source: S, config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.max_entries)
            .ok_or_else(|| PodlensError::config("cache.max_entries must be at least 1"))?;

        Ok(Self {
            source,
            markdown: TtlCache::new(capacity, config.render_ttl()),
            examples: TtlCache::new(capacity, config.examples_ttl()),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Markdown rendering of `id`.
    #[instrument(skip(self))]
    pub fn markdown(&self, id: &str) -> Result<String> {
        let key = cache_key(MARKDOWN_KIND, id);
        if let Some(hit) = self.markdown.get(&key) {
            debug!("markdown cache hit");
            return Ok(hit);
        }

        let document = self.fetch(id)?;
        let markdown = podlens_pod::render(document.as_deref().unwrap_or_default());
        self.markdown.set(key, markdown.clone(), None);
        Ok(markdown)
    }

    /// Usage examples of `id`, in extraction order.
    #[instrument(skip(self))]
    pub fn examples(&self, id: &str) -> Result<Vec<UsageExample>> {
        let key = cache_key(EXAMPLES_KIND, id);
        if let Some(hit) = self.examples.get(&key) {
            debug!(count = hit.len(), "examples cache hit");
            return Ok(hit);
        }

        let document = self.fetch(id)?;
        let examples = podlens_pod::extract_examples(document.as_deref().unwrap_or_default());
        self.examples.set(key, examples.clone(), None);
        Ok(examples)
    }

    /// Parsed NAME section of `id`. Not cached.
    pub fn module_name(&self, id: &str) -> Result<Option<ModuleName>> {
        Ok(self
            .fetch(id)?
            .and_then(|doc| podlens_pod::parse_name_section(&doc)))
    }

    /// Heading outline of `id`. Not cached.
    pub fn outline(&self, id: &str) -> Result<Vec<Heading>> {
        Ok(self
            .fetch(id)?
            .map(|doc| podlens_pod::outline(&doc))
            .unwrap_or_default())
    }

    /// Forget everything cached for `id`. Returns whether anything was cached.
    pub fn invalidate(&self, id: &str) -> bool {
        let markdown = self.markdown.delete(&cache_key(MARKDOWN_KIND, id));
        let examples = self.examples.delete(&cache_key(EXAMPLES_KIND, id));
        markdown || examples
    }

    pub fn clear(&self) {
        self.markdown.clear();
        self.examples.clear();
    }

    pub fn cache_stats(&self) -> ServiceStats {
        ServiceStats {
            markdown: self.markdown.stats(),
            examples: self.examples.stats(),
        }
    }

    fn fetch(&self, id: &str) -> Result<Option<String>> {
        let document = self.source.fetch(id)?;
        if document.is_none() {
            debug!(id, "document absent, converting as empty");
        }
        Ok(document)
    }
}

fn cache_key(kind: &str, id: &str) -> String {
    format!("{kind}:{}", id.trim())
}
