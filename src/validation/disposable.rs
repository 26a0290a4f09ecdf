use super::syntax::to_ascii_domain;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DisposableSourceError {
    #[error("disposable domain list has not been loaded")]
    NotLoaded,
    #[error("failed to read disposable domain file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to query disposable domains from MongoDB: {0}")]
    MongoDb(#[from] mongodb::error::Error),
}

/// Membership test for disposable (throwaway) mail domains.
pub trait DisposableDomains: Send + Sync {
    /// `domain` is expected to have no trailing dot; Unicode and punycode forms are equivalent.
    fn contains(&self, domain: &str) -> Result<bool, DisposableSourceError>;

    /// Number of domains currently known, for health reporting.
    fn domain_count(&self) -> usize;
}

/// Where the disposable domain list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisposableSource {
    /// Nothing configured; the list is empty.
    #[default]
    None,
    /// Plain text file, one domain per line, `#` starts a comment.
    File(PathBuf),
    /// Every document's `domain` field in a MongoDB collection.
    MongoDb {
        uri: String,
        database: String,
        collection: String,
    },
}

impl DisposableSource {
    /// Reads the full domain list from the source.
    pub async fn fetch(&self) -> Result<HashSet<String>, DisposableSourceError> {
        match self {
            DisposableSource::None => Ok(HashSet::new()),
            DisposableSource::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|source| {
                    DisposableSourceError::File {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(parse_domain_list(&text))
            }
            DisposableSource::MongoDb {
                uri,
                database,
                collection,
            } => {
                let client = Client::with_uri_str(uri).await?;
                let collection: Collection<Document> =
                    client.database(database).collection(collection);

                let values = collection.distinct("domain", doc! {}).await?;
                Ok(values
                    .iter()
                    .filter_map(|value| value.as_str())
                    .filter_map(normalize_entry)
                    .collect())
            }
        }
    }
}

/// Parses the text file format: one domain per line, blank lines and `#` comments skipped.
pub fn parse_domain_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .filter_map(normalize_entry)
        .collect()
}

/// Entries and lookups are compared in their ASCII (punycode) form.
fn normalize_entry(raw: &str) -> Option<String> {
    let domain = raw.trim().trim_end_matches('.');
    if domain.is_empty() {
        return None;
    }
    Some(to_ascii_domain(domain).unwrap_or_else(|| domain.to_lowercase()))
}

/// Disposable domain list held in memory and swapped wholesale on reload.
///
/// Readers clone the current `Arc` snapshot, so a reload never exposes a
/// half-built set. Until the first successful [`reload`](Self::reload) every
/// lookup fails with [`DisposableSourceError::NotLoaded`].
pub struct DisposableDomainSet {
    source: DisposableSource,
    match_subdomains: bool,
    snapshot: RwLock<Option<Arc<HashSet<String>>>>,
}

impl DisposableDomainSet {
    pub fn new(source: DisposableSource, match_subdomains: bool) -> Self {
        Self {
            source,
            match_subdomains,
            snapshot: RwLock::new(None),
        }
    }

    /// Builds an already loaded set with no backing source.
    pub fn from_domains<I, S>(domains: I, match_subdomains: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: HashSet<String> = domains
            .into_iter()
            .filter_map(|domain| normalize_entry(domain.as_ref()))
            .collect();
        Self {
            source: DisposableSource::None,
            match_subdomains,
            snapshot: RwLock::new(Some(Arc::new(domains))),
        }
    }

    pub fn source(&self) -> &DisposableSource {
        &self.source
    }

    /// Fetches the list from the source and replaces the current snapshot.
    ///
    /// On error the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<usize, DisposableSourceError> {
        let domains = self.source.fetch().await?;
        let count = domains.len();
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(domains));
        Ok(count)
    }

    fn current(&self) -> Option<Arc<HashSet<String>>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DisposableDomains for DisposableDomainSet {
    fn contains(&self, domain: &str) -> Result<bool, DisposableSourceError> {
        let domains = self.current().ok_or(DisposableSourceError::NotLoaded)?;
        let Some(domain) = normalize_entry(domain) else {
            return Ok(false);
        };

        if domains.contains(&domain) {
            return Ok(true);
        }
        if self.match_subdomains {
            let mut rest = domain.as_str();
            while let Some((_, parent)) = rest.split_once('.') {
                if domains.contains(parent) {
                    return Ok(true);
                }
                rest = parent;
            }
        }
        Ok(false)
    }

    fn domain_count(&self) -> usize {
        self.current().map_or(0, |domains| domains.len())
    }
}

/// Reloads `set` every `every`, keeping the old list when a reload fails.
pub fn spawn_refresh(set: Arc<DisposableDomainSet>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; startup already loaded the list
        interval.tick().await;
        loop {
            interval.tick().await;
            match set.reload().await {
                Ok(count) => info!(count, "Reloaded disposable domain list"),
                Err(e) => warn!(error = %e, "Disposable domain reload failed, keeping previous list"),
            }
        }
    })
}
