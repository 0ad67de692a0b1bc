use crate::config::StoreMode;
use crate::jobs::model::Job;
use crate::jobs::normalize::normalize;
use crate::jobs::repo::JobsRepo;
use crate::upstream::{FetchError, UpstreamClient};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error("store query failed: {0}")]
    Store(#[source] anyhow::Error),
}

/// One request's worth of work: fetch, normalize and, when a store is
/// attached, read-or-insert every record.
#[derive(Clone)]
pub struct JobFeed {
    upstream: UpstreamClient,
    store: Option<JobsRepo>,
}

impl JobFeed {
    pub fn relay(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            store: None,
        }
    }

    pub fn persistent(upstream: UpstreamClient, store: JobsRepo) -> Self {
        Self {
            upstream,
            store: Some(store),
        }
    }

    pub fn mode(&self) -> StoreMode {
        match self.store {
            Some(_) => StoreMode::Persistent,
            None => StoreMode::Relay,
        }
    }

    pub fn store(&self) -> Option<&JobsRepo> {
        self.store.as_ref()
    }

    pub async fn load(&self, search: Option<&str>) -> Result<Vec<Job>, FeedError> {
        let raw = self.upstream.fetch(search).await?;
        let jobs = normalize(raw);

        tracing::debug!(
            count = jobs.len(),
            mode = self.mode().as_str(),
            "normalized upstream jobs"
        );

        let Some(store) = &self.store else {
            return Ok(jobs);
        };

        // Output keeps upstream order; the first failing query aborts the batch.
        let mut out = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let stored = store.read_or_insert(job).await.map_err(FeedError::Store)?;
            out.push(stored);
        }

        Ok(out)
    }
}
