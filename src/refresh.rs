//! One refresh cycle: fetch → extract → replace.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::app::{MatchcastError, Result};
use crate::domain::MatchRecord;
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;
use crate::store::Store;

/// Outcome of a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub records: usize,
    pub elapsed: Duration,
}

pub struct Refresher<S: Store> {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: Extractor,
    store: Arc<S>,
    url: String,
    in_flight: Mutex<()>,
}

impl<S: Store> Refresher<S> {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        extractor: Extractor,
        store: Arc<S>,
        url: String,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            url,
            in_flight: Mutex::new(()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and extract without touching the store.
    pub async fn scrape(&self, url: &str) -> Result<Vec<MatchRecord>> {
        let markup = self.fetcher.fetch(url).await?;
        self.extractor.extract(&markup)
    }

    /// Run one refresh against the configured URL.
    ///
    /// The store is replaced only on success. A call made while another
    /// refresh is running fails with [`MatchcastError::RefreshInProgress`].
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| MatchcastError::RefreshInProgress)?;

        let start = Instant::now();
        tracing::info!("Refreshing matches from {}", self.url);

        let records = self.scrape(&self.url).await?;
        let count = records.len();
        self.store.replace(records);

        let report = RefreshReport {
            records: count,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Refresh complete: {} matches ({:.1}s)",
            report.records,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use crate::fetcher::FetchError;
    use crate::store::MemoryStore;

    pub const PAGE: &str = r#"<html><body><div class="inner-post-entry entry-content">
        <h2>Sábado</h2><h3>16h00 – Flamengo x Vasco</h3><p>Canais: Globo</p>
        <h3>18h30 – Grêmio x Inter</h3>
        </div></body></html>"#;

    /// Replays queued responses; repeats the last one when the queue runs dry.
    pub struct ScriptedFetcher {
        responses: StdMutex<VecDeque<std::result::Result<String, u16>>>,
        delay: Duration,
        pub calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        pub fn new(responses: Vec<std::result::Result<&str, u16>>) -> Self {
            Self {
                responses: StdMutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let next = {
                let mut responses = self.responses.lock().unwrap();
                if responses.len() > 1 {
                    responses.pop_front()
                } else {
                    responses.front().cloned()
                }
            };

            match next {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                }),
            }
        }
    }

    pub fn refresher(fetcher: ScriptedFetcher) -> (Arc<Refresher<MemoryStore>>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let refresher = Refresher::new(
            Arc::new(fetcher),
            Extractor::default(),
            store.clone(),
            "https://example.com/jogos".to_string(),
        );
        (Arc::new(refresher), store)
    }

    #[tokio::test]
    async fn test_refresh_replaces_store() {
        let (refresher, store) = refresher(ScriptedFetcher::new(vec![Ok(PAGE)]));

        let report = refresher.refresh().await.unwrap();
        assert_eq!(report.records, 2);

        let all = store.get_all();
        assert_eq!(all[0].channels, "Globo");
        assert_eq!(all[1].fixture, "Grêmio x Inter");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_snapshot() {
        let (refresher, store) = refresher(ScriptedFetcher::new(vec![Ok(PAGE), Err(502)]));

        refresher.refresh().await.unwrap();
        let before = store.get_all();

        let err = refresher.refresh().await.unwrap_err();
        assert!(matches!(err, MatchcastError::Fetch(FetchError::Status { status: 502, .. })));
        assert_eq!(store.get_all(), before);
    }

    #[tokio::test]
    async fn test_missing_content_keeps_previous_snapshot() {
        let (refresher, store) =
            refresher(ScriptedFetcher::new(vec![Ok(PAGE), Ok("<html><body>manutenção</body></html>")]));

        refresher.refresh().await.unwrap();
        let err = refresher.refresh().await.unwrap_err();

        assert!(matches!(err, MatchcastError::ContentNotFound(_)));
        assert_eq!(store.get_all().len(), 2);
    }

    #[tokio::test]
    async fn test_scrape_does_not_touch_store() {
        let (refresher, store) = refresher(ScriptedFetcher::new(vec![Ok(PAGE)]));

        let records = refresher.scrape("https://example.com/other").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(store.get_all().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_refresh_is_rejected() {
        let fetcher = ScriptedFetcher::new(vec![Ok(PAGE)]).with_delay(Duration::from_millis(200));
        let (refresher, store) = refresher(fetcher);

        let first = {
            let refresher = refresher.clone();
            tokio::spawn(async move { refresher.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = refresher.refresh().await;
        assert!(matches!(second, Err(MatchcastError::RefreshInProgress)));

        let first = first.await.unwrap();
        tokio_test::assert_ok!(first);
        assert_eq!(store.get_all().len(), 2);

        // The guard is released once the first refresh finishes.
        tokio_test::assert_ok!(refresher.refresh().await);
    }
}
