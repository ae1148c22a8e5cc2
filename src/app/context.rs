use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::daemon::DailySchedule;
use crate::extractor::Extractor;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::refresh::Refresher;
use crate::store::MemoryStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<MemoryStore>,
    pub refresher: Arc<Refresher<MemoryStore>>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::from_config(&config.source)?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let extractor = Extractor::new(&config.source.content_selector)?;
        let store = Arc::new(MemoryStore::new());
        let refresher = Arc::new(Refresher::new(
            fetcher,
            extractor,
            store.clone(),
            config.source.url.clone(),
        ));

        Ok(Self {
            config,
            store,
            refresher,
        })
    }

    pub fn schedule(&self) -> Result<DailySchedule> {
        Ok(DailySchedule::from_config(&self.config.schedule)?)
    }
}
