//! # matchcast
//!
//! Scrapes a public page listing televised football matches and serves the
//! result as JSON.
//!
//! ## Architecture
//!
//! ```text
//! Daemon → Refresher → Fetcher → Extractor → Store ← Server
//! ```
//!
//! - [`fetcher`]: HTTP client with a bounded timeout
//! - [`extractor`]: Walks the page's content region into match records
//! - [`store`]: In-memory snapshot of the latest scrape
//! - [`daemon`]: Daily refresh schedule
//! - [`server`]: `GET /matches` and `GET /matches/{day}`
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve the API, scraping now and every day at 01:00 São Paulo time
//! matchcast serve
//!
//! # Scrape once and print today's listing
//! matchcast fetch --day sábado
//!
//! # Try the extractor on a saved page
//! matchcast parse saved.html
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// config, fetcher, extractor, store and refresher.
pub mod app;

/// Command-line interface using clap.
///
/// - `serve` - Scrape, schedule daily refreshes and serve the API
/// - `fetch` - Scrape once and print JSON
/// - `parse <file>` - Extract from a local HTML file
/// - `config init|show` - Manage the config file
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/matchcast/config.toml`; `SCRAPE_URL` and `PORT`
/// override the file.
pub mod config;

/// Daily refresh scheduling.
///
/// - [`Schedule`](daemon::Schedule): Next-run calculation
/// - [`DailySchedule`](daemon::DailySchedule): Fixed local time in a named zone
/// - [`Daemon`](daemon::Daemon): Refresh loop with next-run reporting
pub mod daemon;

/// Core domain model: [`MatchRecord`](domain::MatchRecord).
pub mod domain;

/// Markup to match records.
pub mod extractor;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page retrieval
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Fetch, extract and replace as one guarded step.
pub mod refresh;

/// Query API built with axum.
pub mod server;

/// In-memory record storage.
///
/// - [`Store`](store::Store): Read/replace operations
/// - [`MemoryStore`](store::MemoryStore): Snapshot-swapping implementation
pub mod store;
