//! Background refresh scheduling.
//!
//! Refreshes the match list once a day at a fixed wall-clock time in a named
//! time zone, and periodically logs how long remains until the next run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::app::Result;
use crate::config::{ConfigError, ScheduleConfig};
use crate::refresh::Refresher;
use crate::store::Store;

/// When the next refresh is due.
pub trait Schedule: Send + Sync {
    /// First run time strictly after `now`.
    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Once a day at `hour:minute` local time in `tz`.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    tz: Tz,
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(tz: Tz, hour: u32, minute: u32) -> Result<Self> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            ConfigError::Invalid(format!("invalid time of day {:02}:{:02}", hour, minute))
        })?;
        Ok(Self { tz, at })
    }

    pub fn from_config(config: &ScheduleConfig) -> std::result::Result<Self, ConfigError> {
        let tz = config.tz()?;
        let at = NaiveTime::from_hms_opt(config.hour, config.minute, 0).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "invalid time of day {:02}:{:02}",
                config.hour, config.minute
            ))
        })?;
        Ok(Self { tz, at })
    }
}

impl Schedule for DailySchedule {
    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = now.with_timezone(&self.tz).date_naive();

        // Two days always contain the next run unless local time skips the
        // slot; a few more cover repeated DST gaps.
        for _ in 0..4 {
            if let Some(candidate) = self.tz.from_local_datetime(&date.and_time(self.at)).earliest() {
                let candidate = candidate.with_timezone(&Utc);
                if candidate > now {
                    return candidate;
                }
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        now + chrono::Duration::days(1)
    }
}

/// Format a wait for logs, e.g. `5h 12m 3s`.
pub fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Next run after `now`, never at or before the run that last fired.
///
/// `sleep` follows the monotonic clock, so the wall clock can still read
/// slightly before `last_run` when the timer wakes.
pub fn next_run(
    schedule: &dyn Schedule,
    now: DateTime<Utc>,
    last_run: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let base = last_run.map_or(now, |last| now.max(last));
    schedule.next_after(base)
}

pub fn time_until(next: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// Drives scheduled refreshes until shutdown.
pub struct Daemon<S: Store> {
    refresher: Arc<Refresher<S>>,
    schedule: Arc<dyn Schedule>,
    report_interval: Duration,
}

impl<S: Store + Send + Sync + 'static> Daemon<S> {
    pub fn new(
        refresher: Arc<Refresher<S>>,
        schedule: Arc<dyn Schedule>,
        report_interval: Duration,
    ) -> Self {
        Self {
            refresher,
            schedule,
            report_interval,
        }
    }

    /// Time left until the next scheduled run.
    pub fn time_until_next(&self) -> Duration {
        let now = Utc::now();
        time_until(self.schedule.next_after(now), now)
    }

    /// Log and return the time left until `next`, measured now.
    pub fn report_next(&self, next: DateTime<Utc>) -> Duration {
        let remaining = time_until(next, Utc::now());
        tracing::info!("Next refresh in {} (at {})", format_wait(remaining), next);
        remaining
    }

    /// Run the loop until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// Failed refreshes are logged and never end the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut report = interval(self.report_interval);
        report.set_missed_tick_behavior(MissedTickBehavior::Delay);
        report.tick().await; // Skip the first immediate tick

        tracing::info!(
            "Scheduler started, next refresh in {}",
            format_wait(self.time_until_next())
        );

        let mut last_run: Option<DateTime<Utc>> = None;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let next = next_run(self.schedule.as_ref(), Utc::now(), last_run);
            let wait = time_until(next, Utc::now());

            tokio::select! {
                _ = sleep(wait) => {
                    last_run = Some(next);
                    self.run_scheduled().await;
                }
                _ = report.tick() => {
                    self.report_next(next);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Scheduler shutting down");
    }

    async fn run_scheduled(&self) {
        tracing::info!("Running scheduled refresh");
        if let Err(e) = self.refresher.refresh().await {
            tracing::error!("Scheduled refresh failed, keeping previous matches: {}", e);
        }
    }
}
