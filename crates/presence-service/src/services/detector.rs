//! Change detector
//!
//! Polls `voice_events` for the configured guild over contiguous half-open
//! windows `[cursor, now)` and hands each relayed transition to a bounded
//! queue. The cursor lives only in this struct; a restart re-baselines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use presence_core::timeseries::schema::{tags, VOICE_EVENTS};
use presence_core::{EventType, SeriesQuery, VoiceTransitionEvent};

use crate::runtime::Shutdown;
use crate::settings::DetectorSettings;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Cumulative drop counters, readable after the detector has moved into its task
#[derive(Debug, Clone, Default)]
pub struct DetectorCounters {
    overflow: Arc<AtomicU64>,
    malformed: Arc<AtomicU64>,
}

impl DetectorCounters {
    /// Events dropped because the queue was full
    pub fn dropped_overflow(&self) -> u64 {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Records dropped because they failed validation
    pub fn dropped_malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }
}

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub window: PollWindow,
    pub delivered: usize,
    pub malformed: usize,
    pub overflowed: usize,
    /// The receiving side has gone away
    pub closed: bool,
}

impl PollReport {
    fn empty(window: PollWindow) -> Self {
        Self {
            window,
            delivered: 0,
            malformed: 0,
            overflowed: 0,
            closed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// First poll: cursor set, history skipped
    Baseline { cursor: DateTime<Utc> },
    Polled(PollReport),
}

/// Change detector
pub struct ChangeDetector {
    ctx: ServiceContext,
    settings: DetectorSettings,
    cursor: Option<DateTime<Utc>>,
    tx: mpsc::Sender<VoiceTransitionEvent>,
    counters: DetectorCounters,
}

impl ChangeDetector {
    /// Create a detector and the receiving end of its queue
    pub fn new(
        ctx: ServiceContext,
        settings: DetectorSettings,
    ) -> (Self, mpsc::Receiver<VoiceTransitionEvent>) {
        let (tx, rx) = mpsc::channel(settings.queue_capacity.max(1));
        (Self::with_sender(ctx, settings, tx), rx)
    }

    pub fn with_sender(
        ctx: ServiceContext,
        settings: DetectorSettings,
        tx: mpsc::Sender<VoiceTransitionEvent>,
    ) -> Self {
        Self {
            ctx,
            settings,
            cursor: None,
            tx,
            counters: DetectorCounters::default(),
        }
    }

    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor
    }

    pub fn counters(&self) -> DetectorCounters {
        self.counters.clone()
    }

    pub fn dropped_overflow(&self) -> u64 {
        self.counters.dropped_overflow()
    }

    fn window_query(&self, window: PollWindow) -> SeriesQuery {
        SeriesQuery::new(VOICE_EVENTS, window.start)
            .until(window.end)
            .tag_eq(tags::GUILD_ID, self.settings.guild_id)
            .tag_in(tags::EVENT_TYPE, EventType::RELAYED.iter().map(EventType::as_str))
    }

    /// Poll using the wall clock
    pub async fn poll(&mut self) -> ServiceResult<PollOutcome> {
        self.poll_at(Utc::now()).await
    }

    /// Poll the window ending at `now`. On failure the cursor stays put and
    /// the same window is retried next time.
    #[instrument(skip(self), fields(guild_id = %self.settings.guild_id))]
    pub async fn poll_at(&mut self, now: DateTime<Utc>) -> ServiceResult<PollOutcome> {
        let Some(start) = self.cursor else {
            self.cursor = Some(now);
            info!(cursor = %now, "Change detector baselined");
            return Ok(PollOutcome::Baseline { cursor: now });
        };

        // Clock went backwards or did not move
        if now <= start {
            return Ok(PollOutcome::Polled(PollReport::empty(PollWindow {
                start,
                end: start,
            })));
        }

        let window = PollWindow { start, end: now };
        let records = self.ctx.query(&self.window_query(window)).await?;
        let mut report = PollReport::empty(window);

        for record in &records {
            let event = match VoiceTransitionEvent::try_from(record) {
                Ok(event) if event.event_type.is_relayed() => event,
                Ok(event) => {
                    debug!(event_type = %event.event_type, "Skipping non-relayed event");
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, time = ?record.time, "Dropping malformed voice event");
                    report.malformed += 1;
                    self.counters.malformed.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            if report.closed {
                continue;
            }
            match self.tx.try_send(event) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(event)) => {
                    report.overflowed += 1;
                    let total = self.counters.overflow.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(
                        user_id = %event.user_id,
                        event_type = %event.event_type,
                        dropped_total = total,
                        "Notification queue full, dropping event"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    report.closed = true;
                    warn!("Notification queue closed");
                }
            }
        }

        self.cursor = Some(now);
        if report.delivered > 0 || report.malformed > 0 || report.overflowed > 0 {
            debug!(
                delivered = report.delivered,
                malformed = report.malformed,
                overflowed = report.overflowed,
                "Poll finished"
            );
        }
        Ok(PollOutcome::Polled(report))
    }

    /// Poll on a fixed interval until shutdown. Dropping `self` at the end
    /// closes the queue, which lets the dispatcher drain and finish.
    pub async fn run(mut self, mut shutdown: Shutdown) {
        let mut ticker = tokio::time::interval(self.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(guild_id = %self.settings.guild_id, "Change detector started");
        loop {
            tokio::select! {
                biased;
                () = shutdown.wait() => break,
                _ = ticker.tick() => {}
            }

            match self.poll().await {
                Ok(_) => {}
                Err(e) if e.is_cancelled() => break,
                Err(e) => error!(error = %e, "Change detector poll failed"),
            }
        }
        info!(
            dropped_overflow = self.counters.dropped_overflow(),
            "Change detector stopped"
        );
    }

    fn poll_interval(&self) -> Duration {
        self.settings.poll_interval.max(Duration::from_millis(1))
    }
}
