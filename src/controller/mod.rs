//! Dashboard controller: owns the filter state and the fetch lifecycle.
//!
//! ## Lifecycle
//!
//! `mount()` spawns one fetch per slot (history, forecast). Each task reports
//! back over a channel tagged with the mount it belongs to. Until a delivery
//! lands, the dashboard renders with an empty dataset.
//!
//! `teardown()` aborts in-flight tasks and retires the mount. A delivery that
//! was already queued for a retired mount is discarded when drained, so a late
//! response can never write into a torn-down view. `mount()` drops whatever
//! is still queued before spawning.
//!
//! A task that ends without a result (panic, abort) still reports: its
//! `Courier` sends `Payload::Lost` on drop, and the live mount treats that
//! as a failed fetch for the slot.
//!
//! `refresh()` re-mounts. The filter selection survives.

pub mod state;

use crate::error::SourceError;
use crate::models::{Category, DateRange, RawForecastRecord, RawRecord};
use crate::parser::{parse_forecast, parse_records};
use crate::source::DataSource;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use self::state::{Action, DashboardFrame, DashboardState};

/// Which isolated state slot a fetch writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    History,
    Forecast,
}

enum Payload {
    History(Result<Vec<RawRecord>, SourceError>),
    Forecast(Result<Vec<RawForecastRecord>, SourceError>),
    Lost(Slot),
}

struct Delivery {
    mount_id: u64,
    payload: Payload,
}

/// Carries one task's result back to the controller, exactly once.
struct Courier {
    mount_id: u64,
    slot: Slot,
    tx: Option<mpsc::UnboundedSender<Delivery>>,
}

impl Courier {
    fn deliver(mut self, payload: Payload) {
        if let Some(tx) = self.tx.take() {
            // Receiver only disappears with the controller itself
            let _ = tx.send(Delivery {
                mount_id: self.mount_id,
                payload,
            });
        }
    }
}

impl Drop for Courier {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Delivery {
                mount_id: self.mount_id,
                payload: Payload::Lost(self.slot),
            });
        }
    }
}

struct Mount {
    id: u64,
    pending: usize,
    tasks: Vec<JoinHandle<()>>,
}

pub struct DashboardController<S> {
    source: Arc<S>,
    state: DashboardState,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
    mount: Option<Mount>,
    last_mount_id: u64,
}

impl<S: DataSource + 'static> DashboardController<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            state: DashboardState::new(),
            tx,
            rx,
            mount: None,
            last_mount_id: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn frame(&self) -> DashboardFrame {
        self.state.frame()
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    // ── Filter transitions ────────────────────────────────────────────────────

    pub fn set_range(&mut self, range: DateRange) {
        self.state.dispatch(Action::SetRange(range));
    }

    pub fn set_category(&mut self, category: Category) {
        self.state.dispatch(Action::SetCategory(category));
    }

    // ── Fetch lifecycle ───────────────────────────────────────────────────────

    /// Start both fetches. Must be called from within a tokio runtime.
    pub fn mount(&mut self) -> u64 {
        self.teardown();

        let mut stale = 0usize;
        while self.rx.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!("Dropped {} stale deliveries before mounting", stale);
        }

        self.last_mount_id += 1;
        let id = self.last_mount_id;
        let tasks = vec![
            self.spawn_fetch(id, Slot::History),
            self.spawn_fetch(id, Slot::Forecast),
        ];
        info!("Mounted dashboard (mount #{})", id);

        self.mount = Some(Mount {
            id,
            pending: tasks.len(),
            tasks,
        });
        id
    }

    /// Re-fetch both series under the current selection.
    pub fn refresh(&mut self) -> u64 {
        self.mount()
    }

    pub fn teardown(&mut self) {
        if let Some(mount) = self.mount.take() {
            for task in &mount.tasks {
                task.abort();
            }
            info!(
                "Tore down mount #{} ({} fetches still pending)",
                mount.id, mount.pending
            );
        }
    }

    fn spawn_fetch(&self, mount_id: u64, slot: Slot) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let courier = Courier {
            mount_id,
            slot,
            tx: Some(self.tx.clone()),
        };

        tokio::spawn(async move {
            let payload = match slot {
                Slot::History => Payload::History(source.fetch_history().await),
                Slot::Forecast => Payload::Forecast(source.fetch_forecast().await),
            };
            courier.deliver(payload);
        })
    }

    /// Wait for the next delivery belonging to the live mount and apply it.
    /// Returns `None` once nothing is outstanding.
    pub async fn next_update(&mut self) -> Option<Slot> {
        loop {
            match &self.mount {
                Some(m) if m.pending > 0 => {}
                _ => return None,
            }
            let delivery = self.rx.recv().await?;
            if let Some(slot) = self.apply(delivery) {
                return Some(slot);
            }
        }
    }

    /// Drain until both fetches of the live mount have landed.
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    fn apply(&mut self, delivery: Delivery) -> Option<Slot> {
        let live = match self.mount.as_mut() {
            Some(m) if m.id == delivery.mount_id => m,
            _ => {
                debug!("Discarding delivery for retired mount #{}", delivery.mount_id);
                return None;
            }
        };
        live.pending = live.pending.saturating_sub(1);

        match delivery.payload {
            Payload::History(Ok(rows)) => {
                let records = parse_records(&rows);
                info!("History: {} of {} rows valid", records.len(), rows.len());
                self.state.dispatch(Action::HistoryLoaded(records));
                Some(Slot::History)
            }
            Payload::History(Err(e)) => {
                warn!("Error fetching price history: {}", e);
                self.state.dispatch(Action::HistoryFailed);
                Some(Slot::History)
            }
            Payload::Forecast(Ok(rows)) => {
                let records = parse_forecast(&rows);
                info!("Forecast: {} of {} rows valid", records.len(), rows.len());
                self.state.dispatch(Action::ForecastLoaded(records));
                Some(Slot::Forecast)
            }
            Payload::Forecast(Err(e)) => {
                warn!("Error fetching forecast: {}", e);
                self.state.dispatch(Action::ForecastFailed);
                Some(Slot::Forecast)
            }
            Payload::Lost(slot) => {
                warn!("{:?} fetch ended without a result", slot);
                self.state.dispatch(match slot {
                    Slot::History => Action::HistoryFailed,
                    Slot::Forecast => Action::ForecastFailed,
                });
                Some(slot)
            }
        }
    }
}

impl<S> Drop for DashboardController<S> {
    fn drop(&mut self) {
        if let Some(mount) = self.mount.take() {
            for task in &mount.tasks {
                task.abort();
            }
        }
    }
}
