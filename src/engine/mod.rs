mod error;
mod generator;
mod mutations;
mod pricing;
mod queries;

pub use error::EngineError;
pub use generator::{generate_slots, HORIZON_DAYS};
pub use pricing::{price_multiplier, slot_price};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};

use crate::model::{AvailabilitySlot, Event, ReleaseMode, ResourceItem, SlotKey};
use crate::wal::Wal;

pub type SharedSlot = Arc<RwLock<AvailabilitySlot>>;

/// Storage appends are retried this many times with doubling backoff before
/// surfacing as `EngineError::Storage`. Business-rule failures never retry.
const WAL_APPEND_ATTEMPTS: u32 = 3;
const WAL_RETRY_BASE_DELAY: Duration = Duration::from_millis(10);

// ── Group-commit WAL channel ─────────────────────────────

pub(crate) enum WalCommand {
    Append {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    Compact {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    AppendsSinceCompact {
        response: oneshot::Sender<u64>,
    },
}

/// Background task that owns the WAL and batches appends for group commit.
/// 1. Block until the first Append arrives.
/// 2. Buffer it (no fsync).
/// 3. Drain all immediately available Appends (the batch window).
/// 4. Single flush_sync for the whole batch.
/// 5. Respond to all senders.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WalCommand::Append { events, response } => {
                let mut batch = vec![(events, response)];

                loop {
                    match rx.try_recv() {
                        Ok(WalCommand::Append { events, response }) => {
                            batch.push((events, response));
                        }
                        Ok(other) => {
                            flush_and_respond(&mut wal, &mut batch);
                            handle_non_append(&mut wal, other);
                            break;
                        }
                        Err(_) => break, // channel empty — flush batch
                    }
                }

                if !batch.is_empty() {
                    flush_and_respond(&mut wal, &mut batch);
                }
            }
            other => handle_non_append(&mut wal, other),
        }
    }
}

type AppendBatch = Vec<(Vec<Event>, oneshot::Sender<io::Result<()>>)>;

fn flush_and_respond(wal: &mut Wal, batch: &mut AppendBatch) {
    let event_count: usize = batch.iter().map(|(events, _)| events.len()).sum();
    metrics::histogram!(crate::observability::WAL_FLUSH_BATCH_SIZE).record(event_count as f64);

    let flush_start = std::time::Instant::now();
    let result = flush_batch(wal, batch);
    metrics::histogram!(crate::observability::WAL_FLUSH_DURATION_SECONDS)
        .record(flush_start.elapsed().as_secs_f64());

    for (_, tx) in batch.drain(..) {
        let r = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(r);
    }
}

fn flush_batch(wal: &mut Wal, batch: &AppendBatch) -> io::Result<()> {
    let mut append_err: Option<io::Error> = None;
    'outer: for (events, _) in batch.iter() {
        for event in events {
            if let Err(e) = wal.append_buffered(event) {
                append_err = Some(e);
                break 'outer;
            }
        }
    }
    // Always flush — even on append error — so partially buffered bytes
    // don't leak into the next batch (callers were told this batch failed).
    let flush_err = wal.flush_sync().err();
    if let Some(e) = append_err {
        return Err(e);
    }
    if let Some(e) = flush_err {
        return Err(e);
    }
    Ok(())
}

fn handle_non_append(wal: &mut Wal, cmd: WalCommand) {
    match cmd {
        WalCommand::Compact { events, response } => {
            let result = Wal::write_compact_file(wal.path(), &events)
                .and_then(|()| wal.swap_compact_file());
            let _ = response.send(result);
        }
        WalCommand::AppendsSinceCompact { response } => {
            let _ = response.send(wal.appends_since_compact());
        }
        WalCommand::Append { .. } => unreachable!(),
    }
}

// ── Slot state transitions ───────────────────────────────

/// Transition for a successful Book. Caller holds the slot's write lock and
/// has already checked availability.
pub(crate) fn apply_book(slot: &mut AvailabilitySlot) {
    slot.booked += 1;
    slot.is_available = slot.booked < slot.capacity;
}

/// Transition for Release: decrement with a floor at zero, then set the
/// availability flag per the configured mode.
pub(crate) fn apply_release(slot: &mut AvailabilitySlot, mode: ReleaseMode) {
    slot.booked = slot.booked.saturating_sub(1);
    slot.is_available = match mode {
        ReleaseMode::ForceAvailable => true,
        ReleaseMode::Recompute => slot.booked < slot.capacity,
    };
}

// ── Engine ───────────────────────────────────────────────

/// The availability ledger: catalog items plus one lockable slot per
/// (furniture, day) pair.
///
/// Each slot lives behind its own `RwLock`, so a Book's check-and-increment
/// runs entirely under the slot's write guard: concurrent Books on one slot
/// serialize, and at most `capacity` of them ever succeed. The WAL append
/// completes before the in-memory mutation is published.
pub struct Engine {
    pub(crate) items: DashMap<String, ResourceItem>,
    /// Catalog order as seeded; drives day-major slot listing order.
    pub(crate) item_order: RwLock<Vec<String>>,
    pub(crate) slots: DashMap<SlotKey, SharedSlot>,
    pub(crate) wal_tx: mpsc::Sender<WalCommand>,
    pub(crate) release_mode: ReleaseMode,
    /// Serializes seed/generate so concurrent bootstraps cannot double-write.
    pub(crate) bootstrap_lock: Mutex<()>,
}

impl Engine {
    pub fn new(wal_path: PathBuf, release_mode: ReleaseMode) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let engine = Self {
            items: DashMap::new(),
            item_order: RwLock::new(Vec::new()),
            slots: DashMap::new(),
            wal_tx,
            release_mode,
            bootstrap_lock: Mutex::new(()),
        };

        // Replay — we're the sole owner of these Arcs, so try_read/try_write
        // always succeed instantly (no contention). Never use blocking locks
        // here because this may run inside an async context.
        for event in &events {
            engine.replay_event(event);
        }

        Ok(engine)
    }

    fn replay_event(&self, event: &Event) {
        match event {
            Event::ItemSeeded { item } => {
                self.items.insert(item.id.clone(), item.clone());
                self.item_order
                    .try_write()
                    .expect("replay: uncontended write")
                    .push(item.id.clone());
            }
            Event::SlotGenerated { slot } => {
                self.slots
                    .insert(slot.key(), Arc::new(RwLock::new(slot.clone())));
            }
            Event::SlotBooked { furniture_id, date } => {
                if let Some(slot) = self.get_slot(&SlotKey::new(furniture_id.clone(), *date)) {
                    apply_book(&mut slot.try_write().expect("replay: uncontended write"));
                }
            }
            Event::SlotReleased { furniture_id, date } => {
                if let Some(slot) = self.get_slot(&SlotKey::new(furniture_id.clone(), *date)) {
                    apply_release(
                        &mut slot.try_write().expect("replay: uncontended write"),
                        self.release_mode,
                    );
                }
            }
        }
    }

    pub fn get_slot(&self, key: &SlotKey) -> Option<SharedSlot> {
        self.slots.get(key).map(|e| e.value().clone())
    }

    async fn try_wal_append(&self, events: &[Event]) -> Result<(), String> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                events: events.to_vec(),
                response: tx,
            })
            .await
            .map_err(|_| "WAL writer shut down".to_string())?;
        rx.await
            .map_err(|_| "WAL writer dropped response".to_string())?
            .map_err(|e| e.to_string())
    }

    /// Durably append events via the group-commit writer, retrying transient
    /// storage failures with exponential backoff.
    pub(crate) async fn wal_append(&self, events: Vec<Event>) -> Result<(), EngineError> {
        let mut delay = WAL_RETRY_BASE_DELAY;
        let mut last_err = String::new();
        for attempt in 1..=WAL_APPEND_ATTEMPTS {
            match self.try_wal_append(&events).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    last_err = e;
                    if attempt < WAL_APPEND_ATTEMPTS {
                        tracing::warn!("WAL append failed (attempt {attempt}): {last_err}");
                        metrics::counter!(crate::observability::WAL_RETRIES_TOTAL).increment(1);
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }
        Err(EngineError::Storage(last_err))
    }
}
