mod conflict;
mod error;
mod persist;

pub use conflict::{check_no_conflict, is_free, validate_draft};
pub use error::StoreError;
pub use persist::{LoadReport, RejectedRow};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::model::{Booking, BookingDraft, Slot, StoreEvent};
use crate::notify::NotifyHub;
use crate::observability;

struct Inner {
    /// Insertion-ordered; order carries no meaning beyond display.
    bookings: Vec<Booking>,
    path: PathBuf,
}

/// The authoritative booking table.
///
/// Every mutation runs under the single write lock for its whole
/// read-check-persist cycle, so two callers can never both pass the
/// conflict check against the same stale snapshot. The backing CSV is
/// rewritten wholesale on every committed mutation.
pub struct BookingStore {
    inner: RwLock<Inner>,
    rooms: Vec<String>,
    notify: Arc<NotifyHub>,
}

impl BookingStore {
    /// Load the table from `path`. Rows with unparseable fields are
    /// excluded and reported, never fatal; only I/O errors fail the open.
    pub fn open(
        path: PathBuf,
        rooms: Vec<String>,
        notify: Arc<NotifyHub>,
    ) -> Result<(Self, LoadReport), StoreError> {
        let (bookings, report) = persist::load(&path)?;
        for reject in &report.rejected {
            warn!(line = reject.line, reason = %reject.reason, "dropped unparseable row");
        }
        if !report.rejected.is_empty() {
            metrics::counter!(observability::LOAD_ROWS_REJECTED_TOTAL)
                .increment(report.rejected.len() as u64);
        }
        info!(
            loaded = report.loaded,
            rejected = report.rejected.len(),
            path = %path.display(),
            "booking store opened"
        );
        let store = Self {
            inner: RwLock::new(Inner { bookings, path }),
            rooms,
            notify,
        };
        Ok((store, report))
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    // ── Mutations ────────────────────────────────────────────

    /// Validate, conflict-check, and commit a new booking. Returns the
    /// committed record with its generated id.
    pub async fn insert(&self, draft: BookingDraft) -> Result<Booking, StoreError> {
        validate_draft(&draft, &self.rooms)?;
        let mut inner = self.inner.write().await;

        if let Err(e) = check_no_conflict(&inner.bookings, &draft.room, &draft.slot, None) {
            metrics::counter!(observability::CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        let booking = Booking::from_draft(Ulid::new(), draft);
        let mut next = inner.bookings.clone();
        next.push(booking.clone());
        Self::persist(&inner.path, &next)?;
        inner.bookings = next;

        metrics::counter!(observability::BOOKINGS_INSERTED_TOTAL).increment(1);
        info!(id = %booking.id, room = %booking.room, "booking inserted");
        self.notify.send(&booking.room, &StoreEvent::Added(booking.clone()));
        Ok(booking)
    }

    /// Wholesale field replacement of the booking with `id`. The conflict
    /// check excludes the record itself, so a booking can move onto a slot
    /// overlapping its own previous one.
    pub async fn update(&self, id: Ulid, draft: BookingDraft) -> Result<Booking, StoreError> {
        validate_draft(&draft, &self.rooms)?;
        let mut inner = self.inner.write().await;

        let pos = inner
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Err(e) = check_no_conflict(&inner.bookings, &draft.room, &draft.slot, Some(id)) {
            metrics::counter!(observability::CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        let booking = Booking::from_draft(id, draft);
        let mut next = inner.bookings.clone();
        next[pos] = booking.clone();
        Self::persist(&inner.path, &next)?;
        inner.bookings = next;

        info!(id = %booking.id, room = %booking.room, "booking updated");
        self.notify.send(&booking.room, &StoreEvent::Updated(booking.clone()));
        Ok(booking)
    }

    /// Delete the booking with `id`. No conflict check.
    pub async fn remove(&self, id: Ulid) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        let pos = inner
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = inner.bookings.clone();
        let booking = next.remove(pos);
        Self::persist(&inner.path, &next)?;
        inner.bookings = next;

        metrics::counter!(observability::BOOKINGS_REMOVED_TOTAL).increment(1);
        info!(id = %booking.id, room = %booking.room, "booking removed");
        self.notify.send(&booking.room, &StoreEvent::Removed(booking.clone()));
        Ok(booking)
    }

    // ── Queries ──────────────────────────────────────────────

    pub async fn get(&self, id: Ulid) -> Option<Booking> {
        let inner = self.inner.read().await;
        inner.bookings.iter().find(|b| b.id == id).cloned()
    }

    /// All bookings in insertion order.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.clone()
    }

    pub async fn bookings_for_room(&self, room: &str) -> Vec<Booking> {
        let inner = self.inner.read().await;
        inner
            .bookings
            .iter()
            .filter(|b| b.room == room)
            .cloned()
            .collect()
    }

    /// Pure availability query; does not validate the slot.
    pub async fn is_available(&self, room: &str, slot: &Slot) -> bool {
        let inner = self.inner.read().await;
        is_free(&inner.bookings, room, slot)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.bookings.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Write the prospective table to disk. Called before the in-memory
    /// apply so a failed write leaves both file and memory unchanged.
    fn persist(path: &std::path::Path, bookings: &[Booking]) -> Result<(), StoreError> {
        let started = Instant::now();
        persist::save(path, bookings)?;
        metrics::histogram!(observability::PERSIST_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        debug!(records = bookings.len(), "table persisted");
        Ok(())
    }
}
