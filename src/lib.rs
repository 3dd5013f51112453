//! Booking core for a conference-room reservation tool.
//!
//! Two pieces: a [`store::BookingStore`] (CSV-backed, insertion-ordered
//! table of bookings behind a single write lock) and the pure conflict
//! checker it runs every candidate slot through (strict half-open
//! intervals — touching endpoints never conflict). Presentation, auth,
//! and admin surfaces are the embedding application's problem; this
//! crate owns validation, conflict checking, persistence, and the
//! notification seams.

pub mod config;
pub mod mailer;
pub mod model;
pub mod notify;
pub mod observability;
pub mod store;

pub use config::{Config, SmtpConfig};
pub use model::{Booking, BookingDraft, Priority, Slot, StoreEvent};
pub use notify::{Notifier, NotifyError, NotifyHub};
pub use store::{BookingStore, LoadReport, RejectedRow, StoreError};
