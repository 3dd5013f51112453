use once_cell::sync::Lazy;
use regex::Regex;
use ulid::Ulid;

use crate::model::{Booking, BookingDraft, Slot};

use super::StoreError;

/// Syntax check only — one `@`, no whitespace, a dot somewhere in the domain.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Validate a draft before it is allowed anywhere near the store.
/// This is the upstream gate the conflict checker's precondition relies
/// on: a draft that passes here has a strictly positive duration.
pub fn validate_draft(draft: &BookingDraft, rooms: &[String]) -> Result<(), StoreError> {
    if draft.user.trim().is_empty() {
        return Err(StoreError::EmptyField("user"));
    }
    if draft.email.trim().is_empty() {
        return Err(StoreError::EmptyField("email"));
    }
    if !EMAIL_RE.is_match(&draft.email) {
        return Err(StoreError::InvalidEmail(draft.email.clone()));
    }
    // Exact match, case-sensitive — no normalization.
    if !rooms.iter().any(|r| r == &draft.room) {
        return Err(StoreError::UnknownRoom(draft.room.clone()));
    }
    if draft.slot.to_date < draft.slot.from_date {
        return Err(StoreError::DatesReversed);
    }
    if draft.slot.start_instant() >= draft.slot.end_instant() {
        return Err(StoreError::EmptyInterval);
    }
    Ok(())
}

/// Linear scan over same-room bookings for a half-open interval collision.
/// `exclude` skips the booking being updated so a record can be moved onto
/// a slot overlapping its own previous one. Pure; never invoked with a
/// zero-duration slot (rejected by `validate_draft`).
pub fn check_no_conflict(
    bookings: &[Booking],
    room: &str,
    slot: &Slot,
    exclude: Option<Ulid>,
) -> Result<(), StoreError> {
    for existing in bookings {
        if exclude == Some(existing.id) {
            continue;
        }
        if existing.room != room {
            continue;
        }
        if existing.slot.overlaps(slot) {
            return Err(StoreError::Conflict(existing.id));
        }
    }
    Ok(())
}

/// Boolean form of `check_no_conflict` for availability queries.
pub fn is_free(bookings: &[Booking], room: &str, slot: &Slot) -> bool {
    check_no_conflict(bookings, room, slot, None).is_ok()
}
