use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Booking priority, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium-Low")]
    MediumLow,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    #[serde(rename = "High")]
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::MediumLow => "Medium-Low",
            Priority::Medium => "Medium",
            Priority::MediumHigh => "Medium-High",
            Priority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Priority::Low),
            "Medium-Low" => Some(Priority::MediumLow),
            "Medium" => Some(Priority::Medium),
            "Medium-High" => Some(Priority::MediumHigh),
            "High" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open occupancy window: continuous from `from_date` + `start`
/// to `to_date` + `end`. Single-day bookings have `from_date == to_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Slot {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(to_date >= from_date, "Slot date range reversed");
        Self { from_date, to_date, start, end }
    }

    /// Single-day convenience constructor.
    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(date, date, start, end)
    }

    pub fn start_instant(&self) -> NaiveDateTime {
        self.from_date.and_time(self.start)
    }

    pub fn end_instant(&self) -> NaiveDateTime {
        self.to_date.and_time(self.end)
    }

    /// True when the date ranges share at least one day. Cheap pre-check
    /// before the instant-level overlap test.
    pub fn dates_overlap(&self, other: &Slot) -> bool {
        self.to_date >= other.from_date && self.from_date <= other.to_date
    }

    /// Strict half-open overlap: touching endpoints do NOT overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.dates_overlap(other)
            && self.start_instant() < other.end_instant()
            && self.end_instant() > other.start_instant()
    }
}

/// A booking request as the caller supplies it — everything but the id.
/// Fields are human-entered and unvalidated until the store checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub user: String,
    pub email: String,
    pub room: String,
    pub slot: Slot,
    pub priority: Priority,
    pub description: Option<String>,
}

/// A committed booking. The id is generated by the store at insert time
/// and is the only lookup key for update/remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub user: String,
    pub email: String,
    pub room: String,
    pub slot: Slot,
    pub priority: Priority,
    pub description: Option<String>,
}

impl Booking {
    pub fn from_draft(id: Ulid, draft: BookingDraft) -> Self {
        Self {
            id,
            user: draft.user,
            email: draft.email,
            room: draft.room,
            slot: draft.slot,
            priority: draft.priority,
            description: draft.description,
        }
    }
}

/// Committed store mutations, broadcast to room subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(Booking),
    Updated(Booking),
    Removed(Booking),
}

impl StoreEvent {
    pub fn booking(&self) -> &Booking {
        match self {
            StoreEvent::Added(b) | StoreEvent::Updated(b) | StoreEvent::Removed(b) => b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn priority_round_trip() {
        for p in [
            Priority::Low,
            Priority::MediumLow,
            Priority::Medium,
            Priority::MediumHigh,
            Priority::High,
        ] {
            assert_eq!(Priority::parse(p.as_str()), Some(p));
        }
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::Low < Priority::MediumLow);
        assert!(Priority::MediumHigh < Priority::High);
    }

    #[test]
    fn slot_instants() {
        let s = Slot::on(d("2024-01-01"), t("09:00"), t("10:00"));
        assert_eq!(s.start_instant(), d("2024-01-01").and_time(t("09:00")));
        assert_eq!(s.end_instant(), d("2024-01-01").and_time(t("10:00")));
    }

    #[test]
    fn same_day_overlap() {
        let a = Slot::on(d("2024-01-01"), t("09:00"), t("10:00"));
        let b = Slot::on(d("2024-01-01"), t("09:30"), t("10:30"));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a = Slot::on(d("2024-01-01"), t("09:00"), t("10:00"));
        let b = Slot::on(d("2024-01-01"), t("10:00"), t("11:00"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_dates_do_not_overlap() {
        let a = Slot::on(d("2024-01-01"), t("09:00"), t("10:00"));
        let b = Slot::on(d("2024-01-02"), t("09:00"), t("10:00"));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn multi_day_range_covers_middle_days() {
        // [Jan 1 09:00, Jan 3 17:00) spans the whole of Jan 2.
        let long = Slot::new(d("2024-01-01"), d("2024-01-03"), t("09:00"), t("17:00"));
        let mid = Slot::on(d("2024-01-02"), t("01:00"), t("02:00"));
        assert!(long.overlaps(&mid));
        assert!(mid.overlaps(&long));
    }

    #[test]
    fn multi_day_partial_date_overlap() {
        let a = Slot::new(d("2024-01-01"), d("2024-01-05"), t("09:00"), t("17:00"));
        let b = Slot::new(d("2024-01-04"), d("2024-01-08"), t("09:00"), t("17:00"));
        assert!(a.dates_overlap(&b));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn adjacent_multi_day_ranges_touching_instant() {
        // First ends Jan 3 12:00, second starts Jan 3 12:00 — shared date,
        // touching instants, no overlap.
        let a = Slot::new(d("2024-01-01"), d("2024-01-03"), t("09:00"), t("12:00"));
        let b = Slot::new(d("2024-01-03"), d("2024-01-05"), t("12:00"), t("17:00"));
        assert!(a.dates_overlap(&b));
        assert!(!a.overlaps(&b));
    }
}
