use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::model::{Booking, Priority, Slot};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

const HEADER: [&str; 10] = [
    "Id", "User", "Email", "FromDate", "ToDate", "Room", "Priority", "Description", "Start", "End",
];

fn csv_to_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// On-disk row. Everything is text; parsing into typed values happens in
/// `parse_row` so each field failure yields its own reason.
#[derive(Debug, Serialize, Deserialize)]
struct RawRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "User")]
    user: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "FromDate")]
    from_date: String,
    #[serde(rename = "ToDate")]
    to_date: String,
    #[serde(rename = "Room")]
    room: String,
    #[serde(rename = "Priority")]
    priority: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
}

/// A persisted row that failed to parse and was excluded from the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line in the file (the header is line 1).
    pub line: u64,
    pub reason: String,
}

/// Outcome of a tolerant load: what made it in, and what did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedRow>,
}

fn parse_row(raw: &RawRow) -> Result<Booking, String> {
    let id: Ulid = raw
        .id
        .parse()
        .map_err(|_| format!("bad id {:?}", raw.id))?;
    let from_date = NaiveDate::parse_from_str(&raw.from_date, DATE_FMT)
        .map_err(|_| format!("bad from-date {:?}", raw.from_date))?;
    let to_date = NaiveDate::parse_from_str(&raw.to_date, DATE_FMT)
        .map_err(|_| format!("bad to-date {:?}", raw.to_date))?;
    let start = NaiveTime::parse_from_str(&raw.start, TIME_FMT)
        .map_err(|_| format!("bad start time {:?}", raw.start))?;
    let end = NaiveTime::parse_from_str(&raw.end, TIME_FMT)
        .map_err(|_| format!("bad end time {:?}", raw.end))?;
    let priority =
        Priority::parse(&raw.priority).ok_or_else(|| format!("bad priority {:?}", raw.priority))?;
    if to_date < from_date {
        return Err(format!("date range reversed: {} > {}", raw.from_date, raw.to_date));
    }
    Ok(Booking {
        id,
        user: raw.user.clone(),
        email: raw.email.clone(),
        room: raw.room.clone(),
        slot: Slot::new(from_date, to_date, start, end),
        priority,
        description: if raw.description.is_empty() {
            None
        } else {
            Some(raw.description.clone())
        },
    })
}

fn to_row(b: &Booking) -> RawRow {
    RawRow {
        id: b.id.to_string(),
        user: b.user.clone(),
        email: b.email.clone(),
        from_date: b.slot.from_date.format(DATE_FMT).to_string(),
        to_date: b.slot.to_date.format(DATE_FMT).to_string(),
        room: b.room.clone(),
        priority: b.priority.to_string(),
        description: b.description.clone().unwrap_or_default(),
        start: b.slot.start.format(TIME_FMT).to_string(),
        end: b.slot.end.format(TIME_FMT).to_string(),
    }
}

/// Load all parseable bookings from `path`. A missing file is an empty
/// store. Malformed rows never fail the load — they are excluded and
/// reported; only real I/O errors propagate.
pub fn load(path: &Path) -> io::Result<(Vec<Booking>, LoadReport)> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), LoadReport::default())),
        Err(e) => return Err(e),
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut bookings = Vec::new();
    let mut report = LoadReport::default();

    // Header is line 1, first record line 2.
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        let line = idx as u64 + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                if let csv::ErrorKind::Io(io_err) = e.into_kind() {
                    return Err(io_err);
                }
                report.rejected.push(RejectedRow {
                    line,
                    reason: "malformed row".into(),
                });
                continue;
            }
        };
        match parse_row(&raw) {
            Ok(b) => bookings.push(b),
            Err(reason) => report.rejected.push(RejectedRow { line, reason }),
        }
    }

    report.loaded = bookings.len();
    Ok((bookings, report))
}

/// Rewrite the whole table: serialize to a temp sibling, fsync, rename
/// over the live file. A crash mid-write leaves the previous complete file.
pub fn save(path: &Path, bookings: &[Booking]) -> io::Result<()> {
    let tmp_path = match path.file_name() {
        Some(name) => {
            let mut tmp = name.to_os_string();
            tmp.push(".tmp");
            path.with_file_name(tmp)
        }
        None => return Err(io::Error::new(io::ErrorKind::InvalidInput, "bad store path")),
    };

    let file = File::create(&tmp_path)?;
    // Header is written explicitly so an empty table still round-trips.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(HEADER).map_err(csv_to_io)?;
    for booking in bookings {
        writer.serialize(to_row(booking)).map_err(csv_to_io)?;
    }
    writer.flush()?;
    let buf = writer
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))?;
    let file = buf
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)
}
