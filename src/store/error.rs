use ulid::Ulid;

#[derive(Debug)]
pub enum StoreError {
    /// A required text field was empty.
    EmptyField(&'static str),
    /// Requester email failed the syntax check.
    InvalidEmail(String),
    /// Room is not in the configured room list.
    UnknownRoom(String),
    /// `to_date` earlier than `from_date`.
    DatesReversed,
    /// Zero or negative duration: end instant not after start instant.
    EmptyInterval,
    /// Candidate slot overlaps the given existing booking.
    Conflict(Ulid),
    /// No booking with this id.
    NotFound(Ulid),
    /// Failed to read or write the backing file.
    Persist(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EmptyField(field) => write!(f, "{field} must not be empty"),
            StoreError::InvalidEmail(email) => write!(f, "not a valid email address: {email}"),
            StoreError::UnknownRoom(room) => write!(f, "no such room: {room}"),
            StoreError::DatesReversed => write!(f, "end date is before start date"),
            StoreError::EmptyInterval => write!(f, "booking must end after it starts"),
            StoreError::Conflict(id) => write!(f, "slot conflicts with existing booking: {id}"),
            StoreError::NotFound(id) => write!(f, "no booking with id: {id}"),
            StoreError::Persist(e) => write!(f, "persistence error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Persist(e.to_string())
    }
}
