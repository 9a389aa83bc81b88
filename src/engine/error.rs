use chrono::NaiveDate;

#[derive(Debug)]
pub enum EngineError {
    /// No slot matches the (furniture, date) composite key.
    SlotNotFound {
        furniture_id: String,
        date: NaiveDate,
    },
    /// The slot's capacity is exhausted.
    Conflict {
        furniture_id: String,
        date: NaiveDate,
    },
    /// Malformed request: missing field or bad date format.
    Validation(&'static str),
    /// Persistence failure after retries.
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::SlotNotFound { furniture_id, date } => {
                write!(f, "slot not found: {furniture_id} on {date}")
            }
            EngineError::Conflict { furniture_id, date } => {
                write!(f, "slot is not available: {furniture_id} on {date}")
            }
            EngineError::Validation(msg) => write!(f, "invalid request: {msg}"),
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    pub(crate) fn slot_not_found(key: &crate::model::SlotKey) -> Self {
        EngineError::SlotNotFound {
            furniture_id: key.furniture_id.clone(),
            date: key.date,
        }
    }

    pub(crate) fn conflict(key: &crate::model::SlotKey) -> Self {
        EngineError::Conflict {
            furniture_id: key.furniture_id.clone(),
            date: key.date,
        }
    }
}
