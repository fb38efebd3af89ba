use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeatIdError {
    #[error("seat id {0:?} has fewer than 3 '-'-separated segments")]
    TooFewSegments(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown seat status {0:?}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?}")]
pub struct UnknownDirection(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VenueError {
    #[error("duplicate seat id {0:?}")]
    DuplicateSeatId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Ошибки загрузки схемы зала. Обе локации уже опробованы, повторов не будет.
#[derive(Debug, Error)]
pub enum VenueLoadError {
    #[error("failed to load venue data: {0}")]
    Unavailable(String),
    #[error("failed to create HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("venue document is not valid JSON: {0}")]
    Decode(#[from] reqwest::Error),
    #[error(transparent)]
    Invalid(#[from] VenueError),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("relay message is missing {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("selection store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("selection store is corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ошибки, которые видит пользователь сессии.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeatMapError {
    #[error("Seat \"{0}\" not found. Please check the seat ID and try again.")]
    SeatNotFound(String),
}
