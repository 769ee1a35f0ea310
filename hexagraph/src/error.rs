use std::fmt;

/// The error type for Hexagraph operations.
#[derive(Debug)]
pub enum Error {
    /// Fixed-arity command given the wrong argument count.
    WrongArity(&'static str),
    /// Target key exists but holds the wrong kind of value.
    WrongType,
    /// Command name not in the dispatch table.
    UnknownCommand(String),
    /// Error returned by the storage layer.
    Storage(String),
    /// Error during query compilation or execution.
    Query(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WrongArity(cmd) => {
                write!(f, "ERR wrong number of arguments for '{cmd}' command")
            }
            Error::WrongType => write!(
                f,
                "WRONGTYPE Operation against a key holding the wrong kind of value"
            ),
            Error::UnknownCommand(cmd) => write!(f, "ERR unknown command '{cmd}'"),
            Error::Storage(e) => write!(f, "Storage error: {e}"),
            Error::Query(e) => write!(f, "Query error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// Convert storage errors to strings to hide internal types
impl From<hexagraph_storage::Error> for Error {
    fn from(e: hexagraph_storage::Error) -> Self {
        match e {
            hexagraph_storage::Error::WrongType(_) => Error::WrongType,
            _ => Error::Storage(e.to_string()),
        }
    }
}

// Convert query errors to strings to hide internal types
impl From<hexagraph_query::Error> for Error {
    fn from(e: hexagraph_query::Error) -> Self {
        Error::Query(e.to_string())
    }
}

/// A specialized Result type for Hexagraph operations.
pub type Result<T> = std::result::Result<T, Error>;
