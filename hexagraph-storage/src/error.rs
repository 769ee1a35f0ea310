use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("WRONGTYPE operation against a key holding the wrong kind of value: {0}")]
    WrongType(String),

    #[error("malformed index key: {0}")]
    MalformedKey(String),
}
