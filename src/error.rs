use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Transport(String),

  #[error("{message}")]
  Server { status: u16, message: String },

  #[error("malformed response: {0}")]
  Malformed(String),
}
