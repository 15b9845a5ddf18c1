use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The coordinator task has stopped; no further requests are accepted.
    #[error("vendor coordinator has shut down")]
    Closed,
}
