use thiserror::Error;

/// Errors reported when configuring a table through a builder.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("a chained table needs at least one bucket")]
    ZeroBuckets,
}
