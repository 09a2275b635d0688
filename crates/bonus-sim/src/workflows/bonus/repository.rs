use super::tables::BonusTables;

/// Storage for the single editable session, so the service can be exercised
/// against in-memory or failing backends.
pub trait SessionRepository: Send + Sync {
    fn load(&self) -> Result<BonusTables, RepositoryError>;
    fn store(&self, tables: BonusTables) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
