#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("username is required (-u/--user)")]
    MissingUsername,

    #[error("could not resolve server address {0}")]
    UnresolvedServerAddress(String),
}
