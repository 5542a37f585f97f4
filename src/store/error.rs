use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("unknown judge: {0}")]
    UnknownJudge(String),

    #[error("unsupported contest data version: {0}")]
    UnsupportedVersion(u32),

    #[error("store lock poisoned")]
    Poisoned,
}
