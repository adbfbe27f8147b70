#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HasherError {
    /// No servers registered, so no key can be assigned.
    #[error("hash ring is empty")]
    RingEmpty,
}

pub type HasherResult<T> = Result<T, HasherError>;
