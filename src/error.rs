#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("message of {len} bytes is too large: its bit length does not fit in 64 bits")]
    InputTooLarge { len: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
