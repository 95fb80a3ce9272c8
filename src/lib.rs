pub mod error;
pub mod hash;
pub mod hex;

pub use error::{Error, Result};
pub use hash::sha256::{digest, try_digest, Sha256};
