pub mod chia_error;
pub mod streamable;

pub use crate::chia_error::{Error, Result};
pub use crate::streamable::*;
