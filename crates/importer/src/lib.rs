pub mod canonical;
pub mod error;
pub mod name_mapper;
pub mod seed;

pub use error::{ImporterError, Result};
pub use name_mapper::canonical_name;
