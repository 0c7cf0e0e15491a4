pub mod ambiguity;
pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod parser;
pub mod paths;
pub mod prd;
pub mod score;
pub mod summary;
pub mod types;

pub use error::{Result, SpecflowError};
