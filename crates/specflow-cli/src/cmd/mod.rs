pub mod analyze;
pub mod config;
pub mod detect;
pub mod parse;
pub mod score;
