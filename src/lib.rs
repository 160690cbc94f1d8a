pub mod activity;
pub mod audit;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod rollback;
pub mod ui;
pub mod version_file;

pub use error::{ChroniqError, Result};
