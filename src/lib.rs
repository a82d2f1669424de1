//! Scheduled monitoring jobs for data-center sector stocks: a news monitor,
//! a daily indicator report and a monthly stock selection.

pub mod config;
pub mod errors;
pub mod external;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
