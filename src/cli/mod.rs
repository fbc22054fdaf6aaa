//! Terminal front-end: one-off queries and config bootstrap

pub mod query;
pub mod setup;
pub mod ui;
