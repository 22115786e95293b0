//! triagectl library - exposes modules for the binary and integration tests

pub mod analyze;
pub mod app;
pub mod attachment;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod errors;
pub mod logging;
pub mod prefs;
pub mod tui;
