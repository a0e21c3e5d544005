//! Rythm'it discover client
//!
//! Tag-constrained thread search against the Rythm'it backend, with an iced
//! window and a small CLI on top.

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod search;
pub mod ui;
