//! Terminal front end: reads commands, applies them to the workflow state
//! and executes the resulting effects.
mod app;
mod cli;
mod clipboard;
mod commands;
mod config;
mod effects;
mod intake;
mod logging;
mod render;

pub use app::run_app;
