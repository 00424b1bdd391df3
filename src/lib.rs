// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod diff;
pub mod file;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod progress;
pub mod report;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;
