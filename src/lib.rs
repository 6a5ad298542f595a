pub mod aggregate;
pub mod cli;
pub mod config;
pub mod faceit;
pub mod link;
pub mod models;
pub mod pipeline;
pub mod settings;
pub mod ui;
