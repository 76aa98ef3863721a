//! Library crate for testssl-web exposing reusable modules.
pub mod command;
pub mod config;
pub mod mux;
pub mod process;
pub mod server;
pub mod types;
