//! Terminal front end for the enrichment client.
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
