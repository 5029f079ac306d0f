//! Planka Import Library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod position;
pub mod resolver;
pub mod store;
pub mod template;
