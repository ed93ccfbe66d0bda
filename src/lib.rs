//! secretctl - manage named container secrets
//!
//! Secrets are metadata records (name, driver, scope, labels, options) kept
//! by a registry. This crate lists them with filters, renders them as JSON
//! or through column templates, and creates, inspects and removes them.

pub mod commands;
pub mod config;
pub mod output;
pub mod secrets;
pub mod utils;
