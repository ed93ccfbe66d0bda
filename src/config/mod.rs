//! Configuration for secretctl

pub mod settings;

pub use settings::Settings;
