//! Secret model, filtering and the registry that stores secrets

pub mod filter;
pub mod registry;
pub mod secret;
pub mod store;

pub use filter::{FilterClause, SecretFilter};
pub use registry::{
    Connect, CreateRequest, RemoveReport, Runtime, SecretRegistry, Selection, get_runtime,
};
pub use secret::{DEFAULT_DRIVER, Secret};
pub use store::{FileConnector, FileRegistry};
