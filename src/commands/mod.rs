//! Command implementations for secretctl

pub mod create;
pub mod inspect;
pub mod ls;
pub mod rm;

pub use create::{CreateOptions, secret_create};
pub use inspect::{InspectOptions, secret_inspect};
pub use ls::{LsOptions, secret_ls};
pub use rm::{RmOptions, secret_rm};

use crate::secrets::Selection;
use crate::utils::errors::SecretError;

/// Names XOR `--all`; anything else is `invalid`
fn selection(names: Vec<String>, all: bool, invalid: SecretError) -> Result<Selection, SecretError> {
    match (all, names.is_empty()) {
        (true, true) => Ok(Selection::All),
        (false, false) => Ok(Selection::Names(names)),
        _ => Err(invalid),
    }
}
