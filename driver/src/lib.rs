use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub mod clock;
pub mod config;
pub mod database;
pub(crate) mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .map_err(Report::from)
        .change_context(KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to read environment variable {key}"))
}
