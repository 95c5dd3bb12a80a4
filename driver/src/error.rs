use std::fmt::Display;

use error_stack::Report;
use kernel::KernelError;

pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

/// A version-checked write that matched no row.
pub(crate) fn stale(entity: &str, id: impl Display) -> Report<KernelError> {
    Report::new(KernelError::Concurrency)
        .attach_printable(format!("{entity} {id} was modified by another transaction"))
}
