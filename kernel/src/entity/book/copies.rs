use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Physical copies of a book currently on the shelf.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CopiesNumber(i32);

impl CopiesNumber {
    pub fn new(copies: impl Into<i32>) -> Self {
        Self(copies.into())
    }

    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0
    }

    // Saturates at zero.
    pub(crate) fn decremented(self) -> Self {
        Self((self.0 - 1).max(0))
    }

    pub(crate) fn incremented(self) -> Self {
        Self(self.0 + 1)
    }
}
