use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ClientNonLocked(bool);

impl ClientNonLocked {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

impl Default for ClientNonLocked {
    fn default() -> Self {
        Self(true)
    }
}
