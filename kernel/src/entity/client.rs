mod email;
mod id;
mod name;
mod non_locked;

pub use self::{email::*, id::*, name::*, non_locked::*};
use crate::entity::common::Version;
use destructure::{Destructure, Mutation};
use serde::{Deserialize, Serialize};
use vodca::References;

/// A library patron. The email is the identity key the authenticator hands us.
#[derive(
    Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure, Mutation,
)]
pub struct Client {
    id: ClientId,
    name: ClientName,
    email: ClientEmail,
    non_locked: ClientNonLocked,
    version: Version<Client>,
}

impl Client {
    pub fn new(
        id: ClientId,
        name: ClientName,
        email: ClientEmail,
        non_locked: ClientNonLocked,
        version: Version<Client>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            non_locked,
            version,
        }
    }

    pub fn is_locked(&self) -> bool {
        !*self.non_locked.as_ref()
    }

    pub fn lock(&mut self) {
        self.non_locked = ClientNonLocked::new(false);
    }

    pub fn unlock(&mut self) {
        self.non_locked = ClientNonLocked::new(true);
    }

    pub fn is_identified_by(&self, caller: &ClientEmail) -> bool {
        self.email == *caller
    }
}
