use kernel::prelude::entity::{Client, DestructClient};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClientDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub non_locked: bool,
    pub version: i64,
}

impl From<Client> for ClientDto {
    fn from(value: Client) -> Self {
        let DestructClient {
            id,
            name,
            email,
            non_locked,
            version,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            non_locked: non_locked.into(),
            version: version.into(),
        }
    }
}

pub struct GetClientDto {
    pub id: Uuid,
}

pub struct RegisterClientDto {
    pub name: String,
    pub email: String,
}
