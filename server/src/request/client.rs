use application::transfer::{GetClientDto, RegisterClientDto};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct RegisterClientRequest {
    name: String,
    email: String,
}

#[derive(Debug)]
pub struct GetClientRequest {
    id: Uuid,
}

impl GetClientRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct ClientTransformer;

impl Intake<RegisterClientRequest> for ClientTransformer {
    type To = RegisterClientDto;
    fn emit(&self, input: RegisterClientRequest) -> Self::To {
        RegisterClientDto {
            name: input.name,
            email: input.email,
        }
    }
}

impl Intake<GetClientRequest> for ClientTransformer {
    type To = GetClientDto;
    fn emit(&self, input: GetClientRequest) -> Self::To {
        GetClientDto { id: input.id }
    }
}
