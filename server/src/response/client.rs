use application::transfer::ClientDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    id: Uuid,
    name: String,
    email: String,
    is_non_locked: bool,
    version: i64,
}

impl IntoResponse for ClientResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct ClientPresenter;

impl Exhaust<ClientDto> for ClientPresenter {
    type To = ClientResponse;
    fn emit(&self, input: ClientDto) -> Self::To {
        ClientResponse {
            id: input.id,
            name: input.name,
            email: input.email,
            is_non_locked: input.non_locked,
            version: input.version,
        }
    }
}
