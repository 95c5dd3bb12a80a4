use application::transfer::OrderDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kernel::prelude::entity::OrderStatus;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    id: Uuid,
    name: String,
    status: OrderStatus,
    accepted_date: Option<Date>,
    returned_date: Option<Date>,
    books: Vec<Uuid>,
    client_id: Uuid,
    version: i64,
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status,
            accepted_date: value.accepted_date,
            returned_date: value.returned_date,
            books: value.books,
            client_id: value.client_id,
            version: value.version,
        }
    }
}

impl IntoResponse for OrderResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct OrderPresenter;

impl Exhaust<OrderDto> for OrderPresenter {
    type To = OrderResponse;
    fn emit(&self, input: OrderDto) -> Self::To {
        OrderResponse::from(input)
    }
}

impl Exhaust<Vec<OrderDto>> for OrderPresenter {
    type To = Json<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<OrderDto>) -> Self::To {
        Json(input.into_iter().map(OrderResponse::from).collect())
    }
}
