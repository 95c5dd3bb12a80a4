use application::transfer::{
    AcceptOrderDto, CreateOrderDto, GetClientOrdersDto, GetOrderDto, OrderBookDto,
    RejectOrderDto, ReserveOrderDto, ReturnOrderDto,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;
use crate::request::ClientEmailHeader;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    name: String,
}

#[derive(Debug)]
pub struct GetOrderRequest {
    id: Uuid,
}

impl GetOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetClientOrdersRequest {
    client_id: Uuid,
}

impl GetClientOrdersRequest {
    pub fn new(client_id: Uuid) -> Self {
        Self { client_id }
    }
}

#[derive(Debug)]
pub struct OrderBookRequest {
    order_id: Uuid,
    book_id: Uuid,
}

impl OrderBookRequest {
    pub fn new(order_id: Uuid, book_id: Uuid) -> Self {
        Self { order_id, book_id }
    }
}

#[derive(Debug)]
pub struct ReserveOrderRequest {
    id: Uuid,
    caller: ClientEmailHeader,
}

impl ReserveOrderRequest {
    pub fn new(id: Uuid, caller: ClientEmailHeader) -> Self {
        Self { id, caller }
    }
}

#[derive(Debug)]
pub struct ReturnOrderRequest {
    id: Uuid,
    caller: ClientEmailHeader,
}

impl ReturnOrderRequest {
    pub fn new(id: Uuid, caller: ClientEmailHeader) -> Self {
        Self { id, caller }
    }
}

#[derive(Debug)]
pub struct AcceptOrderRequest {
    id: Uuid,
}

impl AcceptOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct RejectOrderRequest {
    id: Uuid,
}

impl RejectOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct OrderTransformer;

impl Intake<(ClientEmailHeader, CreateOrderRequest)> for OrderTransformer {
    type To = CreateOrderDto;
    fn emit(&self, input: (ClientEmailHeader, CreateOrderRequest)) -> Self::To {
        let (caller, input) = input;
        CreateOrderDto {
            name: input.name,
            caller: caller.into_inner(),
        }
    }
}

impl Intake<GetOrderRequest> for OrderTransformer {
    type To = GetOrderDto;
    fn emit(&self, input: GetOrderRequest) -> Self::To {
        GetOrderDto { id: input.id }
    }
}

impl Intake<GetClientOrdersRequest> for OrderTransformer {
    type To = GetClientOrdersDto;
    fn emit(&self, input: GetClientOrdersRequest) -> Self::To {
        GetClientOrdersDto {
            client_id: input.client_id,
        }
    }
}

impl Intake<OrderBookRequest> for OrderTransformer {
    type To = OrderBookDto;
    fn emit(&self, input: OrderBookRequest) -> Self::To {
        OrderBookDto {
            order_id: input.order_id,
            book_id: input.book_id,
        }
    }
}

impl Intake<ReserveOrderRequest> for OrderTransformer {
    type To = ReserveOrderDto;
    fn emit(&self, input: ReserveOrderRequest) -> Self::To {
        ReserveOrderDto {
            id: input.id,
            caller: input.caller.into_inner(),
        }
    }
}

impl Intake<ReturnOrderRequest> for OrderTransformer {
    type To = ReturnOrderDto;
    fn emit(&self, input: ReturnOrderRequest) -> Self::To {
        ReturnOrderDto {
            id: input.id,
            caller: input.caller.into_inner(),
        }
    }
}

impl Intake<AcceptOrderRequest> for OrderTransformer {
    type To = AcceptOrderDto;
    fn emit(&self, input: AcceptOrderRequest) -> Self::To {
        AcceptOrderDto { id: input.id }
    }
}

impl Intake<RejectOrderRequest> for OrderTransformer {
    type To = RejectOrderDto;
    fn emit(&self, input: RejectOrderRequest) -> Self::To {
        RejectOrderDto { id: input.id }
    }
}
