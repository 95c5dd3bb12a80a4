use kernel::prelude::entity::{DestructOrder, Order, OrderStatus};
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct OrderDto {
    pub id: Uuid,
    pub name: String,
    pub status: OrderStatus,
    pub accepted_date: Option<Date>,
    pub returned_date: Option<Date>,
    pub books: Vec<Uuid>,
    pub client_id: Uuid,
    pub version: i64,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            name,
            status,
            accepted_date,
            returned_date,
            books,
            client_id,
            version,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            status,
            accepted_date: accepted_date.map(Into::into),
            returned_date: returned_date.map(Into::into),
            books: books.into_iter().map(Into::into).collect(),
            client_id: client_id.into(),
            version: version.into(),
        }
    }
}

pub struct GetOrderDto {
    pub id: Uuid,
}

pub struct GetClientOrdersDto {
    pub client_id: Uuid,
}

/// `caller` is the email of the authenticated client.
pub struct CreateOrderDto {
    pub name: String,
    pub caller: String,
}

pub struct OrderBookDto {
    pub order_id: Uuid,
    pub book_id: Uuid,
}

pub struct ReserveOrderDto {
    pub id: Uuid,
    pub caller: String,
}

pub struct AcceptOrderDto {
    pub id: Uuid,
}

pub struct RejectOrderDto {
    pub id: Uuid,
}

pub struct ReturnOrderDto {
    pub id: Uuid,
    pub caller: String,
}
