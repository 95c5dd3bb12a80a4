mod book;
mod client;
mod order;

pub use self::{book::*, client::*, order::*};

use kernel::interface::query::{BookQuery, ClientQuery, OrderQuery};
use kernel::prelude::entity::{Book, BookId, Client, ClientId, Order, OrderId};
use kernel::{KernelError, Resource};

pub(crate) async fn find_order<Q: OrderQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    id: &OrderId,
) -> error_stack::Result<Order, KernelError> {
    query.find_by_id(con, id).await?.ok_or_else(|| {
        Resource::Order
            .into_report()
            .attach_printable(format!("Order {id}"))
    })
}

pub(crate) async fn find_book<Q: BookQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    id: &BookId,
) -> error_stack::Result<Book, KernelError> {
    query.find_by_id(con, id).await?.ok_or_else(|| {
        Resource::Book
            .into_report()
            .attach_printable(format!("Book {id}"))
    })
}

pub(crate) async fn find_client<Q: ClientQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    id: &ClientId,
) -> error_stack::Result<Client, KernelError> {
    query.find_by_id(con, id).await?.ok_or_else(|| {
        Resource::Client
            .into_report()
            .attach_printable(format!("Client {id}"))
    })
}
