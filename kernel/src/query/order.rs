use time::Date;

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ClientEmail, ClientId, Order, OrderId, OrderStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Order>, KernelError>;

    async fn find_by_client_id(
        &self,
        con: &mut Self::Transaction,
        client_id: &ClientId,
    ) -> error_stack::Result<Vec<Order>, KernelError>;

    /// Counts the orders of the client identified by `email` that are in `status`
    /// and whose returned date lies in `[start, end]`.
    async fn count_by_status_and_email_between(
        &self,
        con: &mut Self::Transaction,
        status: &OrderStatus,
        email: &ClientEmail,
        start: &Date,
        end: &Date,
    ) -> error_stack::Result<i64, KernelError>;

    /// The client's order in `status` with the latest returned date.
    async fn find_latest_by_client_and_status(
        &self,
        con: &mut Self::Transaction,
        client_id: &ClientId,
        status: &OrderStatus,
    ) -> error_stack::Result<Option<Order>, KernelError>;
}

pub trait DependOnOrderQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderQuery: OrderQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_query(&self) -> &Self::OrderQuery;
}
