use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Order, Version};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError>;

    /// Writes status, accepted date and returned date.
    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError>;

    /// Replaces the stored book list with `order.books()`.
    async fn update_books(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError>;
}

pub trait DependOnOrderModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderModifier: OrderModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_modifier(&self) -> &Self::OrderModifier;
}
