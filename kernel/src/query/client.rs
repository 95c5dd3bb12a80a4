use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Client, ClientEmail, ClientId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ClientQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ClientId,
    ) -> error_stack::Result<Option<Client>, KernelError>;

    async fn find_by_email(
        &self,
        con: &mut Self::Transaction,
        email: &ClientEmail,
    ) -> error_stack::Result<Option<Client>, KernelError>;

    async fn exists(
        &self,
        con: &mut Self::Transaction,
        id: &ClientId,
    ) -> error_stack::Result<bool, KernelError>;

    async fn find_locked(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Client>, KernelError>;
}

pub trait DependOnClientQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ClientQuery: ClientQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn client_query(&self) -> &Self::ClientQuery;
}
