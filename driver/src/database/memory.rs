use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Book, Client, Order};
use kernel::KernelError;

pub use self::{book::*, client::*, order::*};

mod book;
mod client;
mod order;

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct MemoryStore {
    books: Vec<Book>,
    clients: Vec<Client>,
    orders: Vec<Order>,
}

/// Process-local store with the same transactional contract as Postgres.
///
/// Transactions are serialized: [`DatabaseConnection::transact`] waits until the
/// previous transaction has been committed or dropped.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryTransaction { guard, staged })
    }
}

/// Writes go to a private copy that replaces the shared state on commit.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryStore>,
    staged: MemoryStore,
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
