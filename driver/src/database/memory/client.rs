use error_stack::Report;

use kernel::interface::query::ClientQuery;
use kernel::interface::update::ClientModifier;
use kernel::prelude::entity::{Client, ClientEmail, ClientId, Version};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;
use crate::error::stale;

pub struct MemoryClientRepository;

#[async_trait::async_trait]
impl ClientQuery for MemoryClientRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ClientId,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        Ok(con
            .staged
            .clients
            .iter()
            .find(|client| client.id() == id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        con: &mut MemoryTransaction,
        email: &ClientEmail,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        Ok(con
            .staged
            .clients
            .iter()
            .find(|client| client.email() == email)
            .cloned())
    }

    async fn exists(
        &self,
        con: &mut MemoryTransaction,
        id: &ClientId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con.staged.clients.iter().any(|client| client.id() == id))
    }

    async fn find_locked(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Client>, KernelError> {
        Ok(con
            .staged
            .clients
            .iter()
            .filter(|client| client.is_locked())
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ClientModifier for MemoryClientRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        client: &Client,
    ) -> error_stack::Result<(), KernelError> {
        let taken = con
            .staged
            .clients
            .iter()
            .any(|stored| stored.id() == client.id() || stored.email() == client.email());
        if taken {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Client {} already exists", client.email())));
        }
        con.staged.clients.push(client.clone());
        Ok(())
    }

    async fn update_lock(
        &self,
        con: &mut MemoryTransaction,
        client: &Client,
    ) -> error_stack::Result<Version<Client>, KernelError> {
        let stored = con
            .staged
            .clients
            .iter_mut()
            .find(|stored| stored.id() == client.id() && stored.version() == client.version())
            .ok_or_else(|| stale("Client", client.id()))?;
        let next = client.version().next();
        stored.substitute(|stored| {
            *stored.non_locked = *client.non_locked();
            *stored.version = next.clone();
        });
        Ok(next)
    }
}
