use time::Date;
use uuid::Uuid;

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{ClientQuery, DependOnClientQuery, DependOnOrderQuery, OrderQuery};
use kernel::interface::update::{ClientModifier, DependOnClientModifier};
use kernel::prelude::entity::{
    Client, ClientEmail, ClientId, ClientName, ClientNonLocked, OrderStatus, Version,
};
use kernel::prelude::policy::DependOnLendingPolicy;
use kernel::{KernelError, Violation};

use crate::service::find_client;
use crate::transfer::{ClientDto, GetClientDto, RegisterClientDto};

#[async_trait::async_trait]
pub trait GetClientService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnClientQuery
{
    async fn get_client(&self, dto: GetClientDto) -> error_stack::Result<ClientDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = ClientId::new(dto.id);
        let client = find_client(self.client_query(), &mut connection, &id).await?;

        Ok(ClientDto::from(client))
    }
}

impl<T> GetClientService for T where T: DependOnDatabaseConnection + DependOnClientQuery {}

#[async_trait::async_trait]
pub trait RegisterClientService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnClientQuery + DependOnClientModifier
{
    async fn register_client(
        &self,
        dto: RegisterClientDto,
    ) -> error_stack::Result<ClientDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let email = ClientEmail::new(dto.email);
        let registered = self
            .client_query()
            .find_by_email(&mut connection, &email)
            .await?;
        if registered.is_some() {
            return Err(Violation::EmailAlreadyRegistered.into_report());
        }

        let client = Client::new(
            ClientId::new(Uuid::new_v4()),
            ClientName::new(dto.name),
            email,
            ClientNonLocked::default(),
            Version::initial(),
        );
        self.client_modifier()
            .create(&mut connection, &client)
            .await?;
        connection.commit().await?;

        tracing::info!(client_id = %client.id(), "Client registered");
        Ok(ClientDto::from(client))
    }
}

impl<T> RegisterClientService for T where
    T: DependOnDatabaseConnection + DependOnClientQuery + DependOnClientModifier
{
}

/// Daily batch that lifts the overdue lock once the cooldown has passed.
#[async_trait::async_trait]
pub trait UnlockClientService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnClientQuery
    + DependOnClientModifier
    + DependOnOrderQuery
    + DependOnClock
    + DependOnLendingPolicy
{
    /// Returns the ids of the clients that were unlocked. A client that fails
    /// is logged and skipped, the rest of the batch still runs.
    async fn unlock_clients(&self) -> error_stack::Result<Vec<Uuid>, KernelError> {
        let locked = {
            let mut connection = self.database_connection().transact().await?;
            self.client_query().find_locked(&mut connection).await?
        };

        let today = self.clock().today();
        let mut unlocked = Vec::new();
        for client in locked {
            let id = client.id().clone();
            match self.reevaluate_lock(&id, today).await {
                Ok(true) => {
                    tracing::info!(client_id = %id, "Client unlocked");
                    unlocked.push(id.into());
                }
                Ok(false) => {}
                Err(report) => {
                    tracing::error!(client_id = %id, error = ?report, "Failed to re-evaluate client lock");
                }
            }
        }
        Ok(unlocked)
    }

    /// Unlocks the client if its latest overdue return is older than the cooldown.
    async fn reevaluate_lock(
        &self,
        id: &ClientId,
        today: Date,
    ) -> error_stack::Result<bool, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let mut client = find_client(self.client_query(), &mut connection, id).await?;
        if !client.is_locked() {
            return Ok(false);
        }

        let latest = self
            .order_query()
            .find_latest_by_client_and_status(&mut connection, client.id(), &OrderStatus::Overdue)
            .await?;
        let Some(returned) = latest.as_ref().and_then(|order| *order.returned_date()) else {
            return Ok(false);
        };
        if !self.lending_policy().may_unlock(&returned, today) {
            return Ok(false);
        }

        client.unlock();
        self.client_modifier()
            .update_lock(&mut connection, &client)
            .await?;
        connection.commit().await?;
        Ok(true)
    }
}

impl<T> UnlockClientService for T where
    T: DependOnDatabaseConnection
        + DependOnClientQuery
        + DependOnClientModifier
        + DependOnOrderQuery
        + DependOnClock
        + DependOnLendingPolicy
{
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::{Resource, Violation};

    use crate::service::test::{assert_not_found, assert_violation, TestModule};
    use crate::service::{GetClientService, RegisterClientService, UnlockClientService};
    use crate::transfer::{GetClientDto, RegisterClientDto};

    #[tokio::test]
    async fn registers_once_per_email() {
        let module = TestModule::new();
        let ada = module.client("ada@example.com").await;
        assert!(ada.non_locked);
        assert_eq!(ada.version, 0);

        let found = module.get_client(GetClientDto { id: ada.id }).await.unwrap();
        assert_eq!(found.email, "ada@example.com");

        let again = module
            .register_client(RegisterClientDto {
                name: "Ada again".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await;
        assert_violation(again, Violation::EmailAlreadyRegistered);

        let missing = module.get_client(GetClientDto { id: Uuid::new_v4() }).await;
        assert_not_found(missing, Resource::Client);
    }

    #[tokio::test]
    async fn failing_client_does_not_stop_the_batch() {
        let module = TestModule::new();
        let ada = module.client("ada@example.com").await;
        let bob = module.client("bob@example.com").await;
        module.overdue_returns("bob@example.com", 5).await;
        module.overdue_returns("ada@example.com", 5).await;
        module.advance(21);

        module.break_lock_updates(Some(ada.id));
        assert_eq!(module.unlock_clients().await.unwrap(), vec![bob.id]);

        let bob = module.get_client(GetClientDto { id: bob.id }).await.unwrap();
        assert!(bob.non_locked);
        let still_locked = module.get_client(GetClientDto { id: ada.id }).await.unwrap();
        assert!(!still_locked.non_locked);

        module.break_lock_updates(None);
        assert_eq!(module.unlock_clients().await.unwrap(), vec![ada.id]);
    }

    #[tokio::test]
    async fn unlocks_after_cooldown() {
        let module = TestModule::new();
        let ada = module.client("ada@example.com").await;
        let bob = module.client("bob@example.com").await;
        module.overdue_returns("bob@example.com", 2).await;
        module.overdue_returns("ada@example.com", 5).await;

        let locked = module.get_client(GetClientDto { id: ada.id }).await.unwrap();
        assert!(!locked.non_locked);

        module.advance(20);
        assert!(module.unlock_clients().await.unwrap().is_empty());

        module.advance(1);
        assert_eq!(module.unlock_clients().await.unwrap(), vec![ada.id]);

        let ada = module.get_client(GetClientDto { id: ada.id }).await.unwrap();
        assert!(ada.non_locked);
        assert_eq!(ada.version, 2);
        let bob = module.get_client(GetClientDto { id: bob.id }).await.unwrap();
        assert!(bob.non_locked);
    }
}
