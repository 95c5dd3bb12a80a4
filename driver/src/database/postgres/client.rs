use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::ClientQuery;
use kernel::interface::update::ClientModifier;
use kernel::prelude::entity::{
    Client, ClientEmail, ClientId, ClientName, ClientNonLocked, Version,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{stale, ConvertError};

pub struct PostgresClientRepository;

#[async_trait::async_trait]
impl ClientQuery for PostgresClientRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ClientId,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        PgClientInternal::find_by_id(con, id).await
    }

    async fn find_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &ClientEmail,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        PgClientInternal::find_by_email(con, email).await
    }

    async fn exists(
        &self,
        con: &mut PostgresTransaction,
        id: &ClientId,
    ) -> error_stack::Result<bool, KernelError> {
        PgClientInternal::exists(con, id).await
    }

    async fn find_locked(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Client>, KernelError> {
        PgClientInternal::find_locked(con).await
    }
}

#[async_trait::async_trait]
impl ClientModifier for PostgresClientRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        client: &Client,
    ) -> error_stack::Result<(), KernelError> {
        PgClientInternal::create(con, client).await
    }

    async fn update_lock(
        &self,
        con: &mut PostgresTransaction,
        client: &Client,
    ) -> error_stack::Result<Version<Client>, KernelError> {
        PgClientInternal::update_lock(con, client).await
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: String,
    non_locked: bool,
    version: i64,
}

impl From<ClientRow> for Client {
    fn from(value: ClientRow) -> Self {
        Client::new(
            ClientId::new(value.id),
            ClientName::new(value.name),
            ClientEmail::new(value.email),
            ClientNonLocked::new(value.non_locked),
            Version::new(value.version),
        )
    }
}

pub(in crate::database) struct PgClientInternal;

impl PgClientInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ClientId,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        let row = sqlx::query_as::<_, ClientRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, non_locked, version
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Client::from))
    }

    async fn find_by_email(
        con: &mut PgConnection,
        email: &ClientEmail,
    ) -> error_stack::Result<Option<Client>, KernelError> {
        let row = sqlx::query_as::<_, ClientRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, non_locked, version
            FROM clients
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Client::from))
    }

    async fn exists(con: &mut PgConnection, id: &ClientId) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)
            "#,
        )
        .bind(id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(exists)
    }

    async fn find_locked(con: &mut PgConnection) -> error_stack::Result<Vec<Client>, KernelError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, non_locked, version
            FROM clients
            WHERE NOT non_locked
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    async fn create(con: &mut PgConnection, client: &Client) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, non_locked, version)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(client.id().as_ref())
        .bind(client.name().as_ref())
        .bind(client.email().as_ref())
        .bind(client.non_locked().as_ref())
        .bind(client.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_lock(
        con: &mut PgConnection,
        client: &Client,
    ) -> error_stack::Result<Version<Client>, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET non_locked = $3, version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(client.id().as_ref())
        .bind(client.version().as_ref())
        .bind(client.non_locked().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(stale("Client", client.id()));
        }
        Ok(client.version().next())
    }
}
