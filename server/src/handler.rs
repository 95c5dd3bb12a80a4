use std::sync::Arc;

use driver::clock::SystemClock;
use driver::config::AppConfig;
use driver::database::{
    PostgresBookRepository, PostgresClientRepository, PostgresDatabase,
    PostgresOrderRepository,
};
use kernel::interface::clock::DependOnClock;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnBookQuery, DependOnClientQuery, DependOnOrderQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnClientModifier, DependOnOrderModifier,
};
use kernel::prelude::policy::{DependOnLendingPolicy, LendingPolicy};
use kernel::KernelError;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }

    pub fn handler(&self) -> &Handler {
        &self.0
    }
}

pub struct Handler {
    database: PostgresDatabase,
    clock: SystemClock,
    policy: LendingPolicy,
}

impl Handler {
    pub async fn init(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        database.migrate().await?;

        Ok(Self {
            database,
            clock: SystemClock,
            policy: config.lending_policy.clone(),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnBookQuery for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnClientQuery for Handler {
    type ClientQuery = PostgresClientRepository;
    fn client_query(&self) -> &Self::ClientQuery {
        &PostgresClientRepository
    }
}

impl DependOnClientModifier for Handler {
    type ClientModifier = PostgresClientRepository;
    fn client_modifier(&self) -> &Self::ClientModifier {
        &PostgresClientRepository
    }
}

impl DependOnOrderQuery for Handler {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for Handler {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnClock for Handler {
    type Clock = SystemClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnLendingPolicy for Handler {
    fn lending_policy(&self) -> &LendingPolicy {
        &self.policy
    }
}
