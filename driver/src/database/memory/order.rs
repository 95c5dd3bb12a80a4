use error_stack::Report;
use time::Date;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{ClientEmail, ClientId, Order, OrderId, OrderStatus, Version};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;
use crate::error::stale;

pub struct MemoryOrderRepository;

impl MemoryOrderRepository {
    fn stored<'a>(
        con: &'a mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<&'a mut Order, KernelError> {
        con.staged
            .orders
            .iter_mut()
            .find(|stored| stored.id() == order.id() && stored.version() == order.version())
            .ok_or_else(|| stale("Order", order.id()))
    }
}

#[async_trait::async_trait]
impl OrderQuery for MemoryOrderRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con
            .staged
            .orders
            .iter()
            .find(|order| order.id() == id)
            .cloned())
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con.staged.orders.clone())
    }

    async fn find_by_client_id(
        &self,
        con: &mut MemoryTransaction,
        client_id: &ClientId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con
            .staged
            .orders
            .iter()
            .filter(|order| order.client_id() == client_id)
            .cloned()
            .collect())
    }

    async fn count_by_status_and_email_between(
        &self,
        con: &mut MemoryTransaction,
        status: &OrderStatus,
        email: &ClientEmail,
        start: &Date,
        end: &Date,
    ) -> error_stack::Result<i64, KernelError> {
        let Some(client_id) = con
            .staged
            .clients
            .iter()
            .find(|client| client.email() == email)
            .map(|client| client.id().clone())
        else {
            return Ok(0);
        };
        let count = con
            .staged
            .orders
            .iter()
            .filter(|order| order.client_id() == &client_id && order.status() == status)
            .filter_map(|order| order.returned_date().map(Date::from))
            .filter(|returned| start <= returned && returned <= end)
            .count();
        Ok(count as i64)
    }

    async fn find_latest_by_client_and_status(
        &self,
        con: &mut MemoryTransaction,
        client_id: &ClientId,
        status: &OrderStatus,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con
            .staged
            .orders
            .iter()
            .filter(|order| order.client_id() == client_id && order.status() == status)
            .max_by_key(|order| order.returned_date().map(Date::from))
            .cloned())
    }
}

#[async_trait::async_trait]
impl OrderModifier for MemoryOrderRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.orders.iter().any(|stored| stored.id() == order.id()) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Order {} already exists", order.id())));
        }
        con.staged.orders.push(order.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        let next = order.version().next();
        Self::stored(con, order)?.substitute(|stored| {
            *stored.status = *order.status();
            *stored.accepted_date = *order.accepted_date();
            *stored.returned_date = *order.returned_date();
            *stored.version = next.clone();
        });
        Ok(next)
    }

    async fn update_books(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        let next = order.version().next();
        Self::stored(con, order)?.substitute(|stored| {
            *stored.books = order.books().clone();
            *stored.version = next.clone();
        });
        Ok(next)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::{ClientModifier, OrderModifier};
    use kernel::prelude::entity::{
        AcceptedDate, Client, ClientEmail, ClientId, ClientName, ClientNonLocked, Order,
        OrderId, OrderName, OrderStatus, ReturnedDate, Version,
    };
    use kernel::KernelError;
    use time::macros::date;
    use time::Date;

    use crate::database::{MemoryClientRepository, MemoryDatabase, MemoryOrderRepository};

    fn overdue(client_id: &ClientId, returned: Date) -> Order {
        Order::new(
            OrderId::new(uuid::Uuid::new_v4()),
            OrderName::new("late"),
            OrderStatus::Overdue,
            Some(AcceptedDate::new(date!(2024 - 01 - 01))),
            Some(ReturnedDate::new(returned)),
            Vec::new(),
            client_id.clone(),
            Version::initial(),
        )
    }

    #[tokio::test]
    async fn counts_overdue_orders_in_window() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let email = ClientEmail::new("ada@example.com");
        let client = Client::new(
            ClientId::new(uuid::Uuid::new_v4()),
            ClientName::new("Ada"),
            email.clone(),
            ClientNonLocked::default(),
            Version::initial(),
        );
        MemoryClientRepository.create(&mut con, &client).await?;

        for returned in [
            date!(2024 - 02 - 01),
            date!(2024 - 02 - 20),
            date!(2024 - 03 - 02),
            date!(2024 - 04 - 15),
        ] {
            MemoryOrderRepository
                .create(&mut con, &overdue(client.id(), returned))
                .await?;
        }

        let count = MemoryOrderRepository
            .count_by_status_and_email_between(
                &mut con,
                &OrderStatus::Overdue,
                &email,
                &date!(2024 - 02 - 01),
                &date!(2024 - 03 - 02),
            )
            .await?;
        assert_eq!(count, 3);

        let unknown = MemoryOrderRepository
            .count_by_status_and_email_between(
                &mut con,
                &OrderStatus::Overdue,
                &ClientEmail::new("nobody@example.com"),
                &date!(2024 - 01 - 01),
                &date!(2024 - 12 - 31),
            )
            .await?;
        assert_eq!(unknown, 0);

        let latest = MemoryOrderRepository
            .find_latest_by_client_and_status(&mut con, client.id(), &OrderStatus::Overdue)
            .await?;
        assert_eq!(
            latest.and_then(|order| *order.returned_date()),
            Some(ReturnedDate::new(date!(2024 - 04 - 15)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn stale_order_write_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let order = Order::create(
            OrderId::new(uuid::Uuid::new_v4()),
            OrderName::new("weekend"),
            ClientId::new(uuid::Uuid::new_v4()),
        );
        MemoryOrderRepository.create(&mut con, &order).await?;

        let version = MemoryOrderRepository.update_books(&mut con, &order).await?;
        assert_eq!(version, Version::new(1));

        let stale = MemoryOrderRepository.update_status(&mut con, &order).await;
        assert_eq!(
            stale.map_err(|e| *e.current_context()),
            Err(KernelError::Concurrency)
        );

        let all = MemoryOrderRepository.find_all(&mut con).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].version(), &Version::new(1));
        Ok(())
    }
}
