use uuid::Uuid;

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, ClientQuery, DependOnBookQuery, DependOnClientQuery, DependOnOrderQuery,
    OrderQuery,
};
use kernel::interface::update::{
    BookModifier, ClientModifier, DependOnBookModifier, DependOnClientModifier,
    DependOnOrderModifier, OrderModifier,
};
use kernel::prelude::entity::{
    BookId, ClientEmail, ClientId, Order, OrderId, OrderName, OrderStatus, Transition,
};
use kernel::prelude::policy::DependOnLendingPolicy;
use kernel::{KernelError, Resource, Violation};

use crate::service::{find_book, find_client, find_order};
use crate::transfer::{
    AcceptOrderDto, CreateOrderDto, GetClientOrdersDto, GetOrderDto, OrderBookDto, OrderDto,
    RejectOrderDto, ReserveOrderDto, ReturnOrderDto,
};

#[async_trait::async_trait]
pub trait GetOrderService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnOrderQuery + DependOnClientQuery
{
    async fn get_order(&self, dto: GetOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let order = find_order(self.order_query(), &mut connection, &id).await?;

        Ok(OrderDto::from(order))
    }

    async fn get_all_orders(&self) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let orders = self.order_query().find_all(&mut connection).await?;

        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn get_client_orders(
        &self,
        dto: GetClientOrdersDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let client_id = ClientId::new(dto.client_id);
        if !self
            .client_query()
            .exists(&mut connection, &client_id)
            .await?
        {
            return Err(Resource::Client
                .into_report()
                .attach_printable(format!("Client {client_id}")));
        }

        let orders = self
            .order_query()
            .find_by_client_id(&mut connection, &client_id)
            .await?;

        Ok(orders.into_iter().map(OrderDto::from).collect())
    }
}

impl<T> GetOrderService for T where
    T: DependOnDatabaseConnection + DependOnOrderQuery + DependOnClientQuery
{
}

#[async_trait::async_trait]
pub trait CreateOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnClientQuery
    + DependOnOrderModifier
{
    async fn create_order(&self, dto: CreateOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let caller = ClientEmail::new(dto.caller);
        let client = self
            .client_query()
            .find_by_email(&mut connection, &caller)
            .await?
            .ok_or_else(|| {
                Resource::Client
                    .into_report()
                    .attach_printable(format!("No client registered as {caller}"))
            })?;
        if client.is_locked() {
            return Err(Violation::AccountLocked.into_report());
        }

        let order = Order::create(
            OrderId::new(Uuid::new_v4()),
            OrderName::new(dto.name),
            client.id().clone(),
        );
        self.order_modifier()
            .create(&mut connection, &order)
            .await?;
        connection.commit().await?;

        tracing::info!(order_id = %order.id(), client_id = %client.id(), "Order created");
        Ok(OrderDto::from(order))
    }
}

impl<T> CreateOrderService for T where
    T: DependOnDatabaseConnection + DependOnClientQuery + DependOnOrderModifier
{
}

#[async_trait::async_trait]
pub trait EditOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnBookQuery
{
    async fn add_book_to_order(
        &self,
        dto: OrderBookDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let order_id = OrderId::new(dto.order_id);
        let mut order = find_order(self.order_query(), &mut connection, &order_id).await?;
        order.next_status(Transition::EditBooks)?;
        let book_id = BookId::new(dto.book_id);
        let book = find_book(self.book_query(), &mut connection, &book_id).await?;

        order.add_book(&book)?;
        let version = self
            .order_modifier()
            .update_books(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::debug!(%order_id, %book_id, "Book added to order");
        Ok(OrderDto::from(order))
    }

    async fn remove_book_from_order(
        &self,
        dto: OrderBookDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let order_id = OrderId::new(dto.order_id);
        let mut order = find_order(self.order_query(), &mut connection, &order_id).await?;
        order.next_status(Transition::EditBooks)?;
        let book_id = BookId::new(dto.book_id);
        let book = find_book(self.book_query(), &mut connection, &book_id).await?;

        order.remove_book(&book)?;
        let version = self
            .order_modifier()
            .update_books(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::debug!(%order_id, %book_id, "Book removed from order");
        Ok(OrderDto::from(order))
    }
}

impl<T> EditOrderService for T where
    T: DependOnDatabaseConnection + DependOnOrderQuery + DependOnOrderModifier + DependOnBookQuery
{
}

/// Client self-service: only the owner of the order may reserve it.
#[async_trait::async_trait]
pub trait ReserveOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnClientQuery
{
    async fn reserve_order(
        &self,
        dto: ReserveOrderDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let caller = ClientEmail::new(dto.caller);
        let mut order = find_order(self.order_query(), &mut connection, &id).await?;
        order.next_status(Transition::Reserve)?;
        let owner = find_client(self.client_query(), &mut connection, order.client_id()).await?;

        order.reserve(&owner, &caller)?;
        let version = self
            .order_modifier()
            .update_status(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::info!(order_id = %id, "Order reserved");
        Ok(OrderDto::from(order))
    }
}

impl<T> ReserveOrderService for T where
    T: DependOnDatabaseConnection + DependOnOrderQuery + DependOnOrderModifier + DependOnClientQuery
{
}

/// Staff action: any authorized caller may accept, ownership is not checked.
#[async_trait::async_trait]
pub trait AcceptOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnClock
{
    async fn accept_order(&self, dto: AcceptOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let mut order = find_order(self.order_query(), &mut connection, &id).await?;
        order.next_status(Transition::Accept)?;
        let mut books = self
            .book_query()
            .find_by_ids(&mut connection, order.books())
            .await?;

        order.accept(&mut books, self.clock().today())?;
        for book in &books {
            self.book_modifier()
                .update_copies(&mut connection, book)
                .await?;
        }
        let version = self
            .order_modifier()
            .update_status(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::info!(order_id = %id, books = books.len(), "Order accepted");
        Ok(OrderDto::from(order))
    }
}

impl<T> AcceptOrderService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOrderModifier
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnClock
{
}

/// Staff action, like [`AcceptOrderService`].
#[async_trait::async_trait]
pub trait RejectOrderService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnOrderQuery + DependOnOrderModifier
{
    async fn reject_order(&self, dto: RejectOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let mut order = find_order(self.order_query(), &mut connection, &id).await?;

        order.reject()?;
        let version = self
            .order_modifier()
            .update_status(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::info!(order_id = %id, "Order rejected");
        Ok(OrderDto::from(order))
    }
}

impl<T> RejectOrderService for T where
    T: DependOnDatabaseConnection + DependOnOrderQuery + DependOnOrderModifier
{
}

/// Client self-service. Puts the copies back on the shelf and applies the
/// overdue penalty, locking the owner after too many late returns.
#[async_trait::async_trait]
pub trait ReturnOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnClientQuery
    + DependOnClientModifier
    + DependOnClock
    + DependOnLendingPolicy
{
    async fn return_order(&self, dto: ReturnOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let caller = ClientEmail::new(dto.caller);
        let mut order = find_order(self.order_query(), &mut connection, &id).await?;
        order.next_status(Transition::Return { overdue: false })?;
        let mut owner = find_client(self.client_query(), &mut connection, order.client_id()).await?;
        let mut books = self
            .book_query()
            .find_by_ids(&mut connection, order.books())
            .await?;

        let policy = self.lending_policy();
        let status = order.give_back(
            &owner,
            &caller,
            &mut books,
            self.clock().today(),
            policy,
        )?;

        // Counted before this order is written, so only earlier overdue returns are seen.
        if let (OrderStatus::Overdue, Some(returned)) = (status, order.returned_date()) {
            let (start, end) = policy.lock_window(returned);
            let prior = self
                .order_query()
                .count_by_status_and_email_between(
                    &mut connection,
                    &OrderStatus::Overdue,
                    owner.email(),
                    &start,
                    &end,
                )
                .await?;
            if policy.should_lock(prior) && !owner.is_locked() {
                owner.lock();
                self.client_modifier()
                    .update_lock(&mut connection, &owner)
                    .await?;
                tracing::warn!(client_id = %owner.id(), prior, "Client locked for overdue returns");
            }
        }

        for book in &books {
            self.book_modifier()
                .update_copies(&mut connection, book)
                .await?;
        }
        let version = self
            .order_modifier()
            .update_status(&mut connection, &order)
            .await?;
        order.substitute(|order| *order.version = version);
        connection.commit().await?;

        tracing::info!(order_id = %id, %status, "Order returned");
        Ok(OrderDto::from(order))
    }
}

impl<T> ReturnOrderService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOrderModifier
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnClientQuery
        + DependOnClientModifier
        + DependOnClock
        + DependOnLendingPolicy
{
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::prelude::entity::{BookId, OrderStatus};
    use kernel::{KernelError, Resource, Violation};

    use crate::service::test::{assert_not_found, assert_violation, TestModule};
    use crate::service::{
        AcceptOrderService, CreateOrderService, EditOrderService, GetBookService,
        GetClientService, GetOrderService, RejectOrderService, ReserveOrderService,
        ReturnOrderService,
    };
    use crate::transfer::{
        AcceptOrderDto, CreateOrderDto, GetBookDto, GetClientDto, GetClientOrdersDto,
        GetOrderDto, OrderBookDto, OrderDto, RejectOrderDto, ReserveOrderDto, ReturnOrderDto,
    };

    const ADA: &str = "ada@example.com";
    const BOB: &str = "bob@example.com";

    async fn order_with(module: &TestModule, caller: &str, books: &[Uuid]) -> OrderDto {
        let mut order = module
            .create_order(CreateOrderDto {
                name: "reading list".to_string(),
                caller: caller.to_string(),
            })
            .await
            .unwrap();
        for book_id in books {
            order = module
                .add_book_to_order(OrderBookDto {
                    order_id: order.id,
                    book_id: *book_id,
                })
                .await
                .unwrap();
        }
        order
    }

    async fn accepted(module: &TestModule, caller: &str, books: &[Uuid]) -> OrderDto {
        let order = order_with(module, caller, books).await;
        module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: caller.to_string(),
            })
            .await
            .unwrap();
        module
            .accept_order(AcceptOrderDto { id: order.id })
            .await
            .unwrap()
    }

    async fn copies(module: &TestModule, id: Uuid) -> i32 {
        module.get_book(GetBookDto { id }).await.unwrap().copies
    }

    #[tokio::test]
    async fn create_order_requires_known_unlocked_caller() {
        let module = TestModule::new();
        let ada = module.client(ADA).await;

        let order = order_with(&module, ADA, &[]).await;
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.client_id, ada.id);
        assert!(order.books.is_empty());
        assert_eq!(order.version, 0);

        let unknown = module
            .create_order(CreateOrderDto {
                name: "ghost".to_string(),
                caller: "nobody@example.com".to_string(),
            })
            .await;
        assert_not_found(unknown, Resource::Client);
    }

    #[tokio::test]
    async fn books_are_edited_only_while_created() {
        let module = TestModule::new();
        module.client(ADA).await;
        let dune = module.book(1).await;
        let order = order_with(&module, ADA, &[dune.id]).await;
        assert_eq!(order.books, vec![dune.id]);

        let duplicate = module
            .add_book_to_order(OrderBookDto {
                order_id: order.id,
                book_id: dune.id,
            })
            .await;
        assert_violation(
            duplicate,
            Violation::BookAlreadyInOrder {
                book_id: BookId::new(dune.id),
            },
        );

        let missing = module
            .add_book_to_order(OrderBookDto {
                order_id: order.id,
                book_id: Uuid::new_v4(),
            })
            .await;
        assert_not_found(missing, Resource::Book);

        module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();
        let late = module
            .remove_book_from_order(OrderBookDto {
                order_id: order.id,
                book_id: dune.id,
            })
            .await;
        assert_violation(
            late,
            Violation::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: OrderStatus::Reserved,
            },
        );
    }

    #[tokio::test]
    async fn remove_book_checks_emptiness_then_membership() {
        let module = TestModule::new();
        module.client(ADA).await;
        let dune = module.book(1).await;
        let emma = module.book(1).await;

        let empty = order_with(&module, ADA, &[]).await;
        let result = module
            .remove_book_from_order(OrderBookDto {
                order_id: empty.id,
                book_id: dune.id,
            })
            .await;
        assert_violation(result, Violation::OrderIsEmpty);

        let order = order_with(&module, ADA, &[dune.id]).await;
        let result = module
            .remove_book_from_order(OrderBookDto {
                order_id: order.id,
                book_id: emma.id,
            })
            .await;
        assert_violation(
            result,
            Violation::BookNotInOrder {
                book_id: BookId::new(emma.id),
            },
        );

        let order = module
            .remove_book_from_order(OrderBookDto {
                order_id: order.id,
                book_id: dune.id,
            })
            .await
            .unwrap();
        assert!(order.books.is_empty());
    }

    #[tokio::test]
    async fn only_the_owner_reserves() {
        let module = TestModule::new();
        module.client(ADA).await;
        module.client(BOB).await;
        let order = order_with(&module, ADA, &[]).await;

        let stranger = module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: BOB.to_string(),
            })
            .await;
        assert_violation(stranger, Violation::OwnerMismatch);

        let reserved = module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reserved.status, OrderStatus::Reserved);

        let twice = module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await;
        assert_violation(
            twice,
            Violation::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: OrderStatus::Reserved,
            },
        );
    }

    #[tokio::test]
    async fn accept_is_all_or_nothing() {
        let module = TestModule::new();
        module.client(ADA).await;
        let gone = module.book(0).await;
        let plenty = module.book(2).await;
        let order = order_with(&module, ADA, &[gone.id, plenty.id]).await;
        module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();

        let result = module.accept_order(AcceptOrderDto { id: order.id }).await;
        assert_violation(
            result,
            Violation::InsufficientCopies {
                book_ids: vec![BookId::new(gone.id)],
            },
        );
        assert_eq!(copies(&module, plenty.id).await, 2);
        let order = module.get_order(GetOrderDto { id: order.id }).await.unwrap();
        assert_eq!(order.status, OrderStatus::Reserved);
        assert_eq!(order.accepted_date, None);
    }

    #[tokio::test]
    async fn accept_takes_one_copy_of_each_book() {
        let module = TestModule::new();
        module.client(ADA).await;
        let dune = module.book(2).await;
        let emma = module.book(1).await;

        let order = accepted(&module, ADA, &[dune.id, emma.id]).await;
        assert_eq!(order.status, OrderStatus::Accepted);
        assert!(order.accepted_date.is_some());
        assert_eq!(copies(&module, dune.id).await, 1);
        assert_eq!(copies(&module, emma.id).await, 0);

        let again = module.accept_order(AcceptOrderDto { id: order.id }).await;
        assert_violation(
            again,
            Violation::WrongOrderStatus {
                expected: OrderStatus::Reserved,
                actual: OrderStatus::Accepted,
            },
        );
    }

    #[tokio::test]
    async fn reject_only_from_reserved() {
        let module = TestModule::new();
        module.client(ADA).await;
        let order = order_with(&module, ADA, &[]).await;

        let early = module.reject_order(RejectOrderDto { id: order.id }).await;
        assert_violation(
            early,
            Violation::WrongOrderStatus {
                expected: OrderStatus::Reserved,
                actual: OrderStatus::Created,
            },
        );

        module
            .reserve_order(ReserveOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();
        let rejected = module
            .reject_order(RejectOrderDto { id: order.id })
            .await
            .unwrap();
        assert_eq!(rejected.status, OrderStatus::Rejected);

        let missing = module.reject_order(RejectOrderDto { id: Uuid::new_v4() }).await;
        assert_not_found(missing, Resource::Order);
    }

    #[tokio::test]
    async fn return_in_time_restores_copies() {
        let module = TestModule::new();
        module.client(ADA).await;
        module.client(BOB).await;
        let dune = module.book(1).await;
        let order = accepted(&module, ADA, &[dune.id]).await;
        module.advance(20);

        let stranger = module
            .return_order(ReturnOrderDto {
                id: order.id,
                caller: BOB.to_string(),
            })
            .await;
        assert_violation(stranger, Violation::OwnerMismatch);

        let returned = module
            .return_order(ReturnOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(returned.status, OrderStatus::Returned);
        assert!(returned.returned_date.is_some());
        assert_eq!(copies(&module, dune.id).await, 1);
    }

    #[tokio::test]
    async fn late_return_is_overdue() {
        let module = TestModule::new();
        module.client(ADA).await;
        let dune = module.book(1).await;
        let order = accepted(&module, ADA, &[dune.id]).await;
        module.advance(21);

        let returned = module
            .return_order(ReturnOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(returned.status, OrderStatus::Overdue);
        assert_eq!(copies(&module, dune.id).await, 1);

        let again = module
            .return_order(ReturnOrderDto {
                id: order.id,
                caller: ADA.to_string(),
            })
            .await;
        assert_violation(
            again,
            Violation::WrongOrderStatus {
                expected: OrderStatus::Accepted,
                actual: OrderStatus::Overdue,
            },
        );
    }

    #[tokio::test]
    async fn too_many_overdue_returns_lock_the_client() {
        let module = TestModule::new();
        let ada = module.client(ADA).await;
        let dune = module.book(5).await;

        let mut orders = Vec::new();
        for _ in 0..5 {
            orders.push(accepted(&module, ADA, &[dune.id]).await);
        }
        module.advance(21);

        for (returned, order) in orders.iter().enumerate() {
            module
                .return_order(ReturnOrderDto {
                    id: order.id,
                    caller: ADA.to_string(),
                })
                .await
                .unwrap();
            let client = module.get_client(GetClientDto { id: ada.id }).await.unwrap();
            // The fifth overdue return sees four earlier ones.
            assert_eq!(!client.non_locked, returned == 4);
        }

        let blocked = module
            .create_order(CreateOrderDto {
                name: "one more".to_string(),
                caller: ADA.to_string(),
            })
            .await;
        assert_violation(blocked, Violation::AccountLocked);
    }

    #[tokio::test]
    async fn lists_orders() {
        let module = TestModule::new();
        let ada = module.client(ADA).await;
        let bob = module.client(BOB).await;
        order_with(&module, ADA, &[]).await;
        order_with(&module, ADA, &[]).await;
        order_with(&module, BOB, &[]).await;

        let all = module.get_all_orders().await.unwrap();
        assert_eq!(all.len(), 3);

        let ada_orders = module
            .get_client_orders(GetClientOrdersDto { client_id: ada.id })
            .await
            .unwrap();
        assert_eq!(ada_orders.len(), 2);
        assert!(ada_orders.iter().all(|order| order.client_id == ada.id));

        let bob_orders = module
            .get_client_orders(GetClientOrdersDto { client_id: bob.id })
            .await
            .unwrap();
        assert_eq!(bob_orders.len(), 1);

        let nobody = module
            .get_client_orders(GetClientOrdersDto {
                client_id: Uuid::new_v4(),
            })
            .await;
        assert_not_found(nobody, Resource::Client);

        let missing = module.get_order(GetOrderDto { id: Uuid::new_v4() }).await;
        assert_eq!(
            missing.unwrap_err().current_context(),
            &KernelError::NotFound
        );
    }
}
