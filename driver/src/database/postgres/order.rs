use error_stack::Report;
use sqlx::PgConnection;
use time::Date;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    AcceptedDate, BookId, ClientEmail, ClientId, Order, OrderId, OrderName, OrderStatus,
    ReturnedDate, Version,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{stale, ConvertError};

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_all(con).await
    }

    async fn find_by_client_id(
        &self,
        con: &mut PostgresTransaction,
        client_id: &ClientId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_by_client_id(con, client_id).await
    }

    async fn count_by_status_and_email_between(
        &self,
        con: &mut PostgresTransaction,
        status: &OrderStatus,
        email: &ClientEmail,
        start: &Date,
        end: &Date,
    ) -> error_stack::Result<i64, KernelError> {
        PgOrderInternal::count_by_status_and_email_between(con, status, email, start, end).await
    }

    async fn find_latest_by_client_and_status(
        &self,
        con: &mut PostgresTransaction,
        client_id: &ClientId,
        status: &OrderStatus,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_latest_by_client_and_status(con, client_id, status).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        PgOrderInternal::update_status(con, order).await
    }

    async fn update_books(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        PgOrderInternal::update_books(con, order).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    name: String,
    status: String,
    accepted_date: Option<Date>,
    returned_date: Option<Date>,
    client_id: Uuid,
    version: i64,
    books: Vec<Uuid>,
}

impl TryFrom<OrderRow> for Order {
    type Error = Report<KernelError>;

    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order::new(
            OrderId::new(value.id),
            OrderName::new(value.name),
            value.status.parse::<OrderStatus>()?,
            value.accepted_date.map(AcceptedDate::new),
            value.returned_date.map(ReturnedDate::new),
            value.books.into_iter().map(BookId::new).collect(),
            ClientId::new(value.client_id),
            Version::new(value.version),
        ))
    }
}

fn into_orders(rows: Vec<OrderRow>) -> error_stack::Result<Vec<Order>, KernelError> {
    rows.into_iter().map(Order::try_from).collect()
}

// language=postgresql
const SELECT_ORDERS: &str = r#"
    SELECT o.id, o.name, o.status, o.accepted_date, o.returned_date, o.client_id, o.version,
           COALESCE(
               ARRAY_AGG(ob.book_id ORDER BY ob.position) FILTER (WHERE ob.book_id IS NOT NULL),
               '{}'
           ) AS books
    FROM orders o
    LEFT JOIN order_books ob ON ob.order_id = o.id
"#;

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDERS} WHERE o.id = $1 GROUP BY o.id"
        ))
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Order::try_from).transpose()
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDERS} GROUP BY o.id ORDER BY o.created_at, o.id"
        ))
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn find_by_client_id(
        con: &mut PgConnection,
        client_id: &ClientId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDERS} WHERE o.client_id = $1 GROUP BY o.id ORDER BY o.created_at, o.id"
        ))
        .bind(client_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn count_by_status_and_email_between(
        con: &mut PgConnection,
        status: &OrderStatus,
        email: &ClientEmail,
        start: &Date,
        end: &Date,
    ) -> error_stack::Result<i64, KernelError> {
        // language=postgresql
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM orders o
            JOIN clients c ON c.id = o.client_id
            WHERE o.status = $1
              AND c.email = $2
              AND o.returned_date BETWEEN $3 AND $4
            "#,
        )
        .bind(status.as_str())
        .bind(email.as_ref())
        .bind(start)
        .bind(end)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(count)
    }

    async fn find_latest_by_client_and_status(
        con: &mut PgConnection,
        client_id: &ClientId,
        status: &OrderStatus,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDERS} WHERE o.client_id = $1 AND o.status = $2 \
             GROUP BY o.id ORDER BY o.returned_date DESC NULLS LAST LIMIT 1"
        ))
        .bind(client_id.as_ref())
        .bind(status.as_str())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Order::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO orders (id, name, status, accepted_date, returned_date, client_id, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.name().as_ref())
        .bind(order.status().as_str())
        .bind(order.accepted_date().map(Date::from))
        .bind(order.returned_date().map(Date::from))
        .bind(order.client_id().as_ref())
        .bind(order.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        Self::insert_books(con, order).await
    }

    async fn update_status(
        con: &mut PgConnection,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $3, accepted_date = $4, returned_date = $5, version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.version().as_ref())
        .bind(order.status().as_str())
        .bind(order.accepted_date().map(Date::from))
        .bind(order.returned_date().map(Date::from))
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(stale("Order", order.id()));
        }
        Ok(order.version().next())
    }

    async fn update_books(
        con: &mut PgConnection,
        order: &Order,
    ) -> error_stack::Result<Version<Order>, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(stale("Order", order.id()));
        }

        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM order_books
            WHERE order_id = $1
            "#,
        )
        .bind(order.id().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        Self::insert_books(con, order).await?;
        Ok(order.version().next())
    }

    async fn insert_books(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        for (position, book_id) in order.books().iter().enumerate() {
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO order_books (order_id, book_id, position)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(order.id().as_ref())
            .bind(book_id.as_ref())
            .bind(position as i32)
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(())
    }
}
