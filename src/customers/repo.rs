use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Customer;
use super::validation::ValidCustomer;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Customer>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Customer>>;
    async fn insert(&self, customer: &ValidCustomer) -> anyhow::Result<Uuid>;
    /// Overwrites every mutable column; returns the affected row count.
    async fn update(&self, id: Uuid, customer: &ValidCustomer) -> anyhow::Result<u64>;
    /// Returns the affected row count, zero for an unknown id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgCustomerStore {
    db: PgPool,
}

impl PgCustomerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> anyhow::Result<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, image_url, created_at
              FROM customers
             ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list customers")?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, image_url, created_at
              FROM customers
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find customer")?;
        Ok(row)
    }

    async fn insert(&self, customer: &ValidCustomer) -> anyhow::Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO customers (name, email, image_url)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.image_url.as_deref()) // Option → NULL allowed
        .fetch_one(&self.db)
        .await
        .context("insert customer")?;
        Ok(id)
    }

    async fn update(&self, id: Uuid, customer: &ValidCustomer) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE customers
               SET name = $1, email = $2, image_url = $3
             WHERE id = $4
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.image_url.as_deref())
        .bind(id)
        .execute(&self.db)
        .await
        .context("update customer")?;
        Ok(done.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let done = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete customer")?;
        Ok(done.rows_affected())
    }
}
