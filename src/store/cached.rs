use super::{EmployeeDirectory, StoreResult};
use crate::model::employee::Employee;
use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::MySqlPool;
use std::time::Duration;

/// Employee lookups served from a moka cache in front of another directory.
///
/// Only hits are cached; a missing employee is asked for again every time.
pub struct CachedDirectory<D> {
    inner: D,
    cache: Cache<u64, Employee>,
}

impl<D: EmployeeDirectory> CachedDirectory<D> {
    pub fn new(inner: D, max_capacity: u64, time_to_live: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(time_to_live)
            .build();

        Self { inner, cache }
    }

    /// Batch insert employees into the cache
    async fn batch_put(&self, employees: Vec<Employee>) {
        let futures: Vec<_> = employees
            .into_iter()
            .map(|e| self.cache.insert(e.id, e))
            .collect();

        futures::future::join_all(futures).await;
    }

    /// Preload every employee row from MySQL, in batches.
    pub async fn warmup(&self, pool: &MySqlPool, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, department_id, manager_id
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            batch.push(row?);
            if batch.len() >= batch_size {
                total += batch.len();
                self.batch_put(std::mem::take(&mut batch)).await;
            }
        }

        if !batch.is_empty() {
            total += batch.len();
            self.batch_put(batch).await;
        }

        tracing::info!(total, "Employee directory cache warmup complete");
        Ok(())
    }
}

#[async_trait]
impl<D: EmployeeDirectory> EmployeeDirectory for CachedDirectory<D> {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<Employee>> {
        if let Some(hit) = self.cache.get(&employee_id).await {
            return Ok(Some(hit));
        }

        let found = self.inner.find_by_id(employee_id).await?;
        if let Some(employee) = &found {
            self.cache.insert(employee_id, employee.clone()).await;
        }
        Ok(found)
    }

    async fn find_by_manager(&self, manager_id: u64) -> StoreResult<Vec<Employee>> {
        // reporting lines change often enough that this always goes to the source
        self.inner.find_by_manager(manager_id).await
    }
}
