/// Repository layer for database operations
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Body, NewBody};
use crate::errors::ApiResult;
use crate::query::sql::{count_query, page_query, BODY_COLUMNS};
use crate::query::FilterSet;

mod memory;

pub use memory::MemoryBodyRepo;

/// Storage for bodies. `count` and `fetch_page` must apply the same
/// filter definition.
#[async_trait]
pub trait BodyRepository: Send + Sync {
    /// Total matching bodies, no offset or limit applied
    async fn count(&self, filters: &FilterSet) -> ApiResult<i64>;

    /// Ordered matching bodies after skipping `skip`, at most `limit`
    async fn fetch_page(&self, filters: &FilterSet, skip: i64, limit: i64)
        -> ApiResult<Vec<Body>>;

    /// Insert a body and return it with its assigned uid
    async fn create(&self, body: NewBody) -> ApiResult<Body>;

    /// Remove every body, returning how many were deleted
    async fn delete_all(&self) -> ApiResult<u64>;
}

/// Postgres-backed body repository
#[derive(Clone)]
pub struct PgBodyRepo {
    pool: PgPool,
}

impl PgBodyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BodyRepository for PgBodyRepo {
    async fn count(&self, filters: &FilterSet) -> ApiResult<i64> {
        let mut qb = count_query(filters);
        debug!(sql = qb.sql(), "counting bodies");

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn fetch_page(
        &self,
        filters: &FilterSet,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<Body>> {
        let mut qb = page_query(filters, skip, limit);
        debug!(sql = qb.sql(), skip, limit, "fetching bodies");

        let rows = qb.build_query_as::<Body>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn create(&self, body: NewBody) -> ApiResult<Body> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Body>(&format!(
            "INSERT INTO bodies({BODY_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19)
             RETURNING {BODY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(body.name)
        .bind(body.iau)
        .bind(body.ra)
        .bind(body.dec)
        .bind(body.constellation)
        .bind(body.object_type)
        .bind(body.apparent_magnitude)
        .bind(body.absolute_magnitude)
        .bind(body.distance)
        .bind(body.hd)
        .bind(body.hr)
        .bind(body.hip)
        .bind(body.bd)
        .bind(body.flamsteed)
        .bind(body.messier)
        .bind(body.ngc)
        .bind(body.ic)
        .bind(body.simbad)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn delete_all(&self) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM bodies").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Initialize database tables
pub async fn init_db(pool: &PgPool) -> ApiResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bodies(
            uid UUID PRIMARY KEY,
            name VARCHAR(180) NOT NULL,
            iau VARCHAR(180),
            right_ascension DOUBLE PRECISION,
            declination DOUBLE PRECISION,
            constellation VARCHAR(180),
            object_type VARCHAR(180),
            apparent_magnitude DOUBLE PRECISION,
            absolute_magnitude DOUBLE PRECISION,
            distance DOUBLE PRECISION,
            hd TEXT,
            hr TEXT,
            hip TEXT,
            bd TEXT,
            flamsteed TEXT,
            messier TEXT,
            ngc TEXT,
            ic TEXT,
            simbad TEXT
        )",
    )
    .execute(pool)
    .await?;

    for (index, column) in [
        ("ix_bodies_name", "name"),
        ("ix_bodies_ra", "right_ascension"),
        ("ix_bodies_dec", "declination"),
        ("ix_bodies_constellation", "constellation"),
        ("ix_bodies_type", "object_type"),
        ("ix_bodies_apparent_magnitude", "apparent_magnitude"),
    ] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {index} ON bodies({column})"
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}
