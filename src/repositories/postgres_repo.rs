use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{LocatorError, LocatorResult};
use crate::geo::{BoundingBox, GeoPoint};
use crate::models::chai_spot::{ChaiSpot, ChaiSpotPatch, NewChaiSpot};
use crate::repositories::VendorStore;

pub const RETRY_LIMIT: usize = 5;
pub const RETRY_DELAY: tokio::time::Duration = tokio::time::Duration::from_millis(500);

const SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS chai_spots (\
        id TEXT PRIMARY KEY, \
        name TEXT NOT NULL, \
        lat DOUBLE PRECISION NOT NULL CHECK (lat BETWEEN -90 AND 90), \
        lng DOUBLE PRECISION NOT NULL CHECK (lng BETWEEN -180 AND 180), \
        rating SMALLINT CHECK (rating BETWEEN 0 AND 5), \
        parking BOOLEAN NOT NULL DEFAULT FALSE\
    );\
    CREATE INDEX IF NOT EXISTS chai_spots_lat_lng_idx ON chai_spots (lat, lng);";

const SELECT_COLUMNS: &str = "SELECT id, name, lat, lng, rating, parking FROM chai_spots";

/// Spots persisted in PostgreSQL.
///
/// The `(lat, lng)` B-tree answers the bounding box of a radius query and
/// the haversine check runs on the returned candidates. A spot's indexed
/// columns live on its own row, so every write keeps record and index
/// entry together.
pub struct PostgresVendorStore {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    closed: AtomicBool,
}

impl PostgresVendorStore {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
            closed: AtomicBool::new(false),
        }
    }

    /// Build the pool and make sure the table and its index exist.
    pub async fn connect(database_url: &str, pool_size: u32) -> LocatorResult<Self> {
        let manager = PostgresConnectionManager::new_from_stringlike(database_url, NoTls)?;
        let pool = Pool::builder().max_size(pool_size).build(manager).await?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!("Connected to postgres with a pool of {} connections", pool_size);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> LocatorResult<()> {
        let conn = self.get_postgres_connection().await?;
        conn.batch_execute(SCHEMA).await?;
        Ok(())
    }

    async fn get_postgres_connection(
        &self,
    ) -> LocatorResult<PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LocatorError::Storage("store is closed".to_string()));
        }

        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!(
                        "Failed to retrieve postgres connection due to: {}, retrying in {:?}",
                        e, RETRY_DELAY
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }

        Err(LocatorError::Storage(
            "Failed to retrieve a valid connection from postgres pool".to_string(),
        ))
    }
}

#[async_trait]
impl VendorStore for PostgresVendorStore {
    async fn create(&self, spot: NewChaiSpot) -> LocatorResult<ChaiSpot> {
        spot.validate()?;
        let spot = spot.into_spot(Uuid::new_v4());

        let conn = self.get_postgres_connection().await?;
        conn.execute(
            "INSERT INTO chai_spots (id, name, lat, lng, rating, parking) \
             VALUES ($1, $2, $3, $4, $5, $6);",
            &[
                &spot.id.to_string(),
                &spot.name,
                &spot.location.lat(),
                &spot.location.lng(),
                &spot.rating.map(i16::from),
                &spot.parking,
            ],
        )
        .await?;

        Ok(spot)
    }

    async fn get_all(&self) -> LocatorResult<Vec<ChaiSpot>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn.query(SELECT_COLUMNS, &[]).await?;

        rows.iter().map(parse_row_into_chai_spot).collect()
    }

    async fn update(&self, id: Uuid, patch: ChaiSpotPatch) -> LocatorResult<ChaiSpot> {
        patch.validate()?;

        let mut conn = self.get_postgres_connection().await?;
        let transaction = conn.transaction().await?;

        let row = transaction
            .query_opt(
                &format!("{} WHERE id = $1 FOR UPDATE;", SELECT_COLUMNS),
                &[&id.to_string()],
            )
            .await?;
        // Dropping the transaction without commit rolls it back.
        let mut spot = match row {
            Some(row) => parse_row_into_chai_spot(&row)?,
            None => return Err(LocatorError::NotFound(id.to_string())),
        };
        patch.apply_to(&mut spot);

        transaction
            .execute(
                "UPDATE chai_spots SET name = $2, lat = $3, lng = $4, rating = $5, parking = $6 \
                 WHERE id = $1;",
                &[
                    &spot.id.to_string(),
                    &spot.name,
                    &spot.location.lat(),
                    &spot.location.lng(),
                    &spot.rating.map(i16::from),
                    &spot.parking,
                ],
            )
            .await?;
        transaction.commit().await?;

        Ok(spot)
    }

    async fn delete(&self, id: Uuid) -> LocatorResult<()> {
        let conn = self.get_postgres_connection().await?;
        let removed = conn
            .execute("DELETE FROM chai_spots WHERE id = $1;", &[&id.to_string()])
            .await?;

        if removed == 0 {
            return Err(LocatorError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn nearby(&self, center: GeoPoint, radius_meters: f64) -> LocatorResult<Vec<ChaiSpot>> {
        if !(radius_meters >= 0.0) {
            return Ok(Vec::new());
        }

        let conn = self.get_postgres_connection().await?;
        let bbox = BoundingBox::around(&center, radius_meters);
        let stmt = format!(
            "{} WHERE lat BETWEEN $1 AND $2 AND lng BETWEEN $3 AND $4;",
            SELECT_COLUMNS
        );

        let mut candidates = Vec::new();
        for (lng_lo, lng_hi) in &bbox.lng_ranges {
            let rows = conn
                .query(&stmt, &[&bbox.min_lat, &bbox.max_lat, lng_lo, lng_hi])
                .await?;
            for row in rows {
                let spot = parse_row_into_chai_spot(&row)?;
                let distance = center.distance_to(&spot.location);
                if distance <= radius_meters {
                    candidates.push((distance, spot));
                }
            }
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(candidates.into_iter().map(|(_, spot)| spot).collect())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        info!("Postgres store closed, pooled connections are released on drop");
    }
}

fn parse_row_into_chai_spot(row: &Row) -> LocatorResult<ChaiSpot> {
    let id: String = row.try_get("id")?;
    let rating: Option<i16> = row.try_get("rating")?;

    Ok(ChaiSpot {
        id: Uuid::parse_str(&id)
            .map_err(|e| LocatorError::Storage(format!("corrupt id {}: {}", id, e)))?,
        name: row.try_get("name")?,
        location: GeoPoint::new(row.try_get("lat")?, row.try_get("lng")?)
            .map_err(|e| LocatorError::Storage(format!("corrupt location for {}: {}", id, e)))?,
        rating: rating
            .map(u8::try_from)
            .transpose()
            .map_err(|e| LocatorError::Storage(format!("corrupt rating for {}: {}", id, e)))?,
        parking: row.try_get("parking")?,
    })
}
