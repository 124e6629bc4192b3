//! Repositorio de lectura/escritura sobre Postgres.
//!
//! `PgWriter` compone un [`PgReader`] y le delega todas las consultas; las
//! mutaciones son upserts con clave natural (slug para estaciones,
//! (resort_id, date) para los hechos), re-ejecutables sin efecto. Los lotes
//! se aplican como sentencias multi-fila dentro de una transacción: o entra
//! el lote completo o no entra nada.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use snow_domain::{DailySnowfall, PeakPeriod, Resort, ResortSnowfallStats, ResortWithPeaks, SnowDepthReading};
use sqlx::Row;
use uuid::Uuid;

use crate::error::{db_err, RepositoryError};
use crate::pg::{PgPool, PgReader};
use crate::repo::{Reader, Writer};

// Filas por sentencia multi-fila; mantiene el número de parámetros (4 por
// fila) muy por debajo del tope de Postgres (65535 binds).
const BATCH_CHUNK_ROWS: usize = 500;

const SAVE_RESORT_SQL: &str = "INSERT INTO resorts (
        id, slug, name, prefecture, region,
        top_elevation_m, base_elevation_m, vertical_m,
        num_courses, longest_course_km, steepest_course_deg
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    ON CONFLICT (slug) DO UPDATE SET
        name = EXCLUDED.name,
        prefecture = EXCLUDED.prefecture,
        region = EXCLUDED.region,
        top_elevation_m = EXCLUDED.top_elevation_m,
        base_elevation_m = EXCLUDED.base_elevation_m,
        vertical_m = EXCLUDED.vertical_m,
        num_courses = EXCLUDED.num_courses,
        longest_course_km = EXCLUDED.longest_course_km,
        steepest_course_deg = EXCLUDED.steepest_course_deg,
        last_updated = now()
    RETURNING id, last_updated";

/// Implementación Postgres del contrato [`Writer`].
#[derive(Clone)]
pub struct PgWriter {
    reader: PgReader,
    pool: PgPool,
}

impl PgWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { reader: PgReader::new(pool.clone()), pool }
    }

    /// Upsert masivo genérico sobre las tablas de hechos (clave
    /// (resort_id, date)). Cada chunk es una sola sentencia; el conjunto va
    /// en una transacción para que un fallo parcial no deje nada aplicado.
    async fn bulk_upsert_facts(
        &self,
        op: &'static str,
        table: &str,
        value_column: &str,
        rows: &[(&str, NaiveDate, i32, &str)],
    ) -> Result<(), RepositoryError> {
        debug!("{op}:start rows={}", rows.len());
        let mut tx = self.pool.begin().await.map_err(db_err(op))?;
        for chunk in rows.chunks(BATCH_CHUNK_ROWS) {
            let sql = bulk_upsert_sql(table, value_column, chunk.len());
            let mut query = sqlx::query(&sql);
            for (resort_id, date, value, season) in chunk {
                query = query.bind(*resort_id).bind(*date).bind(*value).bind(*season);
            }
            query.execute(&mut *tx).await.map_err(db_err(op))?;
        }
        tx.commit().await.map_err(db_err(op))?;
        debug!("{op}:done rows={}", rows.len());
        Ok(())
    }
}

/// `INSERT INTO <table> (resort_id, date, <value_column>, season) VALUES
/// (...), ... ON CONFLICT (resort_id, date) DO UPDATE` para `rows` filas.
fn bulk_upsert_sql(table: &str, value_column: &str, rows: usize) -> String {
    let mut sql = format!("INSERT INTO {table} (resort_id, date, {value_column}, season) VALUES ");
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        let base = row * 4;
        sql.push_str(&format!("(${}, ${}, ${}, ${})", base + 1, base + 2, base + 3, base + 4));
    }
    sql.push_str(&format!(
        " ON CONFLICT (resort_id, date) DO UPDATE SET \
         {value_column} = EXCLUDED.{value_column}, season = EXCLUDED.season"
    ));
    sql
}

#[async_trait]
impl Writer for PgWriter {
    async fn save_resort(&self, resort: &mut Resort) -> Result<(), RepositoryError> {
        let op = "save resort";
        if resort.id.is_empty() {
            resort.id = Uuid::new_v4().to_string();
        }
        debug!("{op}:start slug={}", resort.slug);
        let row = sqlx::query(SAVE_RESORT_SQL)
            .bind(&resort.id)
            .bind(&resort.slug)
            .bind(&resort.name)
            .bind(&resort.prefecture)
            .bind(&resort.region)
            .bind(resort.top_elevation_m)
            .bind(resort.base_elevation_m)
            .bind(resort.vertical_m)
            .bind(resort.num_courses)
            .bind(resort.longest_course_km)
            .bind(resort.steepest_course_deg)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err(op))?;
        // En conflicto el RETURNING trae la identidad ya existente; se
        // escribe de vuelta junto al last_updated asignado por el servidor.
        resort.id = row.try_get("id").map_err(db_err(op))?;
        resort.last_updated = row.try_get("last_updated").map_err(db_err(op))?;
        debug!("{op}:done slug={} id={}", resort.slug, resort.id);
        Ok(())
    }

    async fn save_snow_depth_readings(
        &self,
        readings: &[SnowDepthReading],
    ) -> Result<(), RepositoryError> {
        if readings.is_empty() {
            return Ok(()); // no-op documentado del contrato
        }
        let rows: Vec<_> = readings
            .iter()
            .map(|r| (r.resort_id.as_str(), r.date, r.depth_cm, r.season.as_str()))
            .collect();
        self.bulk_upsert_facts("save snow depth readings", "snow_depth_readings", "depth_cm", &rows)
            .await
    }

    async fn save_daily_snowfall(&self, snowfalls: &[DailySnowfall]) -> Result<(), RepositoryError> {
        if snowfalls.is_empty() {
            return Ok(());
        }
        let rows: Vec<_> = snowfalls
            .iter()
            .map(|s| (s.resort_id.as_str(), s.date, s.snowfall_cm, s.season.as_str()))
            .collect();
        self.bulk_upsert_facts("save daily snowfall", "daily_snowfall", "snowfall_cm", &rows)
            .await
    }
}

// El escritor satisface el contrato de lectura delegando en su PgReader.
#[async_trait]
impl Reader for PgWriter {
    async fn get_resort_by_slug(&self, slug: &str) -> Result<Resort, RepositoryError> {
        self.reader.get_resort_by_slug(slug).await
    }

    async fn get_resort_by_id(&self, id: &str) -> Result<Resort, RepositoryError> {
        self.reader.get_resort_by_id(id).await
    }

    async fn get_snowiest_resorts_for_week(
        &self,
        week_start: NaiveDate,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.reader.get_snowiest_resorts_for_week(week_start, limit).await
    }

    async fn get_snowiest_resorts_for_week_by_prefecture(
        &self,
        week_start: NaiveDate,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.reader
            .get_snowiest_resorts_for_week_by_prefecture(week_start, prefecture, limit)
            .await
    }

    async fn get_snowiest_resorts_for_date_range(
        &self,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.reader
            .get_snowiest_resorts_for_date_range(start_date, end_date, limit)
            .await
    }

    async fn get_snowiest_resorts_for_date_range_by_prefecture(
        &self,
        start_date: &str,
        end_date: &str,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.reader
            .get_snowiest_resorts_for_date_range_by_prefecture(start_date, end_date, prefecture, limit)
            .await
    }

    async fn get_all_resorts_with_peaks(&self) -> Result<Vec<ResortWithPeaks>, RepositoryError> {
        self.reader.get_all_resorts_with_peaks().await
    }

    async fn get_peak_periods_for_resort(
        &self,
        resort_id: &str,
    ) -> Result<Vec<PeakPeriod>, RepositoryError> {
        self.reader.get_peak_periods_for_resort(resort_id).await
    }
}
