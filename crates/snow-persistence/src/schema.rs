//! DDL idempotente para las cuatro tablas consumidas por el repositorio.
//!
//! `ensure_schema` se invoca explícitamente por el proceso que embebe la
//! librería (y por el arnés de tests); nunca de forma implícita al construir
//! el pool. Los índices únicos son los que sustentan las claves de upsert.

use sqlx::PgPool;

use crate::error::{db_err, RepositoryError};

const SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS resorts (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        prefecture TEXT NOT NULL,
        region TEXT NOT NULL,
        top_elevation_m INTEGER,
        base_elevation_m INTEGER,
        vertical_m INTEGER,
        num_courses INTEGER,
        longest_course_km DOUBLE PRECISION,
        steepest_course_deg DOUBLE PRECISION,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS snow_depth_readings (
        resort_id TEXT NOT NULL REFERENCES resorts(id),
        date DATE NOT NULL,
        depth_cm INTEGER NOT NULL,
        season TEXT NOT NULL,
        UNIQUE (resort_id, date)
    )",
    "CREATE TABLE IF NOT EXISTS daily_snowfall (
        resort_id TEXT NOT NULL REFERENCES resorts(id),
        date DATE NOT NULL,
        snowfall_cm INTEGER NOT NULL,
        season TEXT NOT NULL,
        UNIQUE (resort_id, date)
    )",
    "CREATE TABLE IF NOT EXISTS resort_peak_periods (
        id BIGSERIAL PRIMARY KEY,
        resort_id TEXT NOT NULL REFERENCES resorts(id),
        peak_rank INTEGER NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        center_date TEXT NOT NULL,
        avg_daily_snowfall DOUBLE PRECISION NOT NULL,
        total_period_snowfall DOUBLE PRECISION NOT NULL,
        prominence_score DOUBLE PRECISION NOT NULL,
        years_of_data INTEGER NOT NULL,
        confidence_level TEXT NOT NULL,
        calculated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_daily_snowfall_date ON daily_snowfall (date)",
    "CREATE INDEX IF NOT EXISTS idx_peak_periods_resort_rank
        ON resort_peak_periods (resort_id, peak_rank)",
];

/// Crea tablas e índices si no existen. Seguro de re-ejecutar.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    for ddl in SCHEMA_DDL {
        sqlx::query(ddl).execute(pool).await.map_err(db_err("ensure schema"))?;
    }
    Ok(())
}
