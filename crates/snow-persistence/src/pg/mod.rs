//! Implementaciones Postgres (sqlx) de los contratos `Reader` y `Writer`.
//!
//! Notas del módulo:
//! - Una ida y vuelta bloqueante (await) por operación lógica; la suspensión
//!   ocurre sólo en la frontera de I/O. Cancelación = soltar el future; el
//!   deadline del pool aflora como `RepositoryError::Timeout`.
//! - Los repositorios no guardan estado mutable por instancia: compartirlos
//!   entre tareas concurrentes no requiere locking adicional. El pool es el
//!   único recurso compartido y es seguro por construcción.
//! - Se usa `sqlx::query` + `try_get` en vez del macro `query!` para evitar
//!   introspección de la base en tiempo de compilación.
//! - El mapeo dominio ↔ filas queda aislado en los helpers de este módulo.

pub mod reader;
pub mod writer;

pub use reader::PgReader;
pub use writer::PgWriter;

use log::warn;
use snow_domain::{PeakPeriod, Resort, ResortSnowfallStats};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DbConfig;
use crate::error::{db_err, RepositoryError};

pub use sqlx::PgPool;

/// Lista de columnas de `resorts`, compartida por lookups y joins.
pub(crate) const RESORT_COLUMNS: &str = "id, slug, name, prefecture, region, \
     top_elevation_m, base_elevation_m, vertical_m, \
     num_courses, longest_course_km, steepest_course_deg, \
     last_updated";

/// Construye el pool de conexiones a partir de la configuración y valida la
/// conexión. El pool se construye una vez al arrancar el proceso y se pasa
/// (clon barato) a ambos repositorios.
pub async fn build_pool(cfg: &DbConfig) -> Result<PgPool, RepositoryError> {
    let (min, max) = clamp_pool_sizes(cfg.min_connections, cfg.max_connections);
    PgPoolOptions::new()
        .min_connections(min)
        .max_connections(max)
        .connect(&cfg.url)
        .await
        .map_err(db_err("build pool"))
}

/// Variante perezosa: no toca la red hasta el primer uso. Útil en tests y en
/// procesos que quieren arrancar aunque la base aún no esté disponible.
pub fn build_pool_lazy(cfg: &DbConfig) -> Result<PgPool, RepositoryError> {
    let (min, max) = clamp_pool_sizes(cfg.min_connections, cfg.max_connections);
    PgPoolOptions::new()
        .min_connections(min)
        .max_connections(max)
        .connect_lazy(&cfg.url)
        .map_err(db_err("build pool"))
}

/// Ajusta tamaños inválidos (0 o min > max) en lugar de fallar.
fn clamp_pool_sizes(min: u32, max: u32) -> (u32, u32) {
    let max = if max == 0 { 1 } else { max };
    if min > max {
        warn!("pool min_connections > max_connections ({min} > {max}), usando min=max");
    }
    (min.min(max), max)
}

pub(crate) fn resort_from_row(row: &PgRow) -> Result<Resort, sqlx::Error> {
    Ok(Resort {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        prefecture: row.try_get("prefecture")?,
        region: row.try_get("region")?,
        top_elevation_m: row.try_get("top_elevation_m")?,
        base_elevation_m: row.try_get("base_elevation_m")?,
        vertical_m: row.try_get("vertical_m")?,
        num_courses: row.try_get("num_courses")?,
        longest_course_km: row.try_get("longest_course_km")?,
        steepest_course_deg: row.try_get("steepest_course_deg")?,
        last_updated: row.try_get("last_updated")?,
    })
}

// Proyección corta de las consultas semanales: el resto de atributos queda
// sin rellenar.
pub(crate) fn week_stats_from_row(row: &PgRow) -> Result<ResortSnowfallStats, sqlx::Error> {
    Ok(ResortSnowfallStats {
        resort_id: row.try_get("id")?,
        name: row.try_get("name")?,
        prefecture: row.try_get("prefecture")?,
        avg_snowfall_cm: row.try_get("avg_snowfall")?,
        years_with_data: None,
        top_elevation_m: None,
        base_elevation_m: None,
        vertical_m: None,
        num_courses: None,
        longest_course_km: None,
    })
}

pub(crate) fn range_stats_from_row(row: &PgRow) -> Result<ResortSnowfallStats, sqlx::Error> {
    Ok(ResortSnowfallStats {
        resort_id: row.try_get("id")?,
        name: row.try_get("name")?,
        prefecture: row.try_get("prefecture")?,
        avg_snowfall_cm: row.try_get("avg_snowfall")?,
        years_with_data: row.try_get("years_with_data")?,
        top_elevation_m: row.try_get("top_elevation_m")?,
        base_elevation_m: row.try_get("base_elevation_m")?,
        vertical_m: row.try_get("vertical_m")?,
        num_courses: row.try_get("num_courses")?,
        longest_course_km: row.try_get("longest_course_km")?,
    })
}

pub(crate) fn peak_from_row(row: &PgRow) -> Result<PeakPeriod, sqlx::Error> {
    Ok(PeakPeriod {
        id: row.try_get("id")?,
        resort_id: row.try_get("resort_id")?,
        peak_rank: row.try_get("peak_rank")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        center_date: row.try_get("center_date")?,
        avg_daily_snowfall: row.try_get("avg_daily_snowfall")?,
        total_period_snowfall: row.try_get("total_period_snowfall")?,
        prominence_score: row.try_get("prominence_score")?,
        years_of_data: row.try_get("years_of_data")?,
        confidence_level: row.try_get("confidence_level")?,
        calculated_at: row.try_get("calculated_at")?,
    })
}
