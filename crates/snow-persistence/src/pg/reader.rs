//! Repositorio de sólo lectura sobre Postgres.
//!
//! Las consultas de ranking agregan por (estación, año histórico) con un CTE,
//! promedian entre años y ordenan por promedio descendente. La ventana de
//! rango compara etiquetas `TO_CHAR(date, 'MM-DD')`; la rama contigua o de
//! cruce de año la decide el predicado puro de `date_window`.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use snow_domain::{PeakPeriod, Resort, ResortSnowfallStats, ResortWithPeaks};
use sqlx::postgres::PgRow;

use crate::date_window::spans_year_boundary;
use crate::error::{db_err, RepositoryError};
use crate::pg::{peak_from_row, range_stats_from_row, resort_from_row, week_stats_from_row, PgPool, RESORT_COLUMNS};
use crate::repo::Reader;

/// Implementación Postgres del contrato [`Reader`]. Sin estado propio más
/// allá del pool; clonable y compartible entre tareas.
#[derive(Clone)]
pub struct PgReader {
    pool: PgPool,
}

impl PgReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get_resort(&self, op: &'static str, column: &str, key: &str) -> Result<Resort, RepositoryError> {
        let sql = format!("SELECT {RESORT_COLUMNS} FROM resorts WHERE {column} = $1");
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err(op))?;
        match row {
            Some(r) => resort_from_row(&r).map_err(db_err(op)),
            None => Err(RepositoryError::NotFound(format!("resort {column}={key}"))),
        }
    }

    async fn week_stats(
        &self,
        op: &'static str,
        week_start: NaiveDate,
        prefecture: Option<&str>,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        debug!("{op}:start week_start={week_start} limit={limit}");
        let sql = week_stats_sql(prefecture.is_some());
        let mut query = sqlx::query(&sql).bind(week_start);
        if let Some(p) = prefecture {
            query = query.bind(p);
        }
        let rows = query.bind(limit).fetch_all(&self.pool).await.map_err(db_err(op))?;
        let stats = collect_rows(op, &rows, week_stats_from_row)?;
        debug!("{op}:done count={}", stats.len());
        Ok(stats)
    }

    async fn range_stats(
        &self,
        op: &'static str,
        start_date: &str,
        end_date: &str,
        prefecture: Option<&str>,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        debug!("{op}:start window={start_date}..{end_date} limit={limit}");
        let sql = range_stats_sql(spans_year_boundary(start_date, end_date), prefecture.is_some());
        let mut query = sqlx::query(&sql).bind(start_date).bind(end_date);
        if let Some(p) = prefecture {
            query = query.bind(p);
        }
        let rows = query.bind(limit).fetch_all(&self.pool).await.map_err(db_err(op))?;
        let stats = collect_rows(op, &rows, range_stats_from_row)?;
        debug!("{op}:done count={}", stats.len());
        Ok(stats)
    }
}

fn collect_rows<T>(
    op: &'static str,
    rows: &[PgRow],
    map: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, RepositoryError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(map(row).map_err(db_err(op))?);
    }
    Ok(out)
}

/// Consulta semanal: suma por (estación, año) los 7 días cuya posición
/// mes/día cae en la semana de `$1`, promedia entre años y devuelve la
/// proyección corta.
fn week_stats_sql(by_prefecture: bool) -> String {
    let (prefecture_filter, limit_param) = if by_prefecture {
        ("AND r.prefecture = $2", "$3")
    } else {
        ("", "$2")
    };
    format!(
        "WITH weekly_data AS (
            SELECT resort_id,
                   EXTRACT(YEAR FROM date) AS year,
                   SUM(snowfall_cm) AS total_snowfall
            FROM daily_snowfall
            WHERE EXTRACT(MONTH FROM date) = EXTRACT(MONTH FROM $1::date)
              AND EXTRACT(DAY FROM date) BETWEEN EXTRACT(DAY FROM $1::date)
                AND EXTRACT(DAY FROM $1::date) + 6
            GROUP BY resort_id, year
        ),
        avg_weekly_data AS (
            SELECT resort_id,
                   AVG(total_snowfall) AS avg_snowfall,
                   COUNT(*) AS years_with_data
            FROM weekly_data
            GROUP BY resort_id
        )
        SELECT r.id, r.name, r.prefecture,
               ROUND(awd.avg_snowfall)::int AS avg_snowfall
        FROM avg_weekly_data awd
        JOIN resorts r ON r.id = awd.resort_id
        WHERE awd.years_with_data >= 1
          {prefecture_filter}
        ORDER BY awd.avg_snowfall DESC
        LIMIT {limit_param}"
    )
}

/// Consulta de rango `MM-DD`: misma agregación que la semanal pero con la
/// ventana elegida por `wraps` y la proyección completa (atributos estáticos
/// y años con datos). El left join se filtra después a years_with_data >= 1,
/// así que una estación sin datos en la ventana nunca aparece.
fn range_stats_sql(wraps: bool, by_prefecture: bool) -> String {
    let window = if wraps {
        "TO_CHAR(date, 'MM-DD') >= $1 OR TO_CHAR(date, 'MM-DD') <= $2"
    } else {
        "TO_CHAR(date, 'MM-DD') >= $1 AND TO_CHAR(date, 'MM-DD') <= $2"
    };
    let (prefecture_filter, limit_param) = if by_prefecture {
        ("r.prefecture = $3 AND", "$4")
    } else {
        ("", "$3")
    };
    format!(
        "WITH date_range_data AS (
            SELECT resort_id,
                   EXTRACT(YEAR FROM date) AS year,
                   SUM(snowfall_cm) AS total_snowfall
            FROM daily_snowfall
            WHERE ({window})
            GROUP BY resort_id, year
        ),
        avg_range_data AS (
            SELECT resort_id,
                   AVG(total_snowfall) AS avg_snowfall,
                   COUNT(*) AS years_with_data
            FROM date_range_data
            GROUP BY resort_id
        )
        SELECT r.id, r.name, r.prefecture,
               ROUND(ard.avg_snowfall)::int AS avg_snowfall,
               ard.years_with_data,
               r.top_elevation_m, r.base_elevation_m, r.vertical_m,
               r.num_courses, r.longest_course_km
        FROM resorts r
        LEFT JOIN avg_range_data ard ON r.id = ard.resort_id
        WHERE {prefecture_filter} ard.years_with_data >= 1
        ORDER BY ard.avg_snowfall DESC NULLS LAST
        LIMIT {limit_param}"
    )
}

#[async_trait]
impl Reader for PgReader {
    async fn get_resort_by_slug(&self, slug: &str) -> Result<Resort, RepositoryError> {
        self.get_resort("get resort by slug", "slug", slug).await
    }

    async fn get_resort_by_id(&self, id: &str) -> Result<Resort, RepositoryError> {
        self.get_resort("get resort by id", "id", id).await
    }

    async fn get_snowiest_resorts_for_week(
        &self,
        week_start: NaiveDate,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.week_stats("snowiest resorts for week", week_start, None, limit).await
    }

    async fn get_snowiest_resorts_for_week_by_prefecture(
        &self,
        week_start: NaiveDate,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.week_stats("snowiest resorts for week by prefecture", week_start, Some(prefecture), limit)
            .await
    }

    async fn get_snowiest_resorts_for_date_range(
        &self,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.range_stats("snowiest resorts for date range", start_date, end_date, None, limit)
            .await
    }

    async fn get_snowiest_resorts_for_date_range_by_prefecture(
        &self,
        start_date: &str,
        end_date: &str,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError> {
        self.range_stats(
            "snowiest resorts for date range by prefecture",
            start_date,
            end_date,
            Some(prefecture),
            limit,
        )
        .await
    }

    async fn get_all_resorts_with_peaks(&self) -> Result<Vec<ResortWithPeaks>, RepositoryError> {
        let op = "all resorts with peaks";
        debug!("{op}:start");
        let sql = format!(
            "SELECT DISTINCT {cols}
             FROM resorts r
             INNER JOIN resort_peak_periods p ON r.id = p.resort_id
             ORDER BY r.prefecture, r.name",
            cols = RESORT_COLUMNS
                .split(", ")
                .map(|c| format!("r.{c}"))
                .collect::<Vec<_>>()
                .join(", "),
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(db_err(op))?;
        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let resort = resort_from_row(row).map_err(db_err(op))?;
            let peaks = self.get_peak_periods_for_resort(&resort.id).await?;
            results.push(ResortWithPeaks { resort, peaks });
        }
        debug!("{op}:done count={}", results.len());
        Ok(results)
    }

    async fn get_peak_periods_for_resort(
        &self,
        resort_id: &str,
    ) -> Result<Vec<PeakPeriod>, RepositoryError> {
        let op = "peak periods for resort";
        let rows = sqlx::query(
            "SELECT id, resort_id, peak_rank, start_date, end_date, center_date,
                    avg_daily_snowfall, total_period_snowfall, prominence_score,
                    years_of_data, confidence_level, calculated_at
             FROM resort_peak_periods
             WHERE resort_id = $1
             ORDER BY peak_rank",
        )
        .bind(resort_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err(op))?;
        collect_rows(op, &rows, peak_from_row)
    }
}
