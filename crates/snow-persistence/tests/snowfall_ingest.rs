//! Tests de la ingesta masiva de hechos (lecturas de espesor y nevadas).
//!
//! Verifica:
//! - Lote vacío: no-op con éxito.
//! - Upsert por (resort_id, date): re-envío idéntico no duplica; re-envío con
//!   valores cambiados actualiza en sitio.
//! - Fallo de una fila: el lote completo se revierte (todo-o-nada).

mod test_support;

use chrono::NaiveDate;
use snow_domain::{DailySnowfall, SnowDepthReading};
use snow_persistence::{PgPool, PgWriter, RepositoryError, Writer};
use sqlx::Row;
use test_support::{sample_resort, test_pool, unique};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("fecha válida")
}

async fn count_rows(pool: &PgPool, table: &str, resort_id: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) AS n FROM {table} WHERE resort_id = $1");
    sqlx::query(&sql)
        .bind(resort_id)
        .fetch_one(pool)
        .await
        .expect("count")
        .get("n")
}

#[tokio::test]
async fn empty_batches_are_noops() {
    let pool = match test_pool().await {
        Some(p) => p,
        None => { eprintln!("DATABASE_URL not set; skipping"); return; }
    };
    let writer = PgWriter::new(pool);

    writer.save_snow_depth_readings(&[]).await.expect("empty readings");
    writer.save_daily_snowfall(&[]).await.expect("empty snowfall");
}

#[tokio::test]
async fn depth_readings_upsert_by_resort_and_date() {
    let pool = match test_pool().await {
        Some(p) => p,
        None => { eprintln!("DATABASE_URL not set; skipping"); return; }
    };
    let writer = PgWriter::new(pool.clone());

    let mut resort = sample_resort(&unique("depth"), &unique("pref"));
    writer.save_resort(&mut resort).await.expect("save resort");

    let readings: Vec<SnowDepthReading> = (1..=3)
        .map(|d| SnowDepthReading {
            resort_id: resort.id.clone(),
            date: date(2024, 1, d),
            depth_cm: 100 + d as i32,
            season: "2023-24".to_string(),
        })
        .collect();
    writer.save_snow_depth_readings(&readings).await.expect("first batch");
    assert_eq!(count_rows(&pool, "snow_depth_readings", &resort.id).await, 3);

    // Re-envío idéntico: mismo estado, sin duplicados.
    writer.save_snow_depth_readings(&readings).await.expect("identical batch");
    assert_eq!(count_rows(&pool, "snow_depth_readings", &resort.id).await, 3);

    // Re-envío con un valor cambiado: actualiza en sitio.
    let mut changed = readings.clone();
    changed[1].depth_cm = 250;
    changed[1].season = "corrected".to_string();
    writer.save_snow_depth_readings(&changed).await.expect("changed batch");
    assert_eq!(count_rows(&pool, "snow_depth_readings", &resort.id).await, 3);

    let row = sqlx::query(
        "SELECT depth_cm, season FROM snow_depth_readings WHERE resort_id = $1 AND date = $2",
    )
    .bind(&resort.id)
    .bind(date(2024, 1, 2))
    .fetch_one(&pool)
    .await
    .expect("fetch updated row");
    assert_eq!(row.get::<i32, _>("depth_cm"), 250);
    assert_eq!(row.get::<String, _>("season"), "corrected");
}

#[tokio::test]
async fn daily_snowfall_resubmission_is_idempotent() {
    let pool = match test_pool().await {
        Some(p) => p,
        None => { eprintln!("DATABASE_URL not set; skipping"); return; }
    };
    let writer = PgWriter::new(pool.clone());

    let mut resort = sample_resort(&unique("snowfall"), &unique("pref"));
    writer.save_resort(&mut resort).await.expect("save resort");

    let snowfalls: Vec<DailySnowfall> = (10..=14)
        .map(|d| DailySnowfall {
            resort_id: resort.id.clone(),
            date: date(2024, 2, d),
            snowfall_cm: d as i32,
            season: "2023-24".to_string(),
        })
        .collect();

    // El scraper re-visita ventanas solapadas: dos envíos del mismo lote
    // deben dejar el mismo estado.
    writer.save_daily_snowfall(&snowfalls).await.expect("first batch");
    writer.save_daily_snowfall(&snowfalls).await.expect("second batch");
    assert_eq!(count_rows(&pool, "daily_snowfall", &resort.id).await, 5);
}

#[tokio::test]
async fn failed_batch_applies_nothing() {
    let pool = match test_pool().await {
        Some(p) => p,
        None => { eprintln!("DATABASE_URL not set; skipping"); return; }
    };
    let writer = PgWriter::new(pool.clone());

    let mut resort = sample_resort(&unique("atomic"), &unique("pref"));
    writer.save_resort(&mut resort).await.expect("save resort");

    let mut batch: Vec<DailySnowfall> = (1..=4)
        .map(|d| DailySnowfall {
            resort_id: resort.id.clone(),
            date: date(2024, 3, d),
            snowfall_cm: 10,
            season: "2023-24".to_string(),
        })
        .collect();
    // Fila inválida al final: estación inexistente (violación de FK).
    batch.push(DailySnowfall {
        resort_id: unique("ghost"),
        date: date(2024, 3, 5),
        snowfall_cm: 10,
        season: "2023-24".to_string(),
    });

    let err = writer.save_daily_snowfall(&batch).await.unwrap_err();
    assert!(
        matches!(err, RepositoryError::ForeignKeyViolation(_)),
        "esperaba ForeignKeyViolation, fue {err:?}"
    );
    // Nada del lote quedó aplicado.
    assert_eq!(count_rows(&pool, "daily_snowfall", &resort.id).await, 0);
}
