//! Soporte común para los tests de integración (requieren DATABASE_URL).

use chrono::Utc;
use snow_domain::Resort;
use snow_persistence::{build_pool_lazy, ensure_schema, DbConfig, PgPool};

/// Pool de test (1x2) con esquema asegurado; `None` si no hay DATABASE_URL.
pub async fn test_pool() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let mut cfg = DbConfig::from_env();
    cfg.min_connections = 1;
    cfg.max_connections = 2;
    let pool = match build_pool_lazy(&cfg) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("No se pudo construir pool de test: {e}");
            return None;
        }
    };
    ensure_schema(&pool).await.expect("schema");
    Some(pool)
}

/// Valor único por ejecución para aislar datos de corridas anteriores sobre
/// la misma base.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

/// Estación de prueba con atributos físicos rellenos y slug único.
pub fn sample_resort(slug: &str, prefecture: &str) -> Resort {
    Resort {
        id: String::new(),
        slug: slug.to_string(),
        name: format!("Resort {slug}"),
        prefecture: prefecture.to_string(),
        region: "Test Region".to_string(),
        top_elevation_m: Some(1800),
        base_elevation_m: Some(600),
        vertical_m: Some(1200),
        num_courses: Some(24),
        longest_course_km: Some(6.5),
        steepest_course_deg: Some(38.0),
        last_updated: Utc::now(),
    }
}
