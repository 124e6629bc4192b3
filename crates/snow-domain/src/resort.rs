use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estación de esquí: identidad, ubicación administrativa y atributos físicos.
///
/// El `slug` es la clave natural externa (única global); `id` es la clave
/// interna estable una vez asignada por el escritor. Los atributos físicos son
/// opcionales porque la cobertura de la fuente varía por estación.
/// `last_updated` lo asigna el servidor en cada escritura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resort {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub prefecture: String,
    pub region: String,
    pub top_elevation_m: Option<i32>,
    pub base_elevation_m: Option<i32>,
    pub vertical_m: Option<i32>,
    pub num_courses: Option<i32>,
    pub longest_course_km: Option<f64>,
    pub steepest_course_deg: Option<f64>,
    pub last_updated: DateTime<Utc>,
}
