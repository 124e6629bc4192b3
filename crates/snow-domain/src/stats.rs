use serde::{Deserialize, Serialize};

/// Proyección agregada derivada de los rankings de nieve por ventana de
/// calendario (semana o rango `MM-DD`), promediada sobre los años de
/// histórico disponibles.
///
/// Las consultas de semana sólo rellenan la proyección corta
/// (`resort_id`, `name`, `prefecture`, `avg_snowfall_cm`); las de rango
/// rellenan además los atributos estáticos y `years_with_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResortSnowfallStats {
    pub resort_id: String,
    pub name: String,
    pub prefecture: String,
    /// Promedio redondeado de nieve acumulada en la ventana, en cm.
    pub avg_snowfall_cm: Option<i32>,
    /// Años distintos de histórico que aportaron datos (consultas de rango).
    pub years_with_data: Option<i64>,
    pub top_elevation_m: Option<i32>,
    pub base_elevation_m: Option<i32>,
    pub vertical_m: Option<i32>,
    pub num_courses: Option<i32>,
    pub longest_course_km: Option<f64>,
}
