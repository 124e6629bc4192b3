use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resort::Resort;

/// Período pico precalculado: ventana de nevadas excepcionalmente intensas
/// para una estación, con su ranking y métricas de soporte.
///
/// Estas filas las calcula y escribe un proceso colaborador; este crate sólo
/// las lee. Las fechas de la ventana son etiquetas `MM-DD` recurrentes
/// (agnósticas al año).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakPeriod {
    pub id: i64,
    pub resort_id: String,
    pub peak_rank: i32,
    pub start_date: String,
    pub end_date: String,
    pub center_date: String,
    pub avg_daily_snowfall: f64,
    pub total_period_snowfall: f64,
    /// Métrica derivada de cuán excepcional es el período frente al histórico
    /// de la estación.
    pub prominence_score: f64,
    pub years_of_data: i32,
    pub confidence_level: String,
    pub calculated_at: DateTime<Utc>,
}

/// Estación junto a sus períodos pico ordenados por rank ascendente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResortWithPeaks {
    pub resort: Resort,
    pub peaks: Vec<PeakPeriod>,
}
