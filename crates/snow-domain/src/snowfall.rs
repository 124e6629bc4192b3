use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lectura de espesor de nieve para una (estación, fecha).
/// Invariante: como máximo una lectura por (resort_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowDepthReading {
    pub resort_id: String,
    pub date: NaiveDate,
    pub depth_cm: i32,
    pub season: String,
}

/// Nevada fresca diaria para una (estación, fecha).
/// Misma invariante de unicidad que [`SnowDepthReading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnowfall {
    pub resort_id: String,
    pub date: NaiveDate,
    pub snowfall_cm: i32,
    pub season: String,
}
