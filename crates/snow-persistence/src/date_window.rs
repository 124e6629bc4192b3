//! Predicado puro para ventanas de calendario `MM-DD` (agnósticas al año).
//!
//! Una ventana cuyo inicio es lexicográficamente mayor que su fin cruza el
//! límite de año (ej. "12-20".."01-10"); las consultas de rango eligen la
//! cláusula SQL según este predicado. Se aísla aquí para poder probarlo sin
//! base de datos.

/// `true` si la ventana `[start, end]` cruza el límite de año.
/// Comparación lexicográfica de cadenas `MM-DD` (zero-padded).
pub fn spans_year_boundary(start: &str, end: &str) -> bool {
    start > end
}
