//! Contratos de lectura y escritura del repositorio.
//!
//! `Reader` es el contrato de la aplicación web (sólo consultas); `Writer`
//! (Reader + mutaciones) el del scraper. Son los únicos puntos de
//! acoplamiento con los procesos colaboradores. Cada operación es una ida y
//! vuelta independiente sobre el pool compartido: se prepara, ejecuta y
//! materializa completa antes de devolver (sin cursores a través del
//! contrato).

use async_trait::async_trait;
use chrono::NaiveDate;
use snow_domain::{DailySnowfall, PeakPeriod, Resort, ResortSnowfallStats, ResortWithPeaks, SnowDepthReading};

use crate::error::RepositoryError;

/// Acceso de sólo lectura al dataset de nieve.
///
/// Todas las operaciones son seguras de reintentar y de ejecutar en
/// concurrencia con escrituras (sujeto al nivel de aislamiento del backend).
#[async_trait]
pub trait Reader: Send + Sync {
    /// Búsqueda exacta por slug. `NotFound` si no hay fila.
    async fn get_resort_by_slug(&self, slug: &str) -> Result<Resort, RepositoryError>;

    /// Búsqueda exacta por id interno. `NotFound` si no hay fila.
    async fn get_resort_by_id(&self, id: &str) -> Result<Resort, RepositoryError>;

    /// Ranking histórico de estaciones para la semana de 7 días que empieza
    /// en `week_start` (sólo cuentan mes y día; el año se ignora). Por
    /// estación y año histórico se suma la nevada de la semana y se promedia
    /// entre años; sólo aparecen estaciones con al menos un año de datos.
    /// Los empates se resuelven en el orden natural del backend: los
    /// llamadores no deben depender del orden entre empatados.
    async fn get_snowiest_resorts_for_week(
        &self,
        week_start: NaiveDate,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError>;

    /// Igual que [`Reader::get_snowiest_resorts_for_week`], filtrado a una
    /// prefectura.
    async fn get_snowiest_resorts_for_week_by_prefecture(
        &self,
        week_start: NaiveDate,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError>;

    /// Generaliza la consulta semanal a un rango `MM-DD`..`MM-DD` arbitrario.
    /// Si `start_date > end_date` (lexicográfico) la ventana cruza el límite
    /// de año ("12-15".."01-15"). Devuelve además los atributos estáticos y
    /// el conteo de años con datos.
    async fn get_snowiest_resorts_for_date_range(
        &self,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError>;

    /// Igual que [`Reader::get_snowiest_resorts_for_date_range`], filtrado a
    /// una prefectura.
    async fn get_snowiest_resorts_for_date_range_by_prefecture(
        &self,
        start_date: &str,
        end_date: &str,
        prefecture: &str,
        limit: i64,
    ) -> Result<Vec<ResortSnowfallStats>, RepositoryError>;

    /// Toda estación con al menos un período pico, cada una con sus picos
    /// ordenados por rank ascendente.
    async fn get_all_resorts_with_peaks(&self) -> Result<Vec<ResortWithPeaks>, RepositoryError>;

    /// Períodos pico de una estación, ordenados por rank ascendente.
    /// Secuencia vacía (no error) si no hay ninguno.
    async fn get_peak_periods_for_resort(
        &self,
        resort_id: &str,
    ) -> Result<Vec<PeakPeriod>, RepositoryError>;
}

/// Acceso completo de lectura/escritura: toda implementación de `Writer`
/// satisface también el contrato de lectura.
///
/// Las tres mutaciones siguen el protocolo de upsert: la clave natural
/// determina la identidad, re-enviar la misma tupla es un no-op en efecto y
/// re-enviar con atributos cambiados sobreescribe los campos mutables.
#[async_trait]
pub trait Writer: Reader {
    /// Upsert de estación con clave `slug`. Si `resort.id` está vacío se
    /// asigna un identificador nuevo antes del insert; en conflicto se
    /// sobreescriben los atributos mutables y se refresca `last_updated`,
    /// nunca `id` ni `slug`. El id y el `last_updated` almacenados se
    /// escriben de vuelta en el registro del llamador.
    async fn save_resort(&self, resort: &mut Resort) -> Result<(), RepositoryError>;

    /// Upsert masivo de lecturas de espesor con clave (resort_id, date).
    /// Lote vacío es no-op. El lote completo se aplica como una unidad
    /// atómica: si cualquier fila falla, no se aplica ninguna y el llamador
    /// debe reintentar el lote entero.
    async fn save_snow_depth_readings(
        &self,
        readings: &[SnowDepthReading],
    ) -> Result<(), RepositoryError>;

    /// Upsert masivo de nevadas diarias; contrato idéntico a
    /// [`Writer::save_snow_depth_readings`].
    async fn save_daily_snowfall(&self, snowfalls: &[DailySnowfall]) -> Result<(), RepositoryError>;
}
