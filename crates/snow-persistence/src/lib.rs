//! snow-persistence
//!
//! Capa de persistencia compartida del dataset de nieve: la consume la
//! aplicación web (lectura) y el scraper (lectura/escritura), ambos sobre el
//! mismo pool de conexiones Postgres construido por el proceso anfitrión.
//!
//! Módulos:
//! - `repo`: contratos `Reader` / `Writer` (los únicos puntos de acoplamiento
//!   con los colaboradores).
//! - `pg`: implementaciones Postgres (sqlx) y construcción del pool.
//! - `config`: carga de configuración desde entorno / `.env`.
//! - `schema`: DDL idempotente de las cuatro tablas consumidas.
//! - `date_window`: predicado puro de ventanas `MM-DD` con cruce de año.
//! - `error`: taxonomía de errores del repositorio.

pub mod config;
pub mod date_window;
pub mod error;
pub mod pg;
pub mod repo;
pub mod schema;

pub use config::{init_dotenv, DbConfig, DEFAULT_DATABASE_URL};
pub use error::RepositoryError;
pub use pg::{build_pool, build_pool_lazy, PgPool, PgReader, PgWriter};
pub use repo::{Reader, Writer};
pub use schema::ensure_schema;
