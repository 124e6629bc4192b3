//! Errores de la capa de repositorio.
//! Mapea errores de sqlx / conexión a variantes semánticas, con el nombre de
//! la operación que falló como contexto. Nada se reintenta internamente: la
//! política de retry es del llamador (el upsert es idempotente por clave).

use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Una búsqueda de fila única no encontró nada.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    /// Deadline agotado adquiriendo conexión o ejecutando la sentencia.
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    /// Fallo decodificando una fila al registro de dominio.
    #[error("row decode error: {0}")]
    Decode(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl RepositoryError {
    /// Prefija el mensaje con la operación que falló.
    pub fn with_op(self, op: &str) -> Self {
        use RepositoryError::*;
        match self {
            NotFound(m) => NotFound(format!("{op}: {m}")),
            UniqueViolation(m) => UniqueViolation(format!("{op}: {m}")),
            ForeignKeyViolation(m) => ForeignKeyViolation(format!("{op}: {m}")),
            CheckViolation(m) => CheckViolation(format!("{op}: {m}")),
            Timeout(m) => Timeout(format!("{op}: {m}")),
            TransientIo(m) => TransientIo(format!("{op}: {m}")),
            Decode(m) => Decode(format!("{op}: {m}")),
            Unknown(m) => Unknown(format!("{op}: {m}")),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => Self::NotFound("row not found".into()),
            SqlxError::PoolTimedOut => Self::Timeout("pool acquire timed out".into()),
            SqlxError::PoolClosed => Self::TransientIo("pool closed".into()),
            SqlxError::WorkerCrashed => Self::TransientIo("connection worker crashed".into()),
            SqlxError::Io(e) => Self::TransientIo(format!("io: {e}")),
            SqlxError::Tls(e) => Self::TransientIo(format!("tls: {e}")),
            SqlxError::Protocol(e) => Self::TransientIo(format!("protocol: {e}")),
            SqlxError::ColumnDecode { index, source } => Self::Decode(format!("column {index}: {source}")),
            SqlxError::ColumnNotFound(c) => Self::Decode(format!("column not found: {c}")),
            SqlxError::ColumnIndexOutOfBounds { index, len } => {
                Self::Decode(format!("column index {index} out of bounds (len {len})"))
            }
            SqlxError::TypeNotFound { type_name } => Self::Decode(format!("type not found: {type_name}")),
            SqlxError::Decode(e) => Self::Decode(e.to_string()),
            SqlxError::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => Self::UniqueViolation(db.message().to_string()),
                sqlx::error::ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(db.message().to_string()),
                sqlx::error::ErrorKind::CheckViolation => Self::CheckViolation(db.message().to_string()),
                sqlx::error::ErrorKind::NotNullViolation => Self::CheckViolation(db.message().to_string()),
                _ => Self::Unknown(db.message().to_string()),
            },
            other => Self::Unknown(format!("unhandled sqlx error: {other:?}")),
        }
    }
}

/// Adaptador para `map_err`: convierte y añade la operación como contexto.
pub(crate) fn db_err(op: &'static str) -> impl FnOnce(SqlxError) -> RepositoryError {
    move |e| RepositoryError::from(e).with_op(op)
}
