use thiserror::Error;

/// Errores de arranque del facade (configuración del host).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error de configuración: {key}={value:?}: {reason}")]
    InvalidVar { key: &'static str, value: String, reason: String },
}
