//! Errores del manejo de artifacts (bundle en disco).

use std::path::PathBuf;

use etox_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact sin modelo empaquetado (llamar pack/load primero)")]
    NotPacked,
    #[error("artifact sin configurar: falta {0}")]
    NotConfigured(&'static str),
    #[error("directorio fuente inexistente: {}", .0.display())]
    SourceMissing(PathBuf),
    #[error("destino existente y no vacío: {}", .0.display())]
    DestinationNotEmpty(PathBuf),
    #[error("schema_version no soportada: {found:?} (soportada <= {supported})")]
    UnsupportedSchema { found: Option<u64>, supported: u32 },
    #[error("manifest no coincide: {section}/{path}")]
    ManifestMismatch { section: &'static str, path: String },
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error recorriendo directorio: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
