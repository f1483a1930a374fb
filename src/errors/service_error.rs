use etox_artifact::ArtifactError;
use etox_domain::DomainError;
use etox_engine::EngineError;
use thiserror::Error;

/// Errores del facade de servicio. Un error en cualquier entrada del lote
/// hace fallar el lote completo.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request inválido: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("Tarea de predicción abortada: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServiceError::Join(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_format() {
        let err = ServiceError::InvalidRequest("falta 'input'".into());
        assert_eq!(err.to_string(), "Request inválido: falta 'input'");
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err: ServiceError = EngineError::Cancelled.into();
        assert_eq!(err.to_string(), "corrida cancelada");
    }
}
