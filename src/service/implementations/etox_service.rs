use std::sync::Arc;

use async_trait::async_trait;
use etox_artifact::{load_predictor, ArtifactError, EToxArtifact};
use etox_domain::{PredictionRecord, PredictionRequest};
use etox_engine::{CancellationToken, Predictor};
use log::{debug, error};
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::service::batch::{extract_request, wrap_output};
use crate::service::trait_service::ToxicityService;

/// Servicio eToxPred: delega cada lote al `Predictor` en el pool bloqueante
/// de tokio.
pub struct EToxService {
    name: String,
    version: String,
    predictor: Arc<Predictor>,
    shutdown: CancellationToken,
}

impl EToxService {
    pub fn new(predictor: Predictor) -> Self {
        Self { name: "etoxpred".into(),
               version: env!("CARGO_PKG_VERSION").into(),
               predictor: Arc::new(predictor),
               shutdown: CancellationToken::new() }
    }

    pub fn from_artifact(artifact: EToxArtifact) -> Result<Self, ServiceError> {
        let predictor = artifact.into_inner().ok_or(ArtifactError::NotPacked)?;
        Ok(Self::new(predictor))
    }

    /// Carga el bundle indicado por la configuración y aplica los overrides
    /// de ejecución del host.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut predictor = load_predictor(&config.bundle.dir, &config.bundle.artifact_name)?;
        config.runner.apply_to(predictor.settings_mut());
        Ok(Self::new(predictor))
    }

    pub fn predictor(&self) -> &Predictor { &self.predictor }

    /// Cancela las corridas en curso y rechaza las siguientes.
    pub fn shutdown(&self) { self.shutdown.cancel(); }

    pub async fn predict_request(&self, request: PredictionRequest) -> Result<Vec<PredictionRecord>, ServiceError> {
        let predictor = Arc::clone(&self.predictor);
        let token = self.shutdown.clone();
        let records = tokio::task::spawn_blocking(move || predictor.predict_with_cancel(&request, &token)).await??;
        Ok(records)
    }
}

#[async_trait]
impl ToxicityService for EToxService {
    fn get_name(&self) -> &str { &self.name }
    fn get_version(&self) -> &str { &self.version }
    fn get_description(&self) -> &str { "eToxPred toxicity and synthetic accessibility predictor" }

    async fn predict(&self, batched_input: Vec<Value>) -> Result<Vec<Value>, ServiceError> {
        let request = extract_request(&batched_input)?;
        debug!("service:predict n={}", request.len());
        let records = self.predict_request(request).await.map_err(|e| {
                                                              error!("service:predict failed err={e}");
                                                              e
                                                          })?;
        wrap_output(&records)
    }
}
