//! EToxFlow Rust Library
//!
//! Este crate actúa como el facade de servicio de eToxPred:
//! - Expone `service` con el contrato `ToxicityService` y su implementación
//!   `EToxService` sobre el predictor externo.
//! - Expone `config` para cargar la ubicación del bundle y los overrides de
//!   ejecución desde el entorno (.env).
//! - Expone `errors` para manejar errores de núcleo y de servicio.
//!
//! El predictor y el manejo del bundle viven en `etox-engine` y
//! `etox-artifact`; se re-exportan aquí por conveniencia.

pub mod config;
pub mod errors;
pub mod service;

pub use config::AppConfig;
pub use errors::{CoreError, ServiceError};
pub use etox_artifact::EToxArtifact;
pub use etox_domain::{PredictionRecord, PredictionRequest, Smiles};
pub use etox_engine::{Predictor, RunnerSettings};
pub use service::{EToxService, ToxicityService};
