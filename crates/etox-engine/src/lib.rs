//! etox-engine: invocación del predictor eToxPred como proceso externo.
//!
//! Este crate provee:
//! - `PredictorConfig` y `RunnerSettings`: dónde viven el código externo
//!   (framework) y el checkpoint, y cómo se lanza el proceso.
//! - `Predictor`: arma un directorio temporal por corrida, escribe el archivo
//!   de entrada, ejecuta el script externo (argv directo, sin shell) y parsea
//!   el CSV resultante.
//! - `CancellationToken` para abortar una corrida en curso.
//!
//! Nota: el crate es síncrono y bloqueante; quien necesite async debe
//! delegar a un pool bloqueante.
use std::path::PathBuf;
use std::time::Duration;

use etox_domain::DomainError;
use thiserror::Error;

pub mod cancel;
pub mod config;
pub mod output;
pub mod predictor;
pub mod process;
pub mod workspace;

pub use cancel::CancellationToken;
pub use config::{PredictorConfig, RunnerSettings, CHECKPOINT_FILE, DEFAULT_INTERPRETER, PREDICT_SCRIPT};
pub use predictor::Predictor;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("predictor sin configurar: falta {0}")]
    NotConfigured(&'static str),
    #[error("directorio framework inexistente: {}", .0.display())]
    FrameworkDirMissing(PathBuf),
    #[error("checkpoint inexistente: {}", .0.display())]
    CheckpointMissing(PathBuf),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("no se pudo lanzar '{program}': {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("'{program}' terminó con código {code:?}: {stderr}")]
    ProcessFailed { program: String, code: Option<i32>, stderr: String },
    #[error("timeout tras {0:?}")]
    Timeout(Duration),
    #[error("corrida cancelada")]
    Cancelled,
    #[error("salida malformada: {0}")]
    MalformedOutput(String),
    #[error("valor inválido en fila {row}, columna '{column}': {value:?}")]
    InvalidValue { row: usize, column: String, value: String },
    #[error("Error CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
