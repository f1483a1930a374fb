//! etox-artifact
//!
//! Empaquetado del predictor para despliegue: copia de directorios de
//! checkpoints/framework y registro versionado de configuración.
//!
//! Módulos:
//! - `artifact`: `EToxArtifact` (pack / save / load / get / verify).
//! - `record`: `ConfigRecord` JSON con `schema_version`.
//! - `fs`: copia recursiva y manifest sha256.
//! - `error`: `ArtifactError`.

pub mod artifact;
pub mod error;
pub mod fs;
pub mod record;

pub use artifact::{load_predictor, EToxArtifact, CHECKPOINTS_BASEDIR, DEFAULT_ARTIFACT_NAME, FRAMEWORK_BASEDIR};
pub use error::ArtifactError;
pub use record::{ConfigRecord, Manifest, RunnerRecord, VersionedRecord};
