//! Registro versionado de configuración del predictor (`<name>.json`).
//!
//! Reemplaza la serialización opaca del objeto predictor por un JSON
//! explícito con `schema_version`:
//! - Campos desconocidos se ignoran al leer (compatibilidad hacia adelante).
//! - Una versión ausente o mayor a la soportada se rechaza antes de
//!   deserializar.
//! - Las rutas guardadas son las del momento del empaquetado; sólo son
//!   informativas porque `load` las reescribe a la ubicación del bundle.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use etox_engine::{Predictor, RunnerSettings};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::ArtifactError;

/// Contrato de un registro JSON con versión de esquema.
pub trait VersionedRecord: Sized + Serialize + DeserializeOwned {
    /// Incrementar en cambios incompatibles.
    const SCHEMA_VERSION: u32;

    fn version_field_name() -> &'static str { "schema_version" }

    fn to_json_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.entry(Self::version_field_name().to_string()).or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Ok(serde_json::to_vec_pretty(&value)?)
    }

    fn from_json_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let found = value.get(Self::version_field_name()).and_then(Value::as_u64);
        match found {
            Some(v) if v >= 1 && v <= u64::from(Self::SCHEMA_VERSION) => Ok(serde_json::from_value(value)?),
            _ => Err(ArtifactError::UnsupportedSchema { found,
                                                        supported: Self::SCHEMA_VERSION }),
        }
    }
}

/// Parámetros de lanzamiento persistidos (el intervalo de polling no viaja).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerRecord {
    pub interpreter: String,
    pub script: String,
    pub checkpoint_file: String,
    /// Milisegundos; `None` o `0` significan sin timeout, igual que en el
    /// entorno y en la CLI.
    pub timeout_ms: Option<u64>,
}

/// Redondea hacia arriba al milisegundo para no acortar nunca el límite.
fn timeout_to_ms(timeout: Duration) -> Option<u64> {
    if timeout.is_zero() {
        return None;
    }
    let ms = timeout.as_nanos().div_ceil(1_000_000);
    Some(u64::try_from(ms).unwrap_or(u64::MAX))
}

impl From<&RunnerSettings> for RunnerRecord {
    fn from(s: &RunnerSettings) -> Self {
        Self { interpreter: s.interpreter.clone(),
               script: s.script.clone(),
               checkpoint_file: s.checkpoint_file.clone(),
               timeout_ms: s.timeout.and_then(timeout_to_ms) }
    }
}

impl From<&RunnerRecord> for RunnerSettings {
    fn from(r: &RunnerRecord) -> Self {
        Self { interpreter: r.interpreter.clone(),
               script: r.script.clone(),
               checkpoint_file: r.checkpoint_file.clone(),
               timeout: r.timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
               ..RunnerSettings::default() }
    }
}

/// Hash de contenido de los directorios copiados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub checkpoints: BTreeMap<String, String>,
    pub framework: BTreeMap<String, String>,
}

impl Manifest {
    /// Primera diferencia `(sección, ruta)` contra `actual`, si existe.
    pub fn first_difference(&self, actual: &Manifest) -> Option<(&'static str, String)> {
        diff_section(&self.checkpoints, &actual.checkpoints).map(|p| ("checkpoints", p))
                                                            .or_else(|| diff_section(&self.framework, &actual.framework).map(|p| ("framework", p)))
    }
}

fn diff_section(expected: &BTreeMap<String, String>, actual: &BTreeMap<String, String>) -> Option<String> {
    expected.keys()
            .chain(actual.keys())
            .find(|k| expected.get(*k) != actual.get(*k))
            .cloned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub schema_version: u32,
    pub artifact_name: String,
    pub created_at: DateTime<Utc>,
    pub framework_dir: PathBuf,
    pub checkpoints_dir: PathBuf,
    pub runner: RunnerRecord,
    #[serde(default)]
    pub manifest: Manifest,
}

impl VersionedRecord for ConfigRecord {
    const SCHEMA_VERSION: u32 = 1;
}

impl ConfigRecord {
    pub fn from_predictor(artifact_name: &str, predictor: &Predictor, manifest: Manifest) -> Result<Self, ArtifactError> {
        let config = predictor.config();
        let framework_dir = config.framework_dir().ok_or(ArtifactError::NotConfigured("framework_dir"))?;
        let checkpoints_dir = config.checkpoints_dir().ok_or(ArtifactError::NotConfigured("checkpoints_dir"))?;
        Ok(Self { schema_version: Self::SCHEMA_VERSION,
                  artifact_name: artifact_name.to_string(),
                  created_at: Utc::now(),
                  framework_dir: framework_dir.to_path_buf(),
                  checkpoints_dir: checkpoints_dir.to_path_buf(),
                  runner: RunnerRecord::from(predictor.settings()),
                  manifest })
    }

    /// Predictor con los parámetros persistidos y sin rutas configuradas.
    pub fn to_predictor(&self) -> Predictor { Predictor::new(RunnerSettings::from(&self.runner)) }

    pub fn write(&self, path: &Path) -> Result<(), ArtifactError> {
        fs::write(path, self.to_json_bytes()?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, ArtifactError> { Self::from_json_bytes(&fs::read(path)?) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "schema_version": 1,
            "artifact_name": "model",
            "created_at": "2024-01-01T00:00:00Z",
            "framework_dir": "/old/framework",
            "checkpoints_dir": "/old/checkpoints",
            "runner": {"interpreter": "python", "script": "etoxpred_predict.py",
                       "checkpoint_file": "etoxpred_best_model.joblib", "timeout_ms": 600000},
            "manifest": {"checkpoints": {"etoxpred_best_model.joblib": "ab"}, "framework": {}}
        })
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut v = sample();
        v["added_in_future"] = json!({"x": 1});
        let rec = ConfigRecord::from_json_bytes(&serde_json::to_vec(&v).unwrap()).unwrap();
        assert_eq!(rec.artifact_name, "model");
        assert_eq!(rec.runner.timeout_ms, Some(600_000));
    }

    #[test]
    fn runner_timeout_keeps_sub_second_precision() {
        let settings = RunnerSettings { timeout: Some(Duration::from_millis(500)),
                                        ..RunnerSettings::default() };
        let rec = RunnerRecord::from(&settings);
        assert_eq!(rec.timeout_ms, Some(500));
        assert_eq!(RunnerSettings::from(&rec), settings);

        let tiny = RunnerSettings { timeout: Some(Duration::from_micros(10)),
                                    ..RunnerSettings::default() };
        assert_eq!(RunnerRecord::from(&tiny).timeout_ms, Some(1));
    }

    #[test]
    fn zero_timeout_means_disabled() {
        let mut rec = RunnerRecord::from(&RunnerSettings::default());
        rec.timeout_ms = Some(0);
        assert_eq!(RunnerSettings::from(&rec).timeout, None);

        let zero = RunnerSettings { timeout: Some(Duration::ZERO),
                                    ..RunnerSettings::default() };
        assert_eq!(RunnerRecord::from(&zero).timeout_ms, None);
    }

    #[test]
    fn rejects_missing_or_newer_version() {
        let mut v = sample();
        v["schema_version"] = json!(2);
        let err = ConfigRecord::from_json_bytes(&serde_json::to_vec(&v).unwrap()).unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedSchema { found: Some(2), supported: 1 }));

        v.as_object_mut().unwrap().remove("schema_version");
        let err = ConfigRecord::from_json_bytes(&serde_json::to_vec(&v).unwrap()).unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedSchema { found: None, .. }));
    }

    #[test]
    fn runner_record_maps_settings() {
        let rec = ConfigRecord::from_json_bytes(&serde_json::to_vec(&sample()).unwrap()).unwrap();
        let p = rec.to_predictor();
        assert_eq!(p.settings().timeout, Some(Duration::from_secs(600)));
        assert!(p.config().framework_dir().is_none());
        assert_eq!(RunnerRecord::from(p.settings()), rec.runner);
    }

    #[test]
    fn manifest_difference() {
        let mut a = Manifest::default();
        a.framework.insert("etoxpred_predict.py".into(), "11".into());
        let mut b = a.clone();
        assert_eq!(a.first_difference(&b), None);
        b.framework.insert("etoxpred_predict.py".into(), "22".into());
        assert_eq!(a.first_difference(&b), Some(("framework", "etoxpred_predict.py".to_string())));
        b.checkpoints.insert("extra.bin".into(), "33".into());
        assert_eq!(a.first_difference(&b), Some(("checkpoints", "extra.bin".to_string())));
    }
}
