//! Configuración del predictor: rutas (framework / checkpoints) y parámetros
//! de lanzamiento del proceso externo.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::EngineError;

/// Nombre fijo del checkpoint dentro del directorio de checkpoints.
pub const CHECKPOINT_FILE: &str = "etoxpred_best_model.joblib";
/// Script de predicción dentro del directorio framework.
pub const PREDICT_SCRIPT: &str = "etoxpred_predict.py";
pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Par de directorios que ubican al programa externo y sus pesos.
///
/// Se construye vacío y se puebla con `load` o con los setters (p.ej. tras
/// desempaquetar un bundle en otra ubicación). Ambas rutas se guardan
/// absolutas porque el proceso corre con cwd = framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictorConfig {
    framework_dir: Option<PathBuf>,
    checkpoints_dir: Option<PathBuf>,
}

impl PredictorConfig {
    pub fn new() -> Self { Self::default() }

    pub fn load(&mut self, framework_dir: impl AsRef<Path>, checkpoints_dir: impl AsRef<Path>) -> Result<(), EngineError> {
        self.set_framework_dir(framework_dir)?;
        self.set_checkpoints_dir(checkpoints_dir)
    }

    pub fn set_framework_dir(&mut self, dest: impl AsRef<Path>) -> Result<(), EngineError> {
        self.framework_dir = Some(std::path::absolute(dest.as_ref())?);
        Ok(())
    }

    pub fn set_checkpoints_dir(&mut self, dest: impl AsRef<Path>) -> Result<(), EngineError> {
        self.checkpoints_dir = Some(std::path::absolute(dest.as_ref())?);
        Ok(())
    }

    pub fn framework_dir(&self) -> Option<&Path> { self.framework_dir.as_deref() }
    pub fn checkpoints_dir(&self) -> Option<&Path> { self.checkpoints_dir.as_deref() }
}

/// Cómo se lanza el programa externo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Intérprete (o ejecutable) que recibe el script como primer argumento.
    pub interpreter: String,
    /// Script relativo al directorio framework.
    pub script: String,
    /// Nombre del checkpoint relativo al directorio de checkpoints.
    pub checkpoint_file: String,
    /// `None` = sin límite.
    pub timeout: Option<Duration>,
    pub poll_interval: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self { interpreter: DEFAULT_INTERPRETER.to_string(),
               script: PREDICT_SCRIPT.to_string(),
               checkpoint_file: CHECKPOINT_FILE.to_string(),
               timeout: Some(DEFAULT_TIMEOUT),
               poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_make_paths_absolute() {
        let mut cfg = PredictorConfig::new();
        assert!(cfg.framework_dir().is_none());
        cfg.set_framework_dir("relative/framework").unwrap();
        cfg.set_checkpoints_dir("relative/checkpoints").unwrap();
        assert!(cfg.framework_dir().unwrap().is_absolute());
        assert!(cfg.checkpoints_dir().unwrap().ends_with("relative/checkpoints"));
    }

    #[test]
    fn defaults_match_etoxpred_layout() {
        let s = RunnerSettings::default();
        assert_eq!(s.script, "etoxpred_predict.py");
        assert_eq!(s.checkpoint_file, "etoxpred_best_model.joblib");
        assert_eq!(s.timeout, Some(Duration::from_secs(600)));
    }
}
