//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una sola vez y expone `AppConfig`:
//! ubicación del bundle desplegado y overrides de ejecución del predictor
//! externo (intérprete, timeout) que dependen del host y no del bundle.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use etox_artifact::DEFAULT_ARTIFACT_NAME;
use etox_engine::RunnerSettings;
use once_cell::sync::Lazy;

use crate::errors::CoreError;

pub const ENV_BUNDLE_DIR: &str = "ETOX_BUNDLE_DIR";
pub const ENV_ARTIFACT_NAME: &str = "ETOX_ARTIFACT_NAME";
pub const ENV_PYTHON: &str = "ETOX_PYTHON";
pub const ENV_TIMEOUT_SECS: &str = "ETOX_TIMEOUT_SECS";
pub const DEFAULT_BUNDLE_DIR: &str = "./bundle";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bundle: BundleConfig,
    pub runner: RunnerOverrides,
}

/// Dónde está el bundle desplegado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    pub dir: PathBuf,
    pub artifact_name: String,
}

/// Overrides sobre los parámetros persistidos en el bundle. `None` conserva
/// el valor del bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerOverrides {
    pub interpreter: Option<String>,
    /// `Some(0)` desactiva el timeout.
    pub timeout_secs: Option<u64>,
}

impl RunnerOverrides {
    pub fn apply_to(&self, settings: &mut RunnerSettings) {
        if let Some(interpreter) = &self.interpreter {
            settings.interpreter = interpreter.clone();
        }
        match self.timeout_secs {
            Some(0) => settings.timeout = None,
            Some(secs) => settings.timeout = Some(Duration::from_secs(secs)),
            None => {}
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración desde una función de búsqueda arbitraria
    /// (permite testear sin tocar el entorno del proceso).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let dir = get(ENV_BUNDLE_DIR).unwrap_or_else(|| DEFAULT_BUNDLE_DIR.to_string());
        let artifact_name = get(ENV_ARTIFACT_NAME).unwrap_or_else(|| DEFAULT_ARTIFACT_NAME.to_string());
        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| CoreError::InvalidVar { key: ENV_TIMEOUT_SECS,
                                                                                    value: raw.clone(),
                                                                                    reason: e.to_string() })?),
            None => None,
        };
        Ok(AppConfig { bundle: BundleConfig { dir: PathBuf::from(dir),
                                              artifact_name },
                       runner: RunnerOverrides { interpreter: get(ENV_PYTHON),
                                                 timeout_secs } })
    }
}
