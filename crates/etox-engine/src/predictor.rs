use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use etox_domain::{PredictionRecord, PredictionRequest};
use log::{debug, warn};

use crate::config::{PredictorConfig, RunnerSettings};
use crate::output::parse_predictions;
use crate::process::{run_to_completion, WaitLimits};
use crate::workspace::RunWorkspace;
use crate::{CancellationToken, EngineError};

/// Predictor eToxPred: una corrida del programa externo por lote.
#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: PredictorConfig,
    settings: RunnerSettings,
}

impl Predictor {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { config: PredictorConfig::new(),
               settings }
    }

    pub fn with_config(config: PredictorConfig, settings: RunnerSettings) -> Self { Self { config, settings } }

    pub fn load(&mut self, framework_dir: impl AsRef<Path>, checkpoints_dir: impl AsRef<Path>) -> Result<(), EngineError> {
        self.config.load(framework_dir, checkpoints_dir)
    }
    pub fn set_framework_dir(&mut self, dest: impl AsRef<Path>) -> Result<(), EngineError> { self.config.set_framework_dir(dest) }
    pub fn set_checkpoints_dir(&mut self, dest: impl AsRef<Path>) -> Result<(), EngineError> {
        self.config.set_checkpoints_dir(dest)
    }

    pub fn config(&self) -> &PredictorConfig { &self.config }
    pub fn settings(&self) -> &RunnerSettings { &self.settings }
    pub fn settings_mut(&mut self) -> &mut RunnerSettings { &mut self.settings }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Vec<PredictionRecord>, EngineError> {
        self.predict_with_cancel(request, &CancellationToken::new())
    }

    /// Corre el lote completo. Un token ya cancelado rechaza incluso un lote
    /// vacío; un lote vacío retorna vacío sin lanzar el proceso externo. Las filas se devuelven en el orden del CSV de salida.
    pub fn predict_with_cancel(&self,
                               request: &PredictionRequest,
                               cancel: &CancellationToken)
                               -> Result<Vec<PredictionRecord>, EngineError> {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if request.is_empty() {
            debug!("predict:skip empty request");
            return Ok(Vec::new());
        }
        let (framework_dir, checkpoint) = self.preflight()?;

        let workspace = RunWorkspace::create()?;
        let run_id = workspace.run_id();
        let started = Instant::now();
        debug!("predict:start run_id={run_id} n={} dir={}", request.len(), workspace.path().display());

        let data_file = workspace.write_input(request)?;
        let pred_file = workspace.pred_file();
        let command = self.command(framework_dir, &data_file, &checkpoint, &pred_file);
        let limits = WaitLimits { timeout: self.settings.timeout,
                                  poll_interval: self.settings.poll_interval };
        run_to_completion(command, limits, cancel, &workspace.stderr_file())?;

        let records = parse_predictions(&pred_file)?;
        if records.len() != request.len() {
            warn!("predict:row count mismatch run_id={run_id} expected={} got={}", request.len(), records.len());
        }
        debug!("predict:done run_id={run_id} rows={} elapsed_ms={}", records.len(), started.elapsed().as_millis());
        Ok(records)
    }

    /// Verifica directorios y checkpoint antes de lanzar nada.
    fn preflight(&self) -> Result<(&Path, PathBuf), EngineError> {
        let framework_dir = self.config.framework_dir().ok_or(EngineError::NotConfigured("framework_dir"))?;
        let checkpoints_dir = self.config.checkpoints_dir().ok_or(EngineError::NotConfigured("checkpoints_dir"))?;
        if !framework_dir.is_dir() {
            return Err(EngineError::FrameworkDirMissing(framework_dir.to_path_buf()));
        }
        let checkpoint = checkpoints_dir.join(&self.settings.checkpoint_file);
        if !checkpoint.is_file() {
            return Err(EngineError::CheckpointMissing(checkpoint));
        }
        Ok((framework_dir, checkpoint))
    }

    fn command(&self, framework_dir: &Path, data_file: &Path, checkpoint: &Path, pred_file: &Path) -> Command {
        let args: [OsString; 7] = [self.settings.script.clone().into(),
                                   "--datafile".into(),
                                   data_file.into(),
                                   "--modelfile".into(),
                                   checkpoint.into(),
                                   "--outputfile".into(),
                                   pred_file.into()];
        let mut command = Command::new(&self.settings.interpreter);
        command.args(args).current_dir(framework_dir);
        command
    }
}
