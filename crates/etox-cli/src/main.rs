use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use etox_artifact::{ArtifactError, EToxArtifact, DEFAULT_ARTIFACT_NAME};
use etox_domain::PredictionRequest;
use etox_engine::{EngineError, Predictor, RunnerSettings};
use etoxflow_rust::{AppConfig, CoreError, EToxService, ServiceError, ToxicityService};
use log::info;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "etox", version, about = "Empaquetado y predicción con eToxPred")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copia framework y checkpoints a un bundle desplegable
    Pack {
        #[arg(long)]
        framework: PathBuf,
        #[arg(long)]
        checkpoints: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = DEFAULT_ARTIFACT_NAME)]
        name: String,
        /// Intérprete a registrar en el bundle (default: python)
        #[arg(long)]
        interpreter: Option<String>,
        /// Timeout a registrar; 0 desactiva
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Muestra el registro de configuración del bundle
    Inspect(BundleArgs),
    /// Verifica el contenido del bundle contra su manifest
    Verify(BundleArgs),
    /// Predice una lista de SMILES y emite los resultados como JSON
    Predict {
        #[command(flatten)]
        bundle: BundleArgs,
        #[arg(long = "smiles")]
        smiles: Vec<String>,
        /// Archivo con un SMILES por línea
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Lee un lote JSON por stdin y escribe el lote de salida por stdout
    Serve(BundleArgs),
}

/// Ubicación del bundle; lo omitido se toma de ETOX_BUNDLE_DIR / ETOX_ARTIFACT_NAME.
#[derive(Debug, Args)]
struct BundleArgs {
    #[arg(long)]
    bundle: Option<PathBuf>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// 4: entrada inválida o recurso inexistente; 5: error de ejecución.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Json(_) | CliError::Core(CoreError::InvalidVar { .. }) => 4,
            CliError::Service(ServiceError::InvalidRequest(_) | ServiceError::Domain(_)) => 4,
            CliError::Service(ServiceError::Artifact(e)) | CliError::Artifact(e) => artifact_exit_code(e),
            _ => 5,
        }
    }
}

fn artifact_exit_code(e: &ArtifactError) -> u8 {
    match e {
        ArtifactError::SourceMissing(_) | ArtifactError::NotPacked | ArtifactError::DestinationNotEmpty(_) => 4,
        ArtifactError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => 4,
        _ => 5,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // El bridge tracing-log reenvía los `log::` de los crates del workspace.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[etox] error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Pack { framework,
                        checkpoints,
                        out,
                        name,
                        interpreter,
                        timeout_secs, } => pack(&framework, &checkpoints, &out, &name, interpreter, timeout_secs),
        Command::Inspect(args) => {
            let config = resolve(&args)?;
            let record = EToxArtifact::new(&config.bundle.artifact_name).read_record(&config.bundle.dir)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Verify(args) => {
            let config = resolve(&args)?;
            EToxArtifact::new(&config.bundle.artifact_name).verify(&config.bundle.dir)?;
            println!("ok: {}", config.bundle.dir.display());
            Ok(())
        }
        Command::Predict { bundle, smiles, file } => {
            let config = resolve(&bundle)?;
            let mut raw = smiles;
            if let Some(path) = file {
                raw.extend(read_smiles_file(&path)?);
            }
            if raw.is_empty() {
                return Err(CliError::Usage("se requiere al menos un --smiles o --file".into()));
            }
            let request = PredictionRequest::from_strings(&raw).map_err(ServiceError::from)?;
            let service = EToxService::from_config(&config)?;
            let records = service.predict_request(request).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Command::Serve(args) => {
            let config = resolve(&args)?;
            let service = EToxService::from_config(&config)?;
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let batch = match serde_json::from_str::<Value>(&input)? {
                Value::Array(items) => items,
                _ => return Err(CliError::Usage("el lote de entrada debe ser una lista JSON".into())),
            };
            let output = service.predict(batch).await?;
            println!("{}", serde_json::to_string(&output)?);
            Ok(())
        }
    }
}

fn pack(framework: &Path,
        checkpoints: &Path,
        out: &Path,
        name: &str,
        interpreter: Option<String>,
        timeout_secs: Option<u64>)
        -> Result<(), CliError> {
    let mut settings = RunnerSettings::default();
    if let Some(interpreter) = interpreter {
        settings.interpreter = interpreter;
    }
    if let Some(secs) = timeout_secs {
        settings.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    let mut predictor = Predictor::new(settings);
    predictor.load(framework, checkpoints)?;
    let mut artifact = EToxArtifact::new(name);
    let record = artifact.pack(predictor).save(out)?;
    info!("pack:done out={} files={}",
          out.display(),
          record.manifest.checkpoints.len() + record.manifest.framework.len());
    println!("bundle creado: {} ({})", out.display(), artifact.record_path(out).display());
    Ok(())
}

/// Config del entorno con los argumentos explícitos por encima.
fn resolve(args: &BundleArgs) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = &args.bundle {
        config.bundle.dir = dir.clone();
    }
    if let Some(name) = &args.name {
        config.bundle.artifact_name = name.clone();
    }
    Ok(config)
}

fn read_smiles_file(path: &Path) -> Result<Vec<String>, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines()
              .map(str::trim)
              .filter(|l| !l.is_empty())
              .map(str::to_string)
              .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

    #[test]
    fn parses_predict_with_repeated_smiles() {
        let cli = Cli::try_parse_from(["etox", "predict", "--bundle", "/b", "--smiles", "CCO", "--smiles", "c1ccccc1"]).unwrap();
        match cli.command {
            Command::Predict { bundle, smiles, file } => {
                assert_eq!(bundle.bundle, Some(PathBuf::from("/b")));
                assert_eq!(smiles, vec!["CCO", "c1ccccc1"]);
                assert!(file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pack_requires_paths() {
        assert!(Cli::try_parse_from(["etox", "pack", "--framework", "/f"]).is_err());
        let cli = Cli::try_parse_from(["etox", "pack", "--framework", "/f", "--checkpoints", "/c", "--out", "/o"]).unwrap();
        assert!(matches!(cli.command, Command::Pack { ref name, .. } if name == "model"));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), 4);
        assert_eq!(CliError::Artifact(ArtifactError::DestinationNotEmpty("/o".into())).exit_code(), 4);
        assert_eq!(CliError::Service(ServiceError::Engine(EngineError::Cancelled)).exit_code(), 5);
        let nf = std::io::Error::new(std::io::ErrorKind::NotFound, "model.json");
        assert_eq!(CliError::Service(ServiceError::Artifact(ArtifactError::Io(nf))).exit_code(), 4);
    }

    #[test]
    fn smiles_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.smi");
        std::fs::write(&path, "CCO\n\n  c1ccccc1  \n").unwrap();
        assert_eq!(read_smiles_file(&path).unwrap(), vec!["CCO", "c1ccccc1"]);
    }
}
