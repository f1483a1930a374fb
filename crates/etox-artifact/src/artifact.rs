//! Artifact eToxPred: maneja la ubicación de checkpoints y framework al
//! empaquetar (`save`) y desempaquetar (`load`) un bundle de despliegue.
//!
//! Layout del bundle bajo `<base>`:
//! - `<name>.json`: `ConfigRecord` versionado.
//! - `checkpoints/`: copia del directorio de checkpoints.
//! - `framework/`: copia del código del predictor externo.
use std::fs;
use std::path::{Path, PathBuf};

use etox_engine::Predictor;
use log::{debug, info};

use crate::fs::{copy_tree, digest_tree, prepare_destination};
use crate::record::{ConfigRecord, Manifest};
use crate::ArtifactError;

pub const CHECKPOINTS_BASEDIR: &str = "checkpoints";
pub const FRAMEWORK_BASEDIR: &str = "framework";
pub const DEFAULT_ARTIFACT_NAME: &str = "model";
const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct EToxArtifact {
    name: String,
    model: Option<Predictor>,
}

impl Default for EToxArtifact {
    fn default() -> Self { Self::new(DEFAULT_ARTIFACT_NAME) }
}

impl EToxArtifact {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(),
               model: None }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn record_path(&self, base_path: &Path) -> PathBuf { base_path.join(format!("{}.{RECORD_EXTENSION}", self.name)) }

    /// Guarda el predictor sin validarlo.
    pub fn pack(&mut self, predictor: Predictor) -> &mut Self {
        self.model = Some(predictor);
        self
    }

    pub fn get(&self) -> Option<&Predictor> { self.model.as_ref() }

    pub fn into_inner(self) -> Option<Predictor> { self.model }

    /// Copia checkpoints y framework bajo `dst` y escribe el registro de
    /// configuración. Ambos destinos se validan antes de copiar nada.
    pub fn save(&self, dst: &Path) -> Result<ConfigRecord, ArtifactError> {
        let model = self.model.as_ref().ok_or(ArtifactError::NotPacked)?;
        let config = model.config();
        let checkpoints_src = config.checkpoints_dir().ok_or(ArtifactError::NotConfigured("checkpoints_dir"))?;
        let framework_src = config.framework_dir().ok_or(ArtifactError::NotConfigured("framework_dir"))?;
        for src in [checkpoints_src, framework_src] {
            if !src.is_dir() {
                return Err(ArtifactError::SourceMissing(src.to_path_buf()));
            }
        }
        debug!("save:start artifact={} dst={}", self.name, dst.display());

        fs::create_dir_all(dst)?;
        let checkpoints_dst = dst.join(CHECKPOINTS_BASEDIR);
        let framework_dst = dst.join(FRAMEWORK_BASEDIR);
        prepare_destination(&checkpoints_dst)?;
        prepare_destination(&framework_dst)?;

        let n_ckpt = copy_tree(checkpoints_src, &checkpoints_dst)?;
        let n_fw = copy_tree(framework_src, &framework_dst)?;
        let manifest = Manifest { checkpoints: digest_tree(&checkpoints_dst)?,
                                  framework: digest_tree(&framework_dst)? };
        let record = ConfigRecord::from_predictor(&self.name, model, manifest)?;
        record.write(&self.record_path(dst))?;
        info!("save:done artifact={} dst={} checkpoint_files={n_ckpt} framework_files={n_fw}",
              self.name,
              dst.display());
        Ok(record)
    }

    /// Lee el registro bajo `path`, reescribe ambas rutas a las copias del
    /// bundle (las rutas del empaquetado no son portables) y empaqueta.
    pub fn load(&mut self, path: &Path) -> Result<&mut Self, ArtifactError> {
        let record = self.read_record(path)?;
        let mut predictor = record.to_predictor();
        predictor.set_checkpoints_dir(path.join(CHECKPOINTS_BASEDIR))?;
        predictor.set_framework_dir(path.join(FRAMEWORK_BASEDIR))?;
        debug!("load:done artifact={} path={} packed_at={}", self.name, path.display(), record.created_at);
        Ok(self.pack(predictor))
    }

    pub fn read_record(&self, path: &Path) -> Result<ConfigRecord, ArtifactError> { ConfigRecord::read(&self.record_path(path)) }

    /// Recalcula el manifest del bundle en `path` y lo compara con el
    /// registrado al guardar.
    pub fn verify(&self, path: &Path) -> Result<ConfigRecord, ArtifactError> {
        let record = self.read_record(path)?;
        let actual = Manifest { checkpoints: digest_tree(&path.join(CHECKPOINTS_BASEDIR))?,
                                framework: digest_tree(&path.join(FRAMEWORK_BASEDIR))? };
        if let Some((section, file)) = record.manifest.first_difference(&actual) {
            return Err(ArtifactError::ManifestMismatch { section, path: file });
        }
        Ok(record)
    }
}

/// Atajo: carga el artifact `name` desde `path` y devuelve el predictor.
pub fn load_predictor(path: &Path, name: &str) -> Result<Predictor, ArtifactError> {
    let mut artifact = EToxArtifact::new(name);
    artifact.load(path)?;
    artifact.into_inner().ok_or(ArtifactError::NotPacked)
}
