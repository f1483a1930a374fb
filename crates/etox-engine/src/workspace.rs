//! Directorio temporal de una corrida.
//!
//! Cada llamada a `predict` obtiene su propio `RunWorkspace`; al soltarlo
//! (`Drop` de `TempDir`) el directorio se borra, también en caminos de error.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use etox_domain::PredictionRequest;
use tempfile::TempDir;
use uuid::Uuid;

use crate::EngineError;

pub const DATA_FILE: &str = "data.smi";
pub const PRED_FILE: &str = "pred.csv";
pub const STDERR_FILE: &str = "stderr.log";

#[cfg(windows)]
pub const LINE_SEP: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEP: &str = "\n";

pub struct RunWorkspace {
    run_id: Uuid,
    dir: TempDir,
}

impl RunWorkspace {
    pub fn create() -> Result<Self, EngineError> {
        let run_id = Uuid::new_v4();
        let dir = tempfile::Builder::new().prefix(&format!("etox-{run_id}-")).tempdir()?;
        Ok(Self { run_id, dir })
    }

    pub fn run_id(&self) -> Uuid { self.run_id }
    pub fn path(&self) -> &Path { self.dir.path() }
    pub fn data_file(&self) -> PathBuf { self.path().join(DATA_FILE) }
    pub fn pred_file(&self) -> PathBuf { self.path().join(PRED_FILE) }
    pub fn stderr_file(&self) -> PathBuf { self.path().join(STDERR_FILE) }

    /// Escribe `data.smi`: `<smiles>\t<molN>` por línea, en orden de entrada.
    pub fn write_input(&self, request: &PredictionRequest) -> Result<PathBuf, EngineError> {
        let path = self.data_file();
        let mut w = BufWriter::new(File::create(&path)?);
        for (smiles, mol_id) in request.entries() {
            write!(w, "{smiles}\t{mol_id}{LINE_SEP}")?;
        }
        w.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_tab_separated_input() {
        let ws = RunWorkspace::create().unwrap();
        let req = PredictionRequest::from_strings(["CCO", "c1ccccc1"]).unwrap();
        let path = ws.write_input(&req).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, format!("CCO\tmol0{LINE_SEP}c1ccccc1\tmol1{LINE_SEP}"));
    }

    #[test]
    fn directory_removed_on_drop() {
        let ws = RunWorkspace::create().unwrap();
        let dir = ws.path().to_path_buf();
        assert!(dir.is_dir());
        assert!(dir.file_name().unwrap().to_string_lossy().starts_with(&format!("etox-{}-", ws.run_id())));
        drop(ws);
        assert!(!dir.exists());
    }
}
