//! Copia de directorios y manifest de contenido (sha256 por archivo).
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::ArtifactError;

/// Deja libre `path` para una copia: si existe y está vacío se elimina; si
/// tiene contenido (o es un archivo) se rechaza sin tocar nada.
pub fn prepare_destination(path: &Path) -> Result<(), ArtifactError> {
    if path.is_dir() {
        if fs::read_dir(path)?.next().is_some() {
            return Err(ArtifactError::DestinationNotEmpty(path.to_path_buf()));
        }
        fs::remove_dir(path)?;
    } else if path.exists() {
        return Err(ArtifactError::DestinationNotEmpty(path.to_path_buf()));
    }
    Ok(())
}

/// Copia recursiva `src` → `dst` siguiendo symlinks. Devuelve la cantidad de
/// archivos copiados.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, ArtifactError> {
    let mut files = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let target = dst.join(relative(src, entry.path())?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

/// Ruta relativa (separador `/`) → sha256 hex de cada archivo bajo `root`.
pub fn digest_tree(root: &Path) -> Result<BTreeMap<String, String>, ArtifactError> {
    let mut digests = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = relative(root, entry.path())?;
        let key = rel.components()
                     .map(|c| c.as_os_str().to_string_lossy().into_owned())
                     .collect::<Vec<_>>()
                     .join("/");
        let mut hasher = Sha256::new();
        io::copy(&mut File::open(entry.path())?, &mut hasher)?;
        digests.insert(key, format!("{:x}", hasher.finalize()));
    }
    Ok(digests)
}

fn relative<'a>(root: &Path, path: &'a Path) -> Result<&'a Path, ArtifactError> {
    path.strip_prefix(root).map_err(|e| ArtifactError::Io(io::Error::other(e)))
}
