//! Filename handling for uploads and downloads.
//!
//! Client-supplied names never reach the filesystem as paths: a name is
//! accepted only as a single component, and resolved reads are verified
//! to stay inside the configured base directory.

use std::path::{Path, PathBuf};

/// Accepts a bare filename: no separators, no parent references, no NUL.
pub fn nombre_archivo_valido(nombre: &str) -> bool {
    !nombre.is_empty()
        && nombre != "."
        && nombre != ".."
        && !nombre.contains('/')
        && !nombre.contains('\\')
        && !nombre.contains('\0')
}

/// Resolves `nombre` inside `base` and canonicalizes both sides. Returns
/// `Ok(None)` when the file is missing or the resolved path escapes the
/// base directory, so callers answer a plain not-found either way.
pub fn resolver_confinado(base: &Path, nombre: &str) -> anyhow::Result<Option<PathBuf>> {
    if !nombre_archivo_valido(nombre) {
        return Ok(None);
    }

    let canonical_base = match base.canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let ruta = canonical_base.join(nombre);
    let canonical = match ruta.canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if !canonical.starts_with(&canonical_base) {
        return Ok(None);
    }

    Ok(Some(canonical))
}

/// Writes uploaded bytes under `base`, creating the directory if needed.
/// The name must already have passed [`nombre_archivo_valido`].
pub async fn guardar_archivo(base: &Path, nombre: &str, datos: &[u8]) -> anyhow::Result<()> {
    if !nombre_archivo_valido(nombre) {
        anyhow::bail!("Nombre de archivo no permitido: {}", nombre);
    }

    tokio::fs::create_dir_all(base).await?;
    tokio::fs::write(base.join(nombre), datos).await?;
    Ok(())
}
