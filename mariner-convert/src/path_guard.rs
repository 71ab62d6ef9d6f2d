use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

pub fn ensure_input_dir(input: &Path) -> Result<()> {
    if !input.is_dir() {
        bail!(
            "input settings folder {} does not exist or is not a directory",
            input.display()
        );
    }
    Ok(())
}

/// Refuse an output folder that is the input folder or lies anywhere inside it.
///
/// A nested output would be walked as input by the next run and could
/// shadow source files.
pub fn ensure_output_outside_input(output: &Path, input: &Path) -> Result<()> {
    let out_norm = normalize_for_compare(output)
        .with_context(|| format!("failed to normalize output path {}", output.display()))?;
    let in_norm = normalize_for_compare(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;
    if out_norm == in_norm {
        bail!(
            "refusing to overwrite source settings: output {} matches input {}",
            output.display(),
            input.display()
        );
    }
    if out_norm.starts_with(&in_norm) {
        bail!(
            "refusing to write into source settings: output {} is inside input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

/// Absolute form of `path` with symlinks resolved as far as it exists on disk.
///
/// The longest existing ancestor is canonicalized and the missing tail is
/// appended, so a folder that will only be created later still compares
/// correctly against the input.
fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().context("current_dir")?.join(path)
    };
    let cleaned = lexical_clean(&absolute);

    for ancestor in cleaned.ancestors() {
        if !ancestor.exists() {
            continue;
        }
        let canonical = ancestor
            .canonicalize()
            .with_context(|| format!("canonicalize {}", ancestor.display()))?;
        let tail = cleaned.strip_prefix(ancestor).unwrap_or(Path::new(""));
        return Ok(canonical.join(tail));
    }
    Ok(cleaned)
}

/// Drop `.` segments and fold `..` into its parent without touching the disk.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
