use eyre::{bail, WrapErr};
use std::path::Path;
use tabstore_cache::StorageManager;
use tabstore_utils::write_atomic_string;

pub fn export(manager: &StorageManager, output: Option<&Path>) -> eyre::Result<()> {
    let document = manager.export_data();
    match output {
        Some(path) => {
            write_atomic_string(path, &document)?;
            tracing::info!("Exported storage to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

pub fn import(manager: &StorageManager, file: &Path) -> eyre::Result<()> {
    let document = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;

    if !manager.import_data(&document) {
        bail!("{} is not a JSON object", file.display());
    }
    tracing::info!("Imported {}", file.display());
    Ok(())
}
