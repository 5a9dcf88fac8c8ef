//! Subcommands and the setup they share.

pub mod batch;
pub mod config;
pub mod list;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use invscan_core::{Dispatcher, FileAcquirer, InvscanConfig, RegexInvoiceParser, SqliteStore};

/// Dispatcher wired to the production stages.
pub type FileDispatcher = Dispatcher<FileAcquirer, RegexInvoiceParser, SqliteStore>;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invscan")
        .join("config.json")
}

/// The `--config` path if given, else the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the explicit config file, or the default one when it exists.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvscanConfig> {
    if let Some(path) = config_path {
        return InvscanConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        Ok(InvscanConfig::from_file(&path)?)
    } else {
        Ok(InvscanConfig::default())
    }
}

/// Open the record store, honoring a `--db` override, and create its table.
pub fn open_store(config: &InvscanConfig, db: Option<&Path>) -> anyhow::Result<SqliteStore> {
    let path = db.unwrap_or(&config.storage.database_path);

    let store = SqliteStore::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", path.display(), e))?;
    store.ensure_schema()?;

    Ok(store)
}

/// Build a dispatcher for `config` writing into `store`.
pub fn build_dispatcher(
    config: &InvscanConfig,
    store: SqliteStore,
) -> anyhow::Result<FileDispatcher> {
    let acquirer = FileAcquirer::from_config(config);
    let parser = RegexInvoiceParser::from_config(&config.extraction)?;
    Ok(Dispatcher::new(acquirer, parser, store))
}
