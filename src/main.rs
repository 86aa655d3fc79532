use std::fs;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rowtree::{
    config::{Config, LogFormat},
    operations::build_catalog,
    types::{CatalogRow, ModelRecord},
    utils::{columns_header, format_tree},
};

fn main() -> eyre::Result<()> {
    let config = Config::from_env()?;
    let _guard = init_tracing(&config);

    let raw = fs::read_to_string(&config.catalog_path)?;
    let records: Vec<ModelRecord> = serde_json::from_str(&raw)?;
    info!(
        path = %config.catalog_path.display(),
        records = records.len(),
        "Loaded catalog records"
    );

    let root = build_catalog("ollama", &records, config.collapsed)?;
    config.sort.apply(&root)?;
    root.set_header(columns_header::<CatalogRow>());

    print!("{}", format_tree(&root));

    if let Some(path) = &config.output_path {
        fs::write(path, serde_json::to_string_pretty(&root)?)?;
        info!(path = %path.display(), nodes = root.size(), "Wrote catalog tree");
    }

    Ok(())
}

/// Installs the global subscriber: stderr in the configured format, plus a log
/// file when a log directory is set. The returned guard flushes the file on drop.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "rowtree.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    guard
}
