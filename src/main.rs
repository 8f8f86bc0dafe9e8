use anyhow::Result;

fn main() -> Result<()> {
    let (config, validation) = tenki_core::Config::load_validated(None)?;

    // Held until exit so buffered log lines are flushed.
    let logging = tenki_core::init_logging(&config)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    tracing::info!("Tenki starting");
    tracing::info!("  Config directory: {}", config.config_dir.display());
    tracing::info!("  Log directory: {}", logging.log_dir().display());

    let result = tenki_tui::run(config);
    if let Err(e) = &result {
        tracing::error!("Tenki exited with error: {:#}", e);
    }
    result
}
