use driver_dispatch::config::{Config, LogFormat};
use driver_dispatch::error::AppError;
use driver_dispatch::scenario::Scenario;
use driver_dispatch::state::AppState;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    init_tracing(&config);

    let state = AppState::new(&config)?;
    let scenario = Scenario::from_path(&config.scenario_path)?;
    scenario.seed(&state.store)?;

    tracing::info!(
        scenario = %config.scenario_path,
        orders = scenario.orders.len(),
        "running scenario"
    );
    let report = scenario.run(&state)?;

    let body = serde_json::to_string_pretty(&report)
        .map_err(|err| AppError::Internal(format!("failed to serialize report: {err}")))?;
    println!("{body}");

    if config.print_metrics {
        print!("{}", state.metrics.encode().map_err(AppError::Internal)?);
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
