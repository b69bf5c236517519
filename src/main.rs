//! Service binary: env-derived configuration, logging, and server startup.

use std::sync::Arc;

use log::info;

use solvarr::{
    AppConfig, AppState, ChromeSessionFactory, Solver, SolverConfig, server,
};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env();
    info!(
        "starting {} v{} on port {}",
        config.instance,
        solvarr::VERSION,
        config.port
    );
    if let Some(ref proxy) = config.proxy {
        info!("routing browser sessions through {proxy}");
    }

    let solver_config = SolverConfig {
        proxy: config.proxy.clone(),
        ..SolverConfig::default()
    };

    let solver = Solver::builder(Arc::new(ChromeSessionFactory::new()))
        .with_config(solver_config)
        .build();

    let state = AppState {
        solver: Arc::new(solver),
        instance: config.instance.clone(),
    };

    server::serve(config.port, state).await
}
