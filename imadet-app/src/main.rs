mod app;
mod observer;

pub use app::App;
use imadet_staircase::SessionConfig;
use observer::SimulatedObserver;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let summary = App::new(config, SimulatedObserver::default())?.run()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
