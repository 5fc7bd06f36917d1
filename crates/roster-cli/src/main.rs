//! `roster` command line

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let matches = cli::command().get_matches();
    let config = cli::load_config(&matches)?;
    init_tracing(&config.log_filter, matches.get_flag("log-json"));
    tracing::debug!(version = roster_query::VERSION, "roster starting");

    let output = cli::run(&matches, &config)?;
    println!("{output}");
    Ok(())
}
