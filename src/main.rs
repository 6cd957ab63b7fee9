mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use serve_videos::config;

fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    config::validate_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve_videos::start(config))
}

fn main() {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "serve_videos=trace,serve_videos_common=debug,tower_http=debug".to_string()
        } else {
            "serve_videos=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    if let Err(e) = run(cli) {
        eprintln!("serve-videos: {e:#}");
        std::process::exit(1);
    }
}
