use anyhow::Context;
use clap::Parser;
use stratus::cli::{Cli, Commands};
use stratus::types::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration is loaded before logging exists.
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    } else {
        Config::default_config()
    };
    config.apply_env_overrides()?;

    // CLI flags take precedence over config.
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("stratus={}", log_level)
            .parse()
            .unwrap_or_else(|_| "stratus=info".parse().expect("fallback directive is valid")),
    );

    let json_layer = (config.general.log_format == "json")
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (config.general.log_format != "json")
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter)
        .init();

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            stratus::cli::commands::init(path).await?;
        }
        Commands::Serve => {
            stratus::cli::commands::serve(&config).await?;
        }
        Commands::Stats { location, samples } => {
            stratus::cli::commands::stats(&location, &samples, &config).await?;
        }
        Commands::Config => {
            stratus::cli::commands::config_cmd(&config, &cli.config).await?;
        }
        Commands::Version => {
            stratus::cli::commands::version();
        }
    }

    Ok(())
}
