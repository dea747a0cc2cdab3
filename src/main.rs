use clap::Parser;
use geoplot::cli::{commands, Cli, Commands};
use geoplot::types::config::Config;
use geoplot::GeoplotResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> GeoplotResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config).unwrap_or_else(|_| Config::default_config())
    } else {
        Config::default_config()
    };

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("geoplot={}", log_level)
            .parse()
            .unwrap_or_else(|_| "geoplot=info".parse().expect("fallback directive is valid")),
    );

    // stdout is reserved for command output and the JSON-RPC stream
    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => commands::init(path)?,
        Commands::Serve => commands::serve(&config).await?,
        Commands::Chart { first_term, ratio } => commands::chart(first_term, ratio, &config)?,
        Commands::Surface {
            equation,
            strict,
            output,
        } => commands::surface(&equation, strict, output.as_deref(), &config)?,
        Commands::Latex {
            first_term,
            ratio,
            output,
        } => commands::latex(first_term, ratio, &output, &config)?,
        Commands::Version => commands::version(),
    }

    Ok(())
}
