use clap::Parser;
use geuebt_stager::utils::{logger, validation::Validate};
use geuebt_stager::{ApiClient, CliConfig, Credentials, Stager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting geuebt-stager");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Resolved and checked once, before any file or network I/O.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let api = ApiClient::new(&config.api_url)?;
    let stager = Stager::new(api, credentials, config.ver.clone());

    match stager
        .run(
            &config.summaries,
            &config.sheet_out,
            &config.merged,
            &config.qc_out,
        )
        .await
    {
        Ok(summary) => {
            tracing::info!(
                "✅ Staged {} isolates ({} upload warnings)",
                summary.staged,
                summary.warnings
            );
            println!(
                "✅ Staged {} isolates ({} upload warnings)",
                summary.staged, summary.warnings
            );
        }
        Err(e) => {
            tracing::error!("❌ Staging failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
