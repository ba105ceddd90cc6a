use ods::cli::ServerCli;
use ods::mcp::{serve_http, OdsMcpServer};
use ods::utils::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values in .env take precedence over the inherited environment.
    let _ = dotenvy::dotenv_override();

    let cli = ServerCli::parse_args();
    init_tracing(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        search_provider = config.search.name(),
        workers = config.compute.workers,
        "starting ods-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let addr = config.bind_addr()?;
    let server = OdsMcpServer::from_config(&config)?;

    tracing::info!(port = config.port, "ods-server ready");
    serve_http(server, addr).await?;

    Ok(())
}
