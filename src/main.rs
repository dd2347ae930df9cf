use shopdesk::config::ConfigLoader;
use shopdesk::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = ConfigLoader::new()?.load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logger.level)),
        )
        .init();

    Server::new(settings).run().await
}
