use std::net::TcpListener;

use env_logger::Env;
use localleads::{
    configuration::get_configuration,
    services::{
        DuckDuckGoClient, GoogleMapsClient, InsightClient, LeadEnricher, MapsClient, OpenaiClient,
        SearchClient,
    },
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration()?;

    let (maps_client, enricher) = match configuration.application.demo_mode {
        true => {
            log::info!("Demo mode enabled, serving fixture data instead of live APIs");
            (
                MapsClient::Fixture,
                LeadEnricher::new(SearchClient::Fixture, InsightClient::Fixture),
            )
        }
        false => (
            MapsClient::Live(GoogleMapsClient::new(configuration.api_keys.google_maps)),
            LeadEnricher::new(
                SearchClient::Live(DuckDuckGoClient::new()),
                InsightClient::Live(OpenaiClient::new(configuration.api_keys.openai)),
            ),
        ),
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    log::info!("Listening on {}", listener.local_addr()?);

    run(listener, maps_client, enricher)?.await?;
    Ok(())
}
