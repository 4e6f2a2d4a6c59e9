use std::net::TcpListener;

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    routes::{default_route, lead_route},
    services::{LeadEnricher, MapsClient},
};

pub fn run(
    listener: TcpListener,
    maps_client: MapsClient,
    enricher: LeadEnricher,
) -> Result<Server, std::io::Error> {
    let maps_client = Data::new(maps_client);
    let enricher = Data::new(enricher);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(default_route::index)
            .service(default_route::health)
            .service(web::scope("/lead").service(lead_route::search_leads))
            .app_data(maps_client.clone())
            .app_data(enricher.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
