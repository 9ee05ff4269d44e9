use crate::clients::ontraport_client::OntraportClient;
use crate::configuration::Settings;
use crate::domain::TagAllowList;
use crate::routes::{health_check, subscriptions};
use crate::subscription::{SubscriptionResponder, SubscriptionService};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            configuration.ontraport.client(),
            configuration.subscription.tag_allow_list(),
            configuration.subscription.support_contact,
            configuration.hosts.client,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    ontraport_client: Option<OntraportClient>,
    allowed_tags: TagAllowList,
    support_contact: String,
    client_url: String,
) -> Result<Server, anyhow::Error> {
    if ontraport_client.is_none() {
        tracing::warn!("Ontraport credentials are missing; subscriptions will be refused.");
    }
    if allowed_tags.is_empty() {
        tracing::warn!("The tag allow-list is empty; every subscription will be refused.");
    }

    let service = Data::new(SubscriptionService::new(ontraport_client, allowed_tags));
    let responder = Data::new(SubscriptionResponder::new(support_contact));

    let server = HttpServer::new(move || {
        // The subscription form posts from the marketing site's origin.
        let cors = Cors::default()
            .allowed_origin(client_url.as_str())
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(&[
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .service(health_check::get)
            .service(subscriptions::post)
            .app_data(service.clone())
            .app_data(responder.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
