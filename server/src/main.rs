use hyper::{
    service::{make_service_fn, service_fn},
    Server,
};
use lists_server::{app::App, Settings, Webserver};
use std::sync::Arc;
use structopt::StructOpt;

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() {
    let env = std::env::var("WEBSERVER_ENV").unwrap_or_else(|_| "test".to_string());

    let env_file_name = format!("{}.env", env);

    let env_file = dotenv::from_filename(&env_file_name);

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    if let Err(e) = env_file {
        warn!(
            "environment file not found: {}, error: {}",
            env_file_name, e
        );
    }

    let settings = Settings::from(Opts::from_args());

    let app = Arc::new(App::new(&settings));

    let addr = ([0, 0, 0, 0], settings.port).into();

    let webserver = Arc::new(Webserver::new(app, settings));

    let service = make_service_fn(|_| {
        let webserver = webserver.clone();
        async {
            Ok::<_, hyper::Error>(service_fn(move |request| {
                let webserver = webserver.clone();
                lists_server::entry_point(webserver, request)
            }))
        }
    });

    let server = Server::bind(&addr).serve(service);

    info!("starting server on {:?}", addr);
    if let Err(e) = server.await {
        error!("server error: {}", e);
    }
}

#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "lists_server", about = "In-memory to-do lists REST API")]
pub struct Opts {
    #[structopt(long, default_value = "3000", env = "WEBSERVER_LISTEN_PORT")]
    port: u16,
    #[structopt(long, env = "WEBSERVER_ADVERTISED_HOST")]
    advertised_host: Option<String>,
    #[structopt(long, default_value = "testuser", env = "WEBSERVER_API_USERNAME")]
    api_username: String,
    #[structopt(
        long,
        default_value = "p455w0rd",
        env = "WEBSERVER_API_PASSWORD",
        hide_env_values = true
    )]
    api_password: String,
}

impl From<Opts> for Settings {
    fn from(
        Opts {
            port,
            advertised_host,
            api_username,
            api_password,
        }: Opts,
    ) -> Self {
        Settings {
            port,
            advertised_host,
            api_username,
            api_password,
        }
    }
}
