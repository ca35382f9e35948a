use std::{net::TcpListener, time::Duration};

use env_logger::Env;
use sqlx::postgres::PgPoolOptions;
use voltlead::{configuration::get_configuration, services::LeadAgent, startup::run};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let pool_options = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10));
    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let agent = LeadAgent::new(&configuration, connection_pool);

    run(listener, agent)?.await
}
