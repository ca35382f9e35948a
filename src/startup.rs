use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, run_route},
    services::LeadAgent,
};

pub fn run(listener: TcpListener, agent: LeadAgent) -> Result<Server, std::io::Error> {
    let agent = web::Data::new(agent);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(web::scope("/agent").service(run_route::trigger_run))
            .app_data(agent.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
