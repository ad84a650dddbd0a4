use actix_cors::Cors;
use actix_web::{
    dev::{Server, ServerHandle},
    http::header,
    middleware, web, App, HttpServer,
};
use tokio::task::JoinHandle;

use crate::{
    configuration::{AppState, State},
    controller::{fiats, prices, tokens},
    error::Error,
};

/// Binds the server and runs it on its own task. Stopping goes through the
/// returned handle; OS signals are left to the caller.
pub fn server_task(
    app_state: &AppState<State>,
) -> Result<(ServerHandle, JoinHandle<Result<(), Error>>), Error> {
    let server = init_server(app_state.clone())?;
    let handle = server.handle();

    let task = tokio::spawn(async move {
        server.await?;
        Ok(())
    });

    Ok((handle, task))
}

/// Price endpoints, under `/api` and at the root.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(prices::index)
            .service(fiats::index)
            .service(tokens::index),
    )
    .service(prices::index)
    .service(fiats::index)
    .service(tokens::index);
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    let server = HttpServer::new(move || {
        let app = app_state.clone();
        let allowed_cors = String::from("*");
        let cors_access_all =
            app.config.allowed_origins.contains(&allowed_cors);
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                if cors_access_all {
                    return true;
                }
                let allowed = &app.config.allowed_origins;
                if let Ok(origin) = origin.to_str() {
                    return allowed.contains(&origin.to_owned());
                }
                false
            })
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::ACCEPT])
            .allowed_header(header::CONTENT_TYPE);

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().limit(4096))
            .configure(routes)
    })
    .bind((host, port))?
    .disable_signals()
    .run();

    Ok(server)
}
