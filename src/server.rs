use actix_cors::Cors;
use actix_files::Files;
use actix_web::{
    dev::Server, error::InternalError, http::header, middleware, web, App,
    HttpResponse, HttpServer,
};

use crate::{
    configuration::{AppState, State},
    controller::{misc, send_notification, subscribe},
    error::Error,
};

const JSON_LIMIT: usize = 16 * 1024;

pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    tokio::spawn(async move {
        let server = init_server(app)?;
        server.await?;
        Ok(())
    })
    .await?
}

/// Registers the `/api` routes and their shared state.
pub fn configure(
    app_state: AppState<State>,
) -> impl Fn(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(app_state.clone()))
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .service(misc::vapid_public_key)
                    .service(misc::version)
                    .service(subscribe::post_index)
                    .service(subscribe::list)
                    .service(subscribe::delete_index)
                    .service(send_notification::index),
            );
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let body = serde_json::json!({
                "error": err.to_string(),
                "status": 400,
            });
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(body),
            )
            .into()
        })
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    let server = HttpServer::new(move || {
        let app = app_state.clone();
        let static_dir = app_state.config.static_dir.to_owned();
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
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
            .allowed_header(header::CONTENT_TYPE);

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .configure(configure(app_state.clone()))
            .configure(|cfg| {
                if let Some(dir) = static_dir {
                    cfg.service(Files::new("/", dir).index_file("index.html"));
                }
            })
    })
    .bind((host.to_owned(), port))?
    .run();

    tracing::info!("Server is running on http://{}:{}", host, port);

    Ok(server)
}
