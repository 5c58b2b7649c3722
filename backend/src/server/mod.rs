//! Server assembly: route registration, JSON extractor configuration, and
//! the bootstrap that wires storage, domain, and HTTP layers together.

pub mod config;

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, get, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::user_service::UserService;
use crate::inbound::http::ApiError;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::middleware::trace::Trace;
use crate::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};

pub use config::Settings;

/// JSON extractor configuration turning deserialization failures into the
/// envelope error shape instead of actix's default plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::invalid_request(err.to_string()).into())
}

/// Root index route; answers with a greeting so a bare GET confirms the
/// service is up.
#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json("welcome home")
}

/// All user routes mounted under `/api/v1`.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
}

/// Connect to storage, apply migrations, and serve until shutdown.
pub async fn run(settings: Settings) -> std::io::Result<()> {
    let database_url = settings.database.url();

    run_migrations(&database_url)
        .await
        .map_err(std::io::Error::other)?;

    let pool_config =
        PoolConfig::new(database_url).with_max_size(settings.database.max_connections);
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;

    let repository = Arc::new(DieselUserRepository::new(pool));
    let service = Arc::new(UserService::new(repository));
    let state = web::Data::new(HttpState::new(service));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip stays visible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .app_data(json_config())
            .wrap(Trace)
            .service(home)
            .service(api_scope())
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}")
                .url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
        );

        app
    })
    .client_request_timeout(settings.server.client_request_timeout)
    .shutdown_timeout(settings.server.shutdown_timeout.as_secs())
    .bind(settings.server.bind_address())?;

    health_state.mark_ready();
    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn root_greets_with_welcome_home() {
        let app = test::init_service(App::new().service(home)).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!("welcome home"));
    }
}
