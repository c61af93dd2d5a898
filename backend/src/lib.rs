pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use services::recuperacion::RecuperacionService;

/// Builds the full application router: bearer-protected novedades
/// routes, public recovery and download routes, and Swagger UI.
pub fn app(pool: PgPool, config: Config, servicio: Arc<RecuperacionService>) -> Router {
    let rutas_novedades = Router::new()
        .route(
            "/novedades/listarN/{id_seguimiento}",
            get(handlers::novedades::listar_por_seguimiento),
        )
        .route(
            "/novedades/listar/{identificacion}",
            get(handlers::novedades::listar_por_aprendiz),
        )
        .route("/novedades/registrar", post(handlers::novedades::registrar))
        .route(
            "/novedades/actualizar/{id}",
            put(handlers::novedades::actualizar),
        )
        .route(
            "/novedades/eliminar/{id_novedad}",
            delete(handlers::novedades::eliminar),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            config.clone(),
            middleware::auth::validar_token,
        ));

    let rutas_publicas = Router::new()
        .route("/recuperar/recuperar", post(handlers::recuperar::recuperar))
        .route("/recuperar/verificar", post(handlers::recuperar::verificar))
        .route("/recuperar/cambiar", put(handlers::recuperar::cambiar))
        .route(
            "/principal/descargarPdf",
            get(handlers::principal::descargar_pdf),
        );

    Router::new()
        .merge(rutas_novedades)
        .merge(rutas_publicas)
        .merge(
            SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", docs::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                )
                .layer(Extension(servicio))
                .layer(axum_middleware::from_fn(
                    middleware::logging::registrar_errores,
                )),
        )
        .with_state((pool, config))
}
