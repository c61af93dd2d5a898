use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use trackproductivo_backend::docs;
use utoipa::OpenApi;

mod support;
use support::{app_de_prueba, config_de_prueba, pool_perezoso};

#[test]
fn openapi_includes_every_endpoint_and_bearer_scheme() {
    let openapi = docs::ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).expect("serialize openapi");

    let paths = json
        .get("paths")
        .and_then(|v| v.as_object())
        .expect("paths object");
    for path in [
        "/novedades/registrar",
        "/novedades/listarN/{id_seguimiento}",
        "/novedades/listar/{identificacion}",
        "/novedades/actualizar/{id}",
        "/novedades/eliminar/{id_novedad}",
        "/recuperar/recuperar",
        "/recuperar/verificar",
        "/recuperar/cambiar",
        "/principal/descargarPdf",
    ] {
        assert!(paths.contains_key(path), "falta {}", path);
    }

    let bearer = json
        .pointer("/components/securitySchemes/BearerAuth")
        .expect("BearerAuth scheme");
    assert_eq!(bearer.get("type").and_then(Value::as_str), Some("http"));
    assert_eq!(bearer.get("scheme").and_then(Value::as_str), Some("bearer"));
}

#[test]
fn recovery_endpoints_opt_out_of_bearer_auth() {
    let openapi = docs::ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).expect("serialize openapi");

    // El esquema global exige BearerAuth...
    let global = json
        .pointer("/security/0/BearerAuth")
        .expect("global BearerAuth requirement");
    assert!(global.is_array());

    // ...pero recuperar lo anula con un requisito vacío.
    let recuperar = json
        .pointer("/paths/~1recuperar~1recuperar/post/security")
        .and_then(|v| v.as_array())
        .expect("security del endpoint de recuperación");
    assert!(recuperar.iter().any(|req| {
        req.as_object().map(|o| o.is_empty()).unwrap_or(false)
    }));
}

// La documentación cuelga fuera del grupo con guardia; ninguna de estas
// peticiones lleva encabezado Authorization.
#[tokio::test]
async fn la_interfaz_swagger_se_sirve_sin_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_de_prueba(pool_perezoso(), config_de_prueba(&dir));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/api/docs/")
    );

    // El inicializador apunta la UI a nuestro documento OpenAPI.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/docs/swagger-initializer.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let script = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&script).contains("/api-doc/openapi.json"));
}

#[tokio::test]
async fn el_json_publicado_coincide_con_el_documento_generado() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_de_prueba(pool_perezoso(), config_de_prueba(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-doc/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let publicado: Value = serde_json::from_slice(&body).expect("documento openapi");
    let generado = serde_json::to_value(docs::ApiDoc::openapi()).expect("serializar openapi");
    assert_eq!(publicado, generado);
}
