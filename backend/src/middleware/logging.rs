use axum::{
    body::{to_bytes, Body},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

const MAX_CUERPO_BYTES: usize = 16 * 1024;

/// Logs every 4xx/5xx reply together with its JSON body. The body is
/// buffered and re-attached so the caller still receives it unchanged.
pub async fn registrar_errores(req: Request<Body>, next: Next) -> Response {
    let metodo = req.method().to_string();
    let uri = req.uri().to_string();
    let inicio = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latencia_ms = inicio.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_CUERPO_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(%metodo, %uri, status = status.as_u16(), latencia_ms, error = ?err,
                "No se pudo leer el cuerpo de la respuesta de error");
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let cuerpo = String::from_utf8_lossy(&bytes);
    if status.is_server_error() {
        tracing::error!(%metodo, %uri, status = status.as_u16(), latencia_ms, cuerpo = %cuerpo,
            "Solicitud terminó con error");
    } else {
        tracing::warn!(%metodo, %uri, status = status.as_u16(), latencia_ms, cuerpo = %cuerpo,
            "Solicitud terminó con error");
    }

    Response::from_parts(parts, Body::from(bytes))
}
