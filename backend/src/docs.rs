#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::principal::DescargaQuery,
    models::{
        novedad::Novedad,
        persona::{CambiarRequest, CodigoEnviado, RecuperarRequest, TokenValido, VerificarRequest},
        MensajeRespuesta,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        registrar_novedad_doc,
        listar_por_seguimiento_doc,
        listar_por_aprendiz_doc,
        actualizar_novedad_doc,
        eliminar_novedad_doc,
        recuperar_doc,
        verificar_doc,
        cambiar_doc,
        descargar_pdf_doc
    ),
    components(
        schemas(
            Novedad,
            MensajeRespuesta,
            ErrorResponse,
            RecuperarRequest,
            VerificarRequest,
            CambiarRequest,
            CodigoEnviado,
            TokenValido
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Novedades", description = "Registro y consulta de novedades de seguimiento"),
        (name = "Recuperación", description = "Recuperación de contraseña por código de verificación"),
        (name = "Principal", description = "Descarga de archivos")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/novedades/registrar",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Campos descripcion, fecha (AAAA-MM-DD), seguimiento, instructor y foto opcional"),
    responses(
        (status = 200, description = "Novedad registrada", body = MensajeRespuesta),
        (status = 400, description = "Fecha con formato incorrecto o datos faltantes", body = ErrorResponse),
        (status = 403, description = "La inserción no afectó filas", body = ErrorResponse)
    ),
    tag = "Novedades"
)]
fn registrar_novedad_doc() {}

#[utoipa::path(
    get,
    path = "/novedades/listarN/{id_seguimiento}",
    params(("id_seguimiento" = i32, Path, description = "Identificador del seguimiento")),
    responses(
        (status = 200, description = "Novedades del seguimiento", body = [Novedad]),
        (status = 404, description = "Sin novedades registradas", body = ErrorResponse)
    ),
    tag = "Novedades"
)]
fn listar_por_seguimiento_doc() {}

#[utoipa::path(
    get,
    path = "/novedades/listar/{identificacion}",
    params(("identificacion" = String, Path, description = "Número de identificación del aprendiz")),
    responses(
        (status = 200, description = "Novedades del aprendiz", body = [Novedad]),
        (status = 400, description = "Identificación no numérica", body = ErrorResponse),
        (status = 404, description = "Sin novedades registradas", body = ErrorResponse)
    ),
    tag = "Novedades"
)]
fn listar_por_aprendiz_doc() {}

#[utoipa::path(
    put,
    path = "/novedades/actualizar/{id}",
    params(("id" = i32, Path, description = "Identificador de la novedad")),
    request_body(content = String, content_type = "multipart/form-data",
        description = "Campos opcionales; los omitidos conservan el valor anterior"),
    responses(
        (status = 200, description = "Novedad actualizada", body = MensajeRespuesta),
        (status = 400, description = "Fecha no válida", body = ErrorResponse),
        (status = 403, description = "La actualización no afectó filas", body = ErrorResponse)
    ),
    tag = "Novedades"
)]
fn actualizar_novedad_doc() {}

#[utoipa::path(
    delete,
    path = "/novedades/eliminar/{id_novedad}",
    params(("id_novedad" = i32, Path, description = "Identificador de la novedad")),
    responses(
        (status = 200, description = "Novedad eliminada", body = MensajeRespuesta),
        (status = 403, description = "La eliminación no afectó filas", body = ErrorResponse)
    ),
    tag = "Novedades"
)]
fn eliminar_novedad_doc() {}

#[utoipa::path(
    post,
    path = "/recuperar/recuperar",
    request_body = RecuperarRequest,
    responses(
        (status = 200, description = "Código enviado por correo", body = CodigoEnviado),
        (status = 400, description = "Formato de correo inválido", body = ErrorResponse),
        (status = 404, description = "Sin usuario activo para el correo", body = ErrorResponse),
        (status = 429, description = "Ya hay un código vigente", body = ErrorResponse)
    ),
    tag = "Recuperación",
    security(())
)]
fn recuperar_doc() {}

#[utoipa::path(
    post,
    path = "/recuperar/verificar",
    request_body = VerificarRequest,
    responses(
        (status = 200, description = "Código vigente", body = TokenValido),
        (status = 400, description = "Código inválido o expirado", body = ErrorResponse)
    ),
    tag = "Recuperación",
    security(())
)]
fn verificar_doc() {}

#[utoipa::path(
    put,
    path = "/recuperar/cambiar",
    request_body = CambiarRequest,
    responses(
        (status = 200, description = "Contraseña actualizada", body = MensajeRespuesta),
        (status = 400, description = "Contraseña débil, código inválido o contraseña repetida", body = ErrorResponse)
    ),
    tag = "Recuperación",
    security(())
)]
fn cambiar_doc() {}

#[utoipa::path(
    get,
    path = "/principal/descargarPdf",
    params(DescargaQuery),
    responses(
        (status = 200, description = "Archivo PDF adjunto"),
        (status = 400, description = "Nombre de archivo ausente o inválido", body = ErrorResponse),
        (status = 404, description = "Archivo no encontrado", body = ErrorResponse)
    ),
    tag = "Principal",
    security(())
)]
fn descargar_pdf_doc() {}
