use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppError;
use crate::models::novedad::{FotoSubida, Novedad, NovedadForm};
use crate::models::MensajeRespuesta;
use crate::repositories::novedad as novedad_repo;
use crate::utils::archivos;
use crate::validation::rules;

/// `POST /novedades/registrar`: creates a novedad from a multipart form
/// with an optional `foto` file part.
pub async fn registrar(
    State((pool, config)): State<(PgPool, Config)>,
    multipart: Multipart,
) -> Result<Json<MensajeRespuesta>, AppError> {
    let form = leer_formulario(multipart).await?;

    // The date shape is reported before missing fields, which is what
    // the frontend relies on to highlight the right input.
    let fecha = match form.fecha.as_deref() {
        Some(f) if rules::fecha_valida(f) => f.to_string(),
        _ => {
            return Err(AppError::BadRequest(
                "Formato de fecha incorrecto".to_string(),
            ))
        }
    };

    let (descripcion, seguimiento, instructor) = match (
        form.descripcion.filter(|v| !v.is_empty()),
        form.seguimiento.filter(|v| !v.is_empty()),
        form.instructor.filter(|v| !v.is_empty()),
    ) {
        (Some(d), Some(s), Some(i)) => (d, s, i),
        _ => {
            return Err(AppError::BadRequest(
                "Faltan datos en la solicitud".to_string(),
            ))
        }
    };

    let seguimiento: i32 = seguimiento
        .parse()
        .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?;
    let instructor: i32 = instructor
        .parse()
        .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?;

    let nombre_foto = guardar_foto(&config, form.foto.as_ref()).await?;

    let filas = novedad_repo::registrar(
        &pool,
        &descripcion,
        &fecha,
        nombre_foto.as_deref(),
        seguimiento,
        instructor,
    )
    .await?;

    if filas > 0 {
        Ok(Json(MensajeRespuesta::new(
            "Novedad registrada exitosamente",
        )))
    } else {
        Err(AppError::OperationFailed(
            "Error al registrar la novedad".to_string(),
        ))
    }
}

/// `GET /novedades/listarN/{id_seguimiento}`: novedades of one
/// seguimiento, 404 when there are none.
pub async fn listar_por_seguimiento(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(id_seguimiento): Path<i32>,
) -> Result<Json<Vec<Novedad>>, AppError> {
    let novedades = novedad_repo::listar_por_seguimiento(&pool, id_seguimiento).await?;
    if novedades.is_empty() {
        return Err(AppError::NotFound(
            "No hay novedades registradas para este seguimiento".to_string(),
        ));
    }

    Ok(Json(novedades))
}

/// `GET /novedades/listar/{identificacion}`: novedades of an aprendiz
/// looked up by identification number.
pub async fn listar_por_aprendiz(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(identificacion): Path<String>,
) -> Result<Json<Vec<Novedad>>, AppError> {
    let identificacion: i64 = identificacion.parse().map_err(|_| {
        AppError::BadRequest("Identificación del aprendiz no válida.".to_string())
    })?;

    let novedades = novedad_repo::listar_por_aprendiz(&pool, identificacion).await?;
    if novedades.is_empty() {
        return Err(AppError::NotFound(
            "No hay novedades registradas para este aprendiz.".to_string(),
        ));
    }

    Ok(Json(novedades))
}

/// `PUT /novedades/actualizar/{id}`: partial update; omitted fields keep
/// the stored values, the photo only changes when a new file arrives.
pub async fn actualizar(
    State((pool, config)): State<(PgPool, Config)>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<MensajeRespuesta>, AppError> {
    let form = leer_formulario(multipart).await?;

    let fecha_nueva = match form.fecha.as_deref().filter(|f| !f.is_empty()) {
        Some(f) if rules::fecha_valida(f) => Some(f.to_string()),
        Some(_) => return Err(AppError::BadRequest("Fecha no válida".to_string())),
        None => None,
    };

    let anterior = novedad_repo::buscar_por_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::OperationFailed("Error al actualizar la novedad".to_string()))?;

    let descripcion = form
        .descripcion
        .filter(|v| !v.is_empty())
        .unwrap_or(anterior.descripcion);
    let fecha = fecha_nueva.unwrap_or_else(|| anterior.fecha.format("%Y-%m-%d").to_string());
    let seguimiento: i32 = match form.seguimiento.filter(|v| !v.is_empty()) {
        Some(s) => s
            .parse()
            .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?,
        None => anterior.seguimiento,
    };
    let instructor: i32 = match form.instructor.filter(|v| !v.is_empty()) {
        Some(i) => i
            .parse()
            .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?,
        None => anterior.instructor,
    };

    let nombre_foto = guardar_foto(&config, form.foto.as_ref()).await?;

    let filas = novedad_repo::actualizar(
        &pool,
        id,
        &descripcion,
        &fecha,
        seguimiento,
        instructor,
        nombre_foto.as_deref(),
    )
    .await?;

    if filas > 0 {
        Ok(Json(MensajeRespuesta::new(
            "Novedad actualizada exitosamente",
        )))
    } else {
        Err(AppError::OperationFailed(
            "Error al actualizar la novedad".to_string(),
        ))
    }
}

/// `DELETE /novedades/eliminar/{id_novedad}`.
pub async fn eliminar(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(id_novedad): Path<i32>,
) -> Result<Json<MensajeRespuesta>, AppError> {
    let filas = novedad_repo::eliminar(&pool, id_novedad).await?;
    if filas > 0 {
        Ok(Json(MensajeRespuesta::new("novedad eliminada exitosamente")))
    } else {
        Err(AppError::OperationFailed(
            "Error al eliminar la novedad".to_string(),
        ))
    }
}

/// Drains the multipart form into the known fields; unknown parts are
/// skipped.
async fn leer_formulario(mut multipart: Multipart) -> Result<NovedadForm, AppError> {
    let mut form = NovedadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?
    {
        let nombre = field.name().unwrap_or_default().to_string();
        match nombre.as_str() {
            "foto" => {
                let nombre_archivo = field.file_name().map(|s| s.to_string());
                let datos = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))?;
                if let Some(nombre_archivo) = nombre_archivo {
                    if !datos.is_empty() {
                        form.foto = Some(FotoSubida {
                            nombre: nombre_archivo,
                            datos: datos.to_vec(),
                        });
                    }
                }
            }
            "descripcion" => form.descripcion = Some(leer_texto(field).await?),
            "fecha" => form.fecha = Some(leer_texto(field).await?),
            "seguimiento" => form.seguimiento = Some(leer_texto(field).await?),
            "instructor" => form.instructor = Some(leer_texto(field).await?),
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

async fn leer_texto(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|_| AppError::BadRequest("Solicitud inválida".to_string()))
}

/// Persists the uploaded photo under the configured directory and hands
/// back the stored filename.
async fn guardar_foto(
    config: &Config,
    foto: Option<&FotoSubida>,
) -> Result<Option<String>, AppError> {
    let foto = match foto {
        Some(foto) => foto,
        None => return Ok(None),
    };

    if !archivos::nombre_archivo_valido(&foto.nombre) {
        return Err(AppError::BadRequest(
            "Debe proporcionar un nombre de archivo válido".to_string(),
        ));
    }

    archivos::guardar_archivo(&config.novedades_dir, &foto.nombre, &foto.datos).await?;
    Ok(Some(foto.nombre.clone()))
}
