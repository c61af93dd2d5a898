use sqlx::PgPool;

use crate::error::AppError;
use crate::models::novedad::Novedad;

const COLUMNAS_NOVEDAD: &str =
    "n.id_novedad, n.descripcion, n.fecha, n.foto, n.seguimiento, n.instructor";

pub async fn listar_por_seguimiento(
    pool: &PgPool,
    id_seguimiento: i32,
) -> Result<Vec<Novedad>, AppError> {
    let novedades = sqlx::query_as::<_, Novedad>(&format!(
        r#"
        SELECT {COLUMNAS_NOVEDAD}
        FROM novedades n
        JOIN seguimientos s ON s.id_seguimiento = n.seguimiento
        WHERE n.seguimiento = $1
        "#
    ))
    .bind(id_seguimiento)
    .fetch_all(pool)
    .await?;

    Ok(novedades)
}

pub async fn listar_por_aprendiz(
    pool: &PgPool,
    identificacion: i64,
) -> Result<Vec<Novedad>, AppError> {
    let novedades = sqlx::query_as::<_, Novedad>(&format!(
        r#"
        SELECT {COLUMNAS_NOVEDAD}
        FROM novedades n
        JOIN seguimientos s ON n.seguimiento = s.id_seguimiento
        JOIN productivas p ON s.productiva = p.id_productiva
        WHERE p.aprendiz = (SELECT id_persona FROM personas WHERE identificacion = $1)
        "#
    ))
    .bind(identificacion)
    .fetch_all(pool)
    .await?;

    Ok(novedades)
}

/// Inserts a novedad. `fecha` arrives as the raw `AAAA-MM-DD` string and
/// is cast by the database, which is what rejects impossible calendar
/// dates that pass the shape check.
pub async fn registrar(
    pool: &PgPool,
    descripcion: &str,
    fecha: &str,
    foto: Option<&str>,
    seguimiento: i32,
    instructor: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO novedades (descripcion, fecha, foto, seguimiento, instructor)
        VALUES ($1, $2::date, $3, $4, $5)
        "#,
    )
    .bind(descripcion)
    .bind(fecha)
    .bind(foto)
    .bind(seguimiento)
    .bind(instructor)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn buscar_por_id(pool: &PgPool, id_novedad: i32) -> Result<Option<Novedad>, AppError> {
    let novedad = sqlx::query_as::<_, Novedad>(&format!(
        "SELECT {COLUMNAS_NOVEDAD} FROM novedades n WHERE n.id_novedad = $1"
    ))
    .bind(id_novedad)
    .fetch_optional(pool)
    .await?;

    Ok(novedad)
}

/// Full-row update; the caller resolves fallbacks against the prior row.
/// `foto` only replaces the stored filename when a new upload arrived.
pub async fn actualizar(
    pool: &PgPool,
    id_novedad: i32,
    descripcion: &str,
    fecha: &str,
    seguimiento: i32,
    instructor: i32,
    foto: Option<&str>,
) -> Result<u64, AppError> {
    let result = match foto {
        Some(foto) => {
            sqlx::query(
                r#"
                UPDATE novedades
                SET descripcion = $2,
                    fecha = $3::date,
                    seguimiento = $4,
                    instructor = $5,
                    foto = $6
                WHERE id_novedad = $1
                "#,
            )
            .bind(id_novedad)
            .bind(descripcion)
            .bind(fecha)
            .bind(seguimiento)
            .bind(instructor)
            .bind(foto)
            .execute(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                UPDATE novedades
                SET descripcion = $2,
                    fecha = $3::date,
                    seguimiento = $4,
                    instructor = $5
                WHERE id_novedad = $1
                "#,
            )
            .bind(id_novedad)
            .bind(descripcion)
            .bind(fecha)
            .bind(seguimiento)
            .bind(instructor)
            .execute(pool)
            .await?
        }
    };

    Ok(result.rows_affected())
}

pub async fn eliminar(pool: &PgPool, id_novedad: i32) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM novedades WHERE id_novedad = $1")
        .bind(id_novedad)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
