use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::persona::Persona;

const COLUMNAS_PERSONA: &str = "id_persona, identificacion, nombres, correo, password, estado, \
     reset_password_token, reset_password_expires";

/// Persistence seam of the recovery flow. The service only sees this
/// trait, so tests can run the whole lifecycle against an in-memory
/// store.
#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// Active persona for the given correo, if any.
    async fn buscar_activa_por_correo(&self, correo: &str) -> sqlx::Result<Option<Persona>>;

    /// Attempts to set a fresh recovery code. The write only lands when
    /// no unexpired code exists for the correo; returns affected rows.
    async fn reservar_codigo(
        &self,
        correo: &str,
        codigo: &str,
        expira: DateTime<Utc>,
    ) -> sqlx::Result<u64>;

    /// Expiry of the code currently in flight for the correo, if it is
    /// still in the future.
    async fn expiracion_vigente(&self, correo: &str) -> sqlx::Result<Option<DateTime<Utc>>>;

    /// Active persona holding the given unexpired code.
    async fn buscar_por_token_vigente(&self, token: &str) -> sqlx::Result<Option<Persona>>;

    /// Stores the new password hash and clears both token fields in the
    /// same update; returns affected rows.
    async fn actualizar_password(&self, id_persona: i32, password_hash: &str) -> sqlx::Result<u64>;

    /// Nulls out token fields whose expiry has passed; returns how many
    /// rows were cleaned.
    async fn limpiar_expirados(&self) -> sqlx::Result<u64>;
}

#[derive(Clone)]
pub struct PgPersonaStore {
    pool: PgPool,
}

impl PgPersonaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonaStore for PgPersonaStore {
    async fn buscar_activa_por_correo(&self, correo: &str) -> sqlx::Result<Option<Persona>> {
        let persona = sqlx::query_as::<_, Persona>(&format!(
            "SELECT {COLUMNAS_PERSONA} FROM personas WHERE correo = $1 AND estado = 'Activo'"
        ))
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(persona)
    }

    async fn reservar_codigo(
        &self,
        correo: &str,
        codigo: &str,
        expira: DateTime<Utc>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE personas
            SET reset_password_token = $2,
                reset_password_expires = $3
            WHERE correo = $1
              AND estado = 'Activo'
              AND (reset_password_expires IS NULL OR reset_password_expires <= now())
            "#,
        )
        .bind(correo)
        .bind(codigo)
        .bind(expira)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn expiracion_vigente(&self, correo: &str) -> sqlx::Result<Option<DateTime<Utc>>> {
        let expira = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT reset_password_expires
            FROM personas
            WHERE correo = $1 AND reset_password_expires > now()
            "#,
        )
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expira)
    }

    async fn buscar_por_token_vigente(&self, token: &str) -> sqlx::Result<Option<Persona>> {
        let persona = sqlx::query_as::<_, Persona>(&format!(
            r#"
            SELECT {COLUMNAS_PERSONA}
            FROM personas
            WHERE reset_password_token = $1
              AND reset_password_expires > now()
              AND estado = 'Activo'
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(persona)
    }

    async fn actualizar_password(&self, id_persona: i32, password_hash: &str) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE personas
            SET password = $2,
                reset_password_token = NULL,
                reset_password_expires = NULL
            WHERE id_persona = $1
            "#,
        )
        .bind(id_persona)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn limpiar_expirados(&self) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE personas
            SET reset_password_token = NULL,
                reset_password_expires = NULL
            WHERE reset_password_token IS NOT NULL
              AND reset_password_expires <= now()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
