//! Password-recovery code lifecycle: issue, verify, consume, clean up.
//!
//! A persona carries at most one recovery code at a time. A code lives
//! for one hour, is matched in cleartext against the stored value and is
//! cleared in the same update that persists the new password, so it can
//! be consumed exactly once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use crate::models::persona::Persona;
use crate::repositories::PersonaStore;
use crate::utils::email::Mailer;
use crate::utils::{jwt, password};

/// Advertised lifetime of an emailed code, in minutes.
pub const VALIDEZ_CODIGO_MINUTOS: i64 = 60;

#[derive(Debug, Error)]
pub enum RecuperacionError {
    #[error("no existe un usuario activo con ese correo")]
    UsuarioNoEncontrado,
    #[error("ya hay un código vigente; faltan {minutos} minutos")]
    SolicitudReciente { minutos: i64 },
    #[error("código inválido o expirado")]
    TokenInvalido,
    #[error("la nueva contraseña coincide con la anterior")]
    PasswordIgual,
    #[error("error de base de datos: {0}")]
    Db(#[from] sqlx::Error),
    #[error("error enviando correo: {0}")]
    Correo(#[source] anyhow::Error),
    #[error(transparent)]
    Interno(anyhow::Error),
}

pub struct RecuperacionService {
    store: Arc<dyn PersonaStore>,
    mailer: Arc<dyn Mailer>,
    auth_secret: String,
}

impl RecuperacionService {
    pub fn new(store: Arc<dyn PersonaStore>, mailer: Arc<dyn Mailer>, auth_secret: String) -> Self {
        Self {
            store,
            mailer,
            auth_secret,
        }
    }

    /// Issues a fresh six-digit code for the persona behind `correo` and
    /// emails it. Rejected while a previous code is still unexpired.
    pub async fn emitir(&self, correo: &str) -> Result<(), RecuperacionError> {
        let persona = self
            .store
            .buscar_activa_por_correo(correo)
            .await?
            .ok_or(RecuperacionError::UsuarioNoEncontrado)?;

        // The reservation is a conditional write: it only lands when no
        // unexpired code exists. Zero rows plus no visible expiry means
        // the old code lapsed between the two statements, so one more
        // attempt settles it.
        let mut codigo = generar_codigo();
        let mut intentos = 0;
        loop {
            intentos += 1;
            let expira = Utc::now() + Duration::minutes(VALIDEZ_CODIGO_MINUTOS);
            let filas = self.store.reservar_codigo(correo, &codigo, expira).await?;
            if filas > 0 {
                break;
            }

            if let Some(expira) = self.store.expiracion_vigente(correo).await? {
                let minutos = minutos_restantes(expira, Utc::now());
                return Err(RecuperacionError::SolicitudReciente { minutos });
            }

            if intentos >= 2 {
                return Err(RecuperacionError::Interno(anyhow::anyhow!(
                    "no se pudo reservar el código para {}",
                    correo
                )));
            }
            codigo = generar_codigo();
        }

        let asercion = jwt::crear_asercion_codigo(persona.identificacion, &codigo, &self.auth_secret)
            .map_err(RecuperacionError::Interno)?;
        tracing::debug!(
            correo = %persona.correo,
            asercion = %asercion,
            "Código de recuperación emitido"
        );

        self.mailer
            .enviar_codigo_verificacion(&persona.correo, &persona.nombres, &codigo)
            .await
            .map_err(RecuperacionError::Correo)?;

        Ok(())
    }

    /// Looks the code up without consuming it. Returns the owning
    /// persona so callers can show the associated correo.
    pub async fn verificar(&self, token: &str) -> Result<Persona, RecuperacionError> {
        self.store
            .buscar_por_token_vigente(token)
            .await?
            .ok_or(RecuperacionError::TokenInvalido)
    }

    /// Consumes the code: stores the new password hash and clears both
    /// token fields in one update. A password equal to the stored one is
    /// rejected without touching the code.
    pub async fn cambiar(&self, token: &str, nueva_password: &str) -> Result<(), RecuperacionError> {
        let persona = self
            .store
            .buscar_por_token_vigente(token)
            .await?
            .ok_or(RecuperacionError::TokenInvalido)?;

        let igual = password::verify_password(nueva_password, &persona.password)
            .map_err(RecuperacionError::Interno)?;
        if igual {
            return Err(RecuperacionError::PasswordIgual);
        }

        let hash = password::hash_password(nueva_password).map_err(RecuperacionError::Interno)?;
        let filas = self
            .store
            .actualizar_password(persona.id_persona, &hash)
            .await?;
        if filas == 0 {
            return Err(RecuperacionError::Interno(anyhow::anyhow!(
                "la actualización de contraseña no afectó filas"
            )));
        }

        self.mailer
            .enviar_confirmacion_cambio(&persona.correo, &persona.nombres)
            .await
            .map_err(RecuperacionError::Correo)?;

        Ok(())
    }

    /// Clears every lapsed code. Used by the cleanup binary.
    pub async fn limpiar_expirados(&self) -> Result<u64, RecuperacionError> {
        Ok(self.store.limpiar_expirados().await?)
    }
}

fn generar_codigo() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Whole minutes until `expira`, rounded up, never below one.
fn minutos_restantes(expira: DateTime<Utc>, ahora: DateTime<Utc>) -> i64 {
    let ms = (expira - ahora).num_milliseconds();
    ((ms + 59_999) / 60_000).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn generar_codigo_produce_seis_digitos() {
        for _ in 0..50 {
            let codigo = generar_codigo();
            assert_eq!(codigo.len(), 6);
            let valor: u32 = codigo.parse().unwrap();
            assert!((100_000..1_000_000).contains(&valor));
        }
    }

    #[test]
    fn minutos_restantes_redondea_hacia_arriba() {
        let ahora = Utc::now();
        assert_eq!(minutos_restantes(ahora + Duration::seconds(61), ahora), 2);
        assert_eq!(minutos_restantes(ahora + Duration::seconds(60), ahora), 1);
        assert_eq!(minutos_restantes(ahora + Duration::milliseconds(200), ahora), 1);
        assert_eq!(minutos_restantes(ahora + Duration::minutes(60), ahora), 60);
    }

    #[test]
    fn minutos_restantes_no_crece_con_el_tiempo() {
        let ahora = Utc::now();
        let expira = ahora + Duration::minutes(37) + Duration::seconds(30);
        let antes = minutos_restantes(expira, ahora);
        let despues = minutos_restantes(expira, ahora + Duration::seconds(45));
        assert!(despues <= antes);
    }

    /// Store where the first reservation loses the race and the expiry
    /// has already vanished, forcing the retry path.
    struct StoreConCarrera {
        reservas: Mutex<u32>,
        persona: Persona,
    }

    fn persona_de_prueba() -> Persona {
        Persona {
            id_persona: 1,
            identificacion: 1073228955,
            nombres: "Juan Pérez".into(),
            correo: "juan@correo.com".into(),
            password: "$2b$12$hash".into(),
            estado: "Activo".into(),
            reset_password_token: None,
            reset_password_expires: None,
        }
    }

    #[async_trait]
    impl PersonaStore for StoreConCarrera {
        async fn buscar_activa_por_correo(&self, _correo: &str) -> sqlx::Result<Option<Persona>> {
            Ok(Some(self.persona.clone()))
        }

        async fn reservar_codigo(
            &self,
            _correo: &str,
            _codigo: &str,
            _expira: DateTime<Utc>,
        ) -> sqlx::Result<u64> {
            let mut reservas = self.reservas.lock().unwrap();
            *reservas += 1;
            Ok(if *reservas == 1 { 0 } else { 1 })
        }

        async fn expiracion_vigente(&self, _correo: &str) -> sqlx::Result<Option<DateTime<Utc>>> {
            Ok(None)
        }

        async fn buscar_por_token_vigente(&self, _token: &str) -> sqlx::Result<Option<Persona>> {
            Ok(None)
        }

        async fn actualizar_password(
            &self,
            _id_persona: i32,
            _password_hash: &str,
        ) -> sqlx::Result<u64> {
            Ok(0)
        }

        async fn limpiar_expirados(&self) -> sqlx::Result<u64> {
            Ok(0)
        }
    }

    struct MailerNulo;

    #[async_trait]
    impl Mailer for MailerNulo {
        async fn enviar_codigo_verificacion(
            &self,
            _destino: &str,
            _nombres: &str,
            _codigo: &str,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        async fn enviar_confirmacion_cambio(
            &self,
            _destino: &str,
            _nombres: &str,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn emitir_reintenta_cuando_el_codigo_caduca_entre_consultas() {
        let store = Arc::new(StoreConCarrera {
            reservas: Mutex::new(0),
            persona: persona_de_prueba(),
        });
        let servicio =
            RecuperacionService::new(store.clone(), Arc::new(MailerNulo), "secreto".into());

        servicio.emitir("juan@correo.com").await.expect("emitir");
        assert_eq!(*store.reservas.lock().unwrap(), 2);
    }
}
