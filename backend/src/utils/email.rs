use anyhow::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;

/// Outgoing mail seam for the recovery flow. Handlers depend on this
/// trait so tests can swap in a recording fake.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn enviar_codigo_verificacion(
        &self,
        destino: &str,
        nombres: &str,
        codigo: &str,
    ) -> Result<()>;

    async fn enviar_confirmacion_cambio(&self, destino: &str, nombres: &str) -> Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    skip_send: bool,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.smtp_skip_send && (config.smtp_user.is_empty() || config.smtp_pass.is_empty()) {
            anyhow::bail!(
                "SMTP_USER y SMTP_PASS son requeridos cuando el envío de correo está habilitado"
            );
        }

        let transport = if config.smtp_user.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from_address: config.smtp_from.clone(),
            skip_send: config.smtp_skip_send,
        })
    }

    /// Probes the relay once at startup; failures are logged, not fatal.
    pub async fn verificar_conexion(&self) {
        if self.skip_send {
            return;
        }

        match self.transport.test_connection().await {
            Ok(true) => tracing::info!("Servidor de correo listo"),
            Ok(false) => tracing::warn!("El servidor de correo rechazó la conexión de prueba"),
            Err(err) => tracing::warn!(error = %err, "Error al configurar el correo"),
        }
    }

    async fn enviar(&self, destino: &str, asunto: &str, html: String) -> Result<()> {
        if self.skip_send {
            tracing::info!(destino, asunto, "SMTP_SKIP_SEND activo; correo no enviado");
            return Ok(());
        }

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(destino.parse()?)
            .subject(asunto)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn enviar_codigo_verificacion(
        &self,
        destino: &str,
        nombres: &str,
        codigo: &str,
    ) -> Result<()> {
        self.enviar(
            destino,
            "Código de Verificación - TrackProductivo",
            plantilla_codigo(nombres, codigo),
        )
        .await
    }

    async fn enviar_confirmacion_cambio(&self, destino: &str, nombres: &str) -> Result<()> {
        self.enviar(
            destino,
            "Contraseña Actualizada - TrackProductivo",
            plantilla_confirmacion(nombres),
        )
        .await
    }
}

fn plantilla_codigo(nombres: &str, codigo: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #006000;">Recuperación de Contraseña</h2>
    <p>Hola {nombres},</p>
    <p>Tu código de verificación es:</p>
    <div style="background-color: #f0f0f0; padding: 15px; text-align: center; font-size: 24px; font-weight: bold; margin: 20px 0;">
        {codigo}
    </div>
    <p>Este código expirará en 1 hora.</p>
    <p>Si no solicitaste este código, ignora este correo.</p>
    <p>Saludos,<br>El equipo de TrackProductivo</p>
</div>"#
    )
}

fn plantilla_confirmacion(nombres: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #006000;">Contraseña Actualizada</h2>
    <p>Hola {nombres},</p>
    <p>Tu contraseña ha sido actualizada exitosamente.</p>
    <p>Si no realizaste este cambio, contacta inmediatamente con soporte.</p>
    <p>Saludos,<br>El equipo de TrackProductivo</p>
</div>"#
    )
}
