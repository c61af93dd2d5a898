use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by the access token the frontend sends as a bearer.
/// Minted by the login service; this backend only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub identificacion: i64,
    pub rol: String,
    pub exp: i64,
    pub iat: i64,
}

/// Short-lived assertion bound to a recovery code. Issued alongside the
/// emailed code and logged for audit; expires with the code.
#[derive(Debug, Serialize, Deserialize)]
pub struct AsercionCodigo {
    pub identificacion: i64,
    pub code: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn verificar_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims)
}

pub fn crear_asercion_codigo(
    identificacion: i64,
    code: &str,
    secret: &str,
) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = AsercionCodigo {
        identificacion,
        code: code.to_string(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_firmado(identificacion: i64, secret: &str, exp: i64) -> String {
        let claims = Claims {
            identificacion,
            rol: "Instructor".into(),
            exp,
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .expect("encode")
    }

    #[test]
    fn verify_accepts_signed_claims() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = token_firmado(1073228955, "secreto", exp);
        let claims = verificar_token(&token, "secreto").expect("verify token");
        assert_eq!(claims.identificacion, 1073228955);
        assert_eq!(claims.rol, "Instructor");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = token_firmado(1073228955, "secreto", exp);
        assert!(verificar_token(&token, "otro-secreto").is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = token_firmado(1073228955, "secreto", exp);
        assert!(verificar_token(&token, "secreto").is_err());
    }

    #[test]
    fn asercion_embeds_code() {
        let asercion = crear_asercion_codigo(1073228955, "348921", "secreto").expect("asercion");
        let data = decode::<AsercionCodigo>(
            &asercion,
            &DecodingKey::from_secret("secreto".as_ref()),
            &Validation::default(),
        )
        .expect("decode");
        assert_eq!(data.claims.code, "348921");
        assert_eq!(data.claims.identificacion, 1073228955);
    }
}
