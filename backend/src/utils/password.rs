//! Password hashing with bcrypt.

const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let hash = bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let coincide = bcrypt::verify(password, hash)
        .map_err(|e| anyhow::anyhow!("Password verification error: {}", e))?;
    Ok(coincide)
}
