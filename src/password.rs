use anyhow::Context;
use argon2::{password_hash::{rand_core::OsRng, SaltString}, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, SecretString};

use crate::telemetry::spawn_blocking_with_tracing;

fn hasher() -> Result<Argon2<'static>, anyhow::Error> {
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {}", e))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

// Produces a PHC string, salt included
pub fn compute_password_hash(password: &SecretString) -> Result<String, anyhow::Error>{
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = hasher()?
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to compute password hash: {}", e))?
        .to_string();

    Ok(password_hash)
}

#[tracing::instrument("Hashing password", skip_all)]
pub async fn hash_password(password: SecretString) -> Result<String, anyhow::Error>{
    spawn_blocking_with_tracing(move || compute_password_hash(&password))
        .await
        .context("Failed due to threadpool error")?
}

// A hash that can not be parsed is an error, a mismatch is `Ok(false)`
#[tracing::instrument("Verifying password", skip_all)]
pub async fn verify_password(password: SecretString, stored_hash: String) -> Result<bool, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse stored password hash: {}", e))?;

        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .context("Failed due to threadpool error")?
}
