use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, Error as Argon2Error
    },
    Argon2, Algorithm, Params, Version
};
use rand::{distributions::Alphanumeric, Rng};
use zeroize::Zeroizing;

const GENERATED_PASSWORD_LENGTH: usize = 10;

/// Hashes a client's invitation password with Argon2id.
pub fn hash_password(password: &str) -> Result<String, Argon2Error> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params::new(15_000, 2, 1, None)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, Argon2Error> {
    let parsed_hash = PasswordHash::new(hashed)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(Argon2Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Random alphanumeric password handed to the admin once at client creation.
pub fn generate_password() -> Zeroizing<String> {
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect();
    Zeroizing::new(password)
}
