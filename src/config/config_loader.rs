use anyhow::{Context, Result, bail};
use jsonwebtoken::Algorithm;
use std::str::FromStr;

use crate::config::{
    config_model::{Database, DotEnvyConfig, Jwt, PasswordHashing, Server},
    stage::Stage,
};

const DEFAULT_JWT_TTL_MINUTES: i64 = 60;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let jwt = Jwt {
        secret: parse_secret(&required("JWT_SECRET")?)?,
        ttl_minutes: parse_ttl_minutes(optional("JWT_TTL_MINUTES").as_deref())?,
        algorithm: parse_algorithm(optional("JWT_ALGORITHM").as_deref())?,
    };

    let defaults = PasswordHashing::default();
    let password_hashing = PasswordHashing {
        memory_kib: optional_parsed("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
        iterations: optional_parsed("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
        parallelism: optional_parsed("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        jwt,
        password_hashing,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn optional_parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} is invalid", key)),
        None => Ok(default),
    }
}

fn parse_secret(value: &str) -> Result<String> {
    if value.is_empty() {
        bail!("JWT_SECRET must not be empty");
    }
    Ok(value.to_string())
}

fn parse_ttl_minutes(value: Option<&str>) -> Result<i64> {
    let ttl_minutes = match value {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .context("JWT_TTL_MINUTES is invalid")?,
        None => DEFAULT_JWT_TTL_MINUTES,
    };
    if ttl_minutes <= 0 {
        bail!("JWT_TTL_MINUTES must be positive");
    }
    Ok(ttl_minutes)
}

/// Only the HMAC family works with a shared secret.
fn parse_algorithm(value: Option<&str>) -> Result<Algorithm> {
    let algorithm = match value {
        Some(value) => {
            Algorithm::from_str(value.trim()).context("JWT_ALGORITHM is invalid")?
        }
        None => Algorithm::HS256,
    };
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => bail!("JWT_ALGORITHM {:?} needs a key pair; use HS256, HS384 or HS512", other),
    }
}
