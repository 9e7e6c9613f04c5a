use anyhow::{anyhow, Result};
use ketchup_core::models::User;
use ketchup_core::repository::Repository;

use crate::parser::parse_user_spec;

/// Picks the user to act as: `--user` first, then the configured default.
pub fn user_spec(flag: Option<String>, default_user: Option<&str>) -> Result<String> {
    flag.or_else(|| default_user.map(str::to_string))
        .filter(|spec| !spec.trim().is_empty())
        .ok_or_else(|| {
            anyhow!("no user configured; pass --user or set KETCHUP_DEFAULT_USER")
        })
}

/// Finds the user named by a `login[:name]` spec, creating it on first use.
pub async fn resolve_user(repo: &impl Repository, spec: &str) -> Result<User> {
    let (login, name) = parse_user_spec(spec)?;
    Ok(repo.find_or_create_user(login, name).await?)
}
