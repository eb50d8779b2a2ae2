//! Command execution. Each command talks to the service through the
//! session's `ApiClient` and prints the result as JSON on stdout.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use sweetshop_core::models::{SweetUpdate, User};
use sweetshop_core::{Config, SessionStore};
use tracing::{debug, warn};

use crate::cli::{Command, SweetsCommand, UpdateArgs};

/// Environment variable that supplies the password without prompting
const PASSWORD_ENV: &str = "SWEETSHOP_PASSWORD";

pub async fn run(
    command: Command,
    session: &mut SessionStore,
    config: &mut Config,
    config_path: &Path,
) -> Result<()> {
    match command {
        Command::Login { email } => {
            let email = match email.or_else(|| config.last_email.clone()) {
                Some(email) => email,
                None => bail!("No email given - pass --email"),
            };
            let password = read_password(&format!("Password for {}: ", email))?;

            session
                .login(&email, &password)
                .await
                .context("Login failed")?;
            remember_email(config, config_path, &email);
            eprintln!("Signed in as {}", email);
        }
        Command::Register { email, name } => {
            let password = read_new_password()?;
            session
                .register(&email, &password, &name)
                .await
                .context("Registration failed")?;
            remember_email(config, config_path, &email);
            eprintln!("Registered and signed in as {}", email);
        }
        Command::Logout => {
            session.logout();
            eprintln!("Signed out");
        }
        Command::Status => print_json(&status(session))?,
        Command::Sweets(command) => run_sweets(command, session).await?,
        Command::Purchases => {
            let purchases = session.api().purchases().mine().await?;
            print_json(&purchases)?;
        }
    }
    Ok(())
}

async fn run_sweets(command: SweetsCommand, session: &SessionStore) -> Result<()> {
    let sweets = session.api().sweets();
    match command {
        SweetsCommand::List { skip, limit } => {
            let list = match SweetsCommand::pagination(skip, limit) {
                Some(page) => sweets.list_page(&page).await?,
                None => sweets.list().await?,
            };
            print_json(&list)?;
        }
        SweetsCommand::Get { id } => print_json(&sweets.get(id).await?)?,
        SweetsCommand::Search(args) => print_json(&sweets.search(&args.into()).await?)?,
        SweetsCommand::Create(args) => print_json(&sweets.create(&args.into()).await?)?,
        SweetsCommand::Update { id, fields } => {
            let update = update_request(fields)?;
            print_json(&sweets.update(id, &update).await?)?;
        }
        SweetsCommand::Delete { id } => print_json(&sweets.delete(id).await?)?,
        SweetsCommand::Purchase { id, quantity } => {
            print_json(&sweets.purchase(id, quantity).await?)?
        }
        SweetsCommand::Restock { id, quantity } => {
            print_json(&sweets.restock(id, quantity).await?)?
        }
    }
    Ok(())
}

/// Session summary for `status`. The token itself is never shown.
fn status(session: &SessionStore) -> Value {
    let api = session.api();
    let tokens = api.token_store();
    let saved_at = match tokens.saved_at() {
        Ok(saved_at) => saved_at,
        Err(e) => {
            warn!(error = %e, "Failed to read token timestamp");
            None
        }
    };

    json!({
        "state": session.state().to_string(),
        "signed_in_as": session.user().map(User::display_name),
        "user": session.user(),
        "api": api.base_url(),
        "token_storage": tokens.kind(),
        "token_saved_at": saved_at.map(|t| t.to_rfc3339()),
        "token_age_minutes": saved_at.map(|t| (Utc::now() - t).num_minutes().max(0)),
    })
}

fn update_request(fields: UpdateArgs) -> Result<SweetUpdate> {
    let update = SweetUpdate::from(fields);
    if update.is_empty() {
        bail!("Nothing to update - pass at least one field flag");
    }
    Ok(update)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Remember the email for the next `login`. Failing to save the config is
/// not worth failing a successful sign-in over.
fn remember_email(config: &mut Config, path: &Path, email: &str) {
    if config.last_email.as_deref() == Some(email) {
        return;
    }
    config.last_email = Some(email.to_string());
    if let Err(e) = config.save_to(path) {
        warn!(error = %e, "Failed to save config");
    }
}

fn read_password(prompt: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        debug!("Using password from {}", PASSWORD_ENV);
        return Ok(password);
    }
    rpassword::prompt_password(prompt).context("Failed to read password")
}

fn read_new_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let password = read_password("Choose a password: ")?;
    let confirm = read_password("Confirm password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}
