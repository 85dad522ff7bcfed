use anyhow::{Context, Result, anyhow, bail};
use dialoguer::Password;
use serde_json::{Value, json};
use tracing::{info, warn};
use tweeter_core::{
    ApiResult, AuthService, LoginRequest, NormalizedResult, ProfileUpdate, RegisterRequest,
    ServiceResponse, SessionStoreRef,
};

use crate::output::{print_failure, print_profile, print_success, spinner};

const MIN_PASSWORD_LEN: usize = 6;

/// Run a call behind a spinner and turn a normalized failure into an error
async fn with_spinner<F>(message: &str, call: F) -> Result<ServiceResponse>
where
    F: std::future::Future<Output = ApiResult>,
{
    let spinner = spinner(message);
    let result = call.await;
    spinner.finish_and_clear();
    result.map_err(report)
}

fn report(result: NormalizedResult) -> anyhow::Error {
    print_failure(&result);
    anyhow!(result)
}

fn prompt_password(prompt: &str, confirm: bool) -> Result<String> {
    let input = Password::new().with_prompt(prompt);
    let input = if confirm {
        input.with_confirmation("Confirm password", "Passwords don't match")
    } else {
        input
    };
    input.interact().context("Failed to read password")
}

fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }
    Ok(())
}

pub async fn run_register(
    auth: &AuthService,
    first_name: String,
    last_name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password", true)?,
    };
    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        password,
    };

    with_spinner("Creating account...", auth.register(&request)).await?;
    info!(email = %request.email, "Registered account");
    print_success("Account created. You can now log in.");
    Ok(())
}

pub async fn run_login(auth: &AuthService, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password", false)?,
    };
    let request = LoginRequest { email, password };

    let response = with_spinner("Logging in...", auth.login(&request)).await?;
    auth.gateway()
        .sessions()
        .set_session(&response.data)
        .context("Failed to store session")?;

    let name = auth
        .gateway()
        .sessions()
        .get_session()
        .context("Failed to read session")?
        .and_then(|session| session.profile())
        .and_then(|user| user.display_name().map(str::to_string))
        .unwrap_or(request.email);
    print_success(&format!("Logged in as {}", name));
    Ok(())
}

/// The stored session is dropped even when the logout call fails
pub async fn run_logout(auth: &AuthService) -> Result<()> {
    let spinner = spinner("Logging out...");
    let result = auth.logout(&json!({})).await;
    spinner.finish_and_clear();

    if let Err(e) = &result {
        warn!(message = %e.message, code = ?e.code, "Logout call failed, clearing session anyway");
    }
    auth.gateway()
        .sessions()
        .remove_session()
        .context("Failed to remove session")?;
    print_success("Logged out");
    Ok(())
}

pub fn run_whoami(sessions: &SessionStoreRef) -> Result<()> {
    match sessions.get_session().context("Failed to read session")? {
        Some(session) => print_profile(&session),
        None => bail!("Not logged in"),
    }
    Ok(())
}

pub fn run_token(sessions: &SessionStoreRef) -> Result<()> {
    match sessions.access_token().context("Failed to read session")? {
        Some(token) => println!("{}", token),
        None => bail!("No access token stored"),
    }
    Ok(())
}

pub async fn run_profile_update(
    auth: &AuthService,
    mut update: ProfileUpdate,
    change_password: bool,
) -> Result<()> {
    let sessions = auth.gateway().sessions();
    let Some(mut session) = sessions.get_session().context("Failed to read session")? else {
        bail!("Not logged in");
    };

    if change_password {
        let password = prompt_password("New password", true)?;
        check_new_password(&password)?;
        update.password = Some(password);
    }
    if is_empty_update(&update) {
        bail!("Nothing to update");
    }

    let response = with_spinner("Updating profile...", auth.update_profile(&update)).await?;
    session.merge_profile(updated_fields(&response.data));
    sessions
        .set_session(&session)
        .context("Failed to store session")?;

    print_success("Profile updated");
    print_profile(&session);
    Ok(())
}

fn is_empty_update(update: &ProfileUpdate) -> bool {
    update.username.is_none()
        && update.name.is_none()
        && update.last_name.is_none()
        && update.email.is_none()
        && update.password.is_none()
}

/// Profile fields in an update response: the `data` payload, or the body itself
fn updated_fields(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    }
}
