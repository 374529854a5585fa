use anyhow::{bail, Context, Result};
use reqwest::Method;

use playlists_core::models::{RegisterRequest, UserProfile};
use playlists_core::{AuthController, RequestOptions};

fn read_password(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

pub async fn login(
    controller: &AuthController,
    email: &str,
    password: Option<String>,
    force: bool,
) -> Result<()> {
    if !force && controller.redirect_if_authenticated() {
        return Ok(());
    }
    let password = read_password(password)?;
    let auth = controller.api().login(email, &password).await?;
    println!("Logged in as {}", auth.user.display_name());
    Ok(())
}

pub async fn register(
    controller: &AuthController,
    email: String,
    first_name: String,
    last_name: String,
    password: Option<String>,
) -> Result<()> {
    let password = read_password(password)?;
    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        password,
    };
    let auth = controller.api().register(&request).await?;
    println!("Registered and logged in as {}", auth.user.display_name());
    Ok(())
}

pub fn logout(controller: &AuthController) {
    println!("Logged out");
    controller.logout();
}

pub async fn status(controller: &AuthController, refresh: bool) -> Result<()> {
    if !controller.require_auth() {
        return Ok(());
    }

    let user = if refresh {
        Some(controller.observe(controller.api().profile().await)?)
    } else {
        controller.session().user::<UserProfile>()
    };

    match user {
        Some(user) => println!("Logged in as {} <{}>", user.display_name(), user.email),
        None => println!("Logged in (no user record stored)"),
    }

    if let Some(claims) = controller.session().claims() {
        if let Some(at) = claims.expires_at() {
            if claims.is_past_expiry() {
                println!("Token expired at {} (the server will ask for a new login)", at.to_rfc2822());
            } else {
                let minutes = claims.minutes_until_expiry().unwrap_or(0);
                println!("Token expires {} ({}h {}m left)", at.to_rfc2822(), minutes / 60, minutes % 60);
            }
        }
    }
    Ok(())
}

/// Split `Name: value`
fn parse_header(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name, value)),
        _ => bail!("Header must look like 'Name: value', got '{}'", raw),
    }
}

fn read_body(data: &str) -> Result<Vec<u8>> {
    match data.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read body from {}", path)),
        None => Ok(data.as_bytes().to_vec()),
    }
}

pub async fn request(
    controller: &AuthController,
    path: &str,
    method: &str,
    headers: &[String],
    data: Option<&str>,
) -> Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", method))?;

    let mut options = RequestOptions::new().method(method);
    for raw in headers {
        let (name, value) = parse_header(raw)?;
        options = options.try_header(name, value)?;
    }
    if let Some(data) = data {
        options = options.body(read_body(data)?);
    }

    let response = controller.api_request(path, options).await?;
    let status = response.status();
    let text = response.text().await.context("Failed to read response body")?;

    eprintln!("HTTP {}", status);
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        bail!("Request failed with status {}", status);
    }
    Ok(())
}
