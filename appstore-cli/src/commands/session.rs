use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use client::{SessionController, SessionStatus};
use rpassword::prompt_password;
use shared::config::Config;
use shared::models::{LoginRequest, RegisterRequest, UserProfile};

use super::{connect, restore_session};

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in with email and password
    Login(LoginArgs),
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Show the signed-in user
    Me,
    /// Forget the stored token
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,

    /// Account password; prompted for when omitted
    #[arg(long, env = "APPSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub credentials: LoginArgs,

    /// Name shown to other users; prompted for when omitted
    #[arg(long, short)]
    pub display_name: Option<String>,
}

pub async fn run(config: &Config, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Login(args) => login(config, args).await,
        SessionCommand::Register(args) => register(config, args).await,
        SessionCommand::Me => me(config).await,
        SessionCommand::Logout => {
            logout(config);
            Ok(())
        }
    }
}

pub async fn login(config: &Config, args: LoginArgs) -> Result<()> {
    let session = restore_session(config).await?;

    let email = value_or_prompt(args.email, "Email: ")?;
    let password = password_or_prompt(args.password)?;
    let request = LoginRequest::new(&email, password)?;

    session.login(&request).await.context("login failed")?;
    print_signed_in(&session, config);
    Ok(())
}

pub async fn register(config: &Config, args: RegisterArgs) -> Result<()> {
    let session = restore_session(config).await?;

    let email = value_or_prompt(args.credentials.email, "Email: ")?;
    let display_name = value_or_prompt(args.display_name, "Display name: ")?;
    let password = password_or_prompt(args.credentials.password)?;
    let request = RegisterRequest::new(&email, password, &display_name)?;

    session
        .register(&request)
        .await
        .context("registration failed")?;
    print_signed_in(&session, config);
    Ok(())
}

pub async fn me(config: &Config) -> Result<()> {
    let session = restore_session(config).await?;
    let snapshot = session.snapshot();

    match (session.status(), snapshot.user) {
        (SessionStatus::Authenticated, Some(user)) => {
            print_profile(&user);
            Ok(())
        }
        _ => match snapshot.error {
            Some(error) => bail!(
                "session is no longer valid ({error}); run `appstore session login` to sign in again"
            ),
            None => bail!("not signed in; run `appstore session login` first"),
        },
    }
}

pub fn logout(config: &Config) {
    let session = SessionController::new(connect(config));
    session.logout();
    println!(
        "Signed out. Token removed from {}",
        config.resolved_token_path().display()
    );
}

fn print_signed_in(session: &SessionController, config: &Config) {
    if let Some(user) = session.snapshot().user {
        println!("Logged in as {}", user.label());
    }
    println!(
        "token stored at {}",
        config.resolved_token_path().display()
    );
}

fn print_profile(user: &UserProfile) {
    println!("Logged in as {}", user.label());
    if let Some(email) = &user.email {
        println!("email: {email}");
    }
    if let Some(id) = &user.id {
        println!("id: {id}");
    }
    for (key, value) in &user.extra {
        println!("{key}: {value}");
    }
}

fn value_or_prompt(value: Option<String>, message: &str) -> Result<String> {
    if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
        return Ok(value);
    }
    prompt(message)
}

fn password_or_prompt(value: Option<String>) -> Result<String> {
    match value {
        Some(password) => Ok(password),
        None => prompt_password("Password: ").context("failed to read password"),
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
