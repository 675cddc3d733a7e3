mod api;
mod config;
mod errors;
mod models;
mod notify;
mod session;
mod state;
mod token_store;
mod workflows;

#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::{Credentials, Registration};
use crate::config::Config;
use crate::models::application::Recipient;
use crate::models::user::ProfileUpdate;
use crate::notify::NotificationKind;
use crate::state::AppState;
use crate::workflows::submission::RecipientList;

/// Headless client for the AutoSender job-application service.
#[derive(Parser)]
#[command(name = "autosender", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and store the session token.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session token.
    Logout,
    /// Show the authenticated profile.
    Profile,
    /// Update profile fields; only the flags you pass are sent.
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        resume_url: Option<String>,
        #[arg(long)]
        linkedin_profile: Option<String>,
        #[arg(long)]
        portfolio_url: Option<String>,
        #[arg(long)]
        github_url: Option<String>,
        #[arg(long)]
        default_cover_letter: Option<String>,
    },
    /// Send a batch of applications.
    Send {
        /// Recipient as `email=Company Name`; repeat for each addressee.
        #[arg(long = "to", value_parser = parse_recipient)]
        recipients: Vec<Recipient>,
        #[arg(long, default_value = "Application for Open Position")]
        subject: String,
    },
    /// List previously sent applications.
    History,
    /// Personalize the default cover letter against a job description.
    Personalize {
        #[arg(long)]
        job_description: String,
    },
}

fn parse_recipient(raw: &str) -> Result<Recipient, String> {
    let (email, company) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `email=Company Name`, got `{raw}`"))?;
    Ok(Recipient::new(email.trim(), company.trim()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(config);
    info!(
        "AutoSender client v{} (backend {})",
        env!("CARGO_PKG_VERSION"),
        state.config.api_base_url
    );

    // One restore attempt per process: the stored token either hydrates the
    // session or gets discarded before any command runs.
    state.session.restore().await;

    let outcome = run(&state, cli.command).await;

    // Whatever is still queued when a one-shot run ends is the command's
    // outcome report.
    for notification in state.notifications.active() {
        let label = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        println!("[{label}] {}", notification.message);
    }

    outcome
}

async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            match state.session.login(&Credentials { email, password }).await {
                Ok(()) => {
                    state.notifications.success("Login successful!");
                }
                Err(err) => {
                    state.notifications.error("Login failed!");
                    return Err(err.into());
                }
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let registration = Registration {
                name,
                email,
                password,
            };
            match state.session.register(&registration).await {
                Ok(()) => {
                    state.notifications.success("Registration successful!");
                }
                Err(err) => {
                    state.notifications.error(err.to_string());
                    return Err(err.into());
                }
            }
        }
        Command::Logout => {
            state.session.logout();
            println!("Logged out.");
        }
        Command::Profile => match state.session.snapshot().user {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                for (label, value) in [
                    ("resume", user.resume_url),
                    ("linkedin", user.linkedin_profile),
                    ("portfolio", user.portfolio_url),
                    ("github", user.github_url),
                ] {
                    if let Some(value) = value {
                        println!("  {label}: {value}");
                    }
                }
                if user.default_cover_letter.is_some() {
                    println!("  default cover letter: set");
                }
            }
            None => println!("Not logged in."),
        },
        Command::UpdateProfile {
            name,
            resume_url,
            linkedin_profile,
            portfolio_url,
            github_url,
            default_cover_letter,
        } => {
            let update = ProfileUpdate {
                name,
                resume_url,
                linkedin_profile,
                portfolio_url,
                github_url,
                default_cover_letter,
            };
            state.profile.update(&update).await?;
        }
        Command::Send {
            recipients,
            subject,
        } => {
            let mut list = RecipientList::from_rows(recipients);
            state.submission.submit(&mut list, &subject).await?;
        }
        Command::History => {
            let records = state.api.get_application_history().await?;
            if records.is_empty() {
                println!("No applications sent yet.");
            } else {
                for record in records {
                    println!(
                        "{}  {}  {}  {}",
                        record.sent_at.format("%Y-%m-%d %H:%M"),
                        record.company_name,
                        record.recipient_email,
                        record.status
                    );
                }
            }
        }
        Command::Personalize { job_description } => {
            let letter = state.personalize.personalize(&job_description).await?;
            println!("{letter}");
        }
    }
    Ok(())
}
