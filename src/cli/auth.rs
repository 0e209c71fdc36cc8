//! Authentication CLI commands

use std::io::BufRead;

use clap::Subcommand;

use super::CliContext;
use crate::audit::AuditEntry;
use crate::auth::{AuthProvider, SecureString};
use crate::error::{CuotasError, CuotasResult};

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,
        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Sign out of the current session
    Logout,
    /// Show whether authentication is enabled and who is signed in
    Status,
    /// Create a user (requires the setup token)
    CreateUser {
        /// Email of the new user
        email: String,
        /// Setup token; prompted for when omitted
        #[arg(long)]
        setup_token: Option<String>,
        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
}

/// Handle an auth command
pub fn handle_auth_command(ctx: &CliContext, cmd: AuthCommands) -> CuotasResult<()> {
    let provider = ctx.auth_provider();

    match cmd {
        AuthCommands::Login {
            email,
            password_stdin,
        } => {
            let password = read_password("Password: ", password_stdin)?;
            let session = provider.sign_in_with_password(&email, &password)?;
            ctx.audit().log(&AuditEntry::sign_in(&session.email))?;

            println!("Signed in as {}", session.email);
            println!(
                "  Session expires: {}",
                session.expires_at.format("%Y-%m-%d %H:%M UTC")
            );
        }

        AuthCommands::Logout => match provider.sign_out()? {
            Some(session) => {
                ctx.audit().log(&AuditEntry::sign_out(&session.email))?;
                println!("Signed out {}", session.email);
            }
            None => println!("Not signed in."),
        },

        AuthCommands::Status => {
            println!(
                "Authentication: {}",
                if ctx.settings.auth.enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            match provider.current_session()? {
                Some(session) => {
                    println!("Session: {}", session.email);
                    println!(
                        "  Expires: {}",
                        session.expires_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                None => println!("Session: none"),
            }
        }

        AuthCommands::CreateUser {
            email,
            setup_token,
            password_stdin,
        } => {
            let token = match setup_token {
                Some(token) => SecureString::from(token),
                None => prompt("Setup token: ")?,
            };
            let password = read_password("New password: ", password_stdin)?;
            let user = provider.admin_create_user(Some(&token), &email, &password)?;
            ctx.audit().log(&AuditEntry::create_user(&user.email))?;

            println!("Created user: {}", user.email);
            println!("  ID: {}", user.id);
        }
    }

    Ok(())
}

fn read_password(prompt_text: &str, from_stdin: bool) -> CuotasResult<SecureString> {
    if !from_stdin {
        return prompt(prompt_text);
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CuotasError::Io(format!("Failed to read password: {}", e)))?;
    let password = SecureString::from(line.trim_end_matches(['\r', '\n']));
    zeroize::Zeroize::zeroize(&mut line);
    Ok(password)
}

/// Prompt for a secret (hidden input)
fn prompt(prompt_text: &str) -> CuotasResult<SecureString> {
    rpassword::prompt_password(prompt_text)
        .map(SecureString::from)
        .map_err(|e| CuotasError::Auth(format!("Failed to read input: {}", e)))
}
