//! Aperture CLI - Chat with the studio CRM agent
//!
//! Thin client over the Aperture HTTP API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use uuid::Uuid;

use api::ApertureClient;
use config::Config;

#[derive(Parser)]
#[command(name = "aperture")]
#[command(about = "Aperture CLI - Chat with the studio CRM agent", long_about = None)]
#[command(version)]
struct Cli {
    /// Log HTTP and client activity (respects RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Show current configuration
    Config,

    /// Set the studio and user to chat as
    Use {
        /// Studio ID
        #[arg(long)]
        studio: Uuid,
        /// User ID
        #[arg(long)]
        user: Uuid,
    },

    /// Send one message to the agent
    Chat {
        /// Message text
        message: String,
        /// Studio ID (overrides `use`)
        #[arg(long)]
        studio: Option<Uuid>,
        /// User ID (overrides `use`)
        #[arg(long)]
        user: Option<Uuid>,
    },

    /// Show the messages of a session
    History {
        /// Session ID (printed by `chat`)
        session_id: Uuid,
        /// Max messages
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List the tools the agent can call
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "aperture=debug,reqwest=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Config => cmd_config(),
        Commands::Use { studio, user } => cmd_use(studio, user),
        Commands::Chat {
            message,
            studio,
            user,
        } => cmd_chat(message, studio, user).await,
        Commands::History { session_id, limit } => cmd_history(session_id, limit).await,
        Commands::Tools => cmd_tools().await,
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> ApertureClient {
    tracing::debug!("Using Aperture API at {}", config.base_url);
    ApertureClient::new(&config.base_url, config.api_key.as_deref())
}

async fn cmd_login(key: Option<String>) -> Result<()> {
    // Saved without env overrides, tested against the effective URL
    let mut config = Config::load()?;
    let base_url = config.effective_base_url(|key| std::env::var(key).ok());

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = ApertureClient::new(&base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Aperture API at {}", base_url);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.studio_id.is_none() {
        println!("\n{}", "Tip: pick the studio and user to chat as:".yellow());
        println!("  aperture use --studio <STUDIO_ID> --user <USER_ID>");
    }

    Ok(())
}

fn cmd_use(studio: Uuid, user: Uuid) -> Result<()> {
    let mut config = Config::load()?;
    config.set_identity(studio, user);
    config.save()?;

    println!(
        "{} Chatting as user {} in studio {}",
        "✓".green(),
        user.to_string().cyan(),
        studio.to_string().cyan()
    );
    Ok(())
}

async fn cmd_chat(message: String, studio: Option<Uuid>, user: Option<Uuid>) -> Result<()> {
    let config = Config::load_effective()?;
    let (studio_id, user_id) = config.resolve_identity(studio, user).context(
        "No studio/user set. Run 'aperture use --studio <ID> --user <ID>' or pass --studio and --user.",
    )?;

    let reply = client(&config).chat(studio_id, user_id, &message).await?;

    println!("{}", reply.response);

    let mut meta = vec![format!("session {}", reply.session_id)];
    if reply.shortcut {
        meta.push("shortcut".to_string());
    }
    if !reply.tools_used.is_empty() {
        meta.push(format!("tools: {}", reply.tools_used.join(", ")));
    }
    eprintln!("{}", format!("[{}]", meta.join(" · ")).dimmed());

    Ok(())
}

async fn cmd_history(session_id: Uuid, limit: usize) -> Result<()> {
    let config = Config::load_effective()?;
    let messages = client(&config).history(session_id, limit).await?;

    if messages.is_empty() {
        println!("No messages in session {}", session_id);
        return Ok(());
    }

    for msg in messages {
        let role = match msg.role.as_str() {
            "user" => msg.role.cyan().bold(),
            "assistant" => msg.role.green().bold(),
            _ => msg.role.dimmed(),
        };
        println!("{} {}", role, msg.created_at.dimmed());
        println!("  {}", truncate_string(&msg.content, 400));
    }

    Ok(())
}

async fn cmd_tools() -> Result<()> {
    let config = Config::load_effective()?;
    let tools = client(&config).tools().await?;

    println!("{}", "Tools:".bold());
    for tool in tools {
        println!(
            "  {} {}",
            tool.function.name.cyan(),
            tool.function.description.dimmed()
        );
    }

    Ok(())
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn cmd_config() -> Result<()> {
    let config = Config::load_effective()?;

    let show = |id: Option<Uuid>| id.map(|u| u.to_string()).unwrap_or_else(|| "None".to_string());

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!("  Studio: {}", show(config.studio_id).cyan());
    println!("  User: {}", show(config.user_id).cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_string("📸📸📸", 2), "📸📸...");
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn test_cli_parses_chat_overrides() {
        let studio = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "aperture",
            "--verbose",
            "chat",
            "find Maria",
            "--studio",
            &studio.to_string(),
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Chat {
                message,
                studio: s,
                user,
            } => {
                assert_eq!(message, "find Maria");
                assert_eq!(s, Some(studio));
                assert_eq!(user, None);
            }
            _ => panic!("expected chat command"),
        }
    }
}
