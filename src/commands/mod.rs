use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;

use crate::app::App;
use crate::error::{JoinerError, Result};

pub mod auth;
pub mod groups;
pub mod instances;
pub mod settings;

/// Browse VRChat groups and join group-hosted instances.
#[derive(Debug, Parser)]
#[command(name = "vrchat-joiner", version, about)]
pub struct Cli {
    /// Directory holding settings, the saved token, and logs
    #[arg(long, global = true, env = "VRCJOIN_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        username: String,
        /// For scripts only: visible in shell history and the process list.
        /// Read from the terminal without echo when omitted
        #[arg(long, env = "VRCJOIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Two-factor code, prompted for when required and omitted
        #[arg(long)]
        code: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// List groups, optionally filtered by search text
    Groups {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Remember a group as the selected one
    Select { group_id: String },
    /// List the instances a group is hosting
    Instances { group_id: String },
    /// Join an instance, either given explicitly or picked automatically
    Join {
        /// Defaults to the last selected group
        group_id: Option<String>,
        #[arg(long, requires = "instance")]
        world: Option<String>,
        #[arg(long, requires = "world")]
        instance: Option<String>,
    },
    /// Show or change settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

pub async fn dispatch(command: Command, app: &App) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            code,
        } => auth::login(app, &username, password, code).await,
        Command::Logout => auth::logout(app).await,
        Command::Groups { search } => groups::list_groups(app, search).await,
        Command::Select { group_id } => groups::select_group(app, &group_id).await,
        Command::Instances { group_id } => instances::list_instances(app, &group_id).await,
        Command::Join {
            group_id,
            world,
            instance,
        } => instances::join(app, group_id, world.zip(instance)).await,
        Command::Settings(cmd) => settings::run(app, cmd).await,
    }
}

/// Print `label` and read one trimmed line from stdin.
pub(crate) async fn prompt(label: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;

    // std's stdin keeps one shared buffer, so consecutive prompts never lose
    // piped input.
    let (read, line) = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .map_err(|e| JoinerError::Custom(format!("Reading input failed: {e}")))??;
    if read == 0 {
        return Err(JoinerError::Custom(format!("No input for {}", label.trim())));
    }
    Ok(line.trim().to_string())
}

/// Print `label` and read a secret from the terminal without echoing it.
pub(crate) async fn prompt_secret(label: &str) -> Result<String> {
    let label = label.to_string();
    tokio::task::spawn_blocking(move || rpassword::prompt_password(label))
        .await
        .map_err(|e| JoinerError::Custom(format!("Reading input failed: {e}")))?
        .map_err(JoinerError::from)
}

/// Restore the saved session or fail with a hint to log in.
pub(crate) async fn require_session(app: &App) -> Result<()> {
    if app.restore_session().await {
        Ok(())
    } else {
        Err(JoinerError::Custom(
            "Not authenticated. Run `vrchat-joiner login <username>` first.".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_with_explicit_instance() {
        let cli = Cli::parse_from([
            "vrchat-joiner",
            "--data-dir",
            "/tmp/x",
            "join",
            "--world",
            "wrld_12345",
            "--instance",
            "12345",
        ]);
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/x"));
        match cli.command {
            Command::Join {
                group_id,
                world,
                instance,
            } => {
                assert_eq!(group_id, None);
                assert_eq!(world.as_deref(), Some("wrld_12345"));
                assert_eq!(instance.as_deref(), Some("12345"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_world_requires_instance() {
        let parsed = Cli::try_parse_from(["vrchat-joiner", "join", "--world", "wrld_12345"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_login_password_is_optional() {
        let cli = Cli::parse_from(["vrchat-joiner", "login", "user"]);
        match cli.command {
            Command::Login { username, code, .. } => {
                assert_eq!(username, "user");
                assert_eq!(code, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
