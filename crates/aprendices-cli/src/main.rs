//! Aprendices CLI - terminal front end for the dashboard API.
//!
//! This is the entry point for the `aprendices` binary. The session is kept
//! in a JSON file so a login survives across invocations.

mod observer;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use aprendices_client::{ClientConfig, DashboardApi, DashboardQueryClient, FilterSet};
use aprendices_session::{FileSessionStore, SessionPolicy, SessionStore};

use observer::TerminalObserver;

/// Base URL used when neither `--base-url` nor `--origin` is given.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Aprendices CLI - query the trainee dashboard API.
#[derive(Parser, Debug)]
#[command(name = "aprendices")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dashboard API base URL [default: http://localhost:8000, or empty
    /// when `--origin` is given].
    #[arg(long, global = true, env = "APRENDICES_BASE_URL")]
    base_url: Option<String>,

    /// Origin used for same-origin deployments. Paths resolve against it
    /// when no base URL is set.
    #[arg(long, global = true, env = "APRENDICES_ORIGIN")]
    origin: Option<String>,

    /// File holding the login session.
    #[arg(
        long,
        global = true,
        env = "APRENDICES_SESSION_FILE",
        default_value = ".aprendices/session.json"
    )]
    session_file: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Do not send `Content-Type: application/json` by default.
    #[arg(long, global = true, default_value = "false")]
    no_json_content_type: bool,

    /// Enable debug logging.
    #[arg(long, global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API is up.
    Status,

    /// Show dashboard cards and charts.
    Dashboard {
        /// Training modality, e.g. PRESENCIAL or VIRTUAL.
        #[arg(long)]
        modalidad: Option<String>,

        /// Training program name.
        #[arg(long)]
        programa: Option<String>,

        /// Training level, e.g. TECNOLOGO.
        #[arg(long)]
        nivel: Option<String>,

        /// Print the raw payload as JSON.
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Log in and store the session.
    Login {
        /// Account username.
        #[arg(long)]
        username: String,

        /// Account password.
        #[arg(long, env = "APRENDICES_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Drop the stored session.
    Logout,

    /// List the users of the logged-in user's training center.
    Users,

    /// Create a user from a JSON document.
    CreateUser {
        /// User fields as a JSON object.
        #[arg(long)]
        data: String,
    },
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let base_url = match (&self.base_url, &self.origin) {
            (Some(base_url), _) => base_url.trim_end_matches('/').to_string(),
            (None, Some(_)) => String::new(),
            (None, None) => DEFAULT_BASE_URL.to_string(),
        };
        ClientConfig {
            base_url,
            origin: self.origin.clone(),
            json_content_type: !self.no_json_content_type,
            request_timeout_seconds: self.timeout,
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("aprendices=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let store = FileSessionStore::open(&args.session_file).with_context(|| {
        format!("failed to open session file {}", args.session_file.display())
    })?;
    let store: Arc<dyn SessionStore> = Arc::new(store);
    let session = SessionPolicy::new(store.clone(), Arc::new(TerminalObserver));

    let config = args.client_config();
    tracing::debug!(
        base_url = %config.base_url,
        origin = ?config.origin,
        session_file = %args.session_file.display(),
        "Client configuration loaded"
    );

    let client = DashboardQueryClient::new(config, session)?;

    run(&client, store.as_ref(), args.command).await
}

async fn run(
    client: &DashboardQueryClient,
    store: &dyn SessionStore,
    command: Command,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    match command {
        Command::Status => {
            let status = client.check_status().await?;
            writeln!(stdout, "API: {}", status.status)?;
            match store.credential() {
                Some(credential) => writeln!(
                    stdout,
                    "Session: logged in since {}",
                    credential.issued().format("%Y-%m-%d %H:%M UTC")
                )?,
                None => writeln!(stdout, "Session: not logged in")?,
            }
        }
        Command::Dashboard {
            modalidad,
            programa,
            nivel,
            json,
        } => {
            let filters = FilterSet {
                modalidad,
                programa,
                nivel,
            };
            let payload = if filters.is_empty() {
                client.fetch_dashboard().await?
            } else {
                client.fetch_dashboard_filtered(&filters).await?
            };
            if json {
                output::write_json(&mut stdout, &payload)?;
            } else {
                output::write_dashboard(&mut stdout, &payload, &filters)?;
            }
        }
        Command::Login { username, password } => {
            let login = client.login(&username, &password).await?;
            match &login.user {
                Some(user) => writeln!(
                    stdout,
                    "Logged in as {username} (center {})",
                    user.cod_centro
                )?,
                None => writeln!(stdout, "Logged in as {username}")?,
            }
        }
        Command::Logout => {
            client.logout()?;
            writeln!(stdout, "Logged out")?;
        }
        Command::Users => {
            let users = client.get_users_by_center().await?;
            output::write_users(&mut stdout, &users)?;
        }
        Command::CreateUser { data } => {
            let user: serde_json::Value =
                serde_json::from_str(&data).context("--data must be a JSON document")?;
            anyhow::ensure!(user.is_object(), "--data must be a JSON object");
            match client.create_user(&user).await? {
                Some(created) => output::write_json(&mut stdout, &created)?,
                None => writeln!(stdout, "User created")?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_client_config() {
        let args = Args::try_parse_from([
            "aprendices",
            "--base-url",
            "http://api.local/",
            "--timeout",
            "5",
            "--no-json-content-type",
            "status",
        ])
        .unwrap();

        let config = args.client_config();
        assert_eq!(config.base_url, "http://api.local");
        assert_eq!(config.request_timeout_seconds, 5);
        assert!(!config.json_content_type);
        assert!(config.origin.is_none());
    }

    #[test]
    fn base_url_defaults_to_local_api() {
        let args = Args::try_parse_from(["aprendices", "status"]).unwrap();
        if args.base_url.is_none() && args.origin.is_none() {
            assert_eq!(args.client_config().base_url, DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn origin_alone_selects_same_origin_mode() {
        let args = Args::try_parse_from([
            "aprendices",
            "--origin",
            "http://dash.local",
            "status",
        ])
        .unwrap();
        if args.base_url.is_some() {
            // APRENDICES_BASE_URL is set in the environment.
            return;
        }

        let config = args.client_config();
        assert_eq!(config.base_url, "");
        assert_eq!(
            config.resolve_url("/api/data").unwrap().as_str(),
            "http://dash.local/api/data"
        );
    }

    #[test]
    fn explicit_base_url_wins_over_origin() {
        let args = Args::try_parse_from([
            "aprendices",
            "--origin",
            "http://dash.local",
            "--base-url",
            "http://api.local",
            "status",
        ])
        .unwrap();

        assert_eq!(args.client_config().base_url, "http://api.local");
    }

    #[test]
    fn dashboard_filters_are_optional() {
        let args = Args::try_parse_from([
            "aprendices",
            "dashboard",
            "--nivel",
            "TECNOLOGO",
            "--json",
        ])
        .unwrap();

        match args.command {
            Command::Dashboard {
                modalidad,
                nivel,
                json,
                ..
            } => {
                assert!(modalidad.is_none());
                assert_eq!(nivel.as_deref(), Some("TECNOLOGO"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_user_requires_data() {
        assert!(Args::try_parse_from(["aprendices", "create-user"]).is_err());
    }

    #[test]
    fn global_flags_accepted_after_subcommand() {
        let args = Args::try_parse_from([
            "aprendices",
            "users",
            "--session-file",
            "/tmp/s.json",
            "--origin",
            "http://dash.local",
        ])
        .unwrap();
        assert_eq!(args.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(args.origin.as_deref(), Some("http://dash.local"));
    }

    #[tokio::test]
    async fn logout_clears_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&path).unwrap());
        store
            .set_credential(aprendices_core::Credential::new("tok"))
            .unwrap();

        let session = SessionPolicy::new(store.clone(), Arc::new(TerminalObserver));
        let client =
            DashboardQueryClient::new(ClientConfig::cross_origin("http://127.0.0.1:9"), session)
                .unwrap();

        run(&client, store.as_ref(), Command::Logout).await.unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert!(reopened.credential().is_none());
    }
}
