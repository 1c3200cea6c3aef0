use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use evalboard::config::ConfigError;
use evalboard::{
    ApiConfig, ApiError, ApiRequest, FileStore, GuardDecision, ReqwestTransport, RouteGuard, SessionController,
    SessionError, SessionStatus, TransportError,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build HTTP client: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("not signed in; run `evalctl login` first")]
    NotSignedIn,
    #[error("no session file location; pass --session-file or set EVAL_SESSION_FILE")]
    NoSessionPath,
    #[error("missing password; pass --password, set EVAL_PASSWORD or pipe it on stdin")]
    MissingPassword,
    #[error("service health check failed")]
    Unhealthy,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "evalctl", about = "Teacher-evaluation session and API CLI")]
struct Cli {
    /// Service root, e.g. http://localhost:8000
    #[arg(long, env = "EVAL_API_URL")]
    base_url: Option<String>,

    /// Where the session token and profile are kept between runs.
    #[arg(long, env = "EVAL_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log requests and session transitions to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the service answers on /health.
    Ping,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EVAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    /// Verify the stored session and print the signed-in profile.
    Whoami,
    /// Verify the stored session and print its state.
    Status,
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    VerifyToken,
    /// Print the route decision for a client path.
    Guard {
        path: String,
    },
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Get {
        path: String,
    },
    Post {
        path: String,
        #[arg(long)]
        data: Option<String>,
    },
    Delete {
        path: String,
    },
}

struct CliContext {
    controller: SessionController,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = build_context(cli.base_url.as_deref(), cli.session_file)?;
    run(&ctx, cli.command).await
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_context(base_url: Option<&str>, session_file: Option<PathBuf>) -> Result<CliContext, CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url)?;
    }
    let path = session_file.or_else(default_session_path).ok_or(CliError::NoSessionPath)?;
    tracing::debug!(base_url = %config.base_url, session_file = %path.display(), "cli context");

    let transport = Arc::new(ReqwestTransport::new(config.clone())?);
    let store = Arc::new(FileStore::new(path));
    Ok(CliContext { controller: SessionController::with_config(&config, transport, store) })
}

fn default_session_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "evalboard").map(|dirs| dirs.config_dir().join("session.json"))
}

async fn run(ctx: &CliContext, command: Command) -> Result<(), CliError> {
    let controller = &ctx.controller;
    match command {
        Command::Ping => {
            if !controller.gateway().check_connection().await {
                return Err(CliError::Unhealthy);
            }
            println!("ok");
            Ok(())
        }
        Command::Login { email, password } => {
            let password = resolve_password(password, io::stdin().lock())?;
            let user = controller.login(&email, &password).await?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Logout => {
            controller.initialize().await;
            controller.logout().await;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            require_session(controller).await?;
            let snapshot = controller.snapshot();
            let user = snapshot.user().ok_or(CliError::NotSignedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Status => {
            controller.initialize().await;
            print_json(&serde_json::to_value(controller.snapshot())?)
        }
        Command::ChangePassword { current, new } => {
            require_session(controller).await?;
            controller.change_password(&current, &new).await?;
            println!("password changed");
            Ok(())
        }
        Command::VerifyToken => {
            require_session(controller).await?;
            let check = controller.verify_token().await?;
            print_json(&serde_json::to_value(check)?)
        }
        Command::Guard { path } => {
            controller.initialize().await;
            let decision = RouteGuard::default().check_path(&controller.snapshot(), &path);
            print_json(&decision_json(&path, &decision))
        }
        Command::Api(api) => run_api(controller, api).await,
    }
}

async fn run_api(controller: &SessionController, api: ApiCommand) -> Result<(), CliError> {
    controller.initialize().await;
    let request = match api.command {
        ApiSubcommand::Get { path } => ApiRequest::get(path),
        ApiSubcommand::Post { path, data } => {
            let body = match data {
                Some(raw) => serde_json::from_str::<Value>(&raw)?,
                None => json!({}),
            };
            ApiRequest::post(path).with_json(body)
        }
        ApiSubcommand::Delete { path } => ApiRequest::delete(path),
    };
    let response = controller.gateway().send(request).await?;
    print_json(&response_json(&response.body))
}

async fn require_session(controller: &SessionController) -> Result<(), CliError> {
    if controller.initialize().await == SessionStatus::Authenticated {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Password from the flag/env, else the first line of `input`.
fn resolve_password(flag: Option<String>, mut input: impl BufRead) -> Result<String, CliError> {
    if let Some(password) = flag.filter(|p| !p.is_empty()) {
        return Ok(password);
    }
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password.to_owned())
}

fn decision_json(path: &str, decision: &GuardDecision) -> Value {
    match decision {
        GuardDecision::Loading => json!({ "path": path, "decision": "loading" }),
        GuardDecision::Allow => json!({ "path": path, "decision": "allow" }),
        GuardDecision::RedirectTo(target) => json!({ "path": path, "decision": "redirect", "location": target }),
    }
}

/// Response body as JSON; non-JSON bodies are wrapped as a string.
fn response_json(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
