//! Command execution against the configured backend.
//!
//! # Responsibility
//! - Resolve configuration (environment, then flags) and initialize logging.
//! - Select the store once and route commands through the procedure surface.
//!
//! # Invariants
//! - Dashboard data and project creation go through `Api` like any caller.
//! - Ingestion commands need a SQLite store; the demo store is read-only.

use log::info;
use rankdash_api::{Api, ApiError, RpcResponse};
use rankdash_core::config::parse_user_id;
use rankdash_core::db::{open_db, DbError};
use rankdash_core::model::now_epoch_ms;
use rankdash_core::{
    init_logging, AppConfig, Audit, Backlink, ConfigError, Keyword, LoggingError,
    ProjectListItem, ProjectRepository, Ranking, RepoError, RequestContext, Session,
    SqliteTrackingRepository, SqliteUserRepository, StoreConfig, TrackingRepository, User,
    UserRepository, UserStats, ValidationError,
};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::cli::{Cli, Commands, GlobalArgs, TrackCommands};
use crate::dashboard::render_dashboard;
use crate::forms::{project_create_input, FormError};

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Validation(ValidationError),
    Form(FormError),
    Rpc(ApiError),
    InvalidId { field: &'static str, value: String },
    UnexpectedPayload(String),
    NeedsDatabase(&'static str),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Logging(err) => write!(f, "logging error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::Rpc(err) => write!(f, "{}: {}", err.code.as_str(), err.message),
            Self::InvalidId { field, value } => write!(f, "{field} must be a uuid, got `{value}`"),
            Self::UnexpectedPayload(message) => write!(f, "unexpected response payload: {message}"),
            Self::NeedsDatabase(command) => {
                write!(f, "`{command}` needs a database; pass --db or set RANKDASH_DB_PATH")
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::Rpc(_) | Self::InvalidId { .. } | Self::UnexpectedPayload(_) => None,
            Self::NeedsDatabase(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormError> for CliError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

/// Applies flag overrides on top of environment configuration.
pub fn apply_overrides(mut config: AppConfig, flags: &GlobalArgs) -> Result<AppConfig, CliError> {
    if let Some(path) = &flags.db {
        config.store = StoreConfig::Sqlite { path: path.clone() };
    }
    if flags.demo {
        config.store = StoreConfig::Demo;
    }
    if let Some(user) = &flags.user {
        config.session_user = Some(parse_user_id(user)?);
    }
    if let Some(level) = &flags.log_level {
        config.set_log_level(level)?;
    }
    if let Some(dir) = &flags.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Runs one parsed invocation to completion.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let config = apply_overrides(AppConfig::from_env()?, &cli.global)?;
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, &dir.to_string_lossy())?;
    }

    let ctx = RequestContext::from_session(config.session_user.map(|user_id| Session { user_id }));
    match &config.store {
        StoreConfig::Demo => {
            info!("event=cli_start module=cli status=ok store=demo");
            execute(&Api::demo(), None, &ctx, cli.command)
        }
        StoreConfig::Sqlite { path } => {
            info!("event=cli_start module=cli status=ok store=sqlite");
            let conn = open_db(path)?;
            let api = Api::sqlite(&conn)?;
            execute(&api, Some(&conn), &ctx, cli.command)
        }
    }
}

fn execute<P, U>(
    api: &Api<P, U>,
    conn: Option<&Connection>,
    ctx: &RequestContext,
    command: Commands,
) -> Result<(), CliError>
where
    P: ProjectRepository,
    U: UserRepository,
{
    match command {
        Commands::Call { procedure, input } => {
            let response = api.call_json(ctx, &procedure, input.as_deref().unwrap_or_default());
            print_envelope(response)
        }
        Commands::Dashboard => {
            let stats: UserStats = fetch(api, ctx, "user.getStats")?;
            let projects: Vec<ProjectListItem> = fetch(api, ctx, "project.getAll")?;
            print!("{}", render_dashboard(&stats, &projects));
            Ok(())
        }
        Commands::CreateProject {
            name,
            domain,
            settings,
        } => {
            let input = project_create_input(&name, &domain, settings.as_deref())?;
            print_envelope(api.call(ctx, "project.create", input))
        }
        Commands::UserAdd { name, email, plan } => {
            let conn = conn.ok_or(CliError::NeedsDatabase("user-add"))?;
            let mut user = User::new(name, email);
            if let Some(plan) = plan {
                user.plan_type = plan;
            }
            let id = SqliteUserRepository::try_new(conn)?.create_user(&user)?;
            info!("event=user_add module=cli status=ok");
            println!("{id}");
            Ok(())
        }
        Commands::Track { action } => {
            let conn = conn.ok_or(CliError::NeedsDatabase("track"))?;
            let id = track(&SqliteTrackingRepository::try_new(conn)?, action)?;
            println!("{id}");
            Ok(())
        }
    }
}

fn track<R: TrackingRepository>(repo: &R, action: TrackCommands) -> Result<Uuid, CliError> {
    let now = now_epoch_ms();
    let id = match action {
        TrackCommands::Keyword { project, term } => {
            repo.add_keyword(&Keyword::new(parse_id("project", &project)?, term, now)?)?
        }
        TrackCommands::Ranking {
            keyword,
            position,
            date,
        } => repo.record_ranking(&Ranking::new(
            parse_id("keyword", &keyword)?,
            position,
            date.unwrap_or(now),
        )?)?,
        TrackCommands::Backlink {
            project,
            source,
            target,
            discovered,
        } => repo.add_backlink(&Backlink::new(
            parse_id("project", &project)?,
            source,
            target,
            discovered.unwrap_or(now),
        )?)?,
        TrackCommands::Audit { project, score } => {
            repo.add_audit(&Audit::new(parse_id("project", &project)?, score, now)?)?
        }
    };
    Ok(id)
}

fn parse_id(field: &'static str, value: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value.trim()).map_err(|_| CliError::InvalidId {
        field,
        value: value.to_string(),
    })
}

fn fetch<P, U, T>(api: &Api<P, U>, ctx: &RequestContext, path: &str) -> Result<T, CliError>
where
    P: ProjectRepository,
    U: UserRepository,
    T: DeserializeOwned,
{
    let data = api
        .call(ctx, path, Value::Null)
        .into_result()
        .map_err(CliError::Rpc)?;
    serde_json::from_value(data).map_err(|err| CliError::UnexpectedPayload(err.to_string()))
}

fn print_envelope(response: RpcResponse) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_json());
    println!("{rendered}");
    match response.error {
        Some(error) => Err(CliError::Rpc(error)),
        None => Ok(()),
    }
}
