//! Command-line interface
//!
//! Each command runs one console flow against the API: resolving the session, gating a route,
//! or editing the grants of a resource.

use crate::auth::{Gate, SessionStore};
use crate::config::ConsoleConfig;
use crate::grants::{
    AddOutcome, Candidate, CandidateDirectory, GrantEditor, GrantRow, PrivilegeChange,
    RemoveOutcome, SkipReason, filter_candidates,
};
use crate::sdk::{ConsoleClient, SubjectKind};
use crate::utils::error::{ConsoleError, Result};
use crate::utils::logging::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Infra access console
#[derive(Parser, Debug)]
#[command(name = "infra-console")]
#[command(version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "INFRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// API server URL, overrides the configuration
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the signed-in user, admin status and reachable routes
    Whoami,
    /// End the current session
    Logout,
    /// Decide whether the signed-in user may open a console route
    Check {
        /// Route path, e.g. /users
        path: String,
    },
    /// List and edit grants on a resource
    #[command(subcommand)]
    Grants(GrantsCommand),
    /// Search users and groups by name
    Subjects {
        /// Case-insensitive substring of the name
        #[arg(default_value = "")]
        query: String,
        /// Leave out subjects that already hold a grant on this resource
        #[arg(long)]
        resource: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GrantsCommand {
    /// List grants on a resource
    List {
        #[arg(long)]
        resource: String,
        /// Include read-only grants inherited from the parent resource
        #[arg(long)]
        inherited: bool,
    },
    /// Grant a privilege on a resource
    Add(AddArgs),
    /// Remove a grant by id
    Remove {
        #[arg(long)]
        resource: String,
        id: String,
    },
    /// Move a grant to another privilege
    SetPrivilege {
        #[arg(long)]
        resource: String,
        id: String,
        privilege: String,
    },
}

#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["user", "group", "subject"])
))]
pub struct AddArgs {
    #[arg(long)]
    pub resource: String,
    /// User id
    #[arg(long)]
    pub user: Option<String>,
    /// Group id
    #[arg(long)]
    pub group: Option<String>,
    /// User or group name, resolved through the directory
    #[arg(long)]
    pub subject: Option<String>,
    /// Defaults to the first allowed privilege
    #[arg(long)]
    pub privilege: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut ConsoleConfig) {
        if let Some(server) = &self.server {
            config.api.server = server.clone();
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }

    /// Run the CLI command
    pub async fn run(self, config: ConsoleConfig) -> Result<()> {
        let client = Arc::new(ConsoleClient::new(&config.api)?);
        let store = SessionStore::new(config.admin_rule());

        match self.command {
            Commands::Whoami => whoami(&config, client.as_ref(), &store).await,
            Commands::Logout => {
                store.logout(client.as_ref()).await;
                println!("Logged out");
                Ok(())
            }
            Commands::Check { path } => check(&config, client.as_ref(), &store, &path).await,
            Commands::Grants(command) => grants(&config, client, command).await,
            Commands::Subjects { query, resource } => {
                subjects(&config, client, &query, resource).await
            }
        }
    }
}

async fn whoami(config: &ConsoleConfig, client: &ConsoleClient, store: &SessionStore) -> Result<()> {
    let state = store.refresh(client).await;
    let Some(viewer) = state.viewer() else {
        return Err(ConsoleError::Unauthorized("not signed in".to_string()));
    };

    println!("{} ({})", viewer.name(), viewer.id());
    println!("admin: {}", viewer.is_admin);
    if !viewer.session.provider_names.is_empty() {
        println!("providers: {}", viewer.session.provider_names.join(", "));
    }

    let routes: Vec<_> = config
        .navigation
        .visible_routes(viewer)
        .map(|entry| entry.path.as_str())
        .collect();
    println!("routes: {}", routes.join(" "));
    Ok(())
}

async fn check(
    config: &ConsoleConfig,
    client: &ConsoleClient,
    store: &SessionStore,
    path: &str,
) -> Result<()> {
    let state = store.refresh(client).await;
    debug!("Checking {} for {:?}", path, state.viewer().map(|v| v.name()));

    let mut gate = Gate::new(config.navigation.clone(), |target: &str| {
        println!("redirect {}", target);
    });

    if gate.evaluate(path, &state).should_render() {
        println!("render {}", path);
    }
    Ok(())
}

async fn grants(
    config: &ConsoleConfig,
    client: Arc<ConsoleClient>,
    command: GrantsCommand,
) -> Result<()> {
    match command {
        GrantsCommand::List {
            resource,
            inherited,
        } => {
            let editor = editor(config, client.clone(), &resource);
            editor.refresh().await?;
            let directory = directory(client.as_ref()).await;

            let rows = listed_rows(editor.rows(&directory), inherited);
            if rows.is_empty() {
                println!("No grants on {}", resource);
            }
            for row in &rows {
                print_row(row);
            }
            Ok(())
        }
        GrantsCommand::Add(args) => add(config, client, args).await,
        GrantsCommand::Remove { resource, id } => {
            let editor = editor(config, client, &resource);
            editor.refresh().await?;

            match editor.remove(&id).await? {
                RemoveOutcome::Removed(id) => println!("Removed {}", id),
                RemoveOutcome::Skipped(reason) => return Err(skipped(reason, &id)),
            }
            Ok(())
        }
        GrantsCommand::SetPrivilege {
            resource,
            id,
            privilege,
        } => {
            let editor = editor(config, client, &resource);
            editor.refresh().await?;

            match editor.change_privilege(&id, &privilege).await? {
                PrivilegeChange::Replaced { old, new } => {
                    println!("Replaced {} with {} ({})", old, new.id, new.privilege)
                }
                PrivilegeChange::Partial { created, stale, error } => {
                    println!("Created {} ({})", created.id, created.privilege);
                    warn!("Old grant {} is still in place: {}", stale, error);
                    let cleaned = editor.retry_cleanup().await?;
                    println!("Removed {} stale grant(s)", cleaned);
                }
                PrivilegeChange::Skipped(reason) => return Err(skipped(reason, &id)),
            }
            Ok(())
        }
    }
}

async fn add(config: &ConsoleConfig, client: Arc<ConsoleClient>, args: AddArgs) -> Result<()> {
    let editor = editor(config, client.clone(), &args.resource);
    editor.refresh().await?;

    let candidate = match (args.user, args.group, args.subject) {
        (Some(id), _, _) => Candidate {
            name: id.clone(),
            id,
            kind: SubjectKind::User,
        },
        (_, Some(id), _) => Candidate {
            name: id.clone(),
            id,
            kind: SubjectKind::Group,
        },
        (_, _, Some(name)) => {
            let directory = directory(client.as_ref()).await;
            directory
                .find_by_name(&name)
                .ok_or_else(|| ConsoleError::NotFound(format!("no user or group named {}", name)))?
        }
        (None, None, None) => {
            return Err(ConsoleError::validation("a user, group or subject is required"));
        }
    };

    let accepted = editor.with_form(|form| {
        form.select(candidate);
        match &args.privilege {
            Some(privilege) => form.set_privilege(privilege),
            None => form.privilege().is_some(),
        }
    });
    if !accepted {
        return Err(ConsoleError::validation(match args.privilege {
            Some(privilege) => format!("privilege {} is not allowed here", privilege),
            None => "a privilege is required".to_string(),
        }));
    }

    match editor.submit().await? {
        AddOutcome::Created(grant) => {
            println!("Created {} ({} {})", grant.id, grant.subject, grant.privilege)
        }
        AddOutcome::Skipped(reason) => return Err(skipped(reason, &args.resource)),
    }
    Ok(())
}

async fn subjects(
    config: &ConsoleConfig,
    client: Arc<ConsoleClient>,
    query: &str,
    resource: Option<String>,
) -> Result<()> {
    let directory = directory(client.as_ref()).await;

    let found = match resource {
        Some(resource) => {
            let editor = editor(config, client, &resource);
            editor.refresh().await?;
            editor.with_form(|form| form.set_query(query));
            editor.candidates(&directory)
        }
        None => filter_candidates(directory.users(), directory.groups(), query, &HashSet::new()),
    };

    for candidate in found {
        println!("{:<6} {:<30} {}", candidate.kind, candidate.name, candidate.id);
    }
    Ok(())
}

fn editor(config: &ConsoleConfig, client: Arc<ConsoleClient>, resource: &str) -> GrantEditor<ConsoleClient> {
    GrantEditor::new(
        client,
        resource,
        config.access.allowed_privileges.clone(),
        config.access.privilege_precedence.clone(),
    )
}

/// Directory for name lookups. Missing names fall back to ids, so failures only warn.
async fn directory(client: &ConsoleClient) -> CandidateDirectory {
    let mut directory = CandidateDirectory::default();
    if let Err(e) = directory.refresh(client).await {
        warn!("Could not load users and groups: {}", e);
    }
    directory
}

/// Rows shown by `grants list`; inherited rows only with `--inherited`
fn listed_rows(rows: Vec<GrantRow>, inherited: bool) -> Vec<GrantRow> {
    rows.into_iter()
        .filter(|row| inherited || !row.inherited)
        .collect()
}

fn print_row(row: &GrantRow) {
    let inherited = if row.inherited { " (inherited)" } else { "" };
    println!(
        "{:<24} {:<6} {:<30} {:<10} {}{}",
        row.id,
        row.subject.kind(),
        row.subject_name,
        row.privilege,
        row.resource,
        inherited
    );
}

fn skipped(reason: SkipReason, target: &str) -> ConsoleError {
    let message = match reason {
        SkipReason::NothingSelected => "no subject selected".to_string(),
        SkipReason::PrivilegeNotAllowed => "privilege is not allowed here".to_string(),
        SkipReason::Duplicate => "that grant already exists".to_string(),
        SkipReason::Unchanged => "grant already has that privilege".to_string(),
        SkipReason::NotEditable => format!("{} is not an editable grant here", target),
        SkipReason::InFlight => format!("{} is already being changed", target),
    };
    ConsoleError::validation(message)
}
