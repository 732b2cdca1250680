//! Command-line interface for studio
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::board::{BoardSnapshot, TaskStore};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::storage::Storage;

mod board;
mod crumbs;
mod init;
mod task;

/// studio - project boards and navigation trails for design studios
#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Studio root directory (defaults to current directory)
    #[arg(long, global = true, env = "STUDIO_ROOT")]
    pub root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize studio storage and config in the root directory
    Init,

    /// Project board columns
    #[command(subcommand)]
    Board(BoardCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// List team members
    Team,

    /// Export a project's tasks as CSV
    Export {
        /// Project id
        project: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Resolve a URL path into a breadcrumb trail
    Crumbs {
        /// URL path, e.g. /finance/invoices/inv-1
        path: String,

        /// JSON file with users, purchase orders, invoices and project name
        #[arg(long)]
        lookups: Option<PathBuf>,

        /// Resolved project name (overrides the lookups file)
        #[arg(long)]
        project_name: Option<String>,
    },
}

/// Board subcommands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create the default columns for a project (no-op if it has columns)
    Seed {
        /// Project id
        project: String,
    },

    /// Show a project's columns and task counts
    Show {
        /// Project id
        project: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    New {
        /// Project id
        project: String,

        /// Task title
        #[arg(short, long)]
        title: String,

        /// Column id (defaults to the project's first column)
        #[arg(long)]
        list: Option<String>,

        /// Phase id
        #[arg(long)]
        phase: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Assignee member id (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit a task's fields
    Edit {
        /// Task id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,

        #[arg(long, conflicts_with = "clear_phase")]
        phase: Option<String>,

        #[arg(long)]
        clear_phase: bool,

        /// Column id
        #[arg(long)]
        list: Option<String>,

        /// Replace assignees (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,

        /// Replace tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Move a task to another column
    Move {
        /// Task id
        id: String,

        /// Target column id
        list: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// List a project's tasks in board order
    Ls {
        /// Project id
        project: String,

        /// Only tasks in this phase
        #[arg(long)]
        phase: Option<String>,

        /// Only tasks in this column
        #[arg(long)]
        list: Option<String>,
    },

    /// Show one task
    Show {
        /// Task id
        id: String,
    },
}

/// Resolved root, config and storage shared by command implementations.
pub(crate) struct Studio {
    pub storage: Storage,
    pub config: Config,
    pub output: OutputOptions,
}

impl Studio {
    pub fn open(root: PathBuf, output: OutputOptions) -> Result<Self> {
        let config = Config::load_from_root(&root)?;
        Ok(Self {
            storage: Storage::new(root),
            config,
            output,
        })
    }

    /// Load the saved board for reading.
    pub fn read_store(&self) -> Result<TaskStore> {
        if !self.storage.is_initialized() {
            return Err(Error::NotInitialized(self.storage.root().to_path_buf()));
        }
        let snapshot = self.storage.load_board()?;
        Ok(TaskStore::from_snapshot(snapshot, self.config.store_options()))
    }

    /// Run `f` against the saved board under the board lock and persist the
    /// result. Nothing is written when `f` fails.
    pub fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&TaskStore) -> Result<T>,
    {
        let options = self.config.store_options();
        self.storage
            .update_board(self.config.storage.lock_timeout_ms, |snapshot| {
                let current = std::mem::replace(snapshot, BoardSnapshot::empty());
                let store = TaskStore::from_snapshot(current, options);
                let result = f(&store);
                *snapshot = store.snapshot();
                result
            })
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let root = resolve_root(self.root)?;

        match self.command {
            // The resolver needs no board config.
            Commands::Crumbs {
                path,
                lookups,
                project_name,
            } => crumbs::run(
                &Storage::new(root),
                output,
                crumbs::CrumbsOptions {
                    path,
                    lookups,
                    project_name,
                },
            ),
            command => {
                let studio = Studio::open(root, output)?;
                run_with_studio(&studio, command)
            }
        }
    }
}

fn run_with_studio(studio: &Studio, command: Commands) -> Result<()> {
    match command {
        Commands::Init => init::run(studio),
        Commands::Board(cmd) => match cmd {
            BoardCommands::Seed { project } => board::run_seed(studio, &project),
            BoardCommands::Show { project } => board::run_show(studio, &project),
        },
        Commands::Team => board::run_team(studio),
        Commands::Export { project, out } => board::run_export(studio, &project, out),
        Commands::Task(cmd) => match cmd {
            TaskCommands::New {
                project,
                title,
                list,
                phase,
                description,
                assignees,
                tags,
            } => task::run_new(
                studio,
                task::NewOptions {
                    project,
                    title,
                    list,
                    phase,
                    description,
                    assignees,
                    tags,
                },
            ),
            TaskCommands::Edit {
                id,
                title,
                description,
                clear_description,
                phase,
                clear_phase,
                list,
                assignees,
                tags,
            } => task::run_edit(
                studio,
                task::EditOptions {
                    id,
                    title,
                    description,
                    clear_description,
                    phase,
                    clear_phase,
                    list,
                    assignees,
                    tags,
                },
            ),
            TaskCommands::Move { id, list } => task::run_move(studio, &id, &list),
            TaskCommands::Rm { id } => task::run_rm(studio, &id),
            TaskCommands::Ls {
                project,
                phase,
                list,
            } => task::run_ls(studio, &project, phase.as_deref(), list.as_deref()),
            TaskCommands::Show { id } => task::run_show(studio, &id),
        },
        Commands::Crumbs {
            path,
            lookups,
            project_name,
        } => crumbs::run(
            &studio.storage,
            studio.output,
            crumbs::CrumbsOptions {
                path,
                lookups,
                project_name,
            },
        ),
    }
}
