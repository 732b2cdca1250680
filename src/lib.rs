//! studio - Studio Boards Library
//!
//! Task boards and navigation trails for an interior-design studio app.
//!
//! # Core Concepts
//!
//! - **Boards**: per-project columns (seven default stages) and tasks,
//!   partitioned by project, with phase-scoped queries
//! - **Breadcrumbs**: URL paths resolved into `(label, href)` trails using
//!   whatever project/user/PO/invoice lookups the caller has loaded
//!
//! # Module Organization
//!
//! - `board`: In-memory task store and its data model
//! - `breadcrumb`: Breadcrumb trail resolution
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.studio.toml`
//! - `error`: Error types and result aliases
//! - `export`: CSV export of project tasks
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output for the CLI
//! - `storage`: Board snapshot persistence under `.studio/`

pub mod board;
pub mod breadcrumb;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod lock;
pub mod output;
pub mod storage;

pub use error::{Error, Result};
