//! studio crumbs command implementation.
//!
//! Runs without `.studio.toml` or board storage; only the lookups file is read.

use std::path::PathBuf;

use crate::breadcrumb::{self, BreadcrumbLookups};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;

pub struct CrumbsOptions {
    pub path: String,
    pub lookups: Option<PathBuf>,
    pub project_name: Option<String>,
}

pub fn run(storage: &Storage, output: OutputOptions, opts: CrumbsOptions) -> Result<()> {
    let mut lookups: BreadcrumbLookups = match &opts.lookups {
        Some(path) => storage.read_json(path)?,
        None => BreadcrumbLookups::default(),
    };
    if let Some(name) = opts.project_name {
        match breadcrumb::split_path(&opts.path).as_slice() {
            ["projects", project_id, ..] => lookups.set_project_name(*project_id, name),
            _ => tracing::debug!(path = %opts.path, "--project-name ignored outside /projects"),
        }
    }

    let trail = breadcrumb::resolve(&opts.path, &lookups);

    let labels: Vec<String> = trail
        .iter()
        .map(|crumb| breadcrumb::display_label(&crumb.label))
        .collect();
    let mut human = HumanOutput::new(labels.join(" / "));
    for crumb in &trail {
        human.push_detail(format!("{} -> {}", crumb.label, crumb.href));
    }

    emit_success(output, "crumbs", &trail, Some(&human))
}
