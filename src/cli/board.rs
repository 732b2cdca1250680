//! studio board, team and export commands.

use std::path::PathBuf;

use serde::Serialize;

use crate::board::{ListColumn, TeamMember};
use crate::cli::Studio;
use crate::error::{Error, Result};
use crate::export;
use crate::output::{emit_success, HumanOutput};

#[derive(Serialize)]
struct ColumnSummary {
    #[serde(flatten)]
    list: ListColumn,
    tasks: usize,
}

#[derive(Serialize)]
struct BoardReport {
    project_id: String,
    columns: Vec<ColumnSummary>,
    unplaced: usize,
}

#[derive(Serialize)]
struct ExportReport {
    project_id: String,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    /// Inline CSV when `--json` is given without `--out`
    #[serde(skip_serializing_if = "Option::is_none")]
    csv: Option<String>,
}

pub fn run_seed(studio: &Studio, project: &str) -> Result<()> {
    let report = studio.with_store(|store| Ok(store.seed_project(project)))?;

    let header = if report.created {
        format!("Seeded board for {project}")
    } else {
        format!("Board for {project} already exists")
    };
    let mut human = HumanOutput::new(header);
    for list in &report.lists {
        human.push_detail(format!("{} {}", list.id, list.title));
    }

    emit_success(studio.output, "board seed", &report, Some(&human))
}

pub fn run_show(studio: &Studio, project: &str) -> Result<()> {
    let store = studio.read_store()?;
    let lists = store.lists_for_project(project);
    let tasks = store.tasks_for_project(project);

    let columns: Vec<ColumnSummary> = lists
        .into_iter()
        .map(|list| {
            let count = tasks.iter().filter(|task| task.list_id == list.id).count();
            ColumnSummary { list, tasks: count }
        })
        .collect();
    let unplaced = tasks
        .iter()
        .filter(|task| !columns.iter().any(|column| column.list.id == task.list_id))
        .count();

    let mut human = HumanOutput::new(format!("Board for {project}"));
    if columns.is_empty() {
        human.push_warning(format!("no columns; run `studio board seed {project}`"));
    }
    for column in &columns {
        human.push_detail(format!(
            "{} {} ({})",
            column.list.id, column.list.title, column.tasks
        ));
    }
    if unplaced > 0 {
        human.push_warning(format!("{unplaced} task(s) in unknown columns"));
    }

    let report = BoardReport {
        project_id: project.to_string(),
        columns,
        unplaced,
    };
    emit_success(studio.output, "board show", &report, Some(&human))
}

pub fn run_team(studio: &Studio) -> Result<()> {
    let members: &[TeamMember] = &studio.config.team;
    let mut human = HumanOutput::new(format!("Team ({})", members.len()));
    for member in members {
        human.push_detail(format!("{} {}", member.id, member.name));
    }
    emit_success(studio.output, "team", &members, Some(&human))
}

pub fn run_export(studio: &Studio, project: &str, out: Option<PathBuf>) -> Result<()> {
    let store = studio.read_store()?;
    let tasks = store.tasks_for_project(project);
    let lists = store.lists_for_project(project);

    let Some(path) = out else {
        if !studio.output.json {
            export::export_tasks_csv(&tasks, &lists, std::io::stdout().lock())?;
            return Ok(());
        }
        let mut buf = Vec::new();
        let rows = export::export_tasks_csv(&tasks, &lists, &mut buf)?;
        let csv = String::from_utf8(buf)
            .map_err(|err| Error::OperationFailed(format!("csv export is not utf-8: {err}")))?;
        let report = ExportReport {
            project_id: project.to_string(),
            rows,
            path: None,
            csv: Some(csv),
        };
        return emit_success(studio.output, "export", &report, None);
    };

    let rows = export::export_tasks_csv_to_path(&tasks, &lists, &path)?;
    let mut human = HumanOutput::new(format!("Exported {rows} task(s) for {project}"));
    human.push_summary("path", path.display().to_string());

    let report = ExportReport {
        project_id: project.to_string(),
        rows,
        path: Some(path),
        csv: None,
    };
    emit_success(studio.output, "export", &report, Some(&human))
}
