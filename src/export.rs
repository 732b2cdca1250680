//! CSV export of a project's tasks.

use std::io::Write;
use std::path::Path;

use crate::board::{ListColumn, Task};
use crate::error::Result;

const HEADER: [&str; 10] = [
    "id",
    "title",
    "list",
    "phase",
    "assignees",
    "tags",
    "subtasks_done",
    "subtasks_total",
    "created_at",
    "updated_at",
];

/// Write `tasks` as CSV, one row per task in the given order. The list
/// column carries the column title when `lists` knows the id.
/// Returns the number of rows written.
pub fn export_tasks_csv<W: Write>(tasks: &[Task], lists: &[ListColumn], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for task in tasks {
        let list = lists
            .iter()
            .find(|list| list.id == task.list_id)
            .map(|list| list.title.as_str())
            .unwrap_or(task.list_id.as_str());
        let done = task.subtasks.iter().filter(|subtask| subtask.done).count();
        let assignees = join_set(task.assignee_ids.iter());
        let tags = join_set(task.tags.iter());
        let subtasks_done = done.to_string();
        let subtasks_total = task.subtasks.len().to_string();
        let created_at = task.created_at.to_rfc3339();
        let updated_at = task.updated_at.to_rfc3339();

        wtr.write_record([
            task.id.as_str(),
            task.title.as_str(),
            list,
            task.phase_id.as_deref().unwrap_or(""),
            assignees.as_str(),
            tags.as_str(),
            subtasks_done.as_str(),
            subtasks_total.as_str(),
            created_at.as_str(),
            updated_at.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(tasks.len())
}

pub fn export_tasks_csv_to_path(tasks: &[Task], lists: &[ListColumn], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    export_tasks_csv(tasks, lists, file)
}

fn join_set<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(";")
}
