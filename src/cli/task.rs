//! studio task command implementations.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::board::{NewTask, Task, TaskPatch, TaskStore};
use crate::cli::Studio;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

pub struct NewOptions {
    pub project: String,
    pub title: String,
    pub list: Option<String>,
    pub phase: Option<String>,
    pub description: Option<String>,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub phase: Option<String>,
    pub clear_phase: bool,
    pub list: Option<String>,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct ChangeReport {
    id: String,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

#[derive(Serialize)]
struct ListReport {
    project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_id: Option<String>,
    tasks: Vec<Task>,
}

pub fn run_new(studio: &Studio, opts: NewOptions) -> Result<()> {
    let task = studio.with_store(|store| {
        let lists = store.seed_project(&opts.project).lists;
        let list_id = match opts.list {
            Some(list) => list,
            None => lists
                .first()
                .map(|list| list.id.clone())
                .ok_or_else(|| Error::Validation("project board has no columns".to_string()))?,
        };
        ensure_list_exists(store, &opts.project, &list_id)?;

        let input = NewTask {
            project_id: opts.project,
            list_id,
            title: opts.title.trim().to_string(),
            description: opts.description,
            assignee_ids: clean_set(opts.assignees),
            tags: clean_set(opts.tags),
            phase_id: opts.phase,
            ..NewTask::default()
        };
        input.validate()?;
        ensure_members_exist(store, &input.assignee_ids)?;
        Ok(store.create_task(input))
    })?;

    let mut human = HumanOutput::new(format!("Created task {}", task.id));
    push_task_summary(&mut human, &task);
    emit_success(studio.output, "task new", &task, Some(&human))
}

pub fn run_edit(studio: &Studio, opts: EditOptions) -> Result<()> {
    let patch = TaskPatch {
        list_id: opts.list,
        title: opts.title.map(|title| title.trim().to_string()),
        description: if opts.clear_description {
            Some(None)
        } else {
            opts.description.map(Some)
        },
        assignee_ids: non_empty_set(opts.assignees),
        tags: non_empty_set(opts.tags),
        phase_id: if opts.clear_phase {
            Some(None)
        } else {
            opts.phase.map(Some)
        },
        ..TaskPatch::default()
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument("nothing to update".to_string()));
    }
    if patch.title.as_deref() == Some("") {
        return Err(Error::Validation("task title cannot be empty".to_string()));
    }

    let id = opts.id;
    let updated = studio.with_store(|store| {
        if let Some(existing) = store.get_task(&id) {
            if let Some(list_id) = &patch.list_id {
                ensure_list_exists(store, &existing.project_id, list_id)?;
            }
        }
        if let Some(assignees) = &patch.assignee_ids {
            ensure_members_exist(store, assignees)?;
        }
        store.update_task(&id, patch)
    })?;

    emit_change(studio, "task edit", "Updated", id, updated)
}

pub fn run_move(studio: &Studio, id: &str, list: &str) -> Result<()> {
    let moved = studio.with_store(|store| {
        if let Some(existing) = store.get_task(id) {
            ensure_list_exists(store, &existing.project_id, list)?;
        }
        store.move_task(id, list)
    })?;

    emit_change(studio, "task move", "Moved", id.to_string(), moved)
}

pub fn run_rm(studio: &Studio, id: &str) -> Result<()> {
    let removed = studio.with_store(|store| store.delete_task(id))?;
    emit_change(studio, "task rm", "Deleted", id.to_string(), removed)
}

pub fn run_ls(
    studio: &Studio,
    project: &str,
    phase: Option<&str>,
    list: Option<&str>,
) -> Result<()> {
    let store = studio.read_store()?;
    let mut tasks = match phase {
        Some(phase) => store.get_tasks_by_phase(project, phase),
        None => store.tasks_for_project(project),
    };
    if let Some(list) = list {
        tasks.retain(|task| task.list_id == list);
    }

    let lists = store.lists_for_project(project);
    let mut human = HumanOutput::new(format!("Tasks for {project} ({})", tasks.len()));
    for task in &tasks {
        let column = lists
            .iter()
            .find(|column| column.id == task.list_id)
            .map(|column| column.title.as_str())
            .unwrap_or(task.list_id.as_str());
        human.push_detail(format!("{} [{}] {}", task.id, column, task.title));
    }

    let report = ListReport {
        project_id: project.to_string(),
        phase_id: phase.map(str::to_string),
        list_id: list.map(str::to_string),
        tasks,
    };
    emit_success(studio.output, "task ls", &report, Some(&human))
}

pub fn run_show(studio: &Studio, id: &str) -> Result<()> {
    let store = studio.read_store()?;
    let task = store
        .get_task(id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    push_task_summary(&mut human, &task);
    if let Some(description) = &task.description {
        human.push_detail(description.clone());
    }
    for subtask in &task.subtasks {
        let mark = if subtask.done { "x" } else { " " };
        human.push_detail(format!("[{mark}] {}", subtask.title));
    }
    emit_success(studio.output, "task show", &task, Some(&human))
}

fn emit_change(
    studio: &Studio,
    command: &str,
    verb: &str,
    id: String,
    task: Option<Task>,
) -> Result<()> {
    let mut human = HumanOutput::new(format!("{verb} task {id}"));
    match &task {
        Some(task) => push_task_summary(&mut human, task),
        None => human.push_warning(format!("task {id} not found; nothing changed")),
    }

    let report = ChangeReport {
        id,
        changed: task.is_some(),
        task,
    };
    emit_success(studio.output, command, &report, Some(&human))
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("title", task.title.clone());
    human.push_summary("project", task.project_id.clone());
    human.push_summary("list", task.list_id.clone());
    if let Some(phase) = &task.phase_id {
        human.push_summary("phase", phase.clone());
    }
    if !task.assignee_ids.is_empty() {
        human.push_summary(
            "assignees",
            task.assignee_ids.iter().cloned().collect::<Vec<_>>().join(", "),
        );
    }
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.iter().cloned().collect::<Vec<_>>().join(", "));
    }
}

fn ensure_list_exists(store: &TaskStore, project: &str, list_id: &str) -> Result<()> {
    let lists = store.lists_for_project(project);
    if lists.is_empty() || lists.iter().any(|list| list.id == list_id) {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "unknown column '{list_id}' for project {project}"
    )))
}

fn ensure_members_exist(store: &TaskStore, member_ids: &BTreeSet<String>) -> Result<()> {
    match member_ids.iter().find(|id| store.member(id).is_none()) {
        Some(unknown) => Err(Error::Validation(format!("unknown team member '{unknown}'"))),
        None => Ok(()),
    }
}

fn clean_set(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn non_empty_set(values: Vec<String>) -> Option<BTreeSet<String>> {
    let set = clean_set(values);
    (!set.is_empty()).then_some(set)
}
