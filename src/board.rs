//! Project boards for studio.
//!
//! A [`TaskStore`] holds every project's board columns and tasks in memory,
//! partitioned by project id. Task ids are unique across the whole store, so
//! lookups by id scan every partition. Newly created tasks are prepended to
//! their project's partition, which makes partition order the default
//! display order.
//!
//! The store is `Send + Sync`. Mutations take the write lock exactly once, so
//! concurrent readers never see half of an update.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::config::Config;
use crate::error::{Error, Result};

pub const BOARD_SCHEMA_VERSION: &str = "studio.board.v1";
const LIST_ID_PREFIX: &str = "l";

/// What update/delete/move do when no task has the requested id.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingTaskPolicy {
    /// Nothing to do; the call succeeds with `None`.
    #[default]
    Ignore,
    /// The call fails with [`Error::TaskNotFound`].
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
}

/// A board column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListColumn {
    pub id: String,
    pub title: String,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub list_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_ids: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for [`TaskStore::create_task`]. The store assigns the id and
/// both timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: String,
    pub list_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_ids: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub phase_id: Option<String>,
}

impl NewTask {
    pub fn new(
        project_id: impl Into<String>,
        list_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            list_id: list_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_id = Some(phase_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assignee(mut self, member_id: impl Into<String>) -> Self {
        self.assignee_ids.insert(member_id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Boundary check for callers taking user input. The store itself does
    /// not call this.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(Error::Validation("task project cannot be empty".to_string()));
        }
        if self.list_id.trim().is_empty() {
            return Err(Error::Validation("task list cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Changes to the mutable fields of a task. `None` leaves a field alone;
/// the nested options on `description` and `phase_id` allow clearing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub list_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee_ids: Option<BTreeSet<String>>,
    pub tags: Option<BTreeSet<String>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub attachments: Option<Vec<Attachment>>,
    pub phase_id: Option<Option<String>>,
}

impl TaskPatch {
    /// The patch `move_task` applies.
    pub fn move_to(list_id: impl Into<String>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, task: &mut Task) {
        if let Some(list_id) = self.list_id {
            task.list_id = list_id;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(assignee_ids) = self.assignee_ids {
            task.assignee_ids = assignee_ids;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks;
        }
        if let Some(attachments) = self.attachments {
            task.attachments = attachments;
        }
        if let Some(phase_id) = self.phase_id {
            task.phase_id = phase_id;
        }
    }
}

/// Serialized form of a whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<ListColumn>>,
    #[serde(default)]
    pub tasks: BTreeMap<String, Vec<Task>>,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: BOARD_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            lists: BTreeMap::new(),
            tasks: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub project_id: String,
    pub created: bool,
    pub lists: Vec<ListColumn>,
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub id_prefix: String,
    pub missing_task: MissingTaskPolicy,
    /// Column titles for `seed_project`, in display order
    pub columns: Vec<String>,
    pub team: Vec<TeamMember>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Config::default().store_options()
    }
}

#[derive(Debug, Default)]
struct BoardState {
    lists: BTreeMap<String, Vec<ListColumn>>,
    tasks: BTreeMap<String, Vec<Task>>,
}

impl BoardState {
    fn contains_task(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    fn find(&self, id: &str) -> Option<&Task> {
        self.tasks
            .values()
            .flat_map(|partition| partition.iter())
            .find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks
            .values_mut()
            .flat_map(|partition| partition.iter_mut())
            .find(|task| task.id == id)
    }
}

#[derive(Debug, Default)]
pub struct TaskStore {
    state: RwLock<BoardState>,
    options: StoreOptions,
}

impl TaskStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            state: RwLock::new(BoardState::default()),
            options,
        }
    }

    /// Rebuild a store from a snapshot. Each task is filed under the
    /// partition its `project_id` names, and a repeated id keeps only its
    /// first occurrence.
    pub fn from_snapshot(snapshot: BoardSnapshot, options: StoreOptions) -> Self {
        tracing::debug!(
            projects = snapshot.tasks.len(),
            boards = snapshot.lists.len(),
            "restoring board snapshot"
        );

        let mut seen = HashSet::new();
        let mut tasks: BTreeMap<String, Vec<Task>> = BTreeMap::new();
        for (partition, entries) in snapshot.tasks {
            for task in entries {
                if !seen.insert(task.id.clone()) {
                    tracing::warn!(task_id = %task.id, partition = %partition, "dropping duplicate task id");
                    continue;
                }
                if task.project_id != partition {
                    tracing::warn!(
                        task_id = %task.id,
                        partition = %partition,
                        project_id = %task.project_id,
                        "refiling task under its project"
                    );
                }
                tasks.entry(task.project_id.clone()).or_default().push(task);
            }
        }

        Self {
            state: RwLock::new(BoardState {
                lists: snapshot.lists,
                tasks,
            }),
            options,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.read();
        BoardSnapshot {
            schema_version: BOARD_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            lists: state.lists.clone(),
            tasks: state.tasks.clone(),
        }
    }

    /// Drop every board and task.
    pub fn reset(&self) {
        let mut state = self.write();
        state.lists.clear();
        state.tasks.clear();
        tracing::debug!("board store reset");
    }

    /// Create the default columns for a project unless it already has some.
    pub fn seed_project(&self, project_id: &str) -> SeedReport {
        let mut state = self.write();
        if let Some(existing) = state.lists.get(project_id).filter(|lists| !lists.is_empty()) {
            return SeedReport {
                project_id: project_id.to_string(),
                created: false,
                lists: existing.clone(),
            };
        }

        let lists: Vec<ListColumn> = self
            .options
            .columns
            .iter()
            .enumerate()
            .map(|(index, title)| ListColumn {
                id: format!("{}-{}", LIST_ID_PREFIX, index + 1),
                title: title.clone(),
                order: index as u32,
            })
            .collect();
        state.lists.insert(project_id.to_string(), lists.clone());
        tracing::debug!(project_id, columns = lists.len(), "seeded project board");

        SeedReport {
            project_id: project_id.to_string(),
            created: true,
            lists,
        }
    }

    pub fn create_task(&self, input: NewTask) -> Task {
        let mut state = self.write();
        let mut id = self.generate_task_id();
        while state.contains_task(&id) {
            id = self.generate_task_id();
        }

        let now = Utc::now();
        let task = Task {
            id,
            project_id: input.project_id,
            list_id: input.list_id,
            title: input.title,
            description: input.description,
            assignee_ids: input.assignee_ids,
            tags: input.tags,
            subtasks: input.subtasks,
            attachments: input.attachments,
            phase_id: input.phase_id,
            created_at: now,
            updated_at: now,
        };

        state
            .tasks
            .entry(task.project_id.clone())
            .or_default()
            .insert(0, task.clone());
        tracing::debug!(task_id = %task.id, project_id = %task.project_id, "created task");
        task
    }

    /// Merge `patch` onto the task with this id, leaving its position in the
    /// partition unchanged.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        let mut state = self.write();
        let Some(slot) = state.find_mut(id) else {
            return self.missing(id);
        };

        let mut updated = slot.clone();
        patch.apply(&mut updated);
        updated.updated_at = Utc::now().max(updated.created_at);
        *slot = updated.clone();
        tracing::debug!(task_id = id, list_id = %updated.list_id, "updated task");
        Ok(Some(updated))
    }

    pub fn move_task(&self, id: &str, list_id: &str) -> Result<Option<Task>> {
        self.update_task(id, TaskPatch::move_to(list_id))
    }

    pub fn delete_task(&self, id: &str) -> Result<Option<Task>> {
        let mut state = self.write();
        let mut removed = None;
        for partition in state.tasks.values_mut() {
            if let Some(index) = partition.iter().position(|task| task.id == id) {
                removed = Some(partition.remove(index));
            }
        }
        drop(state);

        match removed {
            Some(task) => {
                tracing::debug!(task_id = id, project_id = %task.project_id, "deleted task");
                Ok(Some(task))
            }
            None => self.missing(id),
        }
    }

    /// Tasks of `project_id` in `phase_id`, in partition order.
    pub fn get_tasks_by_phase(&self, project_id: &str, phase_id: &str) -> Vec<Task> {
        self.read()
            .tasks
            .get(project_id)
            .map(|partition| {
                partition
                    .iter()
                    .filter(|task| task.phase_id.as_deref() == Some(phase_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.read().find(id).cloned()
    }

    pub fn tasks_for_project(&self, project_id: &str) -> Vec<Task> {
        self.read()
            .tasks
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn tasks_in_list(&self, project_id: &str, list_id: &str) -> Vec<Task> {
        self.read()
            .tasks
            .get(project_id)
            .map(|partition| {
                partition
                    .iter()
                    .filter(|task| task.list_id == list_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn lists_for_project(&self, project_id: &str) -> Vec<ListColumn> {
        self.read()
            .lists
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every project with a board or at least one task.
    pub fn project_ids(&self) -> Vec<String> {
        let state = self.read();
        let ids: BTreeSet<&String> = state.lists.keys().chain(state.tasks.keys()).collect();
        ids.into_iter().cloned().collect()
    }

    pub fn team_members(&self) -> &[TeamMember] {
        &self.options.team
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.options.team.iter().find(|member| member.id == id)
    }

    fn generate_task_id(&self) -> String {
        format!(
            "{}-{}",
            self.options.id_prefix,
            Ulid::new().to_string().to_lowercase()
        )
    }

    fn missing(&self, id: &str) -> Result<Option<Task>> {
        match self.options.missing_task {
            MissingTaskPolicy::Ignore => {
                tracing::warn!(task_id = id, "task not found, nothing to do");
                Ok(None)
            }
            MissingTaskPolicy::Error => Err(Error::TaskNotFound(id.to_string())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
