//! High-level workspace API: owner-scoped task and dependency operations.

use crate::graph;
use crate::id::generate_id;
use crate::types::{DependencyEdge, Task, TaskView, ValidationError};
use chrono::Utc;

/// Errors that can occur during workspace operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Task not found in the owner's scope.
    TaskNotFound(String),
    /// A task cannot depend on itself.
    SelfDependency,
    /// The (provider, dependent) pair already exists for this owner.
    DuplicateDependency {
        provider_id: String,
        dependent_id: String,
    },
    /// No such (provider, dependent) pair exists for this owner.
    DependencyNotFound {
        provider_id: String,
        dependent_id: String,
    },
    /// Adding this edge would create a cycle.
    CycleDetected,
    /// The task has incomplete prerequisites and cannot be completed.
    TaskLocked(String),
    /// The task is still referenced by dependency edges.
    TaskHasDependencies(String),
    /// The committed edge set contains a cycle; the insertion gate was
    /// bypassed somewhere upstream.
    GraphCorrupted,
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::TaskNotFound(id) => write!(f, "task not found: {}", id),
            StoreError::SelfDependency => write!(f, "a task cannot depend on itself"),
            StoreError::DuplicateDependency {
                provider_id,
                dependent_id,
            } => {
                write!(f, "dependency {} -> {} already exists", provider_id, dependent_id)
            }
            StoreError::DependencyNotFound {
                provider_id,
                dependent_id,
            } => {
                write!(f, "dependency {} -> {} not found", provider_id, dependent_id)
            }
            StoreError::CycleDetected => write!(f, "adding this dependency would create a cycle"),
            StoreError::TaskLocked(id) => {
                write!(f, "cannot complete task {}: prerequisites are not met", id)
            }
            StoreError::TaskHasDependencies(id) => {
                write!(f, "cannot delete task {}: dependency edges still reference it", id)
            }
            StoreError::GraphCorrupted => {
                write!(f, "dependency graph contains a cycle; stored edges are inconsistent")
            }
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// The application state: every task and dependency edge, across owners,
/// in creation order.
///
/// All operations are scoped by `owner_id` and filter down to that owner
/// before any graph computation runs, so one user's edges can never lock
/// or reorder another user's tasks. Creation order is preserved because it
/// decides the sorter's tie-break between independent tasks.
///
/// Mutations go through `&mut self`, which serializes each
/// check-then-insert sequence for a given workspace. Callers sharing one
/// across threads put it behind a mutex.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    tasks: Vec<Task>,
    edges: Vec<DependencyEdge>,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a workspace from existing rows, keeping their order.
    pub fn from_parts(tasks: Vec<Task>, edges: Vec<DependencyEdge>) -> Self {
        Self { tasks, edges }
    }

    /// Create a new task for `owner_id`. The name is trimmed before
    /// validation, so a whitespace-only name is rejected as empty.
    pub fn create_task(&mut self, owner_id: &str, name: &str) -> Result<Task, StoreError> {
        let now = Utc::now();
        let name = name.trim();

        let task = Task {
            id: generate_id(owner_id, name, now),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        task.validate().map_err(StoreError::Validation)?;

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Get a task by ID within the owner's scope.
    pub fn get_task(&self, owner_id: &str, task_id: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.owner_id == owner_id && t.id == task_id)
    }

    /// All of an owner's tasks, in creation order.
    pub fn tasks(&self, owner_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// All of an owner's dependency edges, in creation order.
    pub fn edges(&self, owner_id: &str) -> Vec<DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Set a task's completion flag.
    ///
    /// Marking an incomplete task complete is gated on every direct
    /// prerequisite being complete. Re-completing an already complete task
    /// and clearing the flag are always allowed; only the incomplete to
    /// complete transition consults the graph.
    pub fn set_completed(
        &mut self,
        owner_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<Task, StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.owner_id == owner_id && t.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;

        if completed && !self.tasks[index].completed {
            let tasks = self.tasks(owner_id);
            let edges = self.edges(owner_id);
            if !graph::is_task_unlocked(task_id, &tasks, &edges) {
                return Err(StoreError::TaskLocked(task_id.to_string()));
            }
        }

        let task = &mut self.tasks[index];
        task.completed = completed;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    /// Delete a task.
    ///
    /// Refused while any dependency edge references the task, as provider
    /// or dependent; callers remove those edges first. The reference check
    /// runs before the existence check, so deleting a referenced task
    /// reports the edges even if racing another delete.
    pub fn delete_task(&mut self, owner_id: &str, task_id: &str) -> Result<(), StoreError> {
        let referenced = self.edges.iter().any(|e| {
            e.owner_id == owner_id && (e.provider_id == task_id || e.dependent_id == task_id)
        });
        if referenced {
            return Err(StoreError::TaskHasDependencies(task_id.to_string()));
        }

        let index = self
            .tasks
            .iter()
            .position(|t| t.owner_id == owner_id && t.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;

        self.tasks.remove(index);
        Ok(())
    }

    /// Add a dependency edge: `dependent_id` requires `provider_id` to be
    /// completed first.
    ///
    /// Gates run in a fixed order: self-dependency, existence of both
    /// tasks in the owner's scope, duplicate pair, and finally the cycle
    /// check over the owner's current edges plus the candidate. The edge
    /// is inserted only when every gate passes, which keeps the owner's
    /// committed graph acyclic at all times.
    pub fn add_dependency(
        &mut self,
        owner_id: &str,
        provider_id: &str,
        dependent_id: &str,
    ) -> Result<DependencyEdge, StoreError> {
        if provider_id == dependent_id {
            return Err(StoreError::SelfDependency);
        }

        if self.get_task(owner_id, provider_id).is_none() {
            return Err(StoreError::TaskNotFound(provider_id.to_string()));
        }
        if self.get_task(owner_id, dependent_id).is_none() {
            return Err(StoreError::TaskNotFound(dependent_id.to_string()));
        }

        let exists = self.edges.iter().any(|e| {
            e.owner_id == owner_id && e.provider_id == provider_id && e.dependent_id == dependent_id
        });
        if exists {
            return Err(StoreError::DuplicateDependency {
                provider_id: provider_id.to_string(),
                dependent_id: dependent_id.to_string(),
            });
        }

        let edges = self.edges(owner_id);
        if graph::would_create_cycle(&edges, provider_id, dependent_id) {
            return Err(StoreError::CycleDetected);
        }

        let edge = DependencyEdge {
            owner_id: owner_id.to_string(),
            provider_id: provider_id.to_string(),
            dependent_id: dependent_id.to_string(),
            created_at: Utc::now(),
        };

        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Remove the dependency edge `provider_id -> dependent_id`.
    pub fn remove_dependency(
        &mut self,
        owner_id: &str,
        provider_id: &str,
        dependent_id: &str,
    ) -> Result<(), StoreError> {
        let index = self
            .edges
            .iter()
            .position(|e| {
                e.owner_id == owner_id
                    && e.provider_id == provider_id
                    && e.dependent_id == dependent_id
            })
            .ok_or_else(|| StoreError::DependencyNotFound {
                provider_id: provider_id.to_string(),
                dependent_id: dependent_id.to_string(),
            })?;

        self.edges.remove(index);
        Ok(())
    }

    /// An owner's tasks in dependency order, each annotated with its lock
    /// state.
    ///
    /// Returns `GraphCorrupted` when the sorter reports a cycle. Committed
    /// edges can only contain one if they were assembled outside the
    /// insertion gate, and a partial ordering is worse than no listing.
    pub fn list_tasks(&self, owner_id: &str) -> Result<Vec<TaskView>, StoreError> {
        let tasks = self.tasks(owner_id);
        let edges = self.edges(owner_id);

        let result = graph::topological_sort(&tasks, &edges);
        if result.has_cycle {
            return Err(StoreError::GraphCorrupted);
        }

        Ok(result
            .sorted
            .into_iter()
            .map(|task| {
                let locked = !graph::is_task_unlocked(&task.id, &tasks, &edges);
                TaskView { task, locked }
            })
            .collect())
    }
}
