//! Shared test infrastructure for prereq integration tests.
//!
//! Provides TestEnv helper for consistent test setup.

#![allow(dead_code)]

use chrono::Utc;
use prereq::{DependencyEdge, Task, TaskView, Workspace};

/// Owner scope most tests run in.
pub const OWNER: &str = "user-1";

/// Test environment wrapping a workspace plus a default owner.
pub struct TestEnv {
    pub ws: Workspace,
}

impl TestEnv {
    /// Create a new test environment with an empty workspace.
    pub fn new() -> Self {
        Self {
            ws: Workspace::new(),
        }
    }

    /// Create a task for the default owner.
    pub fn create_task(&mut self, name: &str) -> Task {
        self.ws.create_task(OWNER, name).expect("Failed to create task")
    }

    /// Create a task for a specific owner.
    pub fn create_task_for(&mut self, owner_id: &str, name: &str) -> Task {
        self.ws
            .create_task(owner_id, name)
            .expect("Failed to create task")
    }

    /// Add a dependency: `dependent` requires `provider` first.
    pub fn add_dependency(&mut self, provider: &Task, dependent: &Task) -> DependencyEdge {
        self.ws
            .add_dependency(OWNER, &provider.id, &dependent.id)
            .expect("Failed to add dependency")
    }

    /// Mark a task completed.
    pub fn complete(&mut self, task: &Task) -> Task {
        self.ws
            .set_completed(OWNER, &task.id, true)
            .expect("Failed to complete task")
    }

    /// Mark a task incomplete again.
    pub fn uncomplete(&mut self, task: &Task) -> Task {
        self.ws
            .set_completed(OWNER, &task.id, false)
            .expect("Failed to uncomplete task")
    }

    /// The default owner's annotated listing, in dependency order.
    pub fn views(&self) -> Vec<TaskView> {
        self.ws.list_tasks(OWNER).expect("Failed to list tasks")
    }

    /// Task IDs in listing order.
    pub fn order(&self) -> Vec<String> {
        self.views().into_iter().map(|v| v.task.id).collect()
    }

    /// Assert that a task is unlocked (eligible for completion).
    pub fn assert_unlocked(&self, task: &Task) {
        let views = self.views();
        let view = views
            .iter()
            .find(|v| v.task.id == task.id)
            .unwrap_or_else(|| panic!("Task {} missing from listing", task.id));
        assert!(
            !view.locked,
            "Expected task {} to be unlocked, but it was locked",
            task.id
        );
    }

    /// Assert that a task is locked.
    pub fn assert_locked(&self, task: &Task) {
        let views = self.views();
        let view = views
            .iter()
            .find(|v| v.task.id == task.id)
            .unwrap_or_else(|| panic!("Task {} missing from listing", task.id));
        assert!(
            view.locked,
            "Expected task {} to be locked, but it wasn't",
            task.id
        );
    }

    /// Number of tasks in the default owner's scope.
    pub fn task_count(&self) -> usize {
        self.ws.tasks(OWNER).len()
    }

    /// Number of edges in the default owner's scope.
    pub fn edge_count(&self) -> usize {
        self.ws.edges(OWNER).len()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a task row directly, bypassing the workspace gates.
pub fn raw_task(id: &str, completed: bool) -> Task {
    let now = Utc::now();
    Task {
        id: id.to_string(),
        owner_id: OWNER.to_string(),
        name: format!("task {}", id),
        completed,
        created_at: now,
        updated_at: now,
    }
}

/// Build an edge row directly, bypassing the workspace gates.
pub fn raw_edge(provider_id: &str, dependent_id: &str) -> DependencyEdge {
    DependencyEdge {
        owner_id: OWNER.to_string(),
        provider_id: provider_id.to_string(),
        dependent_id: dependent_id.to_string(),
        created_at: Utc::now(),
    }
}
