//! Query API with flexible filtering.

use crate::graph;
use crate::store::Workspace;
use crate::types::{DependencyEdge, Filter, Task};

/// Query builder for fluent queries over one owner's tasks.
pub struct Query<'a> {
    workspace: &'a Workspace,
    owner_id: String,
    filter: Filter,
}

impl<'a> Query<'a> {
    /// Create a new query scoped to an owner.
    pub(crate) fn new(workspace: &'a Workspace, owner_id: &str) -> Self {
        Self {
            workspace,
            owner_id: owner_id.to_string(),
            filter: Filter::new(),
        }
    }

    /// Filter by completion state.
    pub fn completed(mut self, completed: bool) -> Self {
        self.filter = self.filter.completed(completed);
        self
    }

    /// Filter by derived lock state.
    pub fn locked(mut self, locked: bool) -> Self {
        self.filter = self.filter.locked(locked);
        self
    }

    /// Filter by name substring (case-insensitive).
    pub fn name_contains(mut self, substring: impl Into<String>) -> Self {
        self.filter = self.filter.name_contains(substring);
        self
    }

    /// Limit results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.filter = self.filter.limit(limit);
        self
    }

    /// Skip first N results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.filter = self.filter.offset(offset);
        self
    }

    /// Execute the query and return matching tasks in creation order.
    pub fn execute(self) -> Vec<Task> {
        let tasks = self.workspace.tasks(&self.owner_id);
        let edges = self.workspace.edges(&self.owner_id);

        let mut matches: Vec<Task> = tasks
            .iter()
            .filter(|task| filter_matches(&self.filter, task, &tasks, &edges))
            .cloned()
            .collect();

        if let Some(offset) = self.filter.offset {
            matches = matches.split_off(offset.min(matches.len()));
        }
        if let Some(limit) = self.filter.limit {
            matches.truncate(limit);
        }

        matches
    }

    /// Count matching tasks. Limit and offset do not apply; this answers
    /// "how many match", not "how long is the page".
    pub fn count(self) -> usize {
        let tasks = self.workspace.tasks(&self.owner_id);
        let edges = self.workspace.edges(&self.owner_id);

        tasks
            .iter()
            .filter(|task| filter_matches(&self.filter, task, &tasks, &edges))
            .count()
    }
}

/// Check a single task against every criterion in the filter. The lock
/// criterion derives the task's state from the full scope, so the whole
/// scope rides along.
fn filter_matches(filter: &Filter, task: &Task, tasks: &[Task], edges: &[DependencyEdge]) -> bool {
    if let Some(completed) = filter.completed {
        if task.completed != completed {
            return false;
        }
    }

    if let Some(locked) = filter.locked {
        let is_locked = !graph::is_task_unlocked(&task.id, tasks, edges);
        if is_locked != locked {
            return false;
        }
    }

    if let Some(needle) = &filter.name_contains {
        if !task.name.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }

    true
}

/// Extension trait to add query methods to Workspace.
pub trait WorkspaceQueryExt {
    /// Start building a query over one owner's tasks.
    fn query(&self, owner_id: &str) -> Query<'_>;

    /// Query with a pre-built filter.
    fn query_with_filter(&self, owner_id: &str, filter: &Filter) -> Vec<Task>;
}

impl WorkspaceQueryExt for Workspace {
    fn query(&self, owner_id: &str) -> Query<'_> {
        Query::new(self, owner_id)
    }

    fn query_with_filter(&self, owner_id: &str, filter: &Filter) -> Vec<Task> {
        let mut query = Query::new(self, owner_id);
        query.filter = filter.clone();
        query.execute()
    }
}
