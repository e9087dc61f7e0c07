//! Core data types for the prereq task graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier: "pq-" + 12 hex chars from content hash + entropy
    pub id: String,

    /// The user whose scope this task lives in
    pub owner_id: String,

    /// Short description of the work
    pub name: String,

    /// Whether the task has been completed
    pub completed: bool,

    /// When created
    pub created_at: DateTime<Utc>,

    /// Last modification
    pub updated_at: DateTime<Utc>,
}

/// A directed dependency between two tasks in the same owner scope.
///
/// Reads as "`dependent_id` requires `provider_id` to be completed first".
/// An edge is identified by its `(owner_id, provider_id, dependent_id)`
/// triple; there is no surrogate edge ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DependencyEdge {
    /// The user whose scope this edge lives in
    pub owner_id: String,

    /// The task that must be completed first
    pub provider_id: String,

    /// The task that depends on the provider
    pub dependent_id: String,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// A task annotated with its derived lock state, ready for presentation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,

    /// True when at least one direct prerequisite is incomplete or missing
    pub locked: bool,
}

/// Filter criteria for task queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Match tasks with this completion state
    pub completed: Option<bool>,

    /// Match tasks with this derived lock state
    pub locked: Option<bool>,

    /// Case-insensitive substring match on the name
    pub name_contains: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,

    /// Number of leading results to skip
    pub offset: Option<usize>,
}

impl Filter {
    /// Create an empty filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match tasks with the given completion state.
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Match tasks with the given lock state.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    /// Match tasks whose name contains the substring (case-insensitive).
    pub fn name_contains(mut self, substring: impl Into<String>) -> Self {
        self.name_contains = Some(substring.into());
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `offset` results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Validation errors for tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong,
    InvalidCharacters,
    InvalidTimestamp,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "name cannot be empty"),
            ValidationError::NameTooLong => write!(f, "name exceeds 200 characters"),
            ValidationError::InvalidCharacters => write!(f, "name contains control characters"),
            ValidationError::InvalidTimestamp => write!(f, "updated_at cannot be before created_at"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Task {
    /// Validate the task's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Name: required, 1-200 chars (counted as chars, not bytes), no
        // control characters
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.name.chars().count() > 200 {
            return Err(ValidationError::NameTooLong);
        }
        if self.name.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidCharacters);
        }

        // Timestamps: updated_at >= created_at
        if self.updated_at < self.created_at {
            return Err(ValidationError::InvalidTimestamp);
        }

        Ok(())
    }
}
