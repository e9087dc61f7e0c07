//! Prereq: cycle-safe task dependency graphs with completion gating.
//!
//! Tasks belong to an owner and may declare that they depend on other
//! tasks in the same scope. The library keeps each owner's dependency
//! graph acyclic, orders tasks so providers come before their dependents,
//! and derives a lock state that gates completion until every direct
//! prerequisite is done.
//!
//! # Example
//!
//! ```
//! use prereq::Workspace;
//!
//! let mut ws = Workspace::new();
//!
//! // Create tasks for one owner
//! let research = ws.create_task("user-1", "Research venues").unwrap();
//! let book = ws.create_task("user-1", "Book a venue").unwrap();
//!
//! // "Book a venue" requires "Research venues" to be completed first
//! ws.add_dependency("user-1", &research.id, &book.id).unwrap();
//!
//! // The dependent is locked until its provider completes
//! let views = ws.list_tasks("user-1").unwrap();
//! assert_eq!(views[0].task.id, research.id);
//! assert!(views[1].locked);
//!
//! // Completing the provider unlocks it
//! ws.set_completed("user-1", &research.id, true).unwrap();
//! let views = ws.list_tasks("user-1").unwrap();
//! assert!(!views[1].locked);
//! ```

mod graph;
mod id;
mod query;
mod snapshot;
mod store;
mod txn;
mod types;

// Re-export public API
pub use graph::{
    SortResult, is_task_unlocked, task_prerequisites, topological_sort, would_create_cycle,
};
pub use query::{Query, WorkspaceQueryExt};
pub use snapshot::Snapshot;
pub use store::{StoreError, Workspace};
pub use txn::{Transaction, WorkspaceTxnExt};
pub use types::{DependencyEdge, Filter, Task, TaskView, ValidationError};
