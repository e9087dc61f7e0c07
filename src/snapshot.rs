//! Snapshot loading: tasks and edges as a single JSON document.

use crate::types::{DependencyEdge, Task};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One load unit of tasks and dependency edges.
///
/// A snapshot may span several owners. Graph computations want exactly one
/// owner's scope, so `tasks_for` and `edges_for` cut it down and `owners`
/// enumerates what is present. Row order is kept as found in the file; it
/// feeds the sorter's tie-break.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Tasks, in creation order.
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Dependency edges, in creation order.
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot file {}", path.display()))
    }

    /// Write the snapshot to a JSON file, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot file {}", path.display()))
    }

    /// Distinct owner IDs appearing in the snapshot, sorted.
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self
            .tasks
            .iter()
            .map(|t| t.owner_id.clone())
            .chain(self.edges.iter().map(|e| e.owner_id.clone()))
            .collect();
        owners.sort();
        owners.dedup();
        owners
    }

    /// The given owner's tasks, keeping file order.
    pub fn tasks_for(&self, owner_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// The given owner's edges, keeping file order.
    pub fn edges_for(&self, owner_id: &str) -> Vec<DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_snapshot() -> Snapshot {
        let now = Utc::now();
        let task = |id: &str, owner: &str| Task {
            id: id.to_string(),
            owner_id: owner.to_string(),
            name: format!("task {}", id),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        Snapshot {
            tasks: vec![
                task("pq-aaaaaaaaaaaa", "user-1"),
                task("pq-bbbbbbbbbbbb", "user-2"),
                task("pq-cccccccccccc", "user-1"),
            ],
            edges: vec![DependencyEdge {
                owner_id: "user-1".to_string(),
                provider_id: "pq-aaaaaaaaaaaa".to_string(),
                dependent_id: "pq-cccccccccccc".to_string(),
                created_at: now,
            }],
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");

        let snapshot = make_snapshot();
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let result = Snapshot::load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("absent.json"));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("junk.json");
        std::fs::write(&path, "not json at all").unwrap();

        assert!(Snapshot::load(&path).is_err());
    }

    #[test]
    fn test_load_tolerates_missing_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let snapshot = Snapshot::load(&path).unwrap();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.edges.is_empty());
    }

    #[test]
    fn test_owners_sorted_and_distinct() {
        let snapshot = make_snapshot();
        assert_eq!(snapshot.owners(), vec!["user-1", "user-2"]);
    }

    #[test]
    fn test_owner_scoped_views() {
        let snapshot = make_snapshot();

        let tasks = snapshot.tasks_for("user-1");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.owner_id == "user-1"));

        assert_eq!(snapshot.edges_for("user-1").len(), 1);
        assert!(snapshot.edges_for("user-2").is_empty());
    }
}
