//! Two-phase optimistic updates over a workspace.

use crate::store::Workspace;
use std::ops::{Deref, DerefMut};

/// A tentative batch of workspace mutations.
///
/// Beginning a transaction checkpoints the workspace. Operations then
/// apply directly; the transaction derefs to [`Workspace`], so the full
/// API is available and every intermediate read sees the tentative state.
/// `commit` keeps the result, while dropping the transaction uncommitted
/// restores the checkpoint. A multi-step update that fails halfway can
/// simply bail out and leave no partial state behind.
///
/// # Example
///
/// ```
/// use prereq::{Workspace, WorkspaceTxnExt};
///
/// let mut ws = Workspace::new();
///
/// let mut txn = ws.begin();
/// let outline = txn.create_task("user-1", "Outline the post")?;
/// let draft = txn.create_task("user-1", "Write the draft")?;
/// txn.add_dependency("user-1", &outline.id, &draft.id)?;
/// txn.commit();
///
/// assert_eq!(ws.tasks("user-1").len(), 2);
/// # Ok::<(), prereq::StoreError>(())
/// ```
pub struct Transaction<'a> {
    workspace: &'a mut Workspace,
    checkpoint: Workspace,
    committed: bool,
}

/// Extension trait to begin transactions on a workspace.
pub trait WorkspaceTxnExt {
    /// Begin a transaction, checkpointing the current state.
    fn begin(&mut self) -> Transaction<'_>;
}

impl WorkspaceTxnExt for Workspace {
    fn begin(&mut self) -> Transaction<'_> {
        let checkpoint = self.clone();
        Transaction {
            workspace: self,
            checkpoint,
            committed: false,
        }
    }
}

impl Transaction<'_> {
    /// Keep every mutation applied since `begin`.
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Discard every mutation applied since `begin`. Dropping the
    /// transaction without committing does the same; this spelling just
    /// makes the intent visible at the call site.
    pub fn roll_back(self) {}
}

impl Deref for Transaction<'_> {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        self.workspace
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Workspace {
        self.workspace
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            *self.workspace = std::mem::take(&mut self.checkpoint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_commit_keeps_mutations() {
        let mut ws = Workspace::new();

        let txn_task = {
            let mut txn = ws.begin();
            let task = txn.create_task("user-1", "Kept").unwrap();
            txn.commit();
            task
        };

        assert_eq!(ws.get_task("user-1", &txn_task.id), Some(&txn_task));
    }

    #[test]
    fn test_drop_rolls_back() {
        let mut ws = Workspace::new();
        let before = ws.create_task("user-1", "Pre-existing").unwrap();

        {
            let mut txn = ws.begin();
            txn.create_task("user-1", "Discarded").unwrap();
            txn.set_completed("user-1", &before.id, true).unwrap();
            // No commit: dropped here.
        }

        assert_eq!(ws.tasks("user-1").len(), 1);
        assert_eq!(ws.get_task("user-1", &before.id), Some(&before));
    }

    #[test]
    fn test_explicit_roll_back() {
        let mut ws = Workspace::new();

        let mut txn = ws.begin();
        txn.create_task("user-1", "Discarded").unwrap();
        txn.roll_back();

        assert!(ws.tasks("user-1").is_empty());
    }

    #[test]
    fn test_failed_step_leaves_no_partial_state() {
        let mut ws = Workspace::new();
        let a = ws.create_task("user-1", "Task A").unwrap();
        let b = ws.create_task("user-1", "Task B").unwrap();

        // First step lands, second is rejected; bailing out un-does the
        // first as well.
        let result = {
            let mut txn = ws.begin();
            let step = (|| {
                txn.add_dependency("user-1", &a.id, &b.id)?;
                txn.add_dependency("user-1", &b.id, &a.id)?;
                Ok::<(), StoreError>(())
            })();
            if step.is_ok() {
                txn.commit();
            }
            step
        };

        assert_eq!(result, Err(StoreError::CycleDetected));
        assert!(ws.edges("user-1").is_empty());
    }

    #[test]
    fn test_reads_inside_txn_see_tentative_state() {
        let mut ws = Workspace::new();

        {
            let mut txn = ws.begin();
            let task = txn.create_task("user-1", "Visible inside").unwrap();
            assert!(txn.get_task("user-1", &task.id).is_some());
            assert_eq!(txn.list_tasks("user-1").unwrap().len(), 1);
        }

        assert!(ws.tasks("user-1").is_empty());
    }
}
