use crate::{document::model::Act, foundation::error::FxResult};

/// Transaction boundary owned by the surrounding editor (undo stack, autosave...).
///
/// The effect pipeline only calls these hooks; it never implements undo itself.
/// `abort` must put the document back into the state it had at `begin`.
pub trait Backup {
    /// Opens a transaction before the first document mutation.
    fn begin(&mut self, act: &Act, label: &str) -> FxResult<()>;
    /// Closes the transaction, keeping every mutation made since `begin`.
    fn commit(&mut self, act: &Act) -> FxResult<()>;
    /// Discards every mutation made since `begin`.
    fn abort(&mut self, act: &mut Act);
}

/// In-memory backup that snapshots the whole document at `begin`.
#[derive(Debug, Default)]
pub struct SnapshotBackup {
    pending: Option<(String, Act)>,
    committed: Vec<String>,
}

impl SnapshotBackup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Labels of committed transactions, oldest first.
    pub fn history(&self) -> &[String] {
        &self.committed
    }
}

impl Backup for SnapshotBackup {
    fn begin(&mut self, act: &Act, label: &str) -> FxResult<()> {
        self.pending = Some((label.to_string(), act.clone()));
        Ok(())
    }

    fn commit(&mut self, _act: &Act) -> FxResult<()> {
        if let Some((label, _)) = self.pending.take() {
            self.committed.push(label);
        }
        Ok(())
    }

    fn abort(&mut self, act: &mut Act) {
        if let Some((_, snapshot)) = self.pending.take() {
            *act = snapshot;
        }
    }
}
