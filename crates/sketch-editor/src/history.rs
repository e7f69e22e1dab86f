//! Linear snapshot undo/redo.
//!
//! History is a list of whole-scene snapshots plus a cursor. The snapshot
//! at the cursor always matches the live scene (visibility flags aside,
//! which the editor carries over separately). Committing after an undo
//! truncates the redo branch.

use sketch_core::scene::Scene;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Scene>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl History {
    /// Start with `initial` as the only (cursor) snapshot.
    pub fn new(initial: Scene) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new snapshot after the cursor, discarding any redo branch.
    pub fn commit(&mut self, scene: Scene) {
        let discarded = self.snapshots.len() - (self.cursor + 1);
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(scene);
        self.cursor = self.snapshots.len() - 1;
        log::debug!(
            "history commit: {} snapshots, cursor {}{}",
            self.snapshots.len(),
            self.cursor,
            if discarded > 0 {
                format!(", dropped {discarded} redo")
            } else {
                String::new()
            }
        );
    }

    /// Step back. `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Scene> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward. `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Scene> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the initial snapshot is always present.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Scene> {
        self.snapshots.get(self.cursor)
    }
}
