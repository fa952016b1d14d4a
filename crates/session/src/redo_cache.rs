use stockroom_persist::CheckpointRef;

/// Stack of checkpoints to walk forward through after undo crossed level boundaries.
///
/// When non-empty, the bottom entry is the state the player was in before the first
/// boundary-crossing undo, and the top entry is the checkpoint currently loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedoCache {
    stack: Vec<CheckpointRef>,
}

impl RedoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reference: CheckpointRef) {
        tracing::debug!(file = %reference, depth = self.stack.len() + 1, "redo cache push");
        self.stack.push(reference);
    }

    pub fn pop(&mut self) -> Option<CheckpointRef> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&CheckpointRef> {
        self.stack.last()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.stack.is_empty() {
            tracing::debug!(dropped = self.stack.len(), "redo cache cleared");
        }
        self.stack.clear();
    }
}
