use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// One function known to the analysis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSlot {
    pub index: usize,
    /// Import/external-linkage stub; never counted or matched.
    pub is_import: bool,
    /// Signature set that claimed this function, if any.
    pub library: Option<String>,
}

/// Copy of an arena's slots, only restorable into the arena it came from.
#[derive(Debug, Clone)]
pub struct ArenaSnapshot {
    arena_id: u64,
    slots: Vec<FunctionSlot>,
}

/// Per-binary analysis state: a flat arena of function slots.
#[derive(Debug)]
pub struct FunctionArena {
    id: u64,
    slots: Vec<FunctionSlot>,
}

impl FunctionArena {
    /// `functions` regular functions followed by `import_stubs` stubs.
    pub fn new(functions: usize, import_stubs: usize) -> Self {
        let slots = (0..functions + import_stubs)
            .map(|index| FunctionSlot { index, is_import: index >= functions, library: None })
            .collect();
        Self { id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed), slots }
    }

    pub fn total_functions(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_import).count()
    }

    pub fn claimed(&self) -> usize {
        self.slots.iter().filter(|s| s.library.is_some()).count()
    }

    /// Mark up to `count` unclaimed functions as recognized by `library`;
    /// returns how many were actually claimed.
    pub fn claim(&mut self, library: &str, count: usize) -> usize {
        let mut claimed = 0;
        for slot in self.slots.iter_mut().filter(|s| !s.is_import && s.library.is_none()) {
            if claimed == count {
                break;
            }
            slot.library = Some(library.to_string());
            claimed += 1;
        }
        claimed
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot { arena_id: self.id, slots: self.slots.clone() }
    }

    /// Restore a snapshot taken from this arena. Foreign snapshots are rejected.
    pub fn restore(&mut self, snapshot: ArenaSnapshot) -> Result<(), ArenaSnapshot> {
        if snapshot.arena_id != self.id || snapshot.slots.len() != self.slots.len() {
            return Err(snapshot);
        }
        self.slots = snapshot.slots;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_skip_imports_and_stop_at_capacity() {
        let mut arena = FunctionArena::new(3, 2);
        assert_eq!(arena.total_functions(), 3);
        assert_eq!(arena.claim("a.sig", 10), 3);
        assert_eq!(arena.claimed(), 3);
    }

    #[test]
    fn foreign_snapshot_is_rejected() {
        let first = FunctionArena::new(2, 0);
        let mut second = FunctionArena::new(2, 0);
        assert!(second.restore(first.snapshot()).is_err());
    }
}
