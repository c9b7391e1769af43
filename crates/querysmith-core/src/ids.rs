//! Part id generation.
//!
//! The composer never invents ids itself; it asks an injected generator.
//! Tests use [`SequentialIds`] for predictable ids, the binary uses
//! [`UuidIds`] so ids survive across separate invocations without clashing.

use crate::types::PartId;

/// Source of fresh, unique part ids.
pub trait IdGenerator: Send {
    /// Produce a new id. `prefix` describes the part ("text", "op-site", ...).
    fn next_id(&mut self, prefix: &str) -> PartId;
}

/// Monotonic counter ids: `text-1`, `op-site-2`, ...
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        SequentialIds { next: 1 }
    }

    /// Start counting at `start`
    pub fn starting_at(start: u64) -> Self {
        SequentialIds { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> PartId {
        let n = self.next.max(1);
        self.next = n + 1;
        PartId(format!("{}-{}", prefix, n))
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> PartId {
        PartId(format!("{}-{}", prefix, uuid::Uuid::new_v4().simple()))
    }
}
