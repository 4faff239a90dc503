//! The command zone: a bump allocator for per-frame [`crate::command::Command`]/
//! [`crate::command::Calc`] records (`spec.md` §3 "Command/Calc"
//! glossary entry: "allocated by front-end, freed when the frame's zone is
//! reset after all workers barrier out").
//!
//! Rather than a raw-pointer bump arena (as the original engine's
//! `MemoryZoneAllocator` is), this stores records as boxed trait objects in
//! an append-only `Vec`; "reset" just truncates the `Vec`. This keeps the
//! allocator safe while preserving the append-only-until-barrier contract
//! the serializer depends on.

use crate::command::Command;

/// Append-only store for one frame's posted commands. `push` never blocks;
/// callers enforce the soft-cap back-pressure (`spec.md` §4.7 suspension
/// point (c)) by checking [`Zone::byte_estimate`] before posting.
#[derive(Debug, Default)]
pub struct Zone {
    commands: Vec<Command>,
    byte_estimate: usize,
}

impl Zone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command, returning its index for later bounds-checked
    /// `Region` intersection by a worker.
    pub fn push(&mut self, command: Command) -> usize {
        self.byte_estimate += command.size_estimate();
        self.commands.push(command);
        self.commands.len() - 1
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Rough byte footprint of everything posted so far, used to check a
    /// [`crate::config::EngineConfig::command_zone_soft_cap`].
    #[must_use]
    pub fn byte_estimate(&self) -> usize {
        self.byte_estimate
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Frees every command posted this frame. Only valid to call once all
    /// workers have observed the barrier that precedes this reset
    /// (`spec.md` §4.7 step 6).
    pub fn reset(&mut self) {
        self.commands.clear();
        self.byte_estimate = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[test]
    fn reset_empties_the_zone() {
        let mut zone = Zone::new();
        zone.push(Command::Barrier);
        zone.push(Command::Barrier);
        assert_eq!(zone.len(), 2);
        zone.reset();
        assert!(zone.is_empty());
        assert_eq!(zone.byte_estimate(), 0);
    }

    #[test]
    fn push_returns_sequential_indices() {
        let mut zone = Zone::new();
        assert_eq!(zone.push(Command::Barrier), 0);
        assert_eq!(zone.push(Command::Barrier), 1);
    }
}
