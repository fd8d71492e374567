use std::collections::HashMap;

/// Which piece of engine state a load will replace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoadSlot {
    /// The base image.
    Base,
    /// The overlay with this id.
    Overlay(String),
}

/// Proof that a load was requested; only the most recent ticket for a slot may commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub(crate) slot: LoadSlot,
    pub(crate) session: u64,
    pub(crate) generation: u64,
}

impl LoadTicket {
    /// Slot this ticket reserves.
    pub fn slot(&self) -> &LoadSlot {
        &self.slot
    }
}

/// Outcome of committing a finished load.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Commit<T> {
    /// The result was applied and the surface re-rendered.
    Applied(T),
    /// A newer request for the same slot superseded this one; nothing changed.
    Stale,
}

impl<T> Commit<T> {
    /// Whether the commit changed engine state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Applied value, `None` for a stale commit.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(v) => Some(v),
            Self::Stale => None,
        }
    }
}

/// Per-slot generation counters for one engine session.
#[derive(Clone, Debug, Default)]
pub(crate) struct Generations {
    session: u64,
    latest: HashMap<LoadSlot, u64>,
}

impl Generations {
    pub(crate) fn new(session: u64) -> Self {
        Self {
            session,
            latest: HashMap::new(),
        }
    }

    pub(crate) fn issue(&mut self, slot: LoadSlot) -> LoadTicket {
        let generation = self.bump(&slot);
        LoadTicket {
            slot,
            session: self.session,
            generation,
        }
    }

    /// Invalidate every outstanding ticket for `slot`.
    pub(crate) fn bump(&mut self, slot: &LoadSlot) -> u64 {
        let g = self.latest.entry(slot.clone()).or_insert(0);
        *g += 1;
        *g
    }

    pub(crate) fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.session == self.session && self.latest.get(&ticket.slot) == Some(&ticket.generation)
    }
}
