//! Event types and sinks for observing loot generation.
//!
//! This module defines [`LootEvent`] and a set of sinks to emit, collect, or
//! forward events while running [`crate::loot::generator::LootGenerator`] or
//! [`crate::loot::generator::generate_loose_loot_with_events`]. Sparse-data
//! conditions (skipped spawn points, count shortfalls) are reported here rather
//! than as errors.
use crate::loot::generator::LootResult;
use crate::loot::TemplateId;

/// Why a spawn point produced no loot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
    /// The spawn point has no template.
    MissingTemplate,
    /// The item pool was empty after filtering.
    EmptyPool,
    /// No distribution entry matched an item left in the pool.
    NoValidItems,
    /// A forced item belongs to a seasonal event that is not running.
    OutOfSeason,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::MissingTemplate => "missing spawn point template",
            SkipReason::EmptyPool => "item pool empty after filtering",
            SkipReason::NoValidItems => "loot pool is empty",
            SkipReason::OutOfSeason => "seasonal item out of season",
        }
    }
}

/// Describes events emitted during loot generation.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum LootEvent {
    /// Emitted when generation starts for a map.
    GenerationStarted {
        /// Map name.
        location: String,
        /// Number of spawn points in the distribution.
        spawnpoint_count: usize,
        /// Number of forced spawn points, including always-spawn points.
        forced_count: usize,
    },

    /// Emitted once the statistical target is known.
    TargetComputed {
        location: String,
        /// Desired number of non-forced spawn points.
        desired: usize,
        /// Points with probability 1 that are always included.
        guaranteed: usize,
    },

    /// Emitted when generation finishes.
    GenerationFinished {
        location: String,
        result: LootResult,
    },

    /// A spawn point was dropped because its id is blacklisted for the map.
    SpawnpointBlacklisted {
        location: String,
        spawnpoint_id: String,
    },

    /// Emitted when forced loot was placed.
    ForcedLootAdded {
        spawnpoint_id: String,
        root_tpl: TemplateId,
    },

    /// Emitted when loot was placed at a selected spawn point.
    LootPlaced {
        spawnpoint_id: String,
        root_tpl: TemplateId,
        /// Number of records in the composed item tree.
        item_count: usize,
    },

    /// A spawn point was skipped.
    SpawnpointSkipped {
        spawnpoint_id: String,
        reason: SkipReason,
    },

    /// Fewer spawn points were available than requested.
    CountShortfall {
        location: String,
        requested: usize,
        found: usize,
    },

    /// Non-fatal warning generated during generation.
    Warning {
        /// Context string (e.g. map name, spawn point id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`LootEvent`], used by [`EventSink::wants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LootEventKind {
    GenerationStarted,
    TargetComputed,
    GenerationFinished,
    SpawnpointBlacklisted,
    ForcedLootAdded,
    LootPlaced,
    SpawnpointSkipped,
    CountShortfall,
    Warning,
}

impl LootEvent {
    pub fn kind(&self) -> LootEventKind {
        match self {
            LootEvent::GenerationStarted { .. } => LootEventKind::GenerationStarted,
            LootEvent::TargetComputed { .. } => LootEventKind::TargetComputed,
            LootEvent::GenerationFinished { .. } => LootEventKind::GenerationFinished,
            LootEvent::SpawnpointBlacklisted { .. } => LootEventKind::SpawnpointBlacklisted,
            LootEvent::ForcedLootAdded { .. } => LootEventKind::ForcedLootAdded,
            LootEvent::LootPlaced { .. } => LootEventKind::LootPlaced,
            LootEvent::SpawnpointSkipped { .. } => LootEventKind::SpawnpointSkipped,
            LootEvent::CountShortfall { .. } => LootEventKind::CountShortfall,
            LootEvent::Warning { .. } => LootEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`LootEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: LootEvent);

    /// Whether the sink cares about events of `kind`. Lets callers skip building them.
    #[inline]
    fn wants(&self, _kind: LootEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = LootEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: LootEvent) {}

    #[inline]
    fn wants(&self, _kind: LootEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(LootEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(LootEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(LootEvent),
{
    #[inline]
    fn send(&mut self, event: LootEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<LootEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<LootEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[LootEvent] {
        &self.events
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: LootEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: LootEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: LootEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: LootEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> LootEvent {
        LootEvent::Warning {
            context: context.into(),
            message: "m".into(),
        }
    }

    #[test]
    fn vec_sink_collects_and_counts_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(LootEvent::SpawnpointSkipped {
            spawnpoint_id: "sp".into(),
            reason: SkipReason::EmptyPool,
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(LootEventKind::Warning), 1);
        assert_eq!(sink.count(LootEventKind::SpawnpointSkipped), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(LootEventKind::Warning));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        assert!(multi.wants(LootEventKind::LootPlaced));
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        let sinks = multi.into_inner();
        assert_eq!(sinks[0].len(), 1);
        assert_eq!(sinks[1].len(), 1);
        matches!(sinks[0].as_slice()[0], LootEvent::Warning { .. })
            .then_some(())
            .expect("event captured");
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        sink.send_many(vec![warning("a"), warning("b")]);
        drop(sink);
        assert_eq!(count, 3);
    }

    #[test]
    fn skip_reasons_have_messages() {
        assert_eq!(SkipReason::NoValidItems.as_str(), "loot pool is empty");
        assert!(!SkipReason::MissingTemplate.as_str().is_empty());
    }
}
