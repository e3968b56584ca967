//! Combat events
//!
//! Two delivery paths exist for notifications:
//! - [`Observers`] lists owned by the core types (wand, pools). Every current
//!   subscriber is invoked synchronously, in subscription order, before the
//!   triggering call returns.
//! - Bevy events written by the simulation systems for downstream consumers
//!   (HUD, telemetry) that live in the schedule.

use bevy::prelude::*;

use crate::execution::HitReport;
use crate::pool::PoolHandle;
use crate::wand::context::CastContext;
use crate::wand::slot::WandSlot;
use crate::ActorId;

/// Token returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// An ordered list of fire-and-forget callbacks.
pub struct Observers<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber. It runs after every subscriber registered before it.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Notifications produced by a [`Wand`](crate::wand::Wand).
#[derive(Debug, Clone)]
pub enum WandEvent {
    /// The cursor moved to a new slot index
    SlotChanged(usize),
    /// A spell was cast with this resolved context
    SpellCast(CastContext),
    /// A slot was appended to the loadout
    SlotAdded(WandSlot),
    /// The slot at this index was removed
    SlotRemoved(usize),
}

/// Notification produced by an [`ObjectPool`](crate::pool::ObjectPool) when
/// an instance goes back into its available queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnedToPool(pub PoolHandle);

/// Raw input: the caster wants to cast this frame
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CastRequested;

/// Event fired after a successful cast
#[derive(Event, Debug, Clone)]
pub struct SpellCastEvent {
    pub context: CastContext,
}

/// Event fired when damage lands on a target
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Actor dealing the damage
    pub source: ActorId,
    /// Actor receiving the damage
    pub target: ActorId,
    /// Damage after crit resolution
    pub amount: f32,
    /// Name of the spell (None for contact damage)
    pub spell_name: Option<String>,
    pub is_critical: bool,
}

impl DamageEvent {
    pub fn from_hit(hit: &HitReport, spell_name: Option<&str>) -> Self {
        Self {
            source: hit.source,
            target: hit.target,
            amount: hit.amount,
            spell_name: spell_name.map(str::to_string),
            is_critical: hit.is_critical,
        }
    }
}

/// Event fired when an enemy dies
#[derive(Event, Debug, Clone)]
pub struct EnemyKilledEvent {
    pub victim: ActorId,
    /// Actor that dealt the killing blow
    pub killer: Option<ActorId>,
}
