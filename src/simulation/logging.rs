//! Combat log bookkeeping systems

use bevy::prelude::*;

use crate::combat::events::{DamageEvent, EnemyKilledEvent, SpellCastEvent};
use crate::combat::log::CombatLog;

pub fn advance_log_clock(time: Res<Time>, mut combat_log: ResMut<CombatLog>) {
    combat_log.match_time += time.delta_secs();
}

/// Mirror this frame's casts, hits and kills into the combat log.
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    mut cast_events: EventReader<SpellCastEvent>,
    mut damage_events: EventReader<DamageEvent>,
    mut kill_events: EventReader<EnemyKilledEvent>,
) {
    for event in cast_events.read() {
        let context = &event.context;
        combat_log.log_cast(
            context.caster,
            context.spell_name().to_string(),
            context.damage,
            context.mana_cost,
        );
    }

    for event in damage_events.read() {
        combat_log.log_damage(
            event.source,
            event.target,
            event.spell_name.clone(),
            event.amount,
            event.is_critical,
        );
    }

    for event in kill_events.read() {
        combat_log.log_death(event.victim, event.killer);
    }
}
