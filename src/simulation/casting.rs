//! Player and wand systems
//!
//! Casting is request driven: anything (autocast, a test, an input layer)
//! sends [`CastRequested`] and `process_cast_requests` makes at most one
//! cast attempt per frame.

use bevy::prelude::*;

use crate::combat::events::{CastRequested, SpellCastEvent};
use crate::combat::health::Damageable;
use crate::error::CastError;
use crate::execution::{EffectPools, ExecutionDispatcher};
use crate::settings::SimSettings;
use crate::wand::Wand;

use super::components::Player;
use super::enemies::Enemies;

pub fn tick_wand(time: Res<Time>, mut wand: ResMut<Wand>) {
    wand.tick(time.delta_secs());
}

pub fn regenerate_player(time: Res<Time>, mut player: ResMut<Player>) {
    let dt = time.delta_secs();
    player.mana.tick(dt);
    player.health.tick(dt);
}

/// Ask for a cast whenever the wand is off cooldown.
pub fn request_autocast(
    settings: Res<SimSettings>,
    player: Res<Player>,
    wand: Res<Wand>,
    mut requests: EventWriter<CastRequested>,
) {
    if settings.autocast && player.is_alive() && wand.is_ready() {
        requests.send(CastRequested);
    }
}

/// Point the player's aim at the closest living enemy.
pub fn aim_at_nearest_enemy(mut player: ResMut<Player>, enemies: Res<Enemies>) {
    let Some(target) = enemies.nearest_to(player.position) else {
        return;
    };
    let offset = target.position() - player.position;
    if offset != Vec2::ZERO {
        player.aim = offset;
    }
}

pub fn process_cast_requests(
    mut requests: EventReader<CastRequested>,
    mut wand: ResMut<Wand>,
    mut player: ResMut<Player>,
    dispatcher: Res<ExecutionDispatcher>,
    mut pools: ResMut<EffectPools>,
    mut cast_events: EventWriter<SpellCastEvent>,
) {
    if requests.read().count() == 0 || !player.is_alive() {
        return;
    }

    match wand.try_cast(&mut *player, &dispatcher, &mut pools) {
        Ok(context) => {
            cast_events.send(SpellCastEvent { context });
        }
        Err(e @ (CastError::OnCooldown
        | CastError::NoCastableSpell
        | CastError::ResourceExhausted { .. })) => {
            debug!("Cast skipped: {}", e);
        }
        Err(e) => {
            warn!("Cast rejected: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wand::{WandLoadout, WandSlot};
    use crate::wand::definitions::SpellDefinition;

    fn app_with_wand(slots: Vec<WandSlot>) -> App {
        let mut app = App::new();
        app.add_event::<CastRequested>()
            .add_event::<SpellCastEvent>()
            .init_resource::<Player>()
            .init_resource::<ExecutionDispatcher>()
            .init_resource::<EffectPools>()
            .insert_resource(Wand::new(
                "test",
                WandLoadout::with_slots(slots, 4).unwrap(),
            ))
            .add_systems(Update, process_cast_requests);
        app
    }

    #[test]
    fn test_cast_only_on_request() {
        let mut app = app_with_wand(vec![WandSlot::spell(SpellDefinition::default())]);

        app.update();
        assert_eq!(app.world().resource::<Player>().casts(), 0);

        app.world_mut().send_event(CastRequested);
        app.update();
        assert_eq!(app.world().resource::<Player>().casts(), 1);
        assert_eq!(app.world().resource::<EffectPools>().active_count(), 1);
    }

    #[test]
    fn test_many_requests_make_one_attempt() {
        let mut app = app_with_wand(vec![WandSlot::spell(SpellDefinition::default())]);
        for _ in 0..3 {
            app.world_mut().send_event(CastRequested);
        }
        app.update();
        assert_eq!(app.world().resource::<Player>().casts(), 1);
    }

    #[test]
    fn test_empty_wand_does_not_cast() {
        let mut app = app_with_wand(vec![WandSlot::Empty]);
        app.world_mut().send_event(CastRequested);
        app.update();
        assert_eq!(app.world().resource::<Player>().casts(), 0);
        assert!(app.world().resource::<Wand>().is_ready());
    }
}
