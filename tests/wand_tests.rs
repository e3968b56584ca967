//! Integration tests for the wand core
//!
//! These tests verify that:
//! - Buffs to the right of a spell (and only those) modify it
//! - The slot cursor walks the loadout circularly
//! - Failed casts leave the wand, the caster and the pools untouched
//! - Observers see slot changes before the cast, in subscription order

use bevy::prelude::*;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

use wandcraft::combat::events::WandEvent;
use wandcraft::execution::{EffectPools, ExecutionDispatcher};
use wandcraft::wand::{
    BuffDefinition, Caster, CastContext, ContentLibrary, ExecutionKind, GlobalMultipliers,
    SpellDefinition, SpellTag, Wand, WandLoadout, WandSlot,
};
use wandcraft::{ActorId, CastError};

// =============================================================================
// Helpers
// =============================================================================

struct TestCaster {
    position: Vec2,
    aim: Vec2,
    mana: f32,
    journal: Arc<Mutex<Vec<String>>>,
}

impl TestCaster {
    fn new(mana: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            aim: Vec2::X,
            mana,
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Caster for TestCaster {
    fn actor_id(&self) -> ActorId {
        ActorId::PLAYER
    }

    fn muzzle_position(&self) -> Vec2 {
        self.position
    }

    fn aim_direction(&self) -> Vec2 {
        self.aim
    }

    fn try_spend_resource(&mut self, amount: f32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    fn on_cast(&mut self, context: &CastContext) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("on_cast {}", context.spell_name()));
    }
}

fn spell(id: &str, damage: f32) -> WandSlot {
    WandSlot::spell(SpellDefinition {
        id: id.to_string(),
        damage,
        mana_cost: 5.0,
        cooldown: 0.0,
        ..default()
    })
}

fn damage_buff(factor: f32) -> WandSlot {
    WandSlot::buff(BuffDefinition {
        id: format!("x{}", factor),
        damage_multiplier: factor,
        ..default()
    })
}

fn wand(slots: Vec<WandSlot>) -> Wand {
    Wand::new("test", WandLoadout::with_slots(slots, 8).unwrap())
}

struct Rig {
    caster: TestCaster,
    dispatcher: ExecutionDispatcher,
    pools: EffectPools,
}

impl Rig {
    fn new() -> Self {
        Self {
            caster: TestCaster::new(100.0),
            dispatcher: ExecutionDispatcher::default(),
            pools: EffectPools::default(),
        }
    }

    fn cast(&mut self, wand: &mut Wand) -> Result<CastContext, CastError> {
        wand.try_cast(&mut self.caster, &self.dispatcher, &mut self.pools)
    }
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_two_buffs_right_of_spell_multiply() {
    let mut wand = wand(vec![spell("bolt", 10.0), damage_buff(1.5), damage_buff(2.0)]);
    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 30.0);
}

#[test]
fn test_cursor_on_last_buff_wraps_and_keeps_both_buffs() {
    let mut wand = wand(vec![spell("bolt", 10.0), damage_buff(1.5), damage_buff(2.0)]);
    wand.select_slot(2).unwrap();

    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 30.0);
    assert_eq!(wand.cursor(), 1);
}

#[test]
fn test_wrapped_buff_left_of_spell_is_excluded() {
    let mut wand = wand(vec![damage_buff(3.0), spell("bolt", 10.0), damage_buff(2.0)]);
    wand.select_slot(2).unwrap();

    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 20.0);
    assert_eq!(wand.cursor(), 2);
}

#[test]
fn test_left_buff_ignored_even_when_tags_match() {
    let arcane_only = WandSlot::buff(BuffDefinition {
        id: "arcane_power".to_string(),
        damage_multiplier: 5.0,
        affected_tags: [SpellTag::Arcane].into_iter().collect(),
        ..default()
    });
    let mut wand = wand(vec![arcane_only, spell("bolt", 10.0)]);
    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 10.0);
}

#[test]
fn test_tag_filtered_buff_contributes_nothing() {
    let fire_only = WandSlot::buff(BuffDefinition {
        id: "fire_power".to_string(),
        damage_multiplier: 2.0,
        pierce_bonus: 3,
        affected_tags: [SpellTag::Fire].into_iter().collect(),
        ..default()
    });
    let mut wand = wand(vec![spell("bolt", 10.0), fire_only]);
    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 10.0);
    assert_eq!(ctx.pierce, 0);
}

#[test]
fn test_passive_buff_and_global_apply_regardless_of_position() {
    let passive = Arc::new(BuffDefinition {
        id: "passive".to_string(),
        damage_multiplier: 2.0,
        ..default()
    });
    let loadout = WandLoadout::with_slots(vec![spell("bolt", 10.0)], 4)
        .unwrap()
        .with_passive_buff(passive)
        .with_global(GlobalMultipliers {
            damage: 1.5,
            ..default()
        });
    let mut wand = Wand::new("test", loadout);
    let ctx = Rig::new().cast(&mut wand).unwrap();
    assert_eq!(ctx.damage, 30.0);
}

// =============================================================================
// Cursor and gating
// =============================================================================

#[test]
fn test_cursor_advance_is_circular() {
    let mut wand = wand(vec![spell("a", 10.0), damage_buff(2.0)]);
    let mut rig = Rig::new();

    let first = rig.cast(&mut wand).unwrap();
    assert_eq!(first.spell_name(), "a");
    assert_eq!(wand.cursor(), 1);

    // Slot 1 is a buff: the cast skips it and wraps back to slot 0
    let second = rig.cast(&mut wand).unwrap();
    assert_eq!(second.spell_name(), "a");
    assert_eq!(wand.cursor(), 1);
}

#[test]
fn test_no_spells_fails_without_touching_cooldown() {
    let mut wand = wand(vec![damage_buff(2.0), WandSlot::Empty]);
    let mut rig = Rig::new();

    assert_eq!(rig.cast(&mut wand).err(), Some(CastError::NoCastableSpell));
    assert!(wand.is_ready());
    assert_eq!(wand.cooldown().remaining(), 0.0);
    assert_eq!(wand.cursor(), 0);
    assert_eq!(rig.caster.mana, 100.0);
}

#[test]
fn test_cooldown_gates_casts() {
    let mut wand = wand(vec![WandSlot::spell(SpellDefinition {
        id: "slow".to_string(),
        cooldown: 1.0,
        ..default()
    })]);
    let mut rig = Rig::new();

    assert!(rig.cast(&mut wand).is_ok());
    assert_eq!(rig.cast(&mut wand).err(), Some(CastError::OnCooldown));
    wand.tick(0.5);
    assert_eq!(rig.cast(&mut wand).err(), Some(CastError::OnCooldown));
    wand.tick(0.5);
    assert!(rig.cast(&mut wand).is_ok());
}

#[test]
fn test_insufficient_mana_aborts_cleanly() {
    let mut wand = wand(vec![spell("bolt", 10.0)]);
    let mut rig = Rig::new();
    rig.caster.mana = 3.0;

    assert_eq!(rig.cast(&mut wand).err(), Some(CastError::ResourceExhausted { required: 5.0 }));
    assert!(wand.is_ready());
    assert_eq!(wand.cursor(), 0);
    assert_eq!(rig.caster.mana, 3.0);
    assert_eq!(rig.pools.active_count(), 0);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_reserved_execution_kinds_are_rejected() {
    for kind in [ExecutionKind::Beam, ExecutionKind::SelfCast] {
        let mut wand = wand(vec![WandSlot::spell(SpellDefinition {
            id: "odd".to_string(),
            execution: kind,
            ..default()
        })]);
        let mut rig = Rig::new();

        assert_eq!(rig.cast(&mut wand).err(), Some(CastError::UnsupportedExecutionKind(kind)));
        assert_eq!(rig.caster.mana, 100.0);
        assert_eq!(rig.pools.active_count(), 0);
        assert!(wand.is_ready());
    }
}

#[test]
fn test_missing_archetype_is_a_configuration_error() {
    let mut wand = wand(vec![WandSlot::spell(SpellDefinition {
        id: "lost".to_string(),
        effect_archetype: 5,
        ..default()
    })]);
    let mut rig = Rig::new();

    assert!(matches!(
        rig.cast(&mut wand),
        Err(CastError::Configuration(_))
    ));
    assert_eq!(rig.caster.mana, 100.0);

    rig.pools = EffectPools::empty();
    let mut wand = self::wand(vec![spell("bolt", 10.0)]);
    assert!(matches!(
        rig.cast(&mut wand),
        Err(CastError::Configuration(_))
    ));
}

#[test]
fn test_projectile_uses_composed_speed_and_aim() {
    let haste = WandSlot::buff(BuffDefinition {
        id: "velocity".to_string(),
        speed_multiplier: 1.5,
        ..default()
    });
    let mut wand = wand(vec![spell("bolt", 10.0), haste]);
    let mut rig = Rig::new();
    rig.caster.aim = Vec2::new(0.0, 3.0);

    rig.cast(&mut wand).unwrap();
    let (_, projectile) = rig.pools.projectiles.iter_active().next().unwrap();
    assert_eq!(projectile.velocity(), Vec2::new(0.0, 18.0));
}

#[test]
fn test_area_effect_spawns_at_offset() {
    let mut wand = wand(vec![WandSlot::spell(SpellDefinition {
        id: "burst".to_string(),
        execution: ExecutionKind::AoE,
        spawn_offset: Some((2.0, 0.5)),
        ..default()
    })]);
    let mut rig = Rig::new();
    rig.caster.position = Vec2::new(1.0, 1.0);

    rig.cast(&mut wand).unwrap();
    assert_eq!(rig.pools.projectiles.active_count(), 0);
    let (_, effect) = rig.pools.area_effects.iter_active().next().unwrap();
    assert_eq!(effect.position(), Vec2::new(3.0, 1.5));
    assert!(effect.is_armed());
}

// =============================================================================
// Observers and slot mutation
// =============================================================================

fn describe(event: &WandEvent) -> String {
    match event {
        WandEvent::SlotChanged(i) => format!("SlotChanged({})", i),
        WandEvent::SpellCast(ctx) => format!("SpellCast {}", ctx.spell_name()),
        WandEvent::SlotAdded(slot) => format!("SlotAdded {}", slot.display_name()),
        WandEvent::SlotRemoved(i) => format!("SlotRemoved({})", i),
    }
}

#[test]
fn test_observers_see_slot_change_then_cast_then_caster_hook() {
    let mut wand = wand(vec![spell("bolt", 10.0), spell("spark", 4.0)]);
    let mut rig = Rig::new();
    let journal = rig.caster.journal.clone();

    let sink = journal.clone();
    wand.subscribe(move |e| sink.lock().unwrap().push(describe(e)));

    rig.cast(&mut wand).unwrap();
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["SlotChanged(1)", "SpellCast bolt", "on_cast bolt"]
    );
}

#[test]
fn test_unsubscribed_observer_is_silent() {
    let mut wand = wand(vec![spell("bolt", 10.0)]);
    let seen = Arc::new(Mutex::new(0));
    let counter = seen.clone();
    let id = wand.subscribe(move |_| *counter.lock().unwrap() += 1);
    assert!(wand.unsubscribe(id));

    Rig::new().cast(&mut wand).unwrap();
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn test_remove_slot_clamps_cursor() {
    let mut wand = wand(vec![spell("a", 1.0), spell("b", 1.0), spell("c", 1.0)]);
    wand.select_slot(2).unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    wand.subscribe(move |e| sink.lock().unwrap().push(describe(e)));

    wand.remove_slot(2).unwrap();
    assert_eq!(wand.cursor(), 1);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["SlotRemoved(2)", "SlotChanged(1)"]
    );

    assert_eq!(
        wand.remove_slot(9).unwrap_err(),
        CastError::InvalidIndex { index: 9, len: 2 }
    );
}

#[test]
fn test_add_slot_respects_capacity() {
    let mut wand = Wand::new(
        "small",
        WandLoadout::with_slots(vec![spell("a", 1.0), damage_buff(2.0)], 2).unwrap(),
    );
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    wand.subscribe(move |e| sink.lock().unwrap().push(describe(e)));

    assert_eq!(
        wand.add_slot(spell("b", 1.0)),
        Err(CastError::CapacityReached { max: 2 })
    );
    assert!(events.lock().unwrap().is_empty());

    wand.remove_slot(1).unwrap();
    assert_eq!(wand.add_slot(spell("b", 1.0)), Ok(1));
    assert_eq!(events.lock().unwrap().last().unwrap(), "SlotAdded b");
}

// =============================================================================
// Content
// =============================================================================

#[test]
fn test_apprentice_wand_from_default_content() {
    let library = ContentLibrary::load("assets/config/content.ron").unwrap();
    let mut wand = library.instantiate_wand("apprentice").unwrap();
    let mut rig = Rig::new();

    let ctx = rig.cast(&mut wand).unwrap();
    assert_eq!(ctx.spell_name(), "Arcane Bolt");
    assert_eq!(ctx.damage, 15.0);
    assert!((ctx.mana_cost - 4.8).abs() < 1e-5);
}

// =============================================================================
// Properties
// =============================================================================

fn resolved_damage(base: f32, global: f32, factors: &[f32]) -> f32 {
    let mut slots = vec![spell("bolt", base)];
    slots.extend(factors.iter().map(|f| damage_buff(*f)));
    let loadout = WandLoadout::with_slots(slots, factors.len() + 1)
        .unwrap()
        .with_global(GlobalMultipliers {
            damage: global,
            ..default()
        });
    let mut wand = Wand::new("prop", loadout);
    Rig::new().cast(&mut wand).unwrap().damage
}

proptest! {
    #[test]
    fn prop_damage_is_base_times_global_times_product(
        base in 1.0f32..100.0,
        global in 0.1f32..3.0,
        factors in prop::collection::vec(0.1f32..4.0, 0..6),
    ) {
        let expected = base * global * factors.iter().product::<f32>();
        let actual = resolved_damage(base, global, &factors);
        prop_assert!((actual - expected).abs() <= expected.abs() * 1e-4 + 1e-4);

        let mut reversed = factors.clone();
        reversed.reverse();
        let swapped = resolved_damage(base, global, &reversed);
        prop_assert!((swapped - actual).abs() <= actual.abs() * 1e-4 + 1e-4);
    }
}
