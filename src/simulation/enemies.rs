//! Enemies and the spawner
//!
//! Enemies are pooled per archetype. Every spawn hands out a fresh
//! [`ActorId`] even when the instance behind it is recycled, so contact
//! timers and kill credit never leak between lives.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::contact::ContactTimers;
use crate::combat::events::{DamageEvent, EnemyKilledEvent};
use crate::combat::health::{DamageOutcome, Damageable, Health};
use crate::combat::log::CombatLog;
use crate::pool::{Initialize, PoolHandle, PoolRegistry, Poolable};
use crate::settings::SpawnerSettings;
use crate::wand::cooldown::CooldownTimer;
use crate::ActorId;

use super::components::{GameRng, Player};

/// Authored enemy kind
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    pub name: String,
    pub max_health: f32,
    /// Units per second
    pub speed: f32,
    pub contact_damage: f32,
    /// Seconds between contact hits on the same target
    pub contact_interval: f32,
    pub radius: f32,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            name: "slime".to_string(),
            max_health: 30.0,
            speed: 2.0,
            contact_damage: 5.0,
            contact_interval: 0.5,
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    id: ActorId,
    name: String,
    active: bool,
    position: Vec2,
    speed: f32,
    radius: f32,
    contact_damage: f32,
    pub health: Health,
    pub contact: ContactTimers,
}

impl Enemy {
    pub fn new(archetype: &EnemyArchetype) -> Self {
        Self {
            id: ActorId::default(),
            name: archetype.name.clone(),
            active: false,
            position: Vec2::ZERO,
            speed: archetype.speed.max(0.0),
            radius: archetype.radius.max(0.0),
            contact_damage: archetype.contact_damage.max(0.0),
            health: Health::new(archetype.max_health),
            contact: ContactTimers::new(archetype.contact_interval),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn contact_damage(&self) -> f32 {
        self.contact_damage
    }

    /// Step toward `target`, stopping once the bodies touch.
    pub fn chase(&mut self, target: Vec2, target_radius: f32, dt: f32) {
        let offset = target - self.position;
        let gap = offset.length() - (self.radius + target_radius);
        if gap <= 0.0 {
            return;
        }
        let step = (self.speed * dt).min(gap);
        self.position += offset.normalize_or_zero() * step;
    }

    pub fn touches(&self, point: Vec2, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.position.distance_squared(point) <= reach * reach
    }
}

impl Poolable for Enemy {
    fn deactivate(&mut self) {
        self.active = false;
        self.contact.clear();
    }
}

/// Spawn arguments: the id to wear and where to appear
impl Initialize<(ActorId, Vec2)> for Enemy {
    fn initialize(&mut self, (id, position): (ActorId, Vec2)) {
        self.id = id;
        self.active = true;
        self.position = position;
        self.health.revive();
        self.contact.clear();
    }
}

impl Damageable for Enemy {
    fn actor_id(&self) -> ActorId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn hit_radius(&self) -> f32 {
        self.radius
    }

    fn is_alive(&self) -> bool {
        self.active && self.health.is_alive()
    }

    fn take_damage(&mut self, amount: f32, source: ActorId) -> DamageOutcome {
        if !self.active {
            return DamageOutcome::IGNORED;
        }
        self.health.take_damage(amount, source)
    }
}

/// Pooled enemies, one pool per archetype.
#[derive(Resource)]
pub struct Enemies {
    registry: PoolRegistry<Enemy>,
    archetypes: Vec<EnemyArchetype>,
    next_id: u32,
}

impl Default for Enemies {
    fn default() -> Self {
        Self::new(vec![EnemyArchetype::default()], 0)
    }
}

impl Enemies {
    pub fn new(archetypes: Vec<EnemyArchetype>, warmup: usize) -> Self {
        let mut registry = PoolRegistry::new();
        for archetype in &archetypes {
            let template = Enemy::new(archetype);
            registry.add_archetype(move || template.clone(), warmup);
        }
        Self {
            registry,
            archetypes,
            next_id: 1,
        }
    }

    pub fn archetypes(&self) -> &[EnemyArchetype] {
        &self.archetypes
    }

    pub fn registry(&self) -> &PoolRegistry<Enemy> {
        &self.registry
    }

    fn next_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a random archetype at `position`.
    pub fn spawn_random(&mut self, rng: &mut GameRng, position: Vec2) -> Option<(PoolHandle, ActorId)> {
        let id = self.next_id();
        self.registry
            .get_random(rng, (id, position))
            .map(|handle| (handle, id))
    }

    /// Spawn a specific archetype at `position`.
    pub fn spawn(&mut self, archetype: usize, position: Vec2) -> Option<(PoolHandle, ActorId)> {
        let id = self.next_id();
        match self.registry.get_by_type(archetype, (id, position)) {
            Ok(handle) => Some((handle, id)),
            Err(e) => {
                warn!("Enemy spawn failed: {}", e);
                None
            }
        }
    }

    pub fn alive_count(&self) -> usize {
        self.registry.active_count()
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&Enemy> {
        self.registry.get_ref(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &Enemy)> + '_ {
        self.registry.iter_active()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut Enemy)> + '_ {
        self.registry.iter_active_mut()
    }

    pub fn release(&mut self, handle: PoolHandle) {
        if let Err(e) = self.registry.release(handle) {
            warn!("Enemy release failed: {}", e);
        }
    }

    /// Closest living enemy to `point`.
    pub fn nearest_to(&self, point: Vec2) -> Option<&Enemy> {
        self.iter()
            .map(|(_, enemy)| enemy)
            .filter(|enemy| enemy.is_alive())
            .min_by(|a, b| {
                a.position
                    .distance_squared(point)
                    .total_cmp(&b.position.distance_squared(point))
            })
    }
}

/// Periodic spawn waves in a ring around the player.
#[derive(Resource, Debug, Clone)]
pub struct EnemySpawner {
    settings: SpawnerSettings,
    timer: CooldownTimer,
    wave_due: bool,
    pub enabled: bool,
    spawned: u32,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::from_settings(&SpawnerSettings::default())
    }
}

impl EnemySpawner {
    /// The first wave arrives one interval in.
    pub fn from_settings(settings: &SpawnerSettings) -> Self {
        Self {
            settings: settings.clone(),
            timer: CooldownTimer::started(settings.interval),
            wave_due: false,
            enabled: true,
            spawned: 0,
        }
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer.update(dt);
        if self.timer.is_ready() {
            self.wave_due = true;
            self.timer.start(self.settings.interval);
        }
    }

    /// Consume a pending wave.
    pub fn take_wave(&mut self) -> bool {
        std::mem::take(&mut self.wave_due)
    }

    /// Random point on the spawn ring around `center`.
    pub fn spawn_position(&self, center: Vec2, rng: &mut GameRng) -> Vec2 {
        let angle = rng.random_range(0.0, std::f32::consts::TAU);
        let distance = rng.random_range(self.settings.min_distance, self.settings.max_distance);
        center + Vec2::from_angle(angle) * distance
    }
}

// === Systems ===

pub fn tick_spawner(time: Res<Time>, mut spawner: ResMut<EnemySpawner>) {
    spawner.tick(time.delta_secs());
}

pub fn tick_enemies(time: Res<Time>, player: Res<Player>, mut enemies: ResMut<Enemies>) {
    let dt = time.delta_secs();
    let player_alive = player.is_alive();
    for (_, enemy) in enemies.iter_mut() {
        enemy.health.tick(dt);
        enemy.contact.tick(dt);
        enemy
            .contact
            .sweep(|target| target != ActorId::PLAYER || player_alive);
    }
}

pub fn spawn_enemies(
    player: Res<Player>,
    mut spawner: ResMut<EnemySpawner>,
    mut enemies: ResMut<Enemies>,
    mut rng: ResMut<GameRng>,
) {
    if !spawner.take_wave() || !spawner.enabled || !player.is_alive() {
        return;
    }
    for _ in 0..spawner.settings.per_spawn {
        if enemies.alive_count() >= spawner.settings.max_alive {
            break;
        }
        let position = spawner.spawn_position(player.position, &mut rng);
        if let Some((_, id)) = enemies.spawn_random(&mut rng, position) {
            spawner.spawned += 1;
            debug!("Spawned {} at ({:.1}, {:.1})", id, position.x, position.y);
        }
    }
}

/// FixedUpdate: enemies walk toward the player.
pub fn chase_player(time: Res<Time>, player: Res<Player>, mut enemies: ResMut<Enemies>) {
    if !player.is_alive() {
        return;
    }
    let dt = time.delta_secs();
    for (_, enemy) in enemies.iter_mut() {
        if enemy.is_alive() {
            enemy.chase(player.position, player.hit_radius, dt);
        }
    }
}

pub fn apply_contact_damage(
    mut player: ResMut<Player>,
    mut enemies: ResMut<Enemies>,
    mut combat_log: ResMut<CombatLog>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (_, enemy) in enemies.iter_mut() {
        if !player.is_alive() {
            break;
        }
        if !enemy.is_alive() || !enemy.touches(player.position, player.hit_radius) {
            continue;
        }
        if !enemy.contact.try_trigger(ActorId::PLAYER) {
            continue;
        }
        let outcome = player.take_damage(enemy.contact_damage, enemy.id);
        if outcome.dealt > 0.0 {
            damage_events.send(DamageEvent {
                source: enemy.id,
                target: ActorId::PLAYER,
                amount: outcome.dealt,
                spell_name: None,
                is_critical: false,
            });
        }
        if outcome.killed {
            info!("Player was killed by {}", enemy.id);
            combat_log.log_death(ActorId::PLAYER, Some(enemy.id));
        }
    }
}

/// Dead enemies go back to their pools.
pub fn release_dead_enemies(
    mut enemies: ResMut<Enemies>,
    mut kill_events: EventWriter<EnemyKilledEvent>,
) {
    let dead: Vec<(PoolHandle, ActorId, Option<ActorId>)> = enemies
        .iter()
        .filter(|(_, enemy)| !enemy.health.is_alive())
        .map(|(handle, enemy)| (handle, enemy.id, enemy.health.killer()))
        .collect();

    for (handle, victim, killer) in dead {
        kill_events.send(EnemyKilledEvent { victim, killer });
        enemies.release(handle);
    }
}
