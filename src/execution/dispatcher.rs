//! Execution dispatch
//!
//! Maps a cast's [`ExecutionKind`] to the handler that turns it into a pooled
//! entity. New kinds are added by registering another handler; existing
//! handlers never change. Kinds without a handler (`Beam` and `Self` by
//! default) are rejected with [`CastError::UnsupportedExecutionKind`].

use bevy::prelude::*;
use std::collections::HashMap;

use super::area_effect::{AreaEffect, AreaEffectArchetype, AreaEffectHandler};
use super::projectile::{Projectile, ProjectileArchetype, ProjectileHandler};
use crate::error::CastError;
use crate::pool::{PoolHandle, PoolRegistry};
use crate::wand::context::CastContext;
use crate::wand::definitions::ExecutionKind;

/// Turns one resolved cast into something in the world.
pub trait ExecutionHandler: Send + Sync {
    /// Check the cast can be executed without changing anything.
    fn validate(&self, context: &CastContext, pools: &EffectPools) -> Result<(), CastError>;

    /// Spawn the effect. Only called after `validate` succeeded.
    fn execute(&self, context: &CastContext, pools: &mut EffectPools)
        -> Result<PoolHandle, CastError>;
}

/// Pools backing every cast effect, one archetype per authored effect kind.
#[derive(Resource)]
pub struct EffectPools {
    pub projectiles: PoolRegistry<Projectile>,
    pub area_effects: PoolRegistry<AreaEffect>,
}

impl Default for EffectPools {
    fn default() -> Self {
        Self::with_archetypes(
            &[ProjectileArchetype::default()],
            &[AreaEffectArchetype::default()],
            16,
            4,
        )
    }
}

impl EffectPools {
    /// Pools with no archetypes; every cast fails validation until some are added.
    pub fn empty() -> Self {
        Self {
            projectiles: PoolRegistry::new(),
            area_effects: PoolRegistry::new(),
        }
    }

    pub fn with_archetypes(
        projectiles: &[ProjectileArchetype],
        area_effects: &[AreaEffectArchetype],
        projectile_warmup: usize,
        area_warmup: usize,
    ) -> Self {
        let mut pools = Self::empty();
        for archetype in projectiles {
            let archetype = archetype.clone();
            pools
                .projectiles
                .add_archetype(move || Projectile::new(&archetype), projectile_warmup);
        }
        for archetype in area_effects {
            let archetype = archetype.clone();
            pools
                .area_effects
                .add_archetype(move || AreaEffect::new(&archetype), area_warmup);
        }
        pools
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.active_count() + self.area_effects.active_count()
    }
}

#[derive(Resource)]
pub struct ExecutionDispatcher {
    handlers: HashMap<ExecutionKind, Box<dyn ExecutionHandler>>,
}

impl Default for ExecutionDispatcher {
    /// Projectile and AoE handlers registered.
    fn default() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(ExecutionKind::Projectile, ProjectileHandler);
        dispatcher.register(ExecutionKind::AoE, AreaEffectHandler);
        dispatcher
    }
}

impl ExecutionDispatcher {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Bind a handler to a kind, returning the one it replaces.
    pub fn register(
        &mut self,
        kind: ExecutionKind,
        handler: impl ExecutionHandler + 'static,
    ) -> Option<Box<dyn ExecutionHandler>> {
        self.handlers.insert(kind, Box::new(handler))
    }

    pub fn supports(&self, kind: ExecutionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    fn handler(&self, kind: ExecutionKind) -> Result<&dyn ExecutionHandler, CastError> {
        self.handlers
            .get(&kind)
            .map(|handler| handler.as_ref())
            .ok_or(CastError::UnsupportedExecutionKind(kind))
    }

    /// Check a cast could be dispatched, without spawning anything.
    pub fn validate(&self, context: &CastContext, pools: &EffectPools) -> Result<(), CastError> {
        let result = self
            .handler(context.execution())
            .and_then(|handler| handler.validate(context, pools));
        if let Err(err) = &result {
            warn!("Cannot execute {}: {}", context.spell_name(), err);
        }
        result
    }

    pub fn dispatch(
        &self,
        context: &CastContext,
        pools: &mut EffectPools,
    ) -> Result<PoolHandle, CastError> {
        let handler = self.handler(context.execution()).map_err(|err| {
            warn!("Cannot execute {}: {}", context.spell_name(), err);
            err
        })?;
        handler.execute(context, pools)
    }
}

/// Shared archetype check for handlers backed by a [`PoolRegistry`].
pub(crate) fn check_archetype<T>(
    registry: &PoolRegistry<T>,
    context: &CastContext,
    what: &str,
) -> Result<(), CastError>
where
    T: crate::pool::Poolable,
{
    let archetype = context.spell.effect_archetype;
    if archetype >= registry.archetype_count() {
        return Err(CastError::Configuration(format!(
            "spell '{}' uses {} archetype {} but {} are registered",
            context.spell.id,
            what,
            archetype,
            registry.archetype_count()
        )));
    }
    Ok(())
}
