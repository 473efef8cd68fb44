//! STRIKERUN Damager
//!
//! Gameplay-плагин "damager": компонент-источник урона, который по
//! overlap'ам от слоя детекции решает валидность удара и применяет
//! stat damage, critical rolls, физические импульсы и interaction триггеры.
//!
//! Архитектура:
//! - ECS = game state и combat rules (Damager config, Stats, pipeline)
//! - rapier = детекция (colliders, sensors, collision groups) и физический
//!   отклик (impulses/forces)
//! - Consumers (анимация, VFX, scoring) подписываются на события пайплайна

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod collection;
pub mod components;
pub mod damage;
pub mod logger;
pub mod stats;

// Re-export базовых типов для удобства
pub use collection::{DamagerRoster, RuntimeCollection};
pub use components::{Damageable, Damager, Dead, ForceMode, Interactable, TriggerInteraction};
pub use damage::{
    DamageDealt, DamagerHit, DamagerOverlap, DamagerPlugin, EntityDied, InteractionStarted,
    ValidatedHit,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger};
pub use stats::{Stat, StatId, StatModifier, StatOp, Stats};

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности пайплайна (critical rolls, random
/// pick из коллекций) — одинаковый seed даёт одинаковую симуляцию.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Обход отсортирован по Entity ID, сериализация через Debug —
/// достаточно для побайтового сравнения прогонов.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
