//! Damage pipeline module
//!
//! Ответственность:
//! - Decision engine: eligibility, critical roll, геометрия силы (engine)
//! - События пайплайна: overlap → validated → dealt/hit/died (events)
//! - ECS-обвязка: FixedUpdate системы (systems)
//!
//! Детекция столкновений принадлежит rapier (или bridge хост-движка,
//! который шлёт DamagerOverlap напрямую) — pipeline начинается с события.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

pub mod engine;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use engine::{
    contact_point, critical_modifier, hit_force, is_invalid_target, roll_critical, TargetContext,
};
pub use events::{
    DamageDealt, DamagerHit, DamagerOverlap, EntityDied, InteractionStarted, ValidatedHit,
};

use crate::collection::DamagerRoster;

/// Damager Plugin
///
/// Регистрирует события и chained FixedUpdate pipeline:
/// 1. sync_damager_activation — Active flag ↔ детектор
/// 2. detect_damager_overlaps — CollisionEvent → DamagerOverlap
/// 3. validate_hits — eligibility → ValidatedHit
/// 4. apply_hit_damage — critical roll + Stats
/// 5. apply_hit_interaction — Interactable активация
/// 6. apply_hit_physics — impulse/force/velocity
/// 7. mark_dead — Dead маркер
pub struct DamagerPlugin;

impl Plugin for DamagerPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий. CollisionEvent обычно регистрирует
        // RapierPhysicsPlugin; add_event — no-op если уже есть (headless
        // тесты шлют их вручную).
        app.add_event::<CollisionEvent>()
            .add_event::<DamagerOverlap>()
            .add_event::<ValidatedHit>()
            .add_event::<DamageDealt>()
            .add_event::<DamagerHit>()
            .add_event::<InteractionStarted>()
            .add_event::<EntityDied>();

        app.init_resource::<DamagerRoster>();

        app.add_systems(
            FixedUpdate,
            (
                systems::sync_damager_activation,
                systems::detect_damager_overlaps,
                systems::validate_hits,
                systems::apply_hit_damage,
                systems::apply_hit_interaction,
                systems::apply_hit_physics,
                systems::mark_dead,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
