//! Decision engine — чистые процедуры решения об уроне
//!
//! Никакого ECS-доступа: eligibility, critical roll и геометрия силы —
//! детерминированные функции от аргументов. RNG инжектится (seeded
//! ChaCha8 в рантайме, фиксированный в тестах). ECS-обвязка в systems.rs.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, Group};
use bevy_rapier3d::rapier::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion};
use bevy_rapier3d::rapier::parry::query::PointQuery;
use rand::Rng;

use crate::components::{Damager, TriggerInteraction};
use crate::stats::StatModifier;

/// Всё что нужно знать о цели для проверки валидности
///
/// Собирается ECS-слоем (validate_hits); сами проверки не трогают World.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    /// Цель лежит в иерархии владельца (включая самого владельца)
    pub in_owner_subtree: bool,
    /// Слой цели (memberships её CollisionGroups)
    pub layer: Group,
    /// Цель — sensor (trigger volume без твёрдой поверхности).
    /// false когда коллайдер цели неизвестен.
    pub is_sensor: bool,
}

/// Цель НЕ проходит условия удара
///
/// Чистый предикат без side effects:
/// 1. dont_hit_owner и цель в поддереве владельца — не бьём себя
/// 2. слой цели вне hit_layer маски
/// 3. sensor при политике Ignore
pub fn is_invalid_target(damager: &Damager, target: &TargetContext) -> bool {
    if damager.dont_hit_owner && target.in_owner_subtree {
        return true;
    }
    if !damager.hit_layer.intersects(target.layer) {
        return true;
    }
    if target.is_sensor && damager.trigger_interaction == TriggerInteraction::Ignore {
        return true;
    }
    false
}

/// Одна равномерная выборка r ∈ [0,1): critical ⟺ r < chance
///
/// chance = 0 — никогда (r ≥ 0), chance = 1 — всегда (r < 1).
pub fn roll_critical(rng: &mut impl Rng, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

/// Модификатор для текущего удара: (возможно critical) копия шаблона
///
/// Roll выполняется на КАЖДЫЙ вызов — независимая выборка на каждый удар,
/// никакого кэширования. Величина масштабируется только при critical
/// с chance > 0; иначе копия без дрейфа.
pub fn critical_modifier(
    base: &StatModifier,
    rng: &mut impl Rng,
    chance: f32,
    multiplier: f32,
) -> (StatModifier, bool) {
    let critical = roll_critical(rng, chance);

    if critical && chance > 0.0 {
        (base.scaled(multiplier), true)
    } else {
        (*base, false)
    }
}

/// Вектор силы удара
pub fn hit_force(direction: Vec3, force: f32) -> Vec3 {
    direction * force
}

/// Ближайшая к `from` точка на поверхности коллайдера цели
///
/// Точка приложения силы при point-of-application impulse. `from` внутри
/// solid коллайдера проецируется в саму себя.
pub fn contact_point(collider: &Collider, transform: &Transform, from: Vec3) -> Vec3 {
    let position = Isometry3::from_parts(
        Translation3::new(
            transform.translation.x,
            transform.translation.y,
            transform.translation.z,
        ),
        UnitQuaternion::from_quaternion(Quaternion::new(
            transform.rotation.w,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
        )),
    );

    let projection = collider
        .raw
        .project_point(&position, &Point3::new(from.x, from.y, from.z), true);

    Vec3::new(projection.point.x, projection.point.y, projection.point.z)
}
