//! ECS-обвязка decision engine — FixedUpdate pipeline
//!
//! Порядок (chained, см. DamagerPlugin):
//! 1. sync_damager_activation — Active flag ↔ rapier детектор + roster
//! 2. detect_damager_overlaps — rapier CollisionEvent → DamagerOverlap
//! 3. validate_hits — eligibility (owner/layer/sensor) → ValidatedHit
//! 4. apply_hit_damage — critical roll + Stats + DamageDealt/DamagerHit
//! 5. apply_hit_interaction — one-shot Interactable активация
//! 6. apply_hit_physics — impulse/force/velocity на rigid body цели
//! 7. mark_dead — EntityDied → Dead маркер
//!
//! Отсутствие capability у цели (Damageable, Interactable, rigid body) —
//! нормальный no-op, без ошибок и паник.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, ColliderDisabled, CollisionEvent, CollisionGroups, ExternalForce, ExternalImpulse,
    Group, RigidBody, Sensor, Velocity,
};

use crate::collection::DamagerRoster;
use crate::components::{Damageable, Damager, Dead, ForceMode, Interactable};
use crate::damage::engine::{self, TargetContext};
use crate::damage::events::{
    DamageDealt, DamagerHit, DamagerOverlap, EntityDied, InteractionStarted, ValidatedHit,
};
use crate::stats::{StatId, Stats};
use crate::DeterministicRng;

/// Система: Active flag ↔ детектор
///
/// Выключенный damager не участвует в hit detection: его rapier collider
/// получает ColliderDisabled. Roster держит текущий набор активных
/// damager'ов (для consumers и random pick); деспавн damager'а (короткоживущие
/// hitbox/projectile entities) тоже выбивает его из roster.
pub fn sync_damager_activation(
    mut commands: Commands,
    changed: Query<(Entity, &Damager), Changed<Damager>>,
    mut removed: RemovedComponents<Damager>,
    mut roster: ResMut<DamagerRoster>,
) {
    for (entity, damager) in changed.iter() {
        if damager.active {
            commands.entity(entity).remove::<ColliderDisabled>();
            if roster.add(entity) {
                crate::log(&format!("Damager {entity:?} activated (id {})", damager.index));
            }
        } else {
            commands.entity(entity).insert(ColliderDisabled);
            roster.remove(&entity);
            crate::log(&format!("Damager {entity:?} deactivated (id {})", damager.index));
        }
    }

    // Despawn не триггерит Changed — подчищаем roster отдельно
    for entity in removed.read() {
        roster.remove(&entity);
    }
}

/// Система: rapier collision events → DamagerOverlap
///
/// Started-события с участием damager'а превращаются в сырой hit-test.
/// Оба участника могут быть damager'ами — тогда оба бьют друг друга.
pub fn detect_damager_overlaps(
    mut collisions: EventReader<CollisionEvent>,
    damagers: Query<&Damager>,
    mut overlaps: EventWriter<DamagerOverlap>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(e1, e2, _flags) = event else {
            continue;
        };

        for (damager_entity, target) in [(*e1, *e2), (*e2, *e1)] {
            if let Ok(damager) = damagers.get(damager_entity) {
                if damager.active {
                    overlaps.write(DamagerOverlap {
                        damager: damager_entity,
                        target,
                    });
                }
            }
        }
    }
}

/// Цель в поддереве владельца (включая самого владельца)
fn in_owner_subtree(parents: &Query<&ChildOf>, target: Entity, owner: Entity) -> bool {
    let mut current = target;
    loop {
        if current == owner {
            return true;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
}

/// Система: eligibility проверки
///
/// Собирает TargetContext из ECS (иерархия, слой, sensor) и прогоняет
/// чистый предикат is_invalid_target. Цель без CollisionGroups считается
/// на дефолтном слое GROUP_1.
pub fn validate_hits(
    mut overlaps: EventReader<DamagerOverlap>,
    mut valid: EventWriter<ValidatedHit>,
    damagers: Query<(&Damager, Option<&Transform>)>,
    parents: Query<&ChildOf>,
    layers: Query<&CollisionGroups>,
    sensors: Query<&Sensor>,
) {
    for overlap in overlaps.read() {
        let Ok((damager, transform)) = damagers.get(overlap.damager) else {
            continue;
        };
        if !damager.active {
            continue;
        }

        let owner = damager.resolve_owner(overlap.damager);
        let context = TargetContext {
            in_owner_subtree: in_owner_subtree(&parents, overlap.target, owner),
            layer: layers
                .get(overlap.target)
                .map(|groups| groups.memberships)
                .unwrap_or(Group::GROUP_1),
            is_sensor: sensors.contains(overlap.target),
        };

        if engine::is_invalid_target(damager, &context) {
            continue;
        }

        let direction = match transform {
            Some(transform) => damager.world_direction(transform),
            None => damager.direction,
        };

        valid.write(ValidatedHit {
            damager: overlap.damager,
            target: overlap.target,
            direction,
        });
    }
}

/// Система: применение урона
///
/// Critical roll на каждый удар (seeded RNG resource), receiver-side
/// multiplier цели (если damager его не игнорирует), эмиссия
/// DamageDealt + DamagerHit. Цель без Damageable/Stats — тихий no-op.
pub fn apply_hit_damage(
    mut hits: EventReader<ValidatedHit>,
    mut rng: ResMut<DeterministicRng>,
    damagers: Query<&Damager>,
    mut targets: Query<(&Damageable, &mut Stats)>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut hit_events: EventWriter<DamagerHit>,
    mut died_events: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Ok(damager) = damagers.get(hit.damager) else {
            crate::log_warning(&format!(
                "ValidatedHit: damager {:?} despawned before dispatch",
                hit.damager
            ));
            continue;
        };

        // Нет damage capability — нормальный исход, без событий
        let Ok((damageable, mut stats)) = targets.get_mut(hit.target) else {
            continue;
        };

        // Независимый roll на каждое применение (не кэшируется)
        let (modifier, critical) = engine::critical_modifier(
            &damager.stat_modifier,
            &mut rng.rng,
            damager.critical_chance,
            damager.critical_multiplier,
        );

        let multiplier = if damager.ignore_damagee_multiplier {
            1.0
        } else {
            damageable.multiplier
        };

        let was_alive = stats.get(StatId::Health).is_some_and(|s| !s.is_empty());
        stats.apply(&modifier, multiplier);

        dealt_events.write(DamageDealt {
            damager: hit.damager,
            damager_id: damager.index,
            target: hit.target,
            modifier,
            critical,
            direction: hit.direction,
            allow_reaction: damager.react,
        });

        hit_events.write(DamagerHit {
            damager: hit.damager,
            damager_id: damager.index,
            target: hit.target,
        });

        crate::log(&format!(
            "💥 Damager {} hit {:?}: {:?} {} {}{}",
            damager.index,
            hit.target,
            modifier.id,
            match modifier.op {
                crate::stats::StatOp::Add => "+",
                crate::stats::StatOp::Subtract => "-",
                crate::stats::StatOp::Set => "=",
                crate::stats::StatOp::Multiply => "x",
            },
            modifier.value,
            if critical { " (CRITICAL)" } else { "" },
        ));

        if was_alive && stats.is_depleted(StatId::Health) {
            died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.damager),
            });
        }
    }
}

/// Система: активация Interactable целей
///
/// Гейт по interact flag damager'а; one-shot latch на цели — повторный
/// удар по уже активированной цели ничего не делает.
pub fn apply_hit_interaction(
    mut hits: EventReader<ValidatedHit>,
    damagers: Query<&Damager>,
    mut interactables: Query<&mut Interactable>,
    mut events: EventWriter<InteractionStarted>,
) {
    for hit in hits.read() {
        let Ok(damager) = damagers.get(hit.damager) else {
            continue;
        };
        if !damager.interact {
            continue;
        }

        let Ok(mut interactable) = interactables.get_mut(hit.target) else {
            continue;
        };

        if interactable.interact(damager.index) {
            events.write(InteractionStarted {
                target: hit.target,
                source_id: damager.index,
            });
        }
    }
}

/// Система: физический отклик на удар
///
/// No-op без dynamic rigid body или при force ≤ 0. С известным коллайдером
/// сила прикладывается в ближайшей к damager'у точке поверхности
/// (point-of-application), иначе — в центр тела.
pub fn apply_hit_physics(
    mut commands: Commands,
    mut hits: EventReader<ValidatedHit>,
    damagers: Query<(&Damager, Option<&Transform>)>,
    mut bodies: Query<(
        &RigidBody,
        &Transform,
        Option<&Collider>,
        Option<&mut ExternalImpulse>,
        Option<&mut ExternalForce>,
        Option<&mut Velocity>,
    )>,
) {
    for hit in hits.read() {
        let Ok((damager, damager_transform)) = damagers.get(hit.damager) else {
            continue;
        };
        if damager.force <= 0.0 {
            continue;
        }

        let Ok((body, target_transform, collider, impulse, force, velocity)) =
            bodies.get_mut(hit.target)
        else {
            continue;
        };
        if !matches!(body, RigidBody::Dynamic) {
            continue;
        }

        let force_vec = engine::hit_force(hit.direction, damager.force);
        // Приближение центра масс позицией тела: точных mass properties
        // на gameplay-стороне нет
        let center = target_transform.translation;

        let application_point = match (collider, damager_transform) {
            (Some(collider), Some(damager_transform)) => Some(engine::contact_point(
                collider,
                target_transform,
                damager_transform.translation,
            )),
            _ => None,
        };

        match damager.force_mode {
            ForceMode::Impulse => {
                let applied = match application_point {
                    Some(point) => ExternalImpulse::at_point(force_vec, point, center),
                    None => ExternalImpulse {
                        impulse: force_vec,
                        torque_impulse: Vec3::ZERO,
                    },
                };
                if let Some(mut existing) = impulse {
                    existing.impulse += applied.impulse;
                    existing.torque_impulse += applied.torque_impulse;
                } else {
                    commands.entity(hit.target).insert(applied);
                }
            }
            ForceMode::Force => {
                let applied = match application_point {
                    Some(point) => ExternalForce::at_point(force_vec, point, center),
                    None => ExternalForce {
                        force: force_vec,
                        torque: Vec3::ZERO,
                    },
                };
                if let Some(mut existing) = force {
                    existing.force += applied.force;
                    existing.torque += applied.torque;
                } else {
                    commands.entity(hit.target).insert(applied);
                }
            }
            ForceMode::VelocityChange => {
                if let Some(mut velocity) = velocity {
                    velocity.linvel += force_vec;
                } else {
                    commands.entity(hit.target).insert(Velocity {
                        linvel: force_vec,
                        angvel: Vec3::ZERO,
                    });
                }
            }
        }
    }
}

/// Система: пометка мертвых entity
///
/// Деспавн не автоматический — consumer решает (ragdoll, лут, fade-out).
pub fn mark_dead(mut commands: Commands, mut deaths: EventReader<EntityDied>) {
    for event in deaths.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
            crate::log(&format!(
                "Entity {:?} killed by {:?}",
                event.entity, event.killer
            ));
        }
    }
}
