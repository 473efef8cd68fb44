//! Damage pipeline events
//!
//! Поток: DamagerOverlap (детекция) → ValidatedHit (eligibility) →
//! DamageDealt / DamagerHit / InteractionStarted / EntityDied (эффекты).
//!
//! Consumers (анимация, VFX, scoring, реакции) подписываются на выходные
//! события — pipeline ничего не знает о них.

use bevy::prelude::*;

use crate::stats::StatModifier;

/// Сырой hit-test от слоя детекции (rapier collision events или
/// bridge хост-движка). Ещё не проверен на валидность.
#[derive(Event, Debug, Clone)]
pub struct DamagerOverlap {
    pub damager: Entity,
    pub target: Entity,
}

/// Overlap прошёл eligibility проверки (owner/layer/sensor)
#[derive(Event, Debug, Clone)]
pub struct ValidatedHit {
    pub damager: Entity,
    pub target: Entity,
    /// Направление удара в мировом пространстве
    pub direction: Vec3,
}

/// Урон применён к цели — payload для получателя и реакций
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub damager: Entity,
    /// ID damager'а (различение left/right hand у одного владельца)
    pub damager_id: i32,
    pub target: Entity,
    /// Применённый модификатор (уже scaled при critical)
    pub modifier: StatModifier,
    pub critical: bool,
    pub direction: Vec3,
    /// Damager разрешает цели реакцию (анимация отлетания)
    pub allow_reaction: bool,
}

/// On-hit notification: успешное применение урона, несёт ссылку на цель
///
/// Для внешних слушателей (анимация, VFX, scoring).
#[derive(Event, Debug, Clone)]
pub struct DamagerHit {
    pub damager: Entity,
    pub damager_id: i32,
    pub target: Entity,
}

/// Interactable цель активирована damager'ом
#[derive(Event, Debug, Clone)]
pub struct InteractionStarted {
    pub target: Entity,
    /// ID активировавшего damager'а
    pub source_id: i32,
}

/// Событие: entity умер (Health исчерпан)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}
