//! Damager component — конфигурация источника урона
//!
//! Damager висит на entity с rapier collider (детектор). Внешний слой
//! (rapier collision events или bridge хост-движка) сообщает об overlap,
//! pipeline в damage::systems решает валидность и применяет эффекты.
//!
//! Вся конфигурация owner-mutable между кадрами: оружие может менять
//! stat_modifier/force на лету (charge attacks, бафы).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};

use crate::stats::StatModifier;

/// Что делать с trigger volumes (sensor коллайдеры без твёрдой поверхности)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum TriggerInteraction {
    /// Сенсоры не получают удары (дефолт)
    #[default]
    Ignore,
    /// Сенсоры считаются валидными целями
    Collide,
}

/// Режим применения силы к rigid body цели
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum ForceMode {
    /// Продолжительная сила (ExternalForce)
    #[default]
    Force,
    /// Мгновенный импульс (ExternalImpulse)
    Impulse,
    /// Прямое изменение linvel (игнорирует массу)
    VelocityChange,
}

/// Источник урона: eligibility-фильтры + параметры stat/crit/physics эффектов
///
/// `index` различает damager'ы одного владельца (левая/правая рука) —
/// получатели (Interactable, анимационные триггеры) ключуются по нему.
#[derive(Component, Debug, Clone)]
pub struct Damager {
    /// ID damager'а для multi-damager владельцев
    pub index: i32,

    /// Участвует ли в hit detection; toggle также включает/выключает
    /// детектор (rapier collider) — см. sync_damager_activation
    pub active: bool,

    /// Владелец (персонаж). None = сам damager entity
    pub owner: Option<Entity>,

    /// Не бить объекты в иерархии владельца
    pub dont_hit_owner: bool,

    /// Маска слоёв валидных целей (rapier Group)
    pub hit_layer: Group,

    /// Политика для sensor целей
    pub trigger_interaction: TriggerInteraction,

    /// Damager может активировать Interactable цели
    pub interact: bool,

    /// Разрешить получателю реакцию на удар (анимация отлетания и т.п.)
    pub react: bool,

    /// Не применять receiver-side multiplier цели
    pub ignore_damagee_multiplier: bool,

    /// Шаблон изменения стата (копируется на каждый hit)
    pub stat_modifier: StatModifier,

    /// Шанс критического удара [0, 1]: 0 = никогда, 1 = всегда
    pub critical_chance: f32,

    /// Множитель величины при критическом ударе
    pub critical_multiplier: f32,

    /// Величина силы для rigid body целей (0 = физика выключена)
    pub force: f32,

    /// Режим применения силы
    pub force_mode: ForceMode,

    /// Направление удара в локальном пространстве damager'а
    pub direction: Vec3,
}

impl Default for Damager {
    fn default() -> Self {
        Self {
            index: 1,
            active: true,
            owner: None,
            dont_hit_owner: true,
            hit_layer: Group::ALL,
            trigger_interaction: TriggerInteraction::Ignore,
            interact: true,
            react: true,
            ignore_damagee_multiplier: false,
            stat_modifier: StatModifier::default(),
            critical_chance: 0.0,
            critical_multiplier: 2.0,
            force: 50.0,
            force_mode: ForceMode::Force,
            direction: Vec3::Z,
        }
    }
}

impl Damager {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Владелец для owner-exclusion: сконфигурированный или сам damager
    pub fn resolve_owner(&self, self_entity: Entity) -> Entity {
        self.owner.unwrap_or(self_entity)
    }

    /// Направление удара в мировом пространстве
    pub fn world_direction(&self, transform: &Transform) -> Vec3 {
        transform.rotation * self.direction
    }
}
