//! Stat model — числовые атрибуты акторов и их модификации
//!
//! - `StatId` / `StatOp` / `StatModifier`: описание изменения стата
//!   (какой стат, какая операция, величина)
//! - `Stats`: компонент-хранилище статов на entity
//!
//! StatModifier — immutable value type: critical hit порождает НОВЫЙ
//! модификатор со scaled величиной, оригинал (шаблон на Damager) не трогаем.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентификатор стата
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum StatId {
    Health,
    Stamina,
    Mana,
}

/// Операция над статом
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum StatOp {
    /// current += value
    Add,
    /// current -= value (урон)
    Subtract,
    /// current = value (абсолютное значение, receiver multiplier не применяется)
    Set,
    /// current *= value (receiver multiplier не применяется)
    Multiply,
}

/// Описание изменения стата: id + операция + величина
///
/// Шаблон хранится в конфиге Damager; на каждый hit порождается копия
/// (возможно scaled при critical).
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct StatModifier {
    pub id: StatId,
    pub op: StatOp,
    pub value: f32,
}

impl StatModifier {
    pub fn new(id: StatId, op: StatOp, value: f32) -> Self {
        Self { id, op, value }
    }

    /// Новый модификатор с value × factor (для critical hits)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            value: self.value * factor,
            ..*self
        }
    }
}

impl Default for StatModifier {
    fn default() -> Self {
        // Классический melee damager: −10 Health за удар
        Self::new(StatId::Health, StatOp::Subtract, 10.0)
    }
}

/// Один стат: текущее значение + максимум
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Stat {
    pub current: f32,
    pub max: f32,
}

impl Stat {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// Компонент-хранилище статов entity
///
/// Маленький Vec вместо HashMap: статов единицы, linear scan дешевле
/// и детерминированнее по порядку обхода.
#[derive(Component, Debug, Clone, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Stats {
    entries: Vec<(StatId, Stat)>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: добавить стат с максимумом (current = max)
    pub fn with(mut self, id: StatId, max: f32) -> Self {
        if self.get(id).is_none() {
            self.entries.push((id, Stat::new(max)));
        }
        self
    }

    pub fn get(&self, id: StatId) -> Option<&Stat> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, id: StatId) -> Option<&mut Stat> {
        self.entries
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, s)| s)
    }

    /// Текущее значение стата (0.0 если стата нет)
    pub fn value(&self, id: StatId) -> f32 {
        self.get(id).map(|s| s.current).unwrap_or(0.0)
    }

    /// Стат присутствует и исчерпан (current ≤ 0)
    pub fn is_depleted(&self, id: StatId) -> bool {
        self.get(id).is_some_and(|s| s.is_empty())
    }

    /// Применить модификатор с receiver-side multiplier
    ///
    /// Multiplier масштабирует только Add/Subtract (силу воздействия);
    /// Set/Multiply используют raw value — множитель получателя не должен
    /// менять смысл абсолютной операции.
    ///
    /// Возвращает false если такого стата нет (нормальный no-op, не ошибка).
    pub fn apply(&mut self, modifier: &StatModifier, multiplier: f32) -> bool {
        let Some(stat) = self.get_mut(modifier.id) else {
            return false;
        };

        match modifier.op {
            StatOp::Add => stat.current += modifier.value * multiplier,
            StatOp::Subtract => stat.current -= modifier.value * multiplier,
            StatOp::Set => stat.current = modifier.value,
            StatOp::Multiply => stat.current *= modifier.value,
        }

        stat.current = stat.current.clamp(0.0, stat.max);
        true
    }
}
