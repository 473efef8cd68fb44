//! Damagee capabilities — что цель умеет принимать
//!
//! Отсутствие компонента = отсутствие capability: pipeline молча
//! пропускает соответствующий dispatch (не ошибка).

use bevy::prelude::*;

/// Способность принимать урон
///
/// Receiver-side multiplier: броня/уязвимость цели. Применяется к
/// Add/Subtract величинам, если damager не выставил ignore_damagee_multiplier.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Damageable {
    pub multiplier: f32,
}

impl Default for Damageable {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

/// Интерактивный объект (рычаг, дверь, pickup)
///
/// One-shot latch: повторный interact на уже активированной цели — no-op.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Interactable {
    pub has_interacted: bool,
    /// ID damager'а который активировал (для реакций, ключующихся по руке)
    pub last_source: Option<i32>,
}

impl Interactable {
    /// Активация от damager'а с данным ID
    ///
    /// false = уже активирован, повторный вызов безопасен.
    pub fn interact(&mut self, source_id: i32) -> bool {
        if self.has_interacted {
            return false;
        }
        self.has_interacted = true;
        self.last_source = Some(source_id);
        true
    }
}

/// Маркер: entity мертв (Health исчерпан)
///
/// Деспавн не автоматический — consumer решает что делать с трупом.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;
