//! Runtime collection — generic набор объектов, живущий только в рантайме
//!
//! Семантика set-с-порядком: add не дублирует, remove терпит отсутствие,
//! random pick через инжектированный RNG (никакого глобального источника).

use bevy::prelude::*;
use rand::Rng;

/// Набор элементов с проверкой уникальности
///
/// Порядок вставки сохраняется (итерация детерминирована).
#[derive(Debug, Clone)]
pub struct RuntimeCollection<T> {
    items: Vec<T>,
}

impl<T> Default for RuntimeCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> RuntimeCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Случайный элемент через инжектированный RNG; None на пустом наборе
    pub fn random(&self, rng: &mut impl Rng) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(rng.gen_range(0..self.items.len()))
    }

    /// Добавить если отсутствует; false = уже был
    pub fn add(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Убрать если присутствует; false = не было
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// Текущий набор активных damager'ов
///
/// Поддерживается sync_damager_activation; consumers берут отсюда
/// damager'ы для триггеров/дебага, random pick — для вариативных реакций.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct DamagerRoster(pub RuntimeCollection<Entity>);
