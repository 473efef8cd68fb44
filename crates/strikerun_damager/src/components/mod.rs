//! ECS Components
//!
//! Организация по доменам:
//! - damager: конфигурация источника урона (Damager, ForceMode, TriggerInteraction)
//! - damagee: capabilities цели (Damageable, Interactable, Dead)

pub mod damagee;
pub mod damager;

// Re-exports для удобного импорта
pub use damagee::*;
pub use damager::*;
