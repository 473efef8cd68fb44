//! Headless демо damager пайплайна
//!
//! Прогоняет серию ударов по мишеням без рендера: overlap события →
//! decision engine → урон/криты/смерть. Печатает исход каждого тика.

use bevy::prelude::*;
use strikerun_damager::*;

fn main() {
    let seed = 42;
    println!("Starting STRIKERUN damager demo (seed: {seed})");

    let mut app = create_headless_app(seed);
    app.add_plugins(DamagerPlugin);

    // Damager: меч с 25% критом
    let sword = app
        .world_mut()
        .spawn((
            Transform::default(),
            Damager {
                critical_chance: 0.25,
                ..Default::default()
            },
        ))
        .id();

    // Мишени
    let dummies: Vec<Entity> = (0..3)
        .map(|i| {
            app.world_mut()
                .spawn((
                    Transform::from_translation(Vec3::new(i as f32 * 2.0, 0.0, 1.5)),
                    Damageable::default(),
                    Stats::new().with(StatId::Health, 50.0),
                ))
                .id()
        })
        .collect();

    let mut dealt_cursor = app
        .world()
        .resource::<Events<DamageDealt>>()
        .get_cursor();

    // 15 ударов по мишеням по кругу
    for tick in 0..15 {
        let target = dummies[tick % dummies.len()];
        app.world_mut().send_event(DamagerOverlap {
            damager: sword,
            target,
        });
        app.world_mut().run_schedule(FixedUpdate);

        let events = app.world().resource::<Events<DamageDealt>>();
        for dealt in dealt_cursor.read(events) {
            println!(
                "Tick {tick}: damager {} hit {:?} for {}{}",
                dealt.damager_id,
                dealt.target,
                dealt.modifier.value,
                if dealt.critical { " (CRIT!)" } else { "" }
            );
        }
    }

    // Итог
    for (i, dummy) in dummies.iter().enumerate() {
        let health = app
            .world()
            .get::<Stats>(*dummy)
            .map(|stats| stats.value(StatId::Health))
            .unwrap_or(0.0);
        let dead = app.world().get::<Dead>(*dummy).is_some();
        println!("Dummy {i}: {health} HP{}", if dead { " [DEAD]" } else { "" });
    }

    println!("Demo complete!");
}
