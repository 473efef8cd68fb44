//! Damager pipeline integration tests
//!
//! Headless App: шлём overlap/collision события вручную и прогоняем
//! FixedUpdate schedule напрямую (никакой реальной физики — детекция
//! внешняя по отношению к пайплайну).
//!
//! Проверяем:
//! - Eligibility: owner exclusion, layer mask, sensor policy
//! - Critical rolls: chance 0 / chance 1, масштаб величины
//! - Capability no-ops: цель без Damageable/Interactable/rigid body
//! - Activation: флаг выключает детектор и весь пайплайн
//! - Death: EntityDied + Dead маркер

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, ColliderDisabled, CollisionEvent, CollisionGroups, ExternalImpulse, Group, RigidBody,
    Sensor, Velocity,
};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
use strikerun_damager::*;

/// Helper: headless app с damager пайплайном
fn setup_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(DamagerPlugin);
    app
}

/// Helper: spawn damager с конфигом
fn spawn_damager(app: &mut App, damager: Damager) -> Entity {
    app.world_mut().spawn((Transform::default(), damager)).id()
}

/// Helper: spawn мишень со 100 HP
fn spawn_dummy(app: &mut App, health: f32) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.5)),
            Damageable::default(),
            Stats::new().with(StatId::Health, health),
        ))
        .id()
}

/// Helper: один удар damager → target через pipeline
fn strike(app: &mut App, damager: Entity, target: Entity) {
    app.world_mut().send_event(DamagerOverlap { damager, target });
    app.world_mut().run_schedule(FixedUpdate);
}

fn health_of(app: &App, entity: Entity) -> f32 {
    app.world()
        .get::<Stats>(entity)
        .map(|stats| stats.value(StatId::Health))
        .unwrap_or(f32::NAN)
}

/// Helper: все накопленные события типа E
fn collected_events<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world().resource::<Events<E>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

#[test]
fn test_hit_applies_damage_and_notifies() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());
    let dummy = spawn_dummy(&mut app, 100.0);

    strike(&mut app, sword, dummy);

    // Дефолтный шаблон: −10 Health
    assert_eq!(health_of(&app, dummy), 90.0);

    let dealt = collected_events::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 1);
    assert_eq!(dealt[0].target, dummy);
    assert_eq!(dealt[0].damager_id, 1);
    assert!(!dealt[0].critical);
    assert!(dealt[0].allow_reaction);

    // On-hit notification несёт ссылку на цель
    let hits = collected_events::<DamagerHit>(&app);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, dummy);
    assert_eq!(hits[0].damager_id, 1);
}

#[test]
fn test_owner_subtree_excluded_regardless_of_layer() {
    let mut app = setup_app(42);

    let owner = app.world_mut().spawn(Transform::default()).id();
    let sword = spawn_damager(
        &mut app,
        Damager {
            owner: Some(owner),
            dont_hit_owner: true,
            hit_layer: Group::ALL, // слой не спасает — exclusion сильнее
            ..Default::default()
        },
    );

    // Мишень — ребенок владельца (щит в руке)
    let shield = spawn_dummy(&mut app, 100.0);
    app.world_mut().entity_mut(shield).insert(ChildOf(owner));

    strike(&mut app, sword, shield);
    assert_eq!(health_of(&app, shield), 100.0);
    assert!(collected_events::<DamageDealt>(&app).is_empty());

    // Сам владелец тоже в поддереве
    app.world_mut()
        .entity_mut(owner)
        .insert((Damageable::default(), Stats::new().with(StatId::Health, 100.0)));
    strike(&mut app, sword, owner);
    assert_eq!(health_of(&app, owner), 100.0);
}

#[test]
fn test_owner_hit_allowed_when_flag_off() {
    let mut app = setup_app(42);

    let owner = app.world_mut().spawn(Transform::default()).id();
    let sword = spawn_damager(
        &mut app,
        Damager {
            owner: Some(owner),
            dont_hit_owner: false,
            ..Default::default()
        },
    );
    let shield = spawn_dummy(&mut app, 100.0);
    app.world_mut().entity_mut(shield).insert(ChildOf(owner));

    strike(&mut app, sword, shield);
    assert_eq!(health_of(&app, shield), 90.0);
}

#[test]
fn test_layer_mask_filters_targets() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            hit_layer: Group::GROUP_3,
            ..Default::default()
        },
    );

    // Цель на чужом слое
    let civilian = spawn_dummy(&mut app, 100.0);
    app.world_mut()
        .entity_mut(civilian)
        .insert(CollisionGroups::new(Group::GROUP_2, Group::ALL));

    strike(&mut app, sword, civilian);
    assert_eq!(health_of(&app, civilian), 100.0);

    // Цель на нужном слое
    let enemy = spawn_dummy(&mut app, 100.0);
    app.world_mut()
        .entity_mut(enemy)
        .insert(CollisionGroups::new(Group::GROUP_3, Group::ALL));

    strike(&mut app, sword, enemy);
    assert_eq!(health_of(&app, enemy), 90.0);
}

#[test]
fn test_sensor_target_policy() {
    let mut app = setup_app(42);

    // Дефолтная политика Ignore: sensor не получает удар
    let sword = spawn_damager(&mut app, Damager::default());
    let trigger_zone = spawn_dummy(&mut app, 100.0);
    app.world_mut().entity_mut(trigger_zone).insert(Sensor);

    strike(&mut app, sword, trigger_zone);
    assert_eq!(health_of(&app, trigger_zone), 100.0);

    // Политика Collide: sensor валиден
    let piercer = spawn_damager(
        &mut app,
        Damager {
            trigger_interaction: TriggerInteraction::Collide,
            ..Default::default()
        },
    );
    strike(&mut app, piercer, trigger_zone);
    assert_eq!(health_of(&app, trigger_zone), 90.0);
}

#[test]
fn test_missing_damageable_is_silent_noop() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());

    // Цель вообще без capabilities
    let crate_prop = app.world_mut().spawn(Transform::default()).id();

    strike(&mut app, sword, crate_prop);

    assert!(collected_events::<DamageDealt>(&app).is_empty());
    assert!(collected_events::<DamagerHit>(&app).is_empty());
}

#[test]
fn test_forced_critical_scales_damage() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            critical_chance: 1.0, // всегда critical
            critical_multiplier: 2.0,
            ..Default::default()
        },
    );
    let dummy = spawn_dummy(&mut app, 100.0);

    strike(&mut app, sword, dummy);

    // {Health, Subtract, 10} × 2 = 20
    assert_eq!(health_of(&app, dummy), 80.0);

    let dealt = collected_events::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 1);
    assert!(dealt[0].critical);
    assert_eq!(dealt[0].modifier.value, 20.0);
    assert_eq!(dealt[0].modifier.id, StatId::Health);
    assert_eq!(dealt[0].modifier.op, StatOp::Subtract);
}

#[test]
fn test_chance_zero_never_critical() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default()); // chance = 0
    let dummy = spawn_dummy(&mut app, 1000.0);

    for _ in 0..20 {
        strike(&mut app, sword, dummy);
    }

    // 20 некритических ударов по 10
    assert_eq!(health_of(&app, dummy), 800.0);
    let dealt = collected_events::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 20);
    assert!(dealt.iter().all(|d| !d.critical));
    assert!(dealt.iter().all(|d| d.modifier.value == 10.0));
}

#[test]
fn test_damagee_multiplier_and_ignore_flag() {
    let mut app = setup_app(42);

    // Уязвимая цель: receiver multiplier 2.0
    let dummy = spawn_dummy(&mut app, 100.0);
    app.world_mut()
        .entity_mut(dummy)
        .insert(Damageable { multiplier: 2.0 });

    let sword = spawn_damager(&mut app, Damager::default());
    strike(&mut app, sword, dummy);
    assert_eq!(health_of(&app, dummy), 80.0); // 10 × 2.0

    // Damager игнорирует множитель получателя
    let piercing = spawn_damager(
        &mut app,
        Damager {
            ignore_damagee_multiplier: true,
            ..Default::default()
        },
    );
    strike(&mut app, piercing, dummy);
    assert_eq!(health_of(&app, dummy), 70.0); // raw 10
}

#[test]
fn test_interaction_one_shot() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager { index: 3, ..Default::default() });

    let lever = app
        .world_mut()
        .spawn((Transform::default(), Interactable::default()))
        .id();

    strike(&mut app, sword, lever);
    strike(&mut app, sword, lever);

    // Ровно одна активация, повторный удар — no-op
    let interactions = collected_events::<InteractionStarted>(&app);
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].target, lever);
    assert_eq!(interactions[0].source_id, 3);

    let interactable = app.world().get::<Interactable>(lever).unwrap();
    assert!(interactable.has_interacted);
    assert_eq!(interactable.last_source, Some(3));
}

#[test]
fn test_interact_flag_disables_interaction() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            interact: false,
            ..Default::default()
        },
    );
    let lever = app
        .world_mut()
        .spawn((Transform::default(), Interactable::default()))
        .id();

    strike(&mut app, sword, lever);

    assert!(collected_events::<InteractionStarted>(&app).is_empty());
    assert!(!app.world().get::<Interactable>(lever).unwrap().has_interacted);
}

#[test]
fn test_inactive_damager_disables_detector_and_pipeline() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            active: false,
            ..Default::default()
        },
    );
    let dummy = spawn_dummy(&mut app, 100.0);

    strike(&mut app, sword, dummy);

    // Детектор выключен, roster пуст, урона нет
    assert!(app.world().get::<ColliderDisabled>(sword).is_some());
    assert!(!app.world().resource::<DamagerRoster>().contains(&sword));
    assert_eq!(health_of(&app, dummy), 100.0);

    // Включаем обратно
    app.world_mut().get_mut::<Damager>(sword).unwrap().active = true;
    strike(&mut app, sword, dummy);

    assert!(app.world().get::<ColliderDisabled>(sword).is_none());
    assert!(app.world().resource::<DamagerRoster>().contains(&sword));
    assert_eq!(health_of(&app, dummy), 90.0);
}

#[test]
fn test_despawned_damager_leaves_roster() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());
    let dummy = spawn_dummy(&mut app, 100.0);

    strike(&mut app, sword, dummy);
    assert!(app.world().resource::<DamagerRoster>().contains(&sword));

    // Короткоживущий damager (projectile): деспавн без деактивации
    app.world_mut().entity_mut(sword).despawn();
    app.world_mut().run_schedule(FixedUpdate);

    // Roster не держит dangling entity
    assert!(!app.world().resource::<DamagerRoster>().contains(&sword));
    assert_eq!(app.world().resource::<DamagerRoster>().len(), 0);
}

#[test]
fn test_collision_event_feeds_pipeline() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());
    let dummy = spawn_dummy(&mut app, 100.0);

    // Сырое rapier событие вместо готового overlap
    app.world_mut().send_event(CollisionEvent::Started(
        sword,
        dummy,
        CollisionEventFlags::empty(),
    ));
    app.world_mut().run_schedule(FixedUpdate);

    assert_eq!(health_of(&app, dummy), 90.0);
}

#[test]
fn test_physics_impulse_applied_to_dynamic_body() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            force: 50.0,
            force_mode: ForceMode::Impulse,
            ..Default::default()
        },
    );

    let barrel = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            RigidBody::Dynamic,
            Collider::ball(0.5),
        ))
        .id();

    strike(&mut app, sword, barrel);

    let impulse = app.world().get::<ExternalImpulse>(barrel).unwrap();
    assert!(
        (impulse.impulse - Vec3::new(0.0, 0.0, 50.0)).length() < 1e-4,
        "impulse = {:?}",
        impulse.impulse
    );
}

#[test]
fn test_physics_velocity_change_mode() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            force: 10.0,
            force_mode: ForceMode::VelocityChange,
            ..Default::default()
        },
    );

    let barrel = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            RigidBody::Dynamic,
            Velocity::zero(),
        ))
        .id();

    strike(&mut app, sword, barrel);

    let velocity = app.world().get::<Velocity>(barrel).unwrap();
    assert!(
        (velocity.linvel - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4,
        "linvel = {:?}",
        velocity.linvel
    );
}

#[test]
fn test_zero_force_leaves_motion_untouched() {
    let mut app = setup_app(42);
    let sword = spawn_damager(
        &mut app,
        Damager {
            force: 0.0,
            force_mode: ForceMode::Impulse,
            ..Default::default()
        },
    );

    let barrel = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            RigidBody::Dynamic,
            Velocity::zero(),
        ))
        .id();

    strike(&mut app, sword, barrel);

    assert!(app.world().get::<ExternalImpulse>(barrel).is_none());
    let velocity = app.world().get::<Velocity>(barrel).unwrap();
    assert_eq!(velocity.linvel, Vec3::ZERO);
}

#[test]
fn test_no_rigid_body_is_silent_noop() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());
    let dummy = spawn_dummy(&mut app, 100.0); // без RigidBody

    strike(&mut app, sword, dummy);

    // Урон прошёл, физики нет — и никаких паник
    assert_eq!(health_of(&app, dummy), 90.0);
    assert!(app.world().get::<ExternalImpulse>(dummy).is_none());
}

#[test]
fn test_death_marks_entity_once() {
    let mut app = setup_app(42);
    let sword = spawn_damager(&mut app, Damager::default());
    let dummy = spawn_dummy(&mut app, 10.0); // умрёт с одного удара

    strike(&mut app, sword, dummy);

    assert_eq!(health_of(&app, dummy), 0.0);
    assert!(app.world().get::<Dead>(dummy).is_some());

    let deaths = collected_events::<EntityDied>(&app);
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].entity, dummy);
    assert_eq!(deaths[0].killer, Some(sword));

    // Добивание трупа не плодит вторую смерть
    strike(&mut app, sword, dummy);
    assert_eq!(collected_events::<EntityDied>(&app).len(), 1);
}
