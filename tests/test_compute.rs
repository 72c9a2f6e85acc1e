mod common;

use common::{make_state, quiet_state, seeded_dice, ScriptedDice, DT};
use glam::Vec2;
use sky_siege::compute::*;
use sky_siege::entities::*;

fn idle() -> FrameInput {
    FrameInput::default()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_defaults() {
    let s = make_state();
    assert_eq!(s.player.pos, Vec2::new(400.0, 550.0));
    assert_eq!(s.player.health, 3);
    assert_eq!(s.player.max_health, 3);
    assert_eq!(s.player.fire_rate, 0.5);
    assert_eq!(s.player.attack_range, 50.0);
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.upgrades.is_empty());
    assert!(s.notifications.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!s.boss_active);
}

// ── player movement ───────────────────────────────────────────────────────────

#[test]
fn tick_moves_player_left() {
    let s = quiet_state();
    let input = FrameInput { left: true, right: false };
    let s2 = tick(&s, &input, DT, &mut seeded_dice());
    assert!((s2.player.pos.x - (400.0 - PLAYER_SPEED * DT)).abs() < 1e-3);
}

#[test]
fn tick_moves_player_right() {
    let s = quiet_state();
    let input = FrameInput { left: false, right: true };
    let s2 = tick(&s, &input, DT, &mut seeded_dice());
    assert!((s2.player.pos.x - (400.0 + PLAYER_SPEED * DT)).abs() < 1e-3);
}

#[test]
fn both_keys_cancel_out() {
    let s = quiet_state();
    let input = FrameInput { left: true, right: true };
    let s2 = tick(&s, &input, DT, &mut seeded_dice());
    assert!((s2.player.pos.x - 400.0).abs() < 1e-3);
}

#[test]
fn player_clamped_at_left_edge() {
    let mut s = quiet_state();
    s.player.pos.x = 1.0;
    let s2 = tick(&s, &FrameInput { left: true, right: false }, DT, &mut seeded_dice());
    assert_eq!(s2.player.pos.x, 0.0);
}

#[test]
fn player_clamped_at_right_edge() {
    let mut s = quiet_state();
    s.player.pos.x = 749.0;
    let s2 = tick(&s, &FrameInput { left: false, right: true }, DT, &mut seeded_dice());
    assert_eq!(s2.player.pos.x, 800.0 - PLAYER_WIDTH);
}

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let _ = tick(&s, &FrameInput { left: true, right: false }, DT, &mut seeded_dice());
    assert_eq!(s.player.pos.x, 400.0);
    assert!(s.bullets.is_empty());
    assert_eq!(s.frame, 0);
}

// ── player fire ───────────────────────────────────────────────────────────────

#[test]
fn first_tick_fires_from_top_centre() {
    let mut s = make_state();
    s.enemy_spawn_timer = -1.0e6;
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());

    assert_eq!(s2.bullets.len(), 1);
    let b = &s2.bullets[0];
    assert_eq!(b.owner, BulletOwner::Player);
    assert_eq!(b.damage, 1);
    assert_eq!(b.pos.x, 425.0);
    // spawned at y=550, then moved once by the bullet pass
    assert!((b.pos.y - (550.0 + PLAYER_BULLET_SPEED * DT)).abs() < 1e-3);
    assert_eq!(s2.player.fire_cooldown, PLAYER_FIRE_RATE);
    assert!(s2.cues.contains(&SoundCue::Laser));
}

#[test]
fn no_second_shot_before_cooldown() {
    let mut s = make_state();
    s.enemy_spawn_timer = -1.0e6;
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    let s3 = tick(&s2, &idle(), DT, &mut seeded_dice());
    assert_eq!(s3.bullets.len(), 1);
    assert!(!s3.cues.contains(&SoundCue::Laser));
}

#[test]
fn fires_again_after_fire_rate_elapses() {
    let mut s = make_state();
    s.enemy_spawn_timer = -1.0e6;
    let mut dice = seeded_dice();
    // 0.5 s at 60 FPS is 30 frames; allow one frame of float slack
    let mut shots = 0;
    for _ in 0..32 {
        s = tick(&s, &idle(), DT, &mut dice);
        shots += s.cues.iter().filter(|c| **c == SoundCue::Laser).count();
    }
    assert_eq!(shots, 2);
}

// ── bullets ───────────────────────────────────────────────────────────────────

#[test]
fn player_bullet_removed_past_top() {
    let mut s = quiet_state();
    s.bullets.push(player_bullet(Vec2::new(100.0, 2.0)));
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert!(s2.bullets.is_empty());
}

#[test]
fn enemy_bullet_removed_past_bottom() {
    let mut s = quiet_state();
    s.bullets.push(enemy_bullet(Vec2::new(100.0, 599.0), 1));
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert!(s2.bullets.is_empty());
}

#[test]
fn bullets_inside_viewport_survive() {
    let mut s = quiet_state();
    s.bullets.push(player_bullet(Vec2::new(100.0, 300.0)));
    s.bullets.push(enemy_bullet(Vec2::new(200.0, 300.0), 1));
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert_eq!(s2.bullets.len(), 2);
    assert!(s2.bullets[0].pos.y < 300.0);
    assert!(s2.bullets[1].pos.y > 300.0);
}

// ── upgrades & notifications ─────────────────────────────────────────────────

#[test]
fn upgrade_falls_and_counts_down() {
    let mut s = quiet_state();
    s.upgrades.push(new_upgrade(UpgradeKind::Health, Vec2::new(100.0, 100.0)));
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    let u = &s2.upgrades[0];
    assert!((u.pos.y - (100.0 + UPGRADE_FALL_SPEED * DT)).abs() < 1e-3);
    assert!((u.timer - (UPGRADE_LIFETIME - DT)).abs() < 1e-4);
}

#[test]
fn upgrade_expires_after_lifetime() {
    let mut s = quiet_state();
    s.upgrades.push(new_upgrade(UpgradeKind::Health, Vec2::new(100.0, 0.0)));
    s.upgrades[0].timer = DT / 2.0;
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert!(s2.upgrades.is_empty());
}

#[test]
fn notification_expires() {
    let mut s = quiet_state();
    notify(&mut s, "HELLO");
    s.notifications[0].remaining = DT / 2.0;
    notify(&mut s, "STILL HERE");
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert_eq!(s2.notifications.len(), 1);
    assert_eq!(s2.notifications[0].text, "STILL HERE");
}

// ── player upgrades ───────────────────────────────────────────────────────────

#[test]
fn health_upgrade_raises_max_and_current() {
    let mut p = new_player(800.0, 600.0);
    p.health = 1;
    apply_upgrade(&mut p, UpgradeKind::Health);
    assert_eq!(p.max_health, 4);
    assert_eq!(p.health, 2);
}

#[test]
fn fire_rate_upgrade_floors_at_minimum() {
    let mut p = new_player(800.0, 600.0);
    for _ in 0..10 {
        apply_upgrade(&mut p, UpgradeKind::FireRate);
    }
    assert_eq!(p.fire_rate, MIN_FIRE_RATE);
}

#[test]
fn attack_range_upgrade_adds_ten() {
    let mut p = new_player(800.0, 600.0);
    apply_upgrade(&mut p, UpgradeKind::AttackRange);
    apply_upgrade(&mut p, UpgradeKind::AttackRange);
    assert_eq!(p.attack_range, 70.0);
}

#[test]
fn reset_player_keeps_upgrades() {
    let mut p = new_player(800.0, 600.0);
    apply_upgrade(&mut p, UpgradeKind::Health);
    apply_upgrade(&mut p, UpgradeKind::FireRate);
    p.health = 1;
    p.pos.x = 12.0;
    p.fire_cooldown = 0.3;

    reset_player(&mut p, 800.0, 600.0);
    assert_eq!(p.pos, Vec2::new(400.0, 550.0));
    assert_eq!(p.health, 4);
    assert_eq!(p.fire_cooldown, 0.0);
    assert!((p.fire_rate - 0.4).abs() < 1e-6);
}

// ── scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn enemy_touching_player_top_deals_one_damage() {
    let mut s = quiet_state();
    // zero gap: enemy bottom edge sits exactly on the player's top edge
    let pos = Vec2::new(s.player.pos.x, s.player.pos.y - ENEMY_SIZE);
    s.enemies.push(new_enemy(EnemyKind::Simple, pos));

    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert_eq!(s2.player.health, 2);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].health, 1);
    assert!(s2.cues.contains(&SoundCue::Explosion));
}

#[test]
fn hard_enemy_dies_on_second_hit_and_scores_fifty() {
    let mut s = quiet_state();
    s.enemies.push(new_enemy(EnemyKind::Hard, Vec2::new(400.0, 100.0)));
    for i in 0..10 {
        s.bullets.push(player_bullet(Vec2::new(420.0, 200.0 + i as f32 * 30.0)));
    }

    let mut dice = ScriptedDice::new(&[]);
    let mut healths = Vec::new();
    for _ in 0..120 {
        s = tick(&s, &idle(), DT, &mut dice);
        match s.enemies.first() {
            Some(e) => healths.push(e.health),
            None => break,
        }
    }

    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 50);
    // exactly two bullets were spent on it
    assert_eq!(s.bullets.len(), 8);
    assert!(healths.contains(&1));
    assert_eq!(healths.last(), Some(&0));
    assert!(healths.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn dead_enemy_scored_exactly_once() {
    let mut s = quiet_state();
    let mut e = new_enemy(EnemyKind::Simple, Vec2::new(100.0, 100.0));
    e.health = 0;
    s.enemies.push(e);

    let mut dice = ScriptedDice::new(&[]);
    let s2 = tick(&s, &idle(), DT, &mut dice);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 10);

    let s3 = tick(&s2, &idle(), DT, &mut dice);
    assert_eq!(s3.score, 10);
}

// ── state machine ─────────────────────────────────────────────────────────────

#[test]
fn zero_health_switches_to_game_over_before_spawning() {
    let mut s = make_state();
    s.player.health = 0;
    s.enemy_spawn_timer = 1.99;
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert_eq!(s2.status, GameStatus::GameOver);
    assert!(s2.enemies.is_empty());
    assert!((s2.enemy_spawn_timer - 1.99).abs() < 1e-6);
}

#[test]
fn tick_is_frozen_during_game_over() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.bullets.push(player_bullet(Vec2::new(10.0, 300.0)));
    let s2 = tick(&s, &FrameInput { left: true, right: false }, DT, &mut seeded_dice());
    assert_eq!(s2.frame, s.frame);
    assert_eq!(s2.bullets, s.bullets);
    assert_eq!(s2.player, s.player);
}

#[test]
fn restart_clears_everything() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 1234;
    s.player.health = 0;
    s.player.pos.x = 3.0;
    s.enemies.push(new_enemy(EnemyKind::Boss, Vec2::new(10.0, 10.0)));
    s.bullets.push(enemy_bullet(Vec2::new(10.0, 10.0), 2));
    s.upgrades.push(new_upgrade(UpgradeKind::FireRate, Vec2::new(1.0, 1.0)));
    notify(&mut s, "BOSS INCOMING!");
    s.enemy_spawn_timer = 1.5;
    s.boss_spawn_timer = 30.0;
    s.bosses_defeated = 2;
    s.boss_active = true;

    let s2 = restart(&s);
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.enemies.is_empty());
    assert!(s2.bullets.is_empty());
    assert!(s2.upgrades.is_empty());
    assert!(s2.notifications.is_empty());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.player.health, PLAYER_MAX_HEALTH);
    assert_eq!(s2.player.pos, Vec2::new(400.0, 550.0));
    assert_eq!(s2.enemy_spawn_timer, 0.0);
    assert_eq!(s2.boss_spawn_timer, 0.0);
    assert_eq!(s2.bosses_defeated, 0);
    assert!(!s2.boss_active);
}

#[test]
fn restart_keeps_fire_rate_upgrades() {
    let mut s = make_state();
    apply_upgrade(&mut s.player, UpgradeKind::FireRate);
    s.status = GameStatus::GameOver;
    let s2 = restart(&s);
    assert!((s2.player.fire_rate - 0.4).abs() < 1e-6);
}

#[test]
fn frame_counter_advances() {
    let s = quiet_state();
    let s2 = tick(&s, &idle(), DT, &mut seeded_dice());
    assert_eq!(s2.frame, 1);
}
