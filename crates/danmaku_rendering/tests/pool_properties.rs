//! # Particle Pool Verification Tests
//!
//! Checks the pool's container guarantees and frame-loop scenarios end to
//! end through the public API.
//!
//! Run with: cargo test -p danmaku_rendering --test pool_properties

use danmaku_core::{Color4B, ParticleList, RectI, Vector2F};
use danmaku_rendering::{
    BatchRecorder, BlendMode, Particle, PoolConfig, RetirePolicy, SolidTexture,
    TexParticlePool2D, TextureHandle,
};

fn atlas() -> TextureHandle {
    SolidTexture::new("effect_atlas", 512, 512).into_handle()
}

fn bullet(tag: f32) -> Particle {
    let mut p = Particle::new(Vector2F::ZERO, RectI::new(0, 0, 16, 16));
    p.extra1 = tag;
    p
}

// ============================================================================
// CONTAINER PROPERTIES
// ============================================================================

#[test]
fn verify_size_tracks_successful_inserts() {
    for capacity in [1usize, 2, 7, 64] {
        let mut list: ParticleList<u32> = ParticleList::new(capacity);
        for i in 0..capacity {
            assert!(list.insert(u32::try_from(i).unwrap()).is_some());
            assert_eq!(list.len(), i + 1);
        }
        assert!(list.insert(999).is_none());
        assert_eq!(list.len(), capacity);
    }
}

#[test]
fn verify_keep_all_visits_each_exactly_once() {
    let mut list: ParticleList<(u32, u32)> = ParticleList::new(128);
    for id in 0..100 {
        list.insert((id, 0));
    }

    list.retain(|(_, visits)| {
        *visits += 1;
        true
    });

    assert_eq!(list.len(), 100);
    assert!(list.iter().all(|&(_, visits)| visits == 1));
}

#[test]
fn verify_targeted_removal_is_exact() {
    let mut list: ParticleList<(u32, u32)> = ParticleList::new(64);
    for id in 0..50 {
        list.insert((id, 0));
    }

    let removed = list.retain(|(id, visits)| {
        *visits += 1;
        *id % 7 != 3
    });

    let expected: Vec<u32> = (0..50).filter(|id| id % 7 != 3).collect();
    let survivors: Vec<u32> = list.iter().map(|&(id, _)| id).collect();
    assert_eq!(removed, 50 - expected.len());
    assert_eq!(survivors, expected);
    assert!(list.iter().all(|&(_, visits)| visits == 1));
}

#[test]
fn verify_clear_restores_capacity() {
    let mut pool = TexParticlePool2D::new(3, atlas(), BlendMode::MulAlpha).unwrap();
    for i in 0..3u8 {
        pool.add_particle(bullet(f32::from(i)));
    }
    assert!(pool.add_particle(bullet(9.0)).is_none());

    pool.clear();
    assert_eq!(pool.len(), 0);
    assert!(pool.add_particle(bullet(10.0)).is_some());
    assert_eq!(pool.len(), 1);
}

#[test]
fn verify_update_on_empty_pool_is_noop() {
    let mut pool = TexParticlePool2D::new(8, atlas(), BlendMode::MulAdd).unwrap();
    pool.set_retire_policy(RetirePolicy::MaxAge { frames: 0 });
    for _ in 0..3 {
        pool.update();
    }
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.stats().retired, 0);
}

// ============================================================================
// FRAME-LOOP SCENARIOS
// ============================================================================

#[test]
fn verify_capacity_three_lifecycle() {
    let mut pool = TexParticlePool2D::with_config(
        &PoolConfig {
            capacity: 3,
            retire: RetirePolicy::MaxAge { frames: 2 },
            ..PoolConfig::default()
        },
        atlas(),
    )
    .unwrap();

    assert!(pool.add_particle(bullet(1.0)).is_some()); // A
    assert!(pool.add_particle(bullet(2.0)).is_some()); // B
    assert!(pool.add_particle(bullet(3.0)).is_some()); // C
    assert!(pool.add_particle(bullet(4.0)).is_none()); // D
    assert_eq!(pool.len(), 3);
    assert!(pool.particles().iter().all(|p| p.extra1 < 4.0));

    pool.update();
    pool.update();
    assert_eq!(pool.len(), 3);
    pool.update();
    assert_eq!(pool.len(), 0);
}

#[test]
fn verify_velocity_integrates_exactly() {
    let mut pool = TexParticlePool2D::new(10, atlas(), BlendMode::MulAlpha).unwrap();
    let starts = [
        Vector2F::new(0.0, 0.0),
        Vector2F::new(-12.5, 3.0),
        Vector2F::new(100.0, -40.0),
        Vector2F::new(7.25, 7.25),
        Vector2F::new(-1.0, 240.0),
    ];
    for start in starts {
        let mut p = bullet(0.0).with_velocity(Vector2F::new(1.0, 0.0));
        p.pos = start;
        pool.add_particle(p);
    }

    pool.update();

    for (p, start) in pool.particles().iter().zip(starts) {
        assert_eq!(p.pos.x, start.x + 1.0);
        assert_eq!(p.pos.y, start.y);
        assert_eq!(p.timer, 1);
    }
}

#[test]
fn verify_fade_out_through_apply() {
    let mut pool = TexParticlePool2D::with_config(
        &PoolConfig {
            capacity: 32,
            retire: RetirePolicy::Transparent,
            ..PoolConfig::default()
        },
        atlas(),
    )
    .unwrap();
    for _ in 0..4 {
        pool.add_particle(bullet(0.0).with_color(Color4B::WHITE.with_alpha(60)));
    }

    let mut frames = 0;
    while !pool.is_empty() {
        // script-side fade: 20 alpha per frame
        pool.apply(|p| {
            p.color.a = p.color.a.saturating_sub(20);
            true
        });
        pool.update();
        frames += 1;
        assert!(frames <= 3, "particles should be gone after 3 frames");
    }
    assert_eq!(frames, 3);
}

#[test]
fn verify_large_pool_splits_at_batch_limit() {
    let mut pool = TexParticlePool2D::with_config(
        &PoolConfig {
            capacity: 10_000,
            blend: BlendMode::MulAdd,
            max_quads_per_batch: 4096,
            ..PoolConfig::default()
        },
        atlas(),
    )
    .unwrap();
    for i in 0..10_000u16 {
        pool.add_particle(bullet(f32::from(i)));
    }

    let mut recorder = BatchRecorder::new();
    pool.update();
    pool.render(&mut recorder);

    let sizes: Vec<usize> = recorder.batches().iter().map(|b| b.quad_count()).collect();
    assert_eq!(sizes, vec![4096, 4096, 1808]);
    assert!(recorder
        .batches()
        .iter()
        .all(|b| b.blend == BlendMode::MulAdd && pool.uses_texture(&b.texture)));
    assert_eq!(pool.stats().draw_calls, 3);
    assert_eq!(pool.stats().quads, 10_000);
}

#[test]
fn verify_pools_share_one_texture() {
    let texture = atlas();
    let a = TexParticlePool2D::new(4, TextureHandle::clone(&texture), BlendMode::MulAlpha).unwrap();
    let b = TexParticlePool2D::new(4, TextureHandle::clone(&texture), BlendMode::MulAdd).unwrap();
    assert_eq!(std::sync::Arc::strong_count(&texture), 3);

    drop(a);
    assert_eq!(std::sync::Arc::strong_count(&texture), 2);
    assert!(b.uses_texture(&texture));
}
