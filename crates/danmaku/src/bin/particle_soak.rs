//! # Particle Soak Test
//!
//! Headless stress run of the frame driver: several emitters firing radial
//! bursts every frame into fixed-capacity pools, pushed past saturation so
//! the drop path is exercised too.
//!
//! No window, no GPU. Batches go to a sink that only counts bytes.
//!
//! Usage: `particle_soak [frames] [config.toml]`

use std::process::ExitCode;

use danmaku::core::{Color4B, RectI, Vector2F};
use danmaku::rendering::{
    BlendMode, DrawBatch, ExtraSlot, Particle, PoolConfig, RetirePolicy, SolidTexture,
    TextureHandle,
};
use danmaku::{DriverConfig, DriverResult, EmitterId, FrameDriver};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Frames to simulate when none are given.
const DEFAULT_FRAMES: u64 = 600;

/// One emitter in the soak scene.
struct Burst {
    id: EmitterId,
    origin: Vector2F,
    per_frame: u32,
    speed: f32,
}

fn build_scene(driver: &mut FrameDriver, atlas: &TextureHandle) -> DriverResult<Vec<Burst>> {
    let sparks = driver.create_emitter(
        &PoolConfig {
            capacity: 20_000,
            blend: BlendMode::MulAdd,
            retire: RetirePolicy::MaxAgeOrTransparent { frames: 90 },
            ..PoolConfig::default()
        },
        TextureHandle::clone(atlas),
    )?;
    let smoke = driver.create_emitter(
        &PoolConfig {
            capacity: 8_000,
            blend: BlendMode::MulAlpha,
            retire: RetirePolicy::ExtraLifetime { slot: ExtraSlot::First },
            ..PoolConfig::default()
        },
        TextureHandle::clone(atlas),
    )?;
    let flashes = driver.create_default_emitter(TextureHandle::clone(atlas))?;

    Ok(vec![
        Burst {
            id: sparks,
            origin: Vector2F::new(0.0, 120.0),
            per_frame: 300,
            speed: 4.0,
        },
        Burst {
            id: smoke,
            origin: Vector2F::new(-96.0, 0.0),
            per_frame: 120,
            speed: 0.75,
        },
        Burst {
            id: flashes,
            origin: Vector2F::new(96.0, 0.0),
            per_frame: 40,
            speed: 2.0,
        },
    ])
}

fn spawn_burst(driver: &mut FrameDriver, burst: &Burst, rng: &mut ChaCha8Rng) {
    for _ in 0..burst.per_frame {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let (sin, cos) = angle.sin_cos();
        let particle = Particle::new(burst.origin, RectI::new(0, 0, 16, 16))
            .with_velocity(Vector2F::new(cos, sin) * burst.speed)
            .with_acceleration(Vector2F::new(0.0, -0.02))
            .with_spin(angle, rng.gen_range(-0.1..0.1))
            .with_color(Color4B::new(255, rng.gen(), 64, 255));

        match driver.spawn(burst.id, particle) {
            Some(stored) => stored.extra1 = rng.gen_range(30.0..120.0),
            // Pool full: drop the rest of this burst.
            None => break,
        }
    }
}

fn run(frames: u64, config: DriverConfig) -> DriverResult<()> {
    let mut driver = FrameDriver::new(config)?;
    let atlas = SolidTexture::new("soak_atlas", 256, 256).into_handle();
    let scene = build_scene(&mut driver, &atlas)?;
    let mut rng = ChaCha8Rng::seed_from_u64(0x00DA_AA4A);

    let mut uploaded_bytes = 0usize;
    let mut sink = |batch: &DrawBatch<'_>| {
        uploaded_bytes += batch.vertex_bytes().len() + batch.index_bytes().len();
    };

    for _ in 0..frames {
        for burst in &scene {
            spawn_burst(&mut driver, burst, &mut rng);
        }
        // Script-side fade for the default pool, which never retires itself.
        if let Some(pool) = driver.emitter_mut(scene[2].id) {
            pool.apply(|p| {
                p.color.a = p.color.a.saturating_sub(8);
                !p.color.is_transparent()
            });
        }
        driver.frame(&mut sink);
    }

    let stats = driver.stats();
    println!("=== PARTICLE SOAK ===");
    println!("frames:            {}", stats.frames_recorded);
    println!("emitters:          {}", driver.emitter_count());
    println!("peak alive:        {}", stats.peak_alive);
    println!("dropped spawns:    {}", stats.dropped_total);
    println!("avg draw calls:    {:.2}", stats.avg_draw_calls());
    println!("avg frame:         {}us", stats.avg_frame_us());
    println!(
        "min / max frame:   {}us / {}us",
        stats.min_frame_us, stats.max_frame_us
    );
    println!("over budget:       {}", stats.frames_over_budget);
    #[allow(clippy::cast_precision_loss)]
    let uploaded_mib = uploaded_bytes as f64 / (1024.0 * 1024.0);
    println!("uploaded:          {uploaded_mib:.1} MiB");

    for burst in &scene {
        driver.release_emitter(burst.id)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let frames = match args.next().map(|s| s.parse::<u64>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("invalid frame count: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match args.next() {
        None => DriverConfig {
            enable_timing_logs: true,
            ..DriverConfig::default()
        },
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(source) => match DriverConfig::from_toml_str(&source) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{path}: {e}");
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(frames, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("soak failed: {e}");
            ExitCode::FAILURE
        }
    }
}
