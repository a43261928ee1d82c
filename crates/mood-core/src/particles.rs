//! Per-emotion particle simulation over a fixed-size, recycled pool.
//!
//! `configure` is the only place the pool is (re)allocated. `step` moves every
//! particle, applies the kind's secondary motion and respawns in place any
//! particle that left its valid region.

use crate::color::Rgba;
use crate::constants::*;
use crate::preset::ParticleKind;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

const RAIN_COLOR: Rgba = Rgba::rgba(174, 194, 224, 0.5);
const FOG_COLOR: Rgba = Rgba::rgba(200, 220, 230, 0.08);
const BIRD_COLOR: Rgba = Rgba::hex(0x1a1a1a);
const FIREFLY_COLOR: Rgba = Rgba::rgba(255, 240, 100, 1.0);
const EMBER_RGB: (u8, u8, u8) = (255, 100, 50);
const ASH_RGB: (u8, u8, u8) = (60, 60, 60);

pub fn pool_size(kind: ParticleKind) -> usize {
    match kind {
        ParticleKind::None => 0,
        ParticleKind::Rain => RAIN_COUNT,
        ParticleKind::Ash => ASH_COUNT,
        ParticleKind::Fog => FOG_COUNT,
        ParticleKind::Birds => BIRD_COUNT,
        ParticleKind::Fireflies => FIREFLY_COUNT,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
    pub color: Rgba,
    /// Random phase so secondary motion desynchronizes across the pool.
    pub phase: f32,
    pub ember: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 0.0,
            life: 0.0,
            max_life: 0.0,
            alpha: 0.0,
            color: Rgba::TRANSPARENT,
            phase: 0.0,
            ember: false,
        }
    }
}

/// Draw command derived from a particle's current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    Streak { from: Vec2, to: Vec2, color: Rgba },
    Bird { at: Vec2, wing: f32, color: Rgba },
    Square { at: Vec2, size: f32, color: Rgba },
    Disc { at: Vec2, radius: f32, color: Rgba },
}

pub struct ParticleField {
    kind: ParticleKind,
    width: f32,
    height: f32,
    pool: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        Self {
            kind: ParticleKind::None,
            width: 0.0,
            height: 0.0,
            pool: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Discard the current pool and allocate a fresh one for `kind`.
    pub fn configure(&mut self, kind: ParticleKind, width: f32, height: f32) {
        self.kind = kind;
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let count = pool_size(kind);
        let mut pool = vec![Particle::default(); count];
        for p in &mut pool {
            spawn(p, kind, self.width, self.height, false, &mut self.rng);
        }
        self.pool = pool;
        log::debug!("[particles] {} x{} at {}x{}", kind.label(), count, width, height);
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Advance one frame. `t_ms` is the animation-frame timestamp.
    pub fn step(&mut self, t_ms: f64) {
        let t = t_ms as f32;
        let (w, h) = (self.width, self.height);
        let kind = self.kind;
        for p in &mut self.pool {
            p.pos += p.vel;
            match kind {
                ParticleKind::Ash => {
                    p.pos.x += (t * ASH_WOBBLE_RATE + p.phase).sin() * ASH_WOBBLE_AMPLITUDE;
                }
                ParticleKind::Birds => {
                    p.pos.y += (t * BIRD_BOB_RATE + p.phase).sin() * BIRD_BOB_AMPLITUDE;
                }
                _ => {}
            }

            let respawn = match kind {
                ParticleKind::Rain => p.pos.y > h,
                ParticleKind::Ash => p.pos.y < -20.0,
                ParticleKind::Birds => p.pos.x > w + 50.0,
                ParticleKind::Fog | ParticleKind::Fireflies => {
                    wrap_edges(&mut p.pos, w, h);
                    false
                }
                ParticleKind::None => false,
            };
            if respawn {
                spawn(p, kind, w, h, true, &mut self.rng);
            }
        }
    }

    /// Pure view of the pool at `t_ms`.
    pub fn sprites(&self, t_ms: f64) -> impl Iterator<Item = Sprite> + '_ {
        let t = t_ms as f32;
        let kind = self.kind;
        self.pool.iter().filter_map(move |p| match kind {
            ParticleKind::None => None,
            ParticleKind::Rain => Some(Sprite::Streak {
                from: p.pos,
                to: p.pos + p.vel * 1.5,
                color: p.color,
            }),
            ParticleKind::Birds => Some(Sprite::Bird {
                at: p.pos,
                wing: (t * BIRD_FLAP_RATE + p.phase).sin() * BIRD_FLAP_AMPLITUDE,
                color: p.color,
            }),
            ParticleKind::Ash => Some(Sprite::Square {
                at: p.pos,
                size: p.size,
                color: p.color,
            }),
            ParticleKind::Fireflies => {
                let glow = ((t * FIREFLY_PULSE_RATE + p.phase).sin() + 1.0) / 2.0;
                Some(Sprite::Disc {
                    at: p.pos,
                    radius: p.size,
                    color: p.color.with_alpha(0.3 + glow * 0.7),
                })
            }
            ParticleKind::Fog => Some(Sprite::Disc {
                at: p.pos,
                radius: p.size,
                color: p.color,
            }),
        })
    }
}

fn wrap_edges(pos: &mut Vec2, w: f32, h: f32) {
    let m = WRAP_MARGIN_PX;
    if pos.x < -m {
        pos.x = w + m;
    }
    if pos.x > w + m {
        pos.x = -m;
    }
    if pos.y < -m {
        pos.y = h + m;
    }
    if pos.y > h + m {
        pos.y = -m;
    }
}

/// (Re)initialize a particle in place for `kind`.
fn spawn(p: &mut Particle, kind: ParticleKind, w: f32, h: f32, respawn: bool, rng: &mut StdRng) {
    p.life = rng.gen::<f32>() * 100.0;
    p.max_life = 100.0 + rng.gen::<f32>() * 100.0;
    p.phase = rng.gen::<f32>() * TAU;
    p.alpha = rng.gen::<f32>();
    p.ember = false;

    if !respawn {
        p.pos = Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h);
    }

    match kind {
        ParticleKind::Rain => {
            if respawn {
                p.pos = Vec2::new(rng.gen::<f32>() * w, -30.0);
            }
            p.vel = Vec2::new(-0.5 - rng.gen::<f32>(), 20.0 + rng.gen::<f32>() * 10.0);
            p.size = 1.0 + rng.gen::<f32>();
            p.color = RAIN_COLOR;
        }
        ParticleKind::Fog => {
            if respawn {
                p.pos = Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h);
            }
            p.vel = Vec2::new(0.2 + rng.gen::<f32>() * 0.3, (rng.gen::<f32>() - 0.5) * 0.1);
            p.size = 100.0 + rng.gen::<f32>() * 150.0;
            p.color = FOG_COLOR;
        }
        ParticleKind::Birds => {
            let y = rng.gen::<f32>() * (h * BIRD_BAND);
            p.pos = if respawn { Vec2::new(-50.0, y) } else { Vec2::new(p.pos.x, y) };
            p.vel = Vec2::new(3.0 + rng.gen::<f32>() * 2.0, rng.gen::<f32>() - 0.5);
            p.size = 3.0 + rng.gen::<f32>() * 2.0;
            p.color = BIRD_COLOR;
        }
        ParticleKind::Ash => {
            if respawn {
                p.pos = Vec2::new(rng.gen::<f32>() * w, h + 10.0);
            }
            p.vel = Vec2::new((rng.gen::<f32>() - 0.5) * 2.0, -(1.0 + rng.gen::<f32>() * 2.0));
            p.size = 1.5 + rng.gen::<f32>() * 2.5;
            p.ember = rng.gen::<f32>() < EMBER_SHARE;
            let ((r, g, b), alpha) = if p.ember {
                (EMBER_RGB, 0.7 + rng.gen::<f32>() * 0.3)
            } else {
                (ASH_RGB, 0.5 + rng.gen::<f32>() * 0.3)
            };
            p.color = Rgba::rgba(r, g, b, alpha);
        }
        ParticleKind::Fireflies => {
            p.vel = Vec2::new((rng.gen::<f32>() - 0.5) * 0.6, (rng.gen::<f32>() - 0.5) * 0.6);
            p.size = 2.0 + rng.gen::<f32>() * 2.0;
            p.color = FIREFLY_COLOR;
        }
        ParticleKind::None => {}
    }
}
