use crate::config;
use macroquad::prelude::{Color, Vec2, draw_rectangle};
use rand::Rng;

const CONFETTI_COLORS: [Color; 6] = [
    Color::new(0.96, 0.26, 0.21, 1.0), // Red
    Color::new(1.00, 0.76, 0.03, 1.0), // Amber
    Color::new(0.30, 0.69, 0.31, 1.0), // Green
    Color::new(0.13, 0.59, 0.95, 1.0), // Blue
    Color::new(0.61, 0.15, 0.69, 1.0), // Purple
    Color::new(1.00, 0.60, 0.80, 1.0), // Pink
];

// Represents a single confetti piece
#[derive(Debug, Clone)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
    color: Color,
    size: f32,
    lifetime: f32, // Time remaining in seconds
    initial_lifetime: f32,
}

impl Particle {
    fn new(position: Vec2, velocity: Vec2, color: Color, size: f32, lifetime: f32) -> Self {
        Particle {
            position,
            velocity,
            color,
            size,
            lifetime,
            initial_lifetime: lifetime,
        }
    }

    fn update(&mut self, dt: f32, gravity: f32) {
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
        self.lifetime -= dt;

        // Fade out effect
        self.color.a = (self.lifetime / self.initial_lifetime).max(0.0);
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }
}

// Manages the confetti currently on screen
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    gravity: f32,
    rng: rand::rngs::ThreadRng,
}

impl ParticleSystem {
    pub fn new() -> Self {
        ParticleSystem {
            particles: Vec::new(),
            gravity: config::CONFETTI_GRAVITY,
            rng: rand::thread_rng(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Launch a cone of confetti upward from `origin`.
    ///
    /// `spread_degrees` is the full width of the cone, centred on straight up.
    pub fn spawn_confetti(&mut self, origin: Vec2, count: usize, spread_degrees: f32) {
        let up = -std::f32::consts::FRAC_PI_2;
        let spread = spread_degrees.to_radians();

        for _ in 0..count {
            let angle = up + (self.rng.r#gen::<f32>() - 0.5) * spread;
            let speed = config::CONFETTI_SPEED * (0.5 + self.rng.r#gen::<f32>() * 0.5);
            let velocity = Vec2::new(angle.cos() * speed, angle.sin() * speed);
            let color = CONFETTI_COLORS[self.rng.gen_range(0..CONFETTI_COLORS.len())];
            let size = 3.0 + self.rng.r#gen::<f32>() * 4.0;
            let lifetime = config::CONFETTI_LIFETIME * (0.6 + self.rng.r#gen::<f32>() * 0.4);

            self.particles
                .push(Particle::new(origin, velocity, color, size, lifetime));
        }
    }

    pub fn update(&mut self, dt: f32) {
        let gravity = self.gravity;
        self.particles.retain_mut(|p| {
            p.update(dt, gravity);
            p.is_alive()
        });
    }

    pub fn draw(&self) {
        for particle in &self.particles {
            let half = particle.size / 2.0;
            draw_rectangle(
                particle.position.x - half,
                particle.position.y - half,
                particle.size,
                particle.size,
                particle.color,
            );
        }
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
