/*
 * Boid Module
 *
 * This module defines the Boid struct and the steering rules that act on it.
 * Each rule returns an acceleration contribution measured on the torus:
 * 1. Separation: Push away from every neighbor, harder the closer it is
 * 2. Cohesion: Pull towards the local flock centre
 * 3. Alignment: Match the average heading of neighbors
 * 4. Stimulus: Pull towards an external point while it is within range
 * 5. Random: A time-varying wobble so a lone boid keeps moving
 *
 * All neighbor-based rules return zero when there are no neighbors.
 */

use nannou::prelude::*;

use crate::params::SimulationParams;
use crate::torus::{wrapped_delta, wrapped_delta_1d, wrapped_distance};
use crate::{ALIGNMENT_SCALE, STIMULUS_RADIUS};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
}

impl Boid {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            position: pt2(x, y),
            velocity: vec2(vx, vy),
        }
    }

    // Flat [x, y, vx, vy] form used in snapshots
    pub fn to_array(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.velocity.x, self.velocity.y]
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Inverse-distance push away from each neighbor, per axis.
    ///
    /// Each axis contributes `sign(d) * r / max(|d|, 1)` where `d` is the
    /// wrapped offset from the neighbor to this boid. The divisor is at least
    /// 1, so one axis never exceeds `r` and the `2r` clamp below never binds.
    /// Contributions are summed, not averaged, so a denser crowd pushes harder.
    pub fn separation(&self, boids: &[Boid], neighbor_indices: &[usize], params: &SimulationParams) -> Vec2 {
        let radius = params.neighbor_radius;
        let push = |d: f32| {
            let sign = if d < 0.0 { -1.0 } else { 1.0 };
            (radius / d.abs().max(1.0)).min(2.0 * radius) * sign
        };

        let mut steering = Vec2::ZERO;
        for &i in neighbor_indices {
            let other = &boids[i];
            let dx = wrapped_delta_1d(other.position.x, self.position.x, params.world_width);
            let dy = wrapped_delta_1d(other.position.y, self.position.y, params.world_height);
            steering.x += push(dx);
            steering.y += push(dy);
        }
        steering
    }

    // Mean wrapped offset towards the neighbors
    pub fn cohesion(&self, boids: &[Boid], neighbor_indices: &[usize], params: &SimulationParams) -> Vec2 {
        if neighbor_indices.is_empty() {
            return Vec2::ZERO;
        }

        let mut centre = Vec2::ZERO;
        for &i in neighbor_indices {
            centre += wrapped_delta(
                self.position,
                boids[i].position,
                params.world_width,
                params.world_height,
            );
        }
        centre / neighbor_indices.len() as f32
    }

    // Mean neighbor velocity, scaled down to stay subordinate to the other rules
    pub fn alignment(&self, boids: &[Boid], neighbor_indices: &[usize]) -> Vec2 {
        if neighbor_indices.is_empty() {
            return Vec2::ZERO;
        }

        let mut heading = Vec2::ZERO;
        for &i in neighbor_indices {
            heading += boids[i].velocity;
        }
        heading / (neighbor_indices.len() as f32 * ALIGNMENT_SCALE)
    }

    /// Wrapped offset towards `stimulus` while it is closer than
    /// [`STIMULUS_RADIUS`], zero otherwise. The cutoff is deliberately hard.
    pub fn stimulus(&self, stimulus: Option<Point2>, params: &SimulationParams) -> Vec2 {
        let Some(target) = stimulus else {
            return Vec2::ZERO;
        };

        let (w, h) = (params.world_width, params.world_height);
        if wrapped_distance(self.position, target, w, h) < STIMULUS_RADIUS {
            wrapped_delta(self.position, target, w, h)
        } else {
            Vec2::ZERO
        }
    }

    // Deterministic wobble; same index and elapsed time always give the same push
    pub fn random(index: usize, elapsed: f64) -> Vec2 {
        let phase = index as f64 + elapsed;
        vec2(phase.sin() as f32, phase.cos() as f32)
    }

    /// Weighted sum of every rule plus the damped previous velocity, before
    /// the speed clamp.
    pub fn steer(
        &self,
        index: usize,
        boids: &[Boid],
        neighbor_indices: &[usize],
        stimulus: Option<Point2>,
        elapsed: f64,
        params: &SimulationParams,
    ) -> Vec2 {
        let separation = self.separation(boids, neighbor_indices, params);
        let cohesion = self.cohesion(boids, neighbor_indices, params);
        let alignment = self.alignment(boids, neighbor_indices);
        let random = Boid::random(index, elapsed);
        let fear = self.stimulus(stimulus, params);

        separation * params.separation_weight
            + cohesion * params.cohesion_weight
            + alignment * params.alignment_weight
            + random * params.random_weight
            + fear * params.stimulus_weight
            + self.velocity * params.damping
    }
}
