/*
 * Physics Module
 *
 * This module seeds the flock and advances it by one frame.
 *
 * A frame reads every boid from the current buffer and writes its result
 * into a separate next buffer, so each boid's forces depend only on the
 * previous frame and never on the order boids are processed in. After the
 * pass the buffers are swapped.
 *
 * Speed is renormalized, not capped: every boid with a nonzero steering
 * vector ends the frame moving at exactly max_speed.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::boid::Boid;
use crate::debug::DebugProbe;
use crate::neighbors::find_neighbors_into;
use crate::params::SimulationParams;
use crate::torus::wrap_point;

// Scatter `count` boids uniformly over the world with random velocities
pub fn spawn_boids<R: Rng>(rng: &mut R, count: usize, width: f32, height: f32, initial_speed: f32) -> Vec<Boid> {
    let mut boids = Vec::with_capacity(count);
    for _ in 0..count {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        let (vx, vy) = if initial_speed > 0.0 {
            (
                rng.gen_range(-initial_speed..initial_speed),
                rng.gen_range(-initial_speed..initial_speed),
            )
        } else {
            (0.0, 0.0)
        };
        boids.push(Boid::new(x, y, vx, vy));
    }
    boids
}

// Rescale to exactly max_speed; a zero vector stays zero
#[inline]
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > 0.0 {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

/// Per-frame inputs shared by every boid.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub dt: f32,
    pub elapsed: f64,
    pub stimulus: Option<Point2>,
}

/// Compute the next state of every boid in `current` into `next`, and
/// refresh the neighbor lists of `probes`. `current` is never written.
pub fn update_boids(
    current: &[Boid],
    next: &mut Vec<Boid>,
    probes: &mut [DebugProbe],
    params: &SimulationParams,
    frame: FrameInput,
) {
    next.clear();
    next.reserve(current.len());

    let mut neighbors = Vec::new();
    for (i, boid) in current.iter().enumerate() {
        find_neighbors_into(i, current, params, &mut neighbors);

        for probe in probes.iter_mut().filter(|p| p.agent_index == i) {
            probe.neighbor_indices.clone_from(&neighbors);
        }

        let steering = boid.steer(i, current, &neighbors, frame.stimulus, frame.elapsed, params);
        let velocity = clamp_speed(steering, params.max_speed);
        let position = wrap_point(boid.position + velocity * frame.dt, params.world_width, params.world_height);

        next.push(Boid { position, velocity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() <= epsilon
    }

    #[test]
    fn spawned_boids_are_inside_the_world() {
        let mut rng = StdRng::seed_from_u64(7);
        let boids = spawn_boids(&mut rng, 500, 320.0, 240.0, 100.0);
        assert_eq!(boids.len(), 500);
        for b in &boids {
            assert!((0.0..320.0).contains(&b.position.x));
            assert!((0.0..240.0).contains(&b.position.y));
            assert!((-100.0..100.0).contains(&b.velocity.x));
            assert!((-100.0..100.0).contains(&b.velocity.y));
        }
    }

    #[test]
    fn zero_initial_speed_spawns_still_boids() {
        let mut rng = StdRng::seed_from_u64(7);
        let boids = spawn_boids(&mut rng, 10, 100.0, 100.0, 0.0);
        assert!(boids.iter().all(|b| b.velocity == Vec2::ZERO));
    }

    #[test]
    fn clamp_renormalizes_both_up_and_down() {
        assert!(approx_eq(clamp_speed(vec2(0.3, 0.4), 200.0).length(), 200.0, 1e-3));
        assert!(approx_eq(clamp_speed(vec2(3000.0, -4000.0), 200.0).length(), 200.0, 1e-3));
        assert_eq!(clamp_speed(Vec2::ZERO, 200.0), Vec2::ZERO);
    }

    #[test]
    fn update_reads_only_the_previous_frame() {
        // the random term depends on index, so leave it out when reordering
        let mut params = SimulationParams::default().with_world_size(400.0, 400.0);
        params.random_weight = 0.0;
        let frame = FrameInput { dt: 0.1, elapsed: 2.0, stimulus: None };
        let boids = vec![
            Boid::new(100.0, 100.0, 10.0, 0.0),
            Boid::new(120.0, 110.0, -5.0, 5.0),
            Boid::new(90.0, 130.0, 0.0, -20.0),
        ];
        let reversed: Vec<Boid> = boids.iter().rev().copied().collect();

        let mut next = Vec::new();
        update_boids(&boids, &mut next, &mut [], &params, frame);
        let mut next_reversed = Vec::new();
        update_boids(&reversed, &mut next_reversed, &mut [], &params, frame);

        for (a, b) in next.iter().zip(next_reversed.iter().rev()) {
            assert!(approx_eq(a.position.x, b.position.x, 1e-3));
            assert!(approx_eq(a.position.y, b.position.y, 1e-3));
            assert!(approx_eq(a.velocity.x, b.velocity.x, 1e-3));
            assert!(approx_eq(a.velocity.y, b.velocity.y, 1e-3));
        }
    }

    #[test]
    fn probes_record_neighbors() {
        let params = SimulationParams::default().with_world_size(200.0, 200.0);
        let boids = vec![
            Boid::new(10.0, 100.0, 0.0, 0.0),
            Boid::new(190.0, 100.0, 0.0, 0.0),
            Boid::new(100.0, 10.0, 0.0, 0.0),
        ];
        let mut probes = vec![DebugProbe::new(0), DebugProbe::new(2)];
        let mut next = Vec::new();
        let frame = FrameInput { dt: 0.0, elapsed: 0.0, stimulus: None };
        update_boids(&boids, &mut next, &mut probes, &params, frame);
        assert_eq!(probes[0].neighbor_indices, vec![1]);
        assert!(probes[1].neighbor_indices.is_empty());
    }

    #[test]
    fn positions_wrap_after_integration() {
        let mut params = SimulationParams::default().with_world_size(100.0, 100.0);
        params.max_speed = 50.0;
        params.random_weight = 0.0;
        params.damping = 1.0;
        let boids = vec![Boid::new(99.0, 1.0, 10.0, -10.0)];
        let mut next = Vec::new();
        let frame = FrameInput { dt: 0.1, elapsed: 0.0, stimulus: None };
        update_boids(&boids, &mut next, &mut [], &params, frame);
        let b = next[0];
        // velocity (10,-10) rescaled to 50 => ~(35.36, -35.36); 0.1s later crosses both edges
        assert!(approx_eq(b.position.x, 2.5355, 1e-3));
        assert!(approx_eq(b.position.y, 97.4645, 1e-3));
        assert!(approx_eq(b.speed(), 50.0, 1e-3));
    }
}
