/*
 * Neighbor Query Module
 *
 * Finds the boids within the neighbor radius of a given boid, measuring
 * distance on the torus. The scan is brute force: O(n) per query and
 * O(n^2) per frame. That is the scaling limit of the engine; there is no
 * spatial index.
 */

use crate::boid::Boid;
use crate::params::SimulationParams;
use crate::torus::wrapped_distance;

/// Indices of every other boid strictly closer than `neighbor_radius` to
/// `boids[index]`, in ascending order. The boid itself is excluded by index,
/// so a different boid sharing its exact position still counts.
pub fn find_neighbors(index: usize, boids: &[Boid], params: &SimulationParams) -> Vec<usize> {
    let mut result = Vec::new();
    find_neighbors_into(index, boids, params, &mut result);
    result
}

// Same as find_neighbors, reusing the caller's buffer
pub fn find_neighbors_into(index: usize, boids: &[Boid], params: &SimulationParams, result: &mut Vec<usize>) {
    result.clear();
    let Some(me) = boids.get(index) else {
        return;
    };

    for (i, other) in boids.iter().enumerate() {
        if i == index {
            continue;
        }
        let d = wrapped_distance(me.position, other.position, params.world_width, params.world_height);
        if d < params.neighbor_radius {
            result.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: f32, height: f32, radius: f32) -> SimulationParams {
        let mut params = SimulationParams::default().with_world_size(width, height);
        params.neighbor_radius = radius;
        params
    }

    #[test]
    fn wrapped_neighbors_are_found() {
        let boids = [Boid::new(10.0, 100.0, 0.0, 0.0), Boid::new(190.0, 100.0, 0.0, 0.0)];
        let params = params(200.0, 200.0, 50.0);
        assert_eq!(find_neighbors(0, &boids, &params), vec![1]);
        assert_eq!(find_neighbors(1, &boids, &params), vec![0]);
    }

    #[test]
    fn radius_is_strict() {
        let boids = [Boid::new(0.0, 0.0, 0.0, 0.0), Boid::new(50.0, 0.0, 0.0, 0.0)];
        let params = params(1000.0, 1000.0, 50.0);
        assert!(find_neighbors(0, &boids, &params).is_empty());
    }

    #[test]
    fn self_is_excluded_by_index_not_position() {
        let boids = [
            Boid::new(40.0, 40.0, 0.0, 0.0),
            Boid::new(40.0, 40.0, 1.0, 1.0),
            Boid::new(900.0, 900.0, 0.0, 0.0),
        ];
        let params = params(1000.0, 1000.0, 50.0);
        assert_eq!(find_neighbors(0, &boids, &params), vec![1]);
        assert_eq!(find_neighbors(1, &boids, &params), vec![0]);
        assert!(find_neighbors(2, &boids, &params).is_empty());
    }

    #[test]
    fn neighborhood_is_mutual() {
        let boids: Vec<Boid> = (0..40)
            .map(|i| {
                let f = i as f32;
                Boid::new((f * 37.0) % 300.0, (f * 53.0) % 200.0, 0.0, 0.0)
            })
            .collect();
        let params = params(300.0, 200.0, 45.0);
        for a in 0..boids.len() {
            for b in find_neighbors(a, &boids, &params) {
                assert!(find_neighbors(b, &boids, &params).contains(&a), "{b} sees {a} but not back");
            }
        }
    }

    #[test]
    fn out_of_range_index_yields_nothing() {
        let boids = [Boid::new(0.0, 0.0, 0.0, 0.0)];
        let params = params(100.0, 100.0, 50.0);
        assert!(find_neighbors(7, &boids, &params).is_empty());
    }
}
