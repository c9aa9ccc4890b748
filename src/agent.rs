use epidemic_common::{angle_to_vec, vec_to_angle, SimParams, Vec2};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Epidemic state of a single agent. Transitions run one way:
/// Susceptible -> Infected -> Recovered or Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Susceptible => "susceptible",
            Status::Infected => "infected",
            Status::Recovered => "recovered",
            Status::Dead => "dead",
        }
    }
}

/// A single mobile agent on the plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    pub status: Status,
    /// Remaining time in the Infected state. Meaningful only while
    /// `status == Infected`; set when the agent is infected and never
    /// touched again after resolution.
    pub recovery_countdown: f32,
}

impl Agent {
    pub fn new(position: Vec2, status: Status, recovery_countdown: f32) -> Self {
        Self {
            position,
            status,
            recovery_countdown,
        }
    }

    /// Transition to Infected with a freshly sampled countdown.
    pub fn infect(&mut self, countdown: f32) {
        self.status = Status::Infected;
        self.recovery_countdown = countdown;
    }

    /// Per-tick update of an Infected agent: age the countdown and, once it
    /// crosses zero, resolve the outcome with a single Bernoulli trial.
    /// Success means Recovered, failure means Dead. Must only be called
    /// while `status == Infected`.
    pub fn update_infection(&mut self, params: &SimParams, rng: &mut StdRng) {
        self.recovery_countdown -= params.dt;
        if self.recovery_countdown <= 0.0 {
            self.status = if rng.random::<f32>() < params.recovery_probability {
                Status::Recovered
            } else {
                Status::Dead
            };
        }
    }

    /// One movement step. `nearest_infected` carries the position and
    /// distance of the closest Infected agent (engine-supplied, and only for
    /// Susceptible agents); when that agent is strictly inside the avoidance
    /// radius the heading points directly away from it and no random draw
    /// happens, otherwise the heading is uniform over [0, 2pi). Never called
    /// for Dead agents.
    pub fn advance(
        &mut self,
        nearest_infected: Option<(Vec2, f32)>,
        params: &SimParams,
        rng: &mut StdRng,
    ) {
        let heading = match nearest_infected {
            Some((pos, dist)) if dist < params.avoidance_radius => {
                vec_to_angle(self.position.sub(pos))
            }
            _ => rng.random_range(0.0..TAU),
        };
        let next = self.position.add(angle_to_vec(heading).scale(params.step_length));
        self.position = correct_bounds(next, params);
    }
}

/// Boundary correction for the playable rectangle: clamp one unit inside the
/// margin/edges, then wrap modulo the full world dimensions. This two-step
/// rule is deliberate and not a physical reflection; it keeps agents out of
/// the reserved left-hand chart strip.
pub(crate) fn correct_bounds(mut p: Vec2, params: &SimParams) -> Vec2 {
    if p.x < params.margin_width {
        p.x = params.margin_width + 1.0;
    }
    if p.x > params.world_width {
        p.x = params.world_width - 1.0;
    }
    if p.y < 0.0 {
        p.y = 1.0;
    }
    if p.y > params.world_height {
        p.y = params.world_height - 1.0;
    }
    Vec2::new(
        p.x.rem_euclid(params.world_width),
        p.y.rem_euclid(params.world_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use epidemic_common::SimulationConfig;
    use rand::SeedableRng;

    fn params() -> SimParams {
        SimulationConfig::default().sim_params()
    }

    #[test]
    fn bounds_clamp_then_wrap() {
        let p = params();
        // Left of the chart margin: pushed one unit inside it.
        let v = correct_bounds(Vec2::new(599.0, 500.0), &p);
        assert_eq!(v, Vec2::new(601.0, 500.0));
        // Past the right edge: pulled one unit back in.
        let v = correct_bounds(Vec2::new(1930.0, 500.0), &p);
        assert_eq!(v, Vec2::new(1919.0, 500.0));
        // Vertical clamps.
        let v = correct_bounds(Vec2::new(700.0, -5.0), &p);
        assert_eq!(v, Vec2::new(700.0, 1.0));
        let v = correct_bounds(Vec2::new(700.0, 1085.0), &p);
        assert_eq!(v, Vec2::new(700.0, 1079.0));
        // In-bounds positions pass through untouched.
        let v = correct_bounds(Vec2::new(800.0, 400.0), &p);
        assert_eq!(v, Vec2::new(800.0, 400.0));
    }

    #[test]
    fn avoidance_moves_directly_away() {
        let p = params();
        let mut rng = StdRng::seed_from_u64(1);
        // Strictly inside the avoidance radius (10.0): distance 9.
        let threat = Vec2::new(1009.0, 500.0);
        let mut agent = Agent::new(Vec2::new(1000.0, 500.0), Status::Susceptible, p.recovery_time);

        let before = agent.position.distance(threat);
        agent.advance(Some((threat, before)), &p, &mut rng);

        // Fled straight along -x by one step length.
        assert!((agent.position.x - (1000.0 - p.step_length)).abs() < 1e-3);
        assert!((agent.position.y - 500.0).abs() < 1e-3);
        assert!(agent.position.distance(threat) > before);
    }

    #[test]
    fn distant_threat_falls_back_to_random_walk() {
        let p = params();
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);
        let start = Vec2::new(1000.0, 500.0);
        let threat = Vec2::new(1500.0, 500.0);

        let mut with_threat = Agent::new(start, Status::Susceptible, p.recovery_time);
        let mut without = Agent::new(start, Status::Susceptible, p.recovery_time);

        // Beyond the avoidance radius the threat is ignored: same draw, same step.
        with_threat.advance(Some((threat, start.distance(threat))), &p, &mut rng_a);
        without.advance(None, &p, &mut rng_b);
        assert_eq!(with_threat.position, without.position);

        // The comparison is strict: a threat at exactly the avoidance radius
        // still falls back to the random walk.
        let boundary_threat = Vec2::new(with_threat.position.x + p.avoidance_radius, with_threat.position.y);
        with_threat.advance(
            Some((boundary_threat, p.avoidance_radius)),
            &p,
            &mut rng_a,
        );
        without.advance(None, &p, &mut rng_b);
        assert_eq!(with_threat.position, without.position);
    }

    #[test]
    fn random_walk_stays_in_bounds() {
        let p = params();
        let mut rng = StdRng::seed_from_u64(3);
        let mut agent = Agent::new(Vec2::new(601.0, 1.0), Status::Recovered, 0.0);
        for _ in 0..1000 {
            agent.advance(None, &p, &mut rng);
            assert!(agent.position.x >= 0.0 && agent.position.x < p.world_width);
            assert!(agent.position.y >= 0.0 && agent.position.y < p.world_height);
        }
    }

    #[test]
    fn resolution_is_a_single_trial() {
        let mut p = params();
        p.recovery_probability = 1.0;
        let mut rng = StdRng::seed_from_u64(5);
        let mut agent = Agent::new(Vec2::new(700.0, 700.0), Status::Infected, 2.0 * p.dt);

        agent.update_infection(&p, &mut rng);
        assert_eq!(agent.status, Status::Infected);
        agent.update_infection(&p, &mut rng);
        assert_eq!(agent.status, Status::Recovered);

        let mut p = params();
        p.recovery_probability = 0.0;
        let mut agent = Agent::new(Vec2::new(700.0, 700.0), Status::Infected, p.dt);
        agent.update_infection(&p, &mut rng);
        assert_eq!(agent.status, Status::Dead);
    }
}
