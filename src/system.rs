//! The particle system: storage, features, and the per-frame step.

use crate::blockage::Blockage;
use crate::config::PhysicsConfig;
use crate::forces::pairwise_force;
use crate::gate::{Gate, GateState, GateThresholds};
use crate::metrics::{Observer, StepMetrics};
use crate::particles::Particles;
use crate::pump::{DipoleParams, Pump};
use crate::region::Region;
use crate::regulator::{ConcentrationRegulator, RegulatorAction};
use crate::rng::DeterministicRng;
use crate::Vec2;
use log::{debug, trace, warn};
use std::fmt;

/// Charged particles in a 2D box with pumps, gates, blockages and
/// concentration regulators.
///
/// Features are added once during setup and resolved in insertion order every
/// step. Call [`update`](Self::update) once per frame and read
/// [`positions`](Self::positions) for display.
///
/// # Step order
///
/// 1. Every gate re-senses its field and updates its state.
/// 2. Active particles lying outside the boundary are deactivated.
/// 3. Every regulator activates or deactivates at most one particle.
/// 4. Pairwise forces are computed for all active particles from the
///    positions as they stand now.
/// 5. Each active particle, in index order:
///    integrate position, add pairwise and pump forces, apply drag, bounce
///    off the boundary, then resolve pumps, gates and blockages.
///    A pump or gate collision ends that particle's step; otherwise it
///    bounces once more after the blockages.
///
/// # Containment
///
/// Bouncing clamps the position onto the boundary and points the velocity
/// inward, so a particle that is not relocated ends every step inside.
/// Pumps and gates that stick out of the boundary can relocate a particle
/// past it. Such a particle has left the domain and is deactivated at the
/// start of the next step, where a regulator may reuse its slot.
///
/// # Example
///
/// ```
/// use ionsim::{ParticleSystem, Region};
///
/// let mut system = ParticleSystem::new(200, Region::new(-10.0, 10.0, -10.0, 10.0));
/// system.add_pump(Region::new(-1.0, 1.0, -0.5, 0.5));
/// system.add_gate(Region::new(4.0, 6.0, -0.5, 0.5));
/// system.add_blockage(Region::new(-10.0, -1.0, -0.5, 0.5));
/// system.create_particles(100, Region::new(-10.0, 10.0, -10.0, -1.0));
///
/// for _ in 0..10 {
///     system.update();
/// }
/// assert_eq!(system.frame(), 10);
/// ```
pub struct ParticleSystem {
    particles: Particles,
    boundary: Region,
    blockages: Vec<Blockage>,
    pumps: Vec<Pump>,
    gates: Vec<Gate>,
    regulators: Vec<ConcentrationRegulator>,
    rng: DeterministicRng,
    config: PhysicsConfig,
    frame: u64,
    /// Pairwise force per slot for the current step.
    forces: Vec<Vec2>,
    observer: Option<Observer>,
}

impl ParticleSystem {
    /// `capacity` inactive slots inside `boundary`, default physics.
    pub fn new(capacity: usize, boundary: Region) -> Self {
        Self::with_config(capacity, boundary, PhysicsConfig::default())
    }

    pub fn with_config(capacity: usize, boundary: Region, config: PhysicsConfig) -> Self {
        debug!(
            "particle system: capacity {}, boundary {:?}, seed {}",
            capacity, boundary, config.seed
        );
        Self {
            particles: Particles::new(capacity, config.sentinel),
            boundary,
            blockages: Vec::new(),
            pumps: Vec::new(),
            gates: Vec::new(),
            regulators: Vec::new(),
            rng: DeterministicRng::new(config.seed),
            config,
            frame: 0,
            forces: vec![Vec2::ZERO; capacity],
            observer: None,
        }
    }

    // ========== Setup ==========

    pub fn add_blockage(&mut self, region: Region) {
        debug!("blockage #{} at {:?}", self.blockages.len(), region);
        self.blockages.push(Blockage::new(region));
    }

    pub fn add_pump(&mut self, region: Region) {
        debug!("pump #{} at {:?}", self.pumps.len(), region);
        self.pumps.push(Pump::new(region));
    }

    pub fn add_gate(&mut self, region: Region) {
        debug!("gate #{} at {:?}", self.gates.len(), region);
        self.gates.push(Gate::new(region));
    }

    pub fn add_concentration_regulator(&mut self, region: Region, target_count: usize) {
        debug!(
            "regulator #{} at {:?}, target {}",
            self.regulators.len(),
            region,
            target_count
        );
        self.regulators
            .push(ConcentrationRegulator::new(region, target_count));
    }

    /// Activate up to `count` free slots at random points in `spawn_region`
    /// with velocities drawn from `±initial_speed` on each axis.
    ///
    /// Returns how many particles were activated.
    pub fn create_particles(&mut self, count: usize, spawn_region: Region) -> usize {
        let speed = self.config.initial_speed;
        let mut created = 0;
        while created < count {
            let Some(index) = self.particles.first_inactive() else {
                warn!(
                    "create_particles: capacity {} reached after {} of {}",
                    self.particles.capacity(),
                    created,
                    count
                );
                break;
            };
            let position = spawn_region.sample(&mut self.rng);
            let velocity = Vec2::new(
                self.rng.uniform(-speed, speed),
                self.rng.uniform(-speed, speed),
            );
            self.particles.activate(index, position, velocity);
            created += 1;
        }
        debug!("spawned {} particles in {:?}", created, spawn_region);
        created
    }

    // ========== Control ==========

    /// Switch a particle on or off. Out-of-range indices are ignored.
    ///
    /// Deactivation parks the particle at the sentinel. Activating an inactive
    /// slot places it at a random point inside the boundary at rest;
    /// activating an already active particle changes nothing.
    pub fn set_particle_active(&mut self, index: usize, active: bool) {
        if index >= self.particles.capacity() {
            return;
        }
        if !active {
            self.particles.deactivate(index);
        } else if !self.particles.is_active(index) {
            let position = self.boundary.sample(&mut self.rng);
            self.particles.activate(index, position, Vec2::ZERO);
        }
    }

    /// Activate slot `index` with an explicit state. Out-of-range indices are
    /// ignored. A position outside the boundary is deactivated on the next
    /// [`update`](Self::update).
    pub fn place_particle(&mut self, index: usize, position: Vec2, velocity: Vec2) {
        self.particles.activate(index, position, velocity);
    }

    /// Open every gate now. Sensing on the next [`update`](Self::update) may
    /// close them again.
    pub fn force_open_gates(&mut self) {
        let opened = self
            .gates
            .iter_mut()
            .filter_map(|g| g.force_open())
            .count();
        debug!("force-opened {} gate(s)", opened);
    }

    /// Install a callback run with [`StepMetrics`] after every step.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&StepMetrics) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ========== Step ==========

    /// Advance the simulation by one step.
    pub fn update(&mut self) {
        let gate_transitions = self.sense_gates();
        let escaped = self.retire_escaped();
        let (activations, deactivations) = self.run_regulators();
        self.compute_pairwise_forces();
        self.integrate();
        self.frame += 1;

        if self.observer.is_some() {
            let metrics = StepMetrics {
                frame: self.frame,
                active_count: self.active_count(),
                membrane_potential: self.membrane_potential(),
                open_gates: self.open_gate_count(),
                gate_transitions,
                escaped,
                regulator_activations: activations,
                regulator_deactivations: deactivations,
            };
            if let Some(observer) = self.observer.as_mut() {
                observer(&metrics);
            }
        }
    }

    fn sense_gates(&mut self) -> usize {
        let thresholds = GateThresholds {
            open: self.config.gate_open_threshold,
            close: self.config.gate_close_threshold,
        };
        let min_separation = self.config.min_separation;
        let positions = self.particles.positions();
        let mut transitions = 0;
        for (i, gate) in self.gates.iter_mut().enumerate() {
            if let Some(t) = gate.update(positions, thresholds, min_separation) {
                debug!(
                    "frame {}: gate #{} {:?} (field.y = {:.3})",
                    self.frame,
                    i,
                    t,
                    gate.field().y
                );
                transitions += 1;
            }
        }
        transitions
    }

    /// Deactivate active particles found outside the boundary.
    fn retire_escaped(&mut self) -> usize {
        let mut escaped = 0;
        for i in 0..self.particles.capacity() {
            if !self.particles.is_active(i) {
                continue;
            }
            let position = self.particles.positions()[i];
            if !self.boundary.contains(position) {
                trace!("particle {} left the domain at {:?}", i, position);
                self.particles.deactivate(i);
                escaped += 1;
            }
        }
        escaped
    }

    fn run_regulators(&mut self) -> (usize, usize) {
        let mut activations = 0;
        let mut deactivations = 0;
        for (i, regulator) in self.regulators.iter().enumerate() {
            match regulator.regulate(&mut self.particles, &mut self.rng) {
                RegulatorAction::Activated(index) => {
                    trace!("regulator #{} activated particle {}", i, index);
                    activations += 1;
                }
                RegulatorAction::Deactivated(index) => {
                    trace!("regulator #{} deactivated particle {}", i, index);
                    deactivations += 1;
                }
                RegulatorAction::Saturated => {
                    trace!("regulator #{} below target with no free slot", i);
                }
                RegulatorAction::None => {}
            }
        }
        (activations, deactivations)
    }

    /// Phase A: pairwise forces from the current positions, written to
    /// `self.forces`. Nothing else is mutated, so every particle sees the
    /// same snapshot.
    fn compute_pairwise_forces(&mut self) {
        let positions = self.particles.positions();
        let active = self.particles.active();
        let charge = self.config.particle_charge;
        let limit = self.config.particle_force_limit;
        let min_separation = self.config.min_separation;

        let force_on = |i: usize| {
            if active[i] {
                pairwise_force(i, positions, active, charge, limit, min_separation)
            } else {
                Vec2::ZERO
            }
        };
        fill_forces(&mut self.forces, force_on);
    }

    /// Phase B: integrate and resolve every active particle in index order.
    fn integrate(&mut self) {
        let config = &self.config;
        let boundary = self.boundary;
        let dipole = DipoleParams {
            charge: config.pump_charge,
            force_limit: config.pump_force_limit,
            min_separation: config.min_separation,
        };

        for i in 0..self.particles.capacity() {
            if !self.particles.is_active(i) {
                continue;
            }
            let force = self.forces[i];
            let (pos, vel) = self.particles.state_mut(i);

            *pos += *vel;
            *vel += force;
            for pump in &self.pumps {
                *vel += pump.force(*pos, &dipole);
            }
            *vel -= *vel * config.drag;
            bounce(&boundary, pos, vel);

            if self
                .pumps
                .iter()
                .any(|pump| pump.collide(&mut *pos, &mut *vel, config.exit_offset, config.pump_damping))
            {
                continue;
            }
            if self
                .gates
                .iter()
                .any(|gate| gate.collide(&mut *pos, &mut *vel, config.exit_offset, config.gate_repulsion))
            {
                continue;
            }
            for blockage in &self.blockages {
                if let Some(dv) = blockage.resolve(*pos, config.blockage_stiffness) {
                    *vel += dv;
                }
            }
            bounce(&boundary, pos, vel);
        }
    }

    // ========== Queries ==========

    /// Active particles within `membrane_half_width` of the boundary's
    /// horizontal midline.
    pub fn membrane_potential(&self) -> f32 {
        let mid = self.boundary.mid_y();
        let half_width = self.config.membrane_half_width;
        self.particles
            .positions()
            .iter()
            .zip(self.particles.active())
            .filter(|&(&p, &a)| a && (p.y - mid).abs() <= half_width)
            .count() as f32
    }

    /// All slot positions; inactive slots sit at the sentinel.
    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        self.particles.positions()
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec2] {
        self.particles.velocities()
    }

    /// Positions as raw bytes (`2 * capacity` little-endian `f32`s) for
    /// direct upload to a vertex buffer.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.particles.positions())
    }

    /// Write positions as `x, y, 0.0` triples (`3 * capacity` floats) into
    /// `out`, replacing its contents.
    pub fn write_positions_xyz(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.particles.capacity() * 3);
        for p in self.particles.positions() {
            out.extend_from_slice(&[p.x, p.y, 0.0]);
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    pub fn active_count(&self) -> usize {
        self.particles.active_count()
    }

    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        self.particles.is_active(index)
    }

    /// Steps completed so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn boundary(&self) -> &Region {
        &self.boundary
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn blockages(&self) -> &[Blockage] {
        &self.blockages
    }

    pub fn pumps(&self) -> &[Pump] {
        &self.pumps
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn regulators(&self) -> &[ConcentrationRegulator] {
        &self.regulators
    }

    pub fn gate_states(&self) -> Vec<GateState> {
        self.gates.iter().map(Gate::state).collect()
    }

    pub fn open_gate_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_open()).count()
    }
}

/// Clamp `pos` onto `boundary` and turn each velocity component that would
/// carry the particle out on its next move back inward.
fn bounce(boundary: &Region, pos: &mut Vec2, vel: &mut Vec2) {
    pos.x = pos.x.clamp(boundary.left(), boundary.right());
    pos.y = pos.y.clamp(boundary.bottom(), boundary.top());

    let next = *pos + *vel;
    if next.x < boundary.left() {
        vel.x = vel.x.abs();
    } else if next.x > boundary.right() {
        vel.x = -vel.x.abs();
    }
    if next.y < boundary.bottom() {
        vel.y = vel.y.abs();
    } else if next.y > boundary.top() {
        vel.y = -vel.y.abs();
    }
}

#[cfg(feature = "parallel")]
fn fill_forces(forces: &mut [Vec2], force_on: impl Fn(usize) -> Vec2 + Sync) {
    use rayon::prelude::*;
    forces
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, f)| *f = force_on(i));
}

#[cfg(not(feature = "parallel"))]
fn fill_forces(forces: &mut [Vec2], force_on: impl Fn(usize) -> Vec2 + Sync) {
    for (i, f) in forces.iter_mut().enumerate() {
        *f = force_on(i);
    }
}

impl fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .field("boundary", &self.boundary)
            .field("blockages", &self.blockages.len())
            .field("pumps", &self.pumps.len())
            .field("gates", &self.gates.len())
            .field("regulators", &self.regulators.len())
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Region {
        Region::new(-10.0, 10.0, -10.0, 10.0)
    }

    #[test]
    fn test_new_system_is_empty() {
        let s = ParticleSystem::new(10, domain());
        assert_eq!(s.capacity(), 10);
        assert_eq!(s.active_count(), 0);
        assert_eq!(s.frame(), 0);
        assert!(s.positions().iter().all(|&p| p == s.config().sentinel));
    }

    #[test]
    fn test_create_particles_respects_capacity() {
        let mut s = ParticleSystem::new(5, domain());
        let spawn = Region::new(-2.0, 2.0, -2.0, 2.0);
        assert_eq!(s.create_particles(3, spawn), 3);
        assert_eq!(s.create_particles(3, spawn), 2);
        assert_eq!(s.active_count(), 5);
        for (p, v) in s.positions().iter().zip(s.velocities()) {
            assert!(spawn.contains(*p));
            assert!(v.x.abs() <= 0.1 && v.y.abs() <= 0.1);
        }
    }

    #[test]
    fn test_set_particle_active() {
        let mut s = ParticleSystem::new(3, domain());
        s.set_particle_active(1, true);
        assert!(s.is_active(1));
        assert!(domain().contains(s.positions()[1]));
        assert_eq!(s.velocities()[1], Vec2::ZERO);

        // re-activating an active particle keeps its state
        let before = s.positions()[1];
        s.set_particle_active(1, true);
        assert_eq!(s.positions()[1], before);

        s.set_particle_active(1, false);
        assert!(!s.is_active(1));
        assert_eq!(s.positions()[1], s.config().sentinel);

        s.set_particle_active(99, true);
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_free_particle_drifts_with_drag() {
        let mut s = ParticleSystem::new(1, domain());
        s.place_particle(0, Vec2::ZERO, Vec2::new(0.5, 0.0));
        s.update();
        assert_eq!(s.positions()[0], Vec2::new(0.5, 0.0));
        assert!((s.velocities()[0].x - 0.46).abs() < 1e-6);
    }

    #[test]
    fn test_overshoot_is_clamped_to_wall() {
        let mut s = ParticleSystem::new(1, domain());
        s.place_particle(0, Vec2::new(9.5, 0.0), Vec2::new(0.6, 0.0));
        s.update();
        assert_eq!(s.positions()[0].x, 10.0);
        assert!(s.velocities()[0].x < 0.0);
    }

    #[test]
    fn test_bounce_points_velocity_inward() {
        let boundary = domain();

        // outside the right wall and already heading back in: stays inward
        let mut pos = Vec2::new(10.5, 0.0);
        let mut vel = Vec2::new(-0.2, 0.0);
        bounce(&boundary, &mut pos, &mut vel);
        assert_eq!(pos, Vec2::new(10.0, 0.0));
        assert_eq!(vel, Vec2::new(-0.2, 0.0));

        // a second bounce never flips it back out
        bounce(&boundary, &mut pos, &mut vel);
        assert_eq!(vel, Vec2::new(-0.2, 0.0));

        // heading out through the bottom: turned upward
        let mut pos = Vec2::new(0.0, -9.95);
        let mut vel = Vec2::new(0.0, -0.1);
        bounce(&boundary, &mut pos, &mut vel);
        assert_eq!(pos, Vec2::new(0.0, -9.95));
        assert_eq!(vel, Vec2::new(0.0, 0.1));
    }

    #[test]
    fn test_blockage_at_wall_cannot_push_out() {
        let mut s = ParticleSystem::new(1, domain());
        s.add_blockage(Region::new(-10.0, 10.0, 5.0, 10.0));
        s.place_particle(0, Vec2::new(0.0, 9.9), Vec2::new(0.0, 0.05));
        s.update();
        // blockage kick of 0.05 * (9.95 - 7.5) would carry it past y = 10
        assert!(s.positions()[0].y <= 10.0);
        assert!(s.velocities()[0].y < 0.0);
    }

    #[test]
    fn test_escaped_particle_is_retired() {
        let mut s = ParticleSystem::new(2, domain());
        s.place_particle(0, Vec2::new(0.0, 12.0), Vec2::ZERO);
        s.place_particle(1, Vec2::new(0.0, 2.0), Vec2::ZERO);
        s.update();
        assert!(!s.is_active(0));
        assert_eq!(s.positions()[0], s.config().sentinel);
        assert!(s.is_active(1));
    }

    #[test]
    fn test_two_particles_repel() {
        let mut s = ParticleSystem::new(2, domain());
        s.place_particle(0, Vec2::new(-0.5, 0.0), Vec2::ZERO);
        s.place_particle(1, Vec2::new(0.5, 0.0), Vec2::ZERO);
        s.update();
        assert!(s.velocities()[0].x < 0.0);
        assert!(s.velocities()[1].x > 0.0);
        assert_eq!(s.velocities()[0].x, -s.velocities()[1].x);
    }

    #[test]
    fn test_membrane_potential_counts_strip() {
        let mut s = ParticleSystem::new(4, domain());
        s.place_particle(0, Vec2::new(0.0, 0.2), Vec2::ZERO);
        s.place_particle(1, Vec2::new(3.0, -0.5), Vec2::ZERO);
        s.place_particle(2, Vec2::new(0.0, 2.0), Vec2::ZERO);
        assert_eq!(s.membrane_potential(), 2.0);
        s.set_particle_active(0, false);
        assert_eq!(s.membrane_potential(), 1.0);
    }

    #[test]
    fn test_write_positions_xyz() {
        let mut s = ParticleSystem::new(2, domain());
        s.place_particle(1, Vec2::new(1.0, 2.0), Vec2::ZERO);
        let mut out = vec![9.0; 1];
        s.write_positions_xyz(&mut out);
        assert_eq!(out, vec![1000.0, 1000.0, 0.0, 1.0, 2.0, 0.0]);
        assert_eq!(s.position_bytes().len(), 2 * 2 * 4);
    }

    #[test]
    fn test_blockage_pushes_particle() {
        let mut s = ParticleSystem::new(1, domain());
        s.add_blockage(Region::new(-5.0, 5.0, -1.0, 1.0));
        s.place_particle(0, Vec2::new(0.0, 0.5), Vec2::ZERO);
        s.update();
        assert!((s.velocities()[0].y - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_open_gate_passes_particle_down() {
        let mut s = ParticleSystem::new(1, domain());
        s.add_gate(Region::new(-1.0, 1.0, -0.5, 0.5));
        // particle above the gate: field.y = -1 / 1.2^2 < -0.4, gate opens
        s.place_particle(0, Vec2::new(0.0, 1.2), Vec2::new(0.0, -1.0));
        s.update();
        assert_eq!(s.gate_states(), vec![GateState::Open]);
        assert!((s.positions()[0].y + 0.51).abs() < 1e-5);
    }

    #[test]
    fn test_force_pass_matches_direct_sum() {
        // holds with and without the `parallel` feature
        let mut s = ParticleSystem::new(40, domain());
        s.create_particles(32, Region::new(-9.0, 9.0, -9.0, 9.0));
        s.compute_pairwise_forces();

        let c = s.config().clone();
        for i in 0..s.capacity() {
            let expected = if s.is_active(i) {
                pairwise_force(
                    i,
                    s.positions(),
                    s.particles.active(),
                    c.particle_charge,
                    c.particle_force_limit,
                    c.min_separation,
                )
            } else {
                Vec2::ZERO
            };
            assert_eq!(s.forces[i], expected);
        }
    }

    #[test]
    fn test_observer_receives_metrics() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut s = ParticleSystem::new(4, domain());
        s.add_concentration_regulator(Region::new(-1.0, 1.0, -1.0, 1.0), 2);
        s.set_observer(move |m| sink.lock().unwrap().push(*m));
        s.update();
        s.update();
        s.update();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].frame, 1);
        assert_eq!(seen[0].regulator_activations, 1);
        assert_eq!(seen[1].active_count, 2);
        assert_eq!(seen[2].regulator_activations, 0);
        assert!(seen.iter().all(|m| m.escaped == 0));
    }
}
