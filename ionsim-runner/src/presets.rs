//! Built-in scenarios

use crate::config::{RegulatorConfig, ScenarioConfig, SpawnConfig};
use ionsim::{PhysicsConfig, Region};

pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: fn() -> ScenarioConfig,
}

fn domain() -> Region {
    Region::new(-10.0, 10.0, -10.0, 10.0)
}

fn lower_compartment() -> Region {
    Region::new(-10.0, 10.0, -10.0, -1.0)
}

fn upper_compartment() -> Region {
    Region::new(-10.0, 10.0, 1.0, 10.0)
}

/// Blockages spanning y = 0 everywhere except the given openings.
fn membrane_around(openings: &[(f32, f32)]) -> Vec<Region> {
    let mut walls = Vec::new();
    let mut x = -10.0;
    for &(left, right) in openings {
        if left > x {
            walls.push(Region::new(x, left, -0.5, 0.5));
        }
        x = right;
    }
    if x < 10.0 {
        walls.push(Region::new(x, 10.0, -0.5, 0.5));
    }
    walls
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Membrane",
        description: "One pump and one gate in a membrane, lower side held at 80 ions",
        config: ScenarioConfig::default,
    },
    Preset {
        name: "Free Gas",
        description: "Mutually repelling ions filling the box, no features",
        config: || ScenarioConfig {
            name: "Free Gas".into(),
            capacity: 100,
            boundary: domain(),
            spawn: vec![SpawnConfig {
                region: domain(),
                count: 100,
            }],
            blockages: Vec::new(),
            pumps: Vec::new(),
            gates: Vec::new(),
            regulators: Vec::new(),
            gates_open: false,
            physics: PhysicsConfig::default(),
            steps: 500,
            report_interval: 50,
        },
    },
    Preset {
        name: "Pump Gradient",
        description: "Two pumps drive ions upward through a sealed membrane",
        config: || ScenarioConfig {
            name: "Pump Gradient".into(),
            capacity: 150,
            boundary: domain(),
            spawn: vec![SpawnConfig {
                region: lower_compartment(),
                count: 100,
            }],
            blockages: membrane_around(&[(-6.0, -4.0), (4.0, 6.0)]),
            pumps: vec![
                Region::new(-6.0, -4.0, -0.5, 0.5),
                Region::new(4.0, 6.0, -0.5, 0.5),
            ],
            gates: Vec::new(),
            regulators: vec![RegulatorConfig {
                region: lower_compartment(),
                target: 100,
            }],
            gates_open: false,
            physics: PhysicsConfig::default(),
            steps: 2000,
            report_interval: 200,
        },
    },
    Preset {
        name: "Leaky Channels",
        description: "Gates start open and let ions fall back against a single pump",
        config: || ScenarioConfig {
            name: "Leaky Channels".into(),
            capacity: 150,
            boundary: domain(),
            spawn: vec![
                SpawnConfig {
                    region: lower_compartment(),
                    count: 60,
                },
                SpawnConfig {
                    region: upper_compartment(),
                    count: 60,
                },
            ],
            blockages: membrane_around(&[(-6.0, -4.0), (-1.0, 1.0), (4.0, 6.0)]),
            pumps: vec![Region::new(-1.0, 1.0, -0.5, 0.5)],
            gates: vec![
                Region::new(-6.0, -4.0, -0.5, 0.5),
                Region::new(4.0, 6.0, -0.5, 0.5),
            ],
            regulators: Vec::new(),
            gates_open: true,
            physics: PhysicsConfig::default(),
            steps: 2000,
            report_interval: 200,
        },
    },
    Preset {
        name: "Two Reservoirs",
        description: "Both compartments regulated, a gate and a pump between them",
        config: || ScenarioConfig {
            name: "Two Reservoirs".into(),
            capacity: 200,
            boundary: domain(),
            spawn: vec![
                SpawnConfig {
                    region: lower_compartment(),
                    count: 70,
                },
                SpawnConfig {
                    region: upper_compartment(),
                    count: 30,
                },
            ],
            blockages: membrane_around(&[(-3.0, -1.0), (1.0, 3.0)]),
            pumps: vec![Region::new(-3.0, -1.0, -0.5, 0.5)],
            gates: vec![Region::new(1.0, 3.0, -0.5, 0.5)],
            regulators: vec![
                RegulatorConfig {
                    region: lower_compartment(),
                    target: 70,
                },
                RegulatorConfig {
                    region: upper_compartment(),
                    target: 30,
                },
            ],
            gates_open: false,
            physics: PhysicsConfig::default().with_seed(2024),
            steps: 3000,
            report_interval: 300,
        },
    },
];

/// Look up a preset by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
