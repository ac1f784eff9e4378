//! Run summaries built from per-step metrics.

use ionsim::StepMetrics;
use std::fmt;

/// Totals accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    /// Metrics of the most recent step.
    pub last: StepMetrics,
    pub peak_potential: f32,
    pub gate_transitions: usize,
    /// Particles that left the domain.
    pub escaped: usize,
    pub regulator_activations: usize,
    pub regulator_deactivations: usize,
}

impl RunSummary {
    pub fn record(&mut self, metrics: &StepMetrics) {
        self.steps += 1;
        self.last = *metrics;
        self.peak_potential = self.peak_potential.max(metrics.membrane_potential);
        self.gate_transitions += metrics.gate_transitions;
        self.escaped += metrics.escaped;
        self.regulator_activations += metrics.regulator_activations;
        self.regulator_deactivations += metrics.regulator_deactivations;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "steps:               {}", self.steps)?;
        writeln!(f, "active particles:    {}", self.last.active_count)?;
        writeln!(
            f,
            "membrane potential:  {} (peak {})",
            self.last.membrane_potential, self.peak_potential
        )?;
        writeln!(f, "open gates:          {}", self.last.open_gates)?;
        writeln!(f, "gate transitions:    {}", self.gate_transitions)?;
        writeln!(f, "left the domain:     {}", self.escaped)?;
        write!(
            f,
            "regulator activity:  +{} / -{}",
            self.regulator_activations, self.regulator_deactivations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut summary = RunSummary::default();
        summary.record(&StepMetrics {
            frame: 1,
            active_count: 10,
            membrane_potential: 3.0,
            open_gates: 1,
            gate_transitions: 1,
            regulator_activations: 1,
            ..Default::default()
        });
        summary.record(&StepMetrics {
            frame: 2,
            active_count: 9,
            membrane_potential: 2.0,
            open_gates: 0,
            gate_transitions: 1,
            escaped: 2,
            regulator_deactivations: 1,
            ..Default::default()
        });

        assert_eq!(summary.steps, 2);
        assert_eq!(summary.last.frame, 2);
        assert_eq!(summary.last.active_count, 9);
        assert_eq!(summary.peak_potential, 3.0);
        assert_eq!(summary.gate_transitions, 2);
        assert_eq!(summary.escaped, 2);
        assert_eq!(summary.regulator_activations, 1);
        assert_eq!(summary.regulator_deactivations, 1);
    }

    #[test]
    fn test_display_lists_totals() {
        let mut summary = RunSummary::default();
        summary.record(&StepMetrics {
            frame: 1,
            active_count: 4,
            ..Default::default()
        });
        let text = summary.to_string();
        assert!(text.contains("steps:               1"));
        assert!(text.contains("active particles:    4"));
    }
}
