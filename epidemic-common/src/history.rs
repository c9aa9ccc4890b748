use serde::{Deserialize, Serialize};

/// The recorded per-tick aggregate output of a simulation run: four
/// parallel series of population-percentage values, one sample appended
/// per tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub susceptible: Vec<f32>,
    pub infected: Vec<f32>,
    pub recovered: Vec<f32>,
    pub dead: Vec<f32>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample to each of the four series.
    pub fn push(&mut self, susceptible: f32, infected: f32, recovered: f32, dead: f32) {
        self.susceptible.push(susceptible);
        self.infected.push(infected);
        self.recovered.push(recovered);
        self.dead.push(dead);
    }

    /// Number of recorded ticks. The four series always have equal length.
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    /// The most recent `n` samples of every series (all samples if fewer
    /// than `n` have been recorded). Consumers that chart live typically
    /// keep only a bounded window.
    pub fn recent(&self, n: usize) -> History {
        let start = self.len().saturating_sub(n);
        History {
            susceptible: self.susceptible[start..].to_vec(),
            infected: self.infected[start..].to_vec(),
            recovered: self.recovered[start..].to_vec(),
            dead: self.dead[start..].to_vec(),
        }
    }
}
