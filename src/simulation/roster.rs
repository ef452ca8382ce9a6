use std::collections::{BTreeMap, HashSet};
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use crate::simulation::errors::SimulationError;
use crate::simulation::random::{shuffle, RandomSource};
use crate::utils::format_viewer_duration;

pub const MIN_PRESENT_VIEWERS: usize = 8;
pub const LEAVE_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSnapshot {
    pub username: String,
    pub duration: String,
}

/// Viewers currently watching, keyed by username.
///
/// Stored in a `BTreeMap` so snapshots come out sorted and eviction draws
/// are consumed in a stable order for seeded runs.
#[derive(Debug, Default, Clone)]
pub struct ViewerRoster {
    joined_at: BTreeMap<String, DateTime<Local>>,
}

impl ViewerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.joined_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joined_at.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.joined_at.contains_key(username)
    }

    pub fn joined_at(&self, username: &str) -> Option<DateTime<Local>> {
        self.joined_at.get(username).copied()
    }

    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        live: bool,
        candidates: &[String],
        now: DateTime<Local>,
        rng: &mut R,
    ) -> Result<Vec<ViewerSnapshot>, SimulationError> {
        if !live {
            return Ok(Vec::new());
        }
        if candidates.is_empty() {
            return Err(SimulationError::EmptyCandidatePool);
        }

        // repeated names count once
        let mut seen = HashSet::new();
        let mut shuffled: Vec<&str> = candidates
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect();

        let minimum = MIN_PRESENT_VIEWERS.min(shuffled.len());
        let target = rng.range_inclusive(minimum, shuffled.len());

        shuffle(&mut shuffled, rng);
        let present: HashSet<&str> = shuffled[..target].iter().copied().collect();

        for name in &present {
            if !self.joined_at.contains_key(*name) {
                debug!("Simulated viewer joined: {}", name);
                self.joined_at.insert((*name).to_string(), now);
            }
        }

        let absent: Vec<String> = self.joined_at
            .keys()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect();
        for name in absent {
            if rng.chance(LEAVE_PROBABILITY) {
                debug!("Simulated viewer left: {}", name);
                self.joined_at.remove(&name);
            }
        }

        Ok(self.snapshot(now))
    }

    pub fn snapshot(&self, now: DateTime<Local>) -> Vec<ViewerSnapshot> {
        self.joined_at
            .iter()
            .map(|(username, joined)| ViewerSnapshot {
                username: username.clone(),
                duration: format_viewer_duration(now.signed_duration_since(*joined)),
            })
            .collect()
    }
}
