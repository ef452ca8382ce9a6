use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::simulation::errors::SimulationError;
use crate::simulation::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Normal,
    Subscriber,
    Moderator,
    Donator,
}

impl Default for ChatRole {
    fn default() -> Self {
        ChatRole::Normal
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChatRole::Normal => write!(f, "normal"),
            ChatRole::Subscriber => write!(f, "subscriber"),
            ChatRole::Moderator => write!(f, "moderator"),
            ChatRole::Donator => write!(f, "donator"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(ChatRole::Normal),
            "subscriber" => Ok(ChatRole::Subscriber),
            "moderator" => Ok(ChatRole::Moderator),
            "donator" => Ok(ChatRole::Donator),
            _ => Err(()),
        }
    }
}

pub const DEFAULT_ROLE_WEIGHTS: [(ChatRole, u32); 4] = [
    (ChatRole::Normal, 70),
    (ChatRole::Subscriber, 15),
    (ChatRole::Moderator, 10),
    (ChatRole::Donator, 5),
];

/// Returns the first label whose running weight total reaches `draw`.
///
/// `draw` is expected in `[0, total)`. A draw past the last bucket yields
/// `None`; callers pick their own fallback.
pub fn select_weighted<T>(entries: &[(T, u32)], draw: f64) -> Option<&T> {
    let mut accumulated = 0u64;
    for (label, weight) in entries {
        accumulated += u64::from(*weight);
        if accumulated as f64 >= draw {
            return Some(label);
        }
    }
    None
}

/// Weighted role table used by the chat simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleWeights {
    entries: Vec<(ChatRole, u32)>,
}

impl RoleWeights {
    pub fn new(entries: Vec<(ChatRole, u32)>) -> Result<Self, SimulationError> {
        let total: u64 = entries.iter().map(|(_, weight)| u64::from(*weight)).sum();
        if entries.is_empty() || total != 100 {
            return Err(SimulationError::InvalidWeights(total));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(ChatRole, u32)] {
        &self.entries
    }

    pub fn role_for_draw(&self, draw: f64) -> ChatRole {
        select_weighted(&self.entries, draw).copied().unwrap_or_default()
    }

    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> ChatRole {
        self.role_for_draw(rng.percent())
    }
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self { entries: DEFAULT_ROLE_WEIGHTS.to_vec() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_inside_first_bucket_is_normal() {
        let weights = RoleWeights::default();
        assert_eq!(weights.role_for_draw(69.0), ChatRole::Normal);
        assert_eq!(weights.role_for_draw(0.0), ChatRole::Normal);
    }

    #[test]
    fn bucket_boundaries_are_inclusive() {
        let weights = RoleWeights::default();
        assert_eq!(weights.role_for_draw(70.0), ChatRole::Normal);
        assert_eq!(weights.role_for_draw(70.5), ChatRole::Subscriber);
        assert_eq!(weights.role_for_draw(85.0), ChatRole::Subscriber);
        assert_eq!(weights.role_for_draw(90.0), ChatRole::Moderator);
        assert_eq!(weights.role_for_draw(99.9), ChatRole::Donator);
    }

    #[test]
    fn draw_past_every_bucket_falls_back_to_normal() {
        let weights = RoleWeights::default();
        assert_eq!(weights.role_for_draw(100.5), ChatRole::Normal);
        assert_eq!(select_weighted(&DEFAULT_ROLE_WEIGHTS, 100.5), None);
    }

    #[test]
    fn weights_must_sum_to_one_hundred() {
        let err = RoleWeights::new(vec![(ChatRole::Normal, 60), (ChatRole::Donator, 5)]).unwrap_err();
        assert_eq!(err, SimulationError::InvalidWeights(65));
        assert!(RoleWeights::new(Vec::new()).is_err());
        assert!(RoleWeights::new(vec![(ChatRole::Moderator, 100)]).is_ok());
    }

    #[test]
    fn oversized_weights_are_rejected_not_wrapped() {
        let err = RoleWeights::new(vec![(ChatRole::Normal, u32::MAX), (ChatRole::Donator, 101)]).unwrap_err();
        assert_eq!(err, SimulationError::InvalidWeights(u64::from(u32::MAX) + 101));

        let huge = [(ChatRole::Normal, u32::MAX), (ChatRole::Donator, u32::MAX)];
        assert_eq!(select_weighted(&huge, 1e12), None);
        assert_eq!(select_weighted(&huge, 5e9), Some(&ChatRole::Donator));
    }

    #[test]
    fn role_names_parse_back() {
        for (role, _) in DEFAULT_ROLE_WEIGHTS {
            assert_eq!(role.to_string().parse::<ChatRole>(), Ok(role));
        }
        assert!("vip".parse::<ChatRole>().is_err());
    }
}
