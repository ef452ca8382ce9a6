use std::collections::VecDeque;
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use crate::simulation::errors::SimulationError;
use crate::simulation::random::RandomSource;
use crate::simulation::weighted::{ChatRole, RoleWeights};

pub const CHAT_HISTORY_LIMIT: usize = 30;
pub const NEW_FOLLOWER_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedMessage {
    pub username: String,
    pub text: String,
    pub role: ChatRole,
    pub timestamp: String,
}

/// What one chat tick produced.
///
/// The message and follower counters belong to the caller; the log only
/// reports how much they should move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTick {
    pub log: Vec<SimulatedMessage>,
    pub new_messages: usize,
    pub new_follower: bool,
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: VecDeque<SimulatedMessage>,
    capacity: usize,
    weights: RoleWeights,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(RoleWeights::default())
    }
}

impl ChatLog {
    pub fn new(weights: RoleWeights) -> Self {
        Self::with_capacity(weights, CHAT_HISTORY_LIMIT)
    }

    pub fn with_capacity(weights: RoleWeights, capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity + 2),
            capacity,
            weights,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> Vec<SimulatedMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        live: bool,
        templates: &[String],
        usernames: &[String],
        now: DateTime<Local>,
        rng: &mut R,
    ) -> Result<ChatTick, SimulationError> {
        if !live {
            return Ok(ChatTick::default());
        }
        if usernames.is_empty() {
            return Err(SimulationError::EmptyCandidatePool);
        }
        if templates.is_empty() {
            return Err(SimulationError::EmptyTemplateCatalog);
        }

        let timestamp = now.format("%H:%M:%S").to_string();
        let count = rng.range_inclusive(1, 2);
        for _ in 0..count {
            let username = usernames[rng.index(usernames.len())].clone();
            let role = self.weights.pick(rng);
            let text = templates[rng.index(templates.len())].clone();
            self.messages.push_back(SimulatedMessage {
                username,
                text,
                role,
                timestamp: timestamp.clone(),
            });
        }

        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }

        let new_follower = rng.chance(NEW_FOLLOWER_PROBABILITY);
        if new_follower {
            debug!("Simulated new follower");
        }

        Ok(ChatTick {
            log: self.messages(),
            new_messages: count,
            new_follower,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::simulation::random::RngSource;

    /// Replays fixed integer and float draws in order, cycling.
    struct Scripted {
        ints: Vec<usize>,
        units: Vec<f64>,
        next_int: usize,
        next_unit: usize,
    }

    impl Scripted {
        fn new(ints: Vec<usize>, units: Vec<f64>) -> Self {
            Self { ints, units, next_int: 0, next_unit: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
            let value = self.ints[self.next_int % self.ints.len()];
            self.next_int += 1;
            value.clamp(low, high)
        }

        fn unit(&mut self) -> f64 {
            let value = self.units[self.next_unit % self.units.len()];
            self.next_unit += 1;
            value
        }
    }

    fn names() -> Vec<String> {
        vec!["alpha".to_string(), "bravo".to_string(), "charlie".to_string()]
    }

    fn templates() -> Vec<String> {
        vec!["hi".to_string(), "GG!".to_string()]
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).earliest().unwrap()
    }

    #[test]
    fn offline_tick_is_empty_and_leaves_state_alone() {
        let mut log = ChatLog::default();
        let mut rng = RngSource::seeded(1);
        log.tick(true, &templates(), &names(), noon(), &mut rng).unwrap();
        let before = log.messages();

        for _ in 0..10 {
            let out = log.tick(false, &templates(), &names(), noon(), &mut rng).unwrap();
            assert_eq!(out, ChatTick::default());
        }
        assert_eq!(log.messages(), before);
    }

    #[test]
    fn builds_message_from_draws() {
        let mut log = ChatLog::default();
        // count=1, username index 2, template index 1; role draw 0.72 -> 72 -> subscriber
        let mut rng = Scripted::new(vec![1, 2, 1], vec![0.72, 0.5]);
        let out = log.tick(true, &templates(), &names(), noon(), &mut rng).unwrap();

        assert_eq!(out.new_messages, 1);
        assert!(!out.new_follower);
        assert_eq!(out.log, vec![SimulatedMessage {
            username: "charlie".to_string(),
            text: "GG!".to_string(),
            role: ChatRole::Subscriber,
            timestamp: "12:00:00".to_string(),
        }]);
    }

    #[test]
    fn reports_new_follower_on_low_draw() {
        let mut log = ChatLog::default();
        let mut rng = Scripted::new(vec![1, 0, 0], vec![0.1, 0.01]);
        let out = log.tick(true, &templates(), &names(), noon(), &mut rng).unwrap();
        assert!(out.new_follower);
    }

    #[test]
    fn log_is_capped_and_drops_oldest_first() {
        let mut log = ChatLog::default();
        let usernames: Vec<String> = (0..40).map(|i| format!("user{:02}", i)).collect();
        // two messages per tick, usernames walk forward so order is visible
        let ints = (0..20).flat_map(|k| [2, 2 * k, 0, 2 * k + 1, 0]).collect();
        let mut rng = Scripted::new(ints, vec![0.5]);

        let mut last = ChatTick::default();
        for _ in 0..20 {
            last = log.tick(true, &templates(), &usernames, noon(), &mut rng).unwrap();
            assert!(log.len() <= CHAT_HISTORY_LIMIT);
        }
        assert_eq!(last.log.len(), CHAT_HISTORY_LIMIT);
        assert_eq!(last.new_messages, 2);
        assert_eq!(last.log.last().map(|m| m.username.as_str()), Some("user39"));
        assert_eq!(last.log.first().map(|m| m.username.as_str()), Some("user10"));
    }

    #[test]
    fn length_settles_at_limit() {
        let mut log = ChatLog::default();
        let mut rng = RngSource::seeded(21);
        for _ in 0..CHAT_HISTORY_LIMIT {
            log.tick(true, &templates(), &names(), noon(), &mut rng).unwrap();
        }
        assert_eq!(log.len(), CHAT_HISTORY_LIMIT);
        log.tick(true, &templates(), &names(), noon(), &mut rng).unwrap();
        assert_eq!(log.len(), CHAT_HISTORY_LIMIT);
    }

    #[test]
    fn empty_inputs_are_rejected_while_live() {
        let mut log = ChatLog::default();
        let mut rng = RngSource::seeded(2);
        assert_eq!(
            log.tick(true, &[], &names(), noon(), &mut rng),
            Err(SimulationError::EmptyTemplateCatalog)
        );
        assert_eq!(
            log.tick(true, &templates(), &[], noon(), &mut rng),
            Err(SimulationError::EmptyCandidatePool)
        );
        assert!(log.is_empty());
    }
}
