use crate::config::Settings;

/// What eating a fruit is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardPolicy {
    reward: u32,
    reward_plus: u32,
    reward_time: Option<f64>,
}

impl RewardPolicy {
    pub fn new(reward: u32, reward_plus: u32, reward_time: Option<f64>) -> Self {
        RewardPolicy { reward, reward_plus, reward_time }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        RewardPolicy::new(settings.reward, settings.reward_plus, settings.reward_time)
    }

    pub fn payoff(&self, accelerating: bool) -> u32 {
        if accelerating {
            self.reward_plus
        } else {
            self.reward
        }
    }

    /// Seconds added to the countdown, if any.
    pub fn time_bonus(&self) -> Option<f64> {
        self.reward_time.filter(|&t| t > 0.0)
    }
}
