use serde::{Deserialize, Serialize};

pub const SLOW_WPM: f64 = 130.0;
pub const MEDIUM_WPM: f64 = 150.0;
pub const FAST_WPM: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rate {
    Slow,
    Medium,
    Fast,
}

impl Rate {
    pub fn words_per_minute(self) -> f64 {
        match self {
            Self::Slow => SLOW_WPM,
            Self::Medium => MEDIUM_WPM,
            Self::Fast => FAST_WPM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    pub slow: f64,
    pub medium: f64,
    pub fast: f64,
}

impl DurationEstimate {
    pub fn from_word_count(word_count: usize) -> Self {
        Self {
            slow: minutes_at(word_count, SLOW_WPM),
            medium: minutes_at(word_count, MEDIUM_WPM),
            fast: minutes_at(word_count, FAST_WPM),
        }
    }

    pub fn for_rate(&self, rate: Rate) -> f64 {
        match rate {
            Rate::Slow => self.slow,
            Rate::Medium => self.medium,
            Rate::Fast => self.fast,
        }
    }
}

fn minutes_at(word_count: usize, words_per_minute: f64) -> f64 {
    round_one_decimal(word_count as f64 / words_per_minute)
}

/// Rounds on the exact binary value of `minutes`, so 27/180 (stored just
/// below 0.15) becomes 0.1.
fn round_one_decimal(minutes: f64) -> f64 {
    format!("{minutes:.1}").parse::<f64>().unwrap_or(minutes)
}
