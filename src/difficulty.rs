use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Drill tier. Ordering matters: moves between tiers are one step at a time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum DifficultyLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    /// Parse a level name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Like [`from_name`](Self::from_name), but unknown names become `Easy`.
    pub fn from_name_or_easy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!(name, "unknown difficulty, falling back to Easy");
            Self::Easy
        })
    }

    /// Seconds a competent answer is expected to take at this tier.
    pub fn expected_time(self) -> f64 {
        match self {
            Self::Easy => 7.0,
            Self::Medium => 15.0,
            Self::Hard => 40.0,
        }
    }

    /// One tier up, staying at `Hard`.
    pub fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium | Self::Hard => Self::Hard,
        }
    }

    /// One tier down, staying at `Easy`.
    pub fn easier(self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            Self::Medium | Self::Easy => Self::Easy,
        }
    }

    /// Cycle used by the setup screen selector.
    pub fn next_wrapping(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    pub fn prev_wrapping(self) -> Self {
        match self {
            Self::Easy => Self::Hard,
            Self::Medium => Self::Easy,
            Self::Hard => Self::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(DifficultyLevel::Easy < DifficultyLevel::Medium);
        assert!(DifficultyLevel::Medium < DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::default(), DifficultyLevel::Easy);
    }

    #[test]
    fn from_name_accepts_any_case() {
        assert_eq!(DifficultyLevel::from_name("Easy"), Some(DifficultyLevel::Easy));
        assert_eq!(DifficultyLevel::from_name("MEDIUM"), Some(DifficultyLevel::Medium));
        assert_eq!(DifficultyLevel::from_name(" hard "), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::from_name("Invalid"), None);
    }

    #[test]
    fn unknown_names_fall_back_to_easy() {
        assert_eq!(DifficultyLevel::from_name_or_easy("Invalid"), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_name_or_easy(""), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_name_or_easy("Hard"), DifficultyLevel::Hard);
    }

    #[test]
    fn steps_are_adjacent_and_saturating() {
        assert_eq!(DifficultyLevel::Easy.harder(), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::Medium.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Hard.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Hard.easier(), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::Medium.easier(), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::Easy.easier(), DifficultyLevel::Easy);
    }

    #[test]
    fn expected_times() {
        assert_eq!(DifficultyLevel::Easy.expected_time(), 7.0);
        assert_eq!(DifficultyLevel::Medium.expected_time(), 15.0);
        assert_eq!(DifficultyLevel::Hard.expected_time(), 40.0);
    }

    #[test]
    fn display_uses_variant_names() {
        assert_eq!(DifficultyLevel::Medium.to_string(), "Medium");
    }

    #[test]
    fn wrapping_cycle_visits_every_level() {
        let mut level = DifficultyLevel::Easy;
        for expected in [DifficultyLevel::Medium, DifficultyLevel::Hard, DifficultyLevel::Easy] {
            level = level.next_wrapping();
            assert_eq!(level, expected);
        }
        assert_eq!(DifficultyLevel::Easy.prev_wrapping(), DifficultyLevel::Hard);
    }
}
