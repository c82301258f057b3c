//! Biometric inputs, derived plans and the persisted profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Biological sex used by the BMR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Storage identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Button label offered to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Мужской",
            Self::Female => "Женский",
        }
    }
}

/// What the user wants the plan to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    WeightGain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::Maintenance, Goal::WeightGain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::Maintenance => "maintenance",
            Self::WeightGain => "weight_gain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WeightLoss => "Похудение",
            Self::Maintenance => "Поддержание веса",
            Self::WeightGain => "Набор массы",
        }
    }

    /// Daily calorie offset applied after the activity multiplier.
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Self::WeightLoss => -500.0,
            Self::Maintenance => 0.0,
            Self::WeightGain => 500.0,
        }
    }
}

/// Self-reported weekly activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sedentary => "Сидячий",
            Self::Light => "Легкая активность",
            Self::Moderate => "Умеренная активность",
            Self::Active => "Высокая активность",
            Self::VeryActive => "Очень высокая активность",
        }
    }

    /// Short form used inside summaries.
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Sedentary => "Сидячий",
            Self::Light => "Легкая",
            Self::Moderate => "Умеренная",
            Self::Active => "Высокая",
            Self::VeryActive => "Очень высокая",
        }
    }

    /// Mifflin–St Jeor activity multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

macro_rules! impl_storage_str {
    ($ty:ty, $name:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!("unknown {}: {s}", $name))
            }
        }
    };
}

impl_storage_str!(Gender, "gender");
impl_storage_str!(Goal, "goal");
impl_storage_str!(ActivityLevel, "activity level");

/// A complete, validated set of intake answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub gender: Gender,
    pub age: u32,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: u32,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
}

/// Targets and advice derived from [`Biometrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub daily_calories: i32,
    pub protein_goal: i32,
    pub fat_goal: i32,
    pub carbs_goal: i32,
    pub workout_plan: String,
    pub diet_advice: String,
}

/// One saved intake result. A user accumulates many; the newest is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub biometrics: Biometrics,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(biometrics: Biometrics, plan: Plan) -> Self {
        Self {
            biometrics,
            plan,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_strings_parse_back() {
        for g in Gender::ALL {
            assert_eq!(g.as_str().parse::<Gender>().unwrap(), g);
        }
        for g in Goal::ALL {
            assert_eq!(g.to_string().parse::<Goal>().unwrap(), g);
        }
        for a in ActivityLevel::ALL {
            assert_eq!(a.to_string().parse::<ActivityLevel>().unwrap(), a);
        }
        assert!("athletic".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for a in ActivityLevel::ALL {
            let json = serde_json::to_string(&a).unwrap();
            assert_eq!(json, format!("\"{a}\""));
        }
        for g in Goal::ALL {
            let json = serde_json::to_string(&g).unwrap();
            assert_eq!(json, format!("\"{g}\""));
        }
    }

    #[test]
    fn multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
        assert_eq!(ActivityLevel::Moderate.multiplier(), 1.55);
        assert_eq!(ActivityLevel::Active.multiplier(), 1.725);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.9);
    }

    #[test]
    fn labels_are_distinct() {
        let labels: Vec<&str> = ActivityLevel::ALL.iter().map(|a| a.label()).collect();
        let mut deduped = labels.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }
}
