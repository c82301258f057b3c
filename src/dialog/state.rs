//! Conversation state and the per-user session record.

use serde::{Deserialize, Serialize};

use crate::profile::{ActivityLevel, Biometrics, Gender, Goal};

/// Position in the conversation.
///
/// The intake path is linear: Start → AskingGender → AskingAge →
/// AskingWeight → AskingHeight → AskingGoal → AskingActivity →
/// ProcessingResults, after which the user lands in MainMenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Start,
    AskingGender,
    AskingAge,
    AskingWeight,
    AskingHeight,
    AskingGoal,
    AskingActivity,
    ProcessingResults,
    MainMenu,
    UpdatingWeight,
    ShowingProfile,
    ShowingExercisesMenu,
    ShowingExercisesList,
}

impl ConversationState {
    pub const ALL: [ConversationState; 13] = [
        ConversationState::Start,
        ConversationState::AskingGender,
        ConversationState::AskingAge,
        ConversationState::AskingWeight,
        ConversationState::AskingHeight,
        ConversationState::AskingGoal,
        ConversationState::AskingActivity,
        ConversationState::ProcessingResults,
        ConversationState::MainMenu,
        ConversationState::UpdatingWeight,
        ConversationState::ShowingProfile,
        ConversationState::ShowingExercisesMenu,
        ConversationState::ShowingExercisesList,
    ];
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::AskingGender => "asking_gender",
            Self::AskingAge => "asking_age",
            Self::AskingWeight => "asking_weight",
            Self::AskingHeight => "asking_height",
            Self::AskingGoal => "asking_goal",
            Self::AskingActivity => "asking_activity",
            Self::ProcessingResults => "processing_results",
            Self::MainMenu => "main_menu",
            Self::UpdatingWeight => "updating_weight",
            Self::ShowingProfile => "showing_profile",
            Self::ShowingExercisesMenu => "showing_exercises_menu",
            Self::ShowingExercisesList => "showing_exercises_list",
        };
        write!(f, "{s}")
    }
}

/// State plus exactly the answers known at that point.
///
/// Each intake variant carries the answers collected before it, so a later
/// field can never be present without the earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Start,
    AskingGender,
    AskingAge {
        gender: Gender,
    },
    AskingWeight {
        gender: Gender,
        age: u32,
    },
    AskingHeight {
        gender: Gender,
        age: u32,
        weight: f64,
    },
    AskingGoal {
        gender: Gender,
        age: u32,
        weight: f64,
        height: u32,
    },
    AskingActivity {
        gender: Gender,
        age: u32,
        weight: f64,
        height: u32,
        goal: Goal,
    },
    ProcessingResults(Biometrics),
    MainMenu,
    /// Loaded from the latest saved profile; only the weight will change.
    UpdatingWeight(Biometrics),
    ShowingProfile,
    ShowingExercisesMenu,
    ShowingExercisesList,
}

impl Stage {
    pub fn state(&self) -> ConversationState {
        match self {
            Self::Start => ConversationState::Start,
            Self::AskingGender => ConversationState::AskingGender,
            Self::AskingAge { .. } => ConversationState::AskingAge,
            Self::AskingWeight { .. } => ConversationState::AskingWeight,
            Self::AskingHeight { .. } => ConversationState::AskingHeight,
            Self::AskingGoal { .. } => ConversationState::AskingGoal,
            Self::AskingActivity { .. } => ConversationState::AskingActivity,
            Self::ProcessingResults(_) => ConversationState::ProcessingResults,
            Self::MainMenu => ConversationState::MainMenu,
            Self::UpdatingWeight(_) => ConversationState::UpdatingWeight,
            Self::ShowingProfile => ConversationState::ShowingProfile,
            Self::ShowingExercisesMenu => ConversationState::ShowingExercisesMenu,
            Self::ShowingExercisesList => ConversationState::ShowingExercisesList,
        }
    }

    /// Flattened view of the answers carried by this stage.
    pub fn answers(&self) -> Answers {
        match *self {
            Self::AskingAge { gender } => Answers {
                gender: Some(gender),
                ..Answers::default()
            },
            Self::AskingWeight { gender, age } => Answers {
                gender: Some(gender),
                age: Some(age),
                ..Answers::default()
            },
            Self::AskingHeight {
                gender,
                age,
                weight,
            } => Answers {
                gender: Some(gender),
                age: Some(age),
                weight: Some(weight),
                ..Answers::default()
            },
            Self::AskingGoal {
                gender,
                age,
                weight,
                height,
            } => Answers {
                gender: Some(gender),
                age: Some(age),
                weight: Some(weight),
                height: Some(height),
                ..Answers::default()
            },
            Self::AskingActivity {
                gender,
                age,
                weight,
                height,
                goal,
            } => Answers {
                gender: Some(gender),
                age: Some(age),
                weight: Some(weight),
                height: Some(height),
                goal: Some(goal),
                activity_level: None,
            },
            Self::ProcessingResults(ref b) | Self::UpdatingWeight(ref b) => Answers::from(b),
            Self::Start
            | Self::AskingGender
            | Self::MainMenu
            | Self::ShowingProfile
            | Self::ShowingExercisesMenu
            | Self::ShowingExercisesList => Answers::default(),
        }
    }
}

/// Answers collected so far, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<u32>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
}

impl From<&Biometrics> for Answers {
    fn from(b: &Biometrics) -> Self {
        Self {
            gender: Some(b.gender),
            age: Some(b.age),
            weight: Some(b.weight),
            height: Some(b.height),
            goal: Some(b.goal),
            activity_level: Some(b.activity_level),
        }
    }
}

/// One user's conversation progress. Lives in memory for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub stage: Stage,
}

impl Default for Session {
    fn default() -> Self {
        Self { stage: Stage::Start }
    }
}

impl Session {
    pub fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub fn state(&self) -> ConversationState {
        self.stage.state()
    }

    pub fn answers(&self) -> Answers {
        self.stage.answers()
    }

    pub fn is_updating_weight(&self) -> bool {
        matches!(self.stage, Stage::UpdatingWeight(_))
    }

    /// Drop all answers and return to Start.
    pub fn reset(&mut self) {
        self.stage = Stage::Start;
    }

    /// Enter the weight-update sub-flow with a previously saved profile.
    pub fn load_for_weight_update(&mut self, biometrics: Biometrics) {
        self.stage = Stage::UpdatingWeight(biometrics);
    }
}
