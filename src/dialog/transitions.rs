//! Free-text transitions, as a pure function of (stage, input).
//!
//! Commands are parsed before this table is consulted. Anything needing
//! storage is returned as a [`Step`] for the controller to carry out.

use crate::channels::OutgoingResponse;
use crate::error::ValidationError;
use crate::profile::Biometrics;
use crate::profile::validation::{
    parse_activity, parse_age, parse_gender, parse_goal, parse_height, parse_weight,
};

use super::commands::Command;
use super::menu::{ExercisesChoice, MenuAction};
use super::prompts;
use super::state::Stage;

/// Outcome of one free-text input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Move to `next` and send `replies`.
    Advance {
        next: Stage,
        replies: Vec<OutgoingResponse>,
    },
    /// Stay in the current stage and re-prompt.
    Reject {
        error: Option<ValidationError>,
        replies: Vec<OutgoingResponse>,
    },
    /// Intake finished: compute, save, summarize.
    Complete(Biometrics),
    /// Weight update accepted: recompute and save with the new weight.
    UpdateWeight(Biometrics),
    /// Menu button that behaves like a command.
    Dispatch(Command),
    /// No transition defined for this stage.
    Unhandled,
}

impl Step {
    fn advance(next: Stage, reply: OutgoingResponse) -> Self {
        Self::Advance {
            next,
            replies: vec![reply],
        }
    }

    fn reject(error: ValidationError, reply: OutgoingResponse) -> Self {
        Self::Reject {
            error: Some(error),
            replies: vec![reply],
        }
    }
}

/// Apply free-text `input` to `stage`. Total over every stage and input.
pub fn transition(stage: &Stage, input: &str) -> Step {
    match *stage {
        Stage::Start => Step::advance(Stage::AskingGender, prompts::gender_prompt()),

        Stage::AskingGender => match parse_gender(input) {
            Ok(gender) => Step::advance(Stage::AskingAge { gender }, prompts::age_prompt()),
            Err(e) => Step::reject(e, prompts::gender_retry()),
        },

        Stage::AskingAge { gender } => match parse_age(input) {
            Ok(age) => Step::advance(Stage::AskingWeight { gender, age }, prompts::weight_prompt()),
            Err(e) => Step::reject(e, prompts::age_retry()),
        },

        Stage::AskingWeight { gender, age } => match parse_weight(input) {
            Ok(weight) => Step::advance(
                Stage::AskingHeight {
                    gender,
                    age,
                    weight,
                },
                prompts::height_prompt(),
            ),
            Err(e) => Step::reject(e, prompts::weight_retry()),
        },

        Stage::AskingHeight {
            gender,
            age,
            weight,
        } => match parse_height(input) {
            Ok(height) => Step::advance(
                Stage::AskingGoal {
                    gender,
                    age,
                    weight,
                    height,
                },
                prompts::goal_prompt(),
            ),
            Err(e) => Step::reject(e, prompts::height_retry()),
        },

        Stage::AskingGoal {
            gender,
            age,
            weight,
            height,
        } => match parse_goal(input) {
            Ok(goal) => Step::advance(
                Stage::AskingActivity {
                    gender,
                    age,
                    weight,
                    height,
                    goal,
                },
                prompts::activity_prompt(),
            ),
            Err(e) => Step::reject(e, prompts::goal_retry()),
        },

        Stage::AskingActivity {
            gender,
            age,
            weight,
            height,
            goal,
        } => match parse_activity(input) {
            Ok(activity_level) => Step::Complete(Biometrics {
                gender,
                age,
                weight,
                height,
                goal,
                activity_level,
            }),
            Err(e) => Step::reject(e, prompts::activity_retry()),
        },

        Stage::MainMenu => match MenuAction::parse(input) {
            Some(MenuAction::Profile) => Step::Dispatch(Command::Profile),
            Some(MenuAction::UpdateWeight) => Step::Dispatch(Command::UpdateWeight),
            Some(MenuAction::NewPlan) => Step::Dispatch(Command::NewPlan),
            Some(MenuAction::Exercises) => Step::Dispatch(Command::Exercises),
            Some(MenuAction::Cancel) => Step::advance(Stage::Start, prompts::menu_closed()),
            None => Step::Reject {
                error: None,
                replies: vec![prompts::menu_retry(), prompts::main_menu()],
            },
        },

        Stage::UpdatingWeight(ref current) => match parse_weight(input) {
            Ok(weight) => Step::UpdateWeight(Biometrics {
                weight,
                ..current.clone()
            }),
            Err(e) => Step::reject(e, prompts::weight_retry()),
        },

        Stage::ShowingExercisesMenu => match ExercisesChoice::parse(input) {
            Some(ExercisesChoice::Catalogue(goal)) => Step::Advance {
                next: Stage::ShowingExercisesMenu,
                replies: vec![prompts::exercises(goal), prompts::exercises_menu()],
            },
            Some(ExercisesChoice::Back) => Step::advance(Stage::MainMenu, prompts::main_menu()),
            None => Step::Reject {
                error: None,
                replies: vec![prompts::exercises_menu()],
            },
        },

        Stage::ProcessingResults(_) | Stage::ShowingProfile | Stage::ShowingExercisesList => {
            Step::Unhandled
        }
    }
}
