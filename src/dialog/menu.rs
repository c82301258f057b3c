//! Main menu and exercises submenu vocabularies.

use crate::profile::Goal;
use crate::profile::validation::label_matches;

/// Buttons of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Profile,
    UpdateWeight,
    NewPlan,
    Exercises,
    Cancel,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Profile,
        MenuAction::UpdateWeight,
        MenuAction::NewPlan,
        MenuAction::Exercises,
        MenuAction::Cancel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Profile => "📊 Мой профиль",
            Self::UpdateWeight => "⚖️ Обновить вес",
            Self::NewPlan => "🎯 Новый план",
            Self::Exercises => "📋 Список упражнений",
            Self::Cancel => "❌ Отмена",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| label_matches(input, action.label()))
    }

    /// Button layout: two pairs, then cancel alone.
    pub fn rows() -> Vec<Vec<&'static str>> {
        vec![
            vec![Self::Profile.label(), Self::UpdateWeight.label()],
            vec![Self::NewPlan.label(), Self::Exercises.label()],
            vec![Self::Cancel.label()],
        ]
    }
}

/// Buttons of the exercises submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExercisesChoice {
    Catalogue(Goal),
    Back,
}

impl ExercisesChoice {
    pub const ALL: [ExercisesChoice; 4] = [
        ExercisesChoice::Catalogue(Goal::WeightLoss),
        ExercisesChoice::Catalogue(Goal::WeightGain),
        ExercisesChoice::Catalogue(Goal::Maintenance),
        ExercisesChoice::Back,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Catalogue(Goal::WeightLoss) => "🏃‍♂️ Упражнения для похудения",
            Self::Catalogue(Goal::WeightGain) => "💪 Упражнения для набора массы",
            Self::Catalogue(Goal::Maintenance) => "⚖️ Упражнения для поддержания",
            Self::Back => "↩️ Назад в меню",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|choice| label_matches(input, choice.label()))
    }

    /// One button per row.
    pub fn rows() -> Vec<Vec<&'static str>> {
        Self::ALL.iter().map(|c| vec![c.label()]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_labels_parse_back() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::parse(action.label()), Some(action));
        }
        assert_eq!(MenuAction::parse(" ❌ отмена "), Some(MenuAction::Cancel));
        assert_eq!(MenuAction::parse("Мой профиль"), None);
    }

    #[test]
    fn submenu_labels_parse_back() {
        for choice in ExercisesChoice::ALL {
            assert_eq!(ExercisesChoice::parse(choice.label()), Some(choice));
        }
        assert_eq!(ExercisesChoice::parse("назад"), None);
    }

    #[test]
    fn layouts() {
        assert_eq!(MenuAction::rows().concat().len(), MenuAction::ALL.len());
        assert_eq!(ExercisesChoice::rows().len(), 4);
    }
}
