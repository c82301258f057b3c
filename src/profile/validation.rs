//! Field parsers for intake answers.
//!
//! Each parser trims the raw text, checks it against the field's domain and
//! returns the normalized value. Malformed text is an ordinary rejection.

use crate::error::ValidationError;

use super::model::{ActivityLevel, Gender, Goal};

pub const AGE_RANGE: (u32, u32) = (0, 120);
pub const WEIGHT_RANGE: (f64, f64) = (0.0, 300.0);
pub const HEIGHT_RANGE: (u32, u32) = (0, 250);

/// Case-insensitive comparison against a fixed label.
pub fn label_matches(input: &str, label: &str) -> bool {
    input.trim().to_lowercase() == label.to_lowercase()
}

fn match_label<T: Copy>(
    field: &'static str,
    input: &str,
    options: &[T],
    label: impl Fn(&T) -> &'static str,
) -> Result<T, ValidationError> {
    options
        .iter()
        .find(|opt| label_matches(input, label(*opt)))
        .copied()
        .ok_or_else(|| ValidationError::UnknownLabel {
            field,
            input: input.trim().to_string(),
        })
}

pub fn parse_gender(input: &str) -> Result<Gender, ValidationError> {
    match_label("gender", input, &Gender::ALL, Gender::label)
}

pub fn parse_goal(input: &str) -> Result<Goal, ValidationError> {
    match_label("goal", input, &Goal::ALL, Goal::label)
}

pub fn parse_activity(input: &str) -> Result<ActivityLevel, ValidationError> {
    match_label("activity", input, &ActivityLevel::ALL, ActivityLevel::label)
}

fn parse_bounded_int(
    field: &'static str,
    input: &str,
    (min, max): (u32, u32),
) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        input: trimmed.to_string(),
    })?;
    if value > i64::from(min) && value < i64::from(max) {
        Ok(value as u32)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: f64::from(min),
            max: f64::from(max),
        })
    }
}

/// Whole years, exclusive on both ends.
pub fn parse_age(input: &str) -> Result<u32, ValidationError> {
    parse_bounded_int("age", input, AGE_RANGE)
}

/// Whole centimetres, exclusive on both ends.
pub fn parse_height(input: &str) -> Result<u32, ValidationError> {
    parse_bounded_int("height", input, HEIGHT_RANGE)
}

/// Kilograms; accepts `.` or `,` as the decimal separator.
pub fn parse_weight(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: "weight",
            input: trimmed.to_string(),
        })?;
    let (min, max) = WEIGHT_RANGE;
    // NaN and infinities fail both comparisons.
    if value > min && value < max {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field: "weight",
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_accepts_whole_open_interval() {
        for age in 1..120 {
            assert_eq!(parse_age(&age.to_string()), Ok(age));
        }
    }

    #[test]
    fn age_rejects_bounds_and_garbage() {
        for input in ["0", "120", "-5", "200", "abc", "", "30.5", "99999999999999999999"] {
            assert!(parse_age(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn age_trims_whitespace() {
        assert_eq!(parse_age("  30 \n"), Ok(30));
    }

    #[test]
    fn age_error_kinds() {
        assert!(matches!(
            parse_age("abc"),
            Err(ValidationError::NotANumber { field: "age", .. })
        ));
        assert!(matches!(
            parse_age("120"),
            Err(ValidationError::OutOfRange { field: "age", .. })
        ));
    }

    #[test]
    fn weight_accepts_decimals() {
        assert_eq!(parse_weight("70.5"), Ok(70.5));
        assert_eq!(parse_weight("70,5"), Ok(70.5));
        assert_eq!(parse_weight("80"), Ok(80.0));
        assert_eq!(parse_weight("299.9"), Ok(299.9));
    }

    #[test]
    fn weight_rejects_out_of_range() {
        for input in ["0", "300", "-1", "NaN", "inf", "kg", "1e9"] {
            assert!(parse_weight(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn height_bounds() {
        assert_eq!(parse_height("180"), Ok(180));
        assert_eq!(parse_height("249"), Ok(249));
        assert!(parse_height("250").is_err());
        assert!(parse_height("0").is_err());
        assert!(parse_height("1.80").is_err());
    }

    #[test]
    fn gender_labels() {
        assert_eq!(parse_gender("Мужской"), Ok(Gender::Male));
        assert_eq!(parse_gender("женский"), Ok(Gender::Female));
        assert_eq!(parse_gender(" МУЖСКОЙ "), Ok(Gender::Male));
        assert!(matches!(
            parse_gender("male"),
            Err(ValidationError::UnknownLabel { field: "gender", .. })
        ));
    }

    #[test]
    fn goal_labels_case_insensitive() {
        assert_eq!(parse_goal("Похудение"), Ok(Goal::WeightLoss));
        assert_eq!(parse_goal("поддержание веса"), Ok(Goal::Maintenance));
        assert_eq!(parse_goal("НАБОР МАССЫ"), Ok(Goal::WeightGain));
        assert!(parse_goal("Похудение!").is_err());
    }

    #[test]
    fn activity_labels() {
        for level in ActivityLevel::ALL {
            assert_eq!(parse_activity(level.label()), Ok(level));
        }
        // Short forms are display-only.
        assert!(parse_activity("Легкая").is_err());
    }
}
