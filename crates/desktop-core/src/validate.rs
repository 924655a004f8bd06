//! Pre-flight checks applied before any command leaves the process.
//!
//! Only obviously malformed input is rejected. There is no upper bound on
//! coordinates: screen geometry is the remote service's concern.

use crate::action::{
    ApplicationInput, ClickMouseInput, Coordinates, DragMouseInput, MoveMouseInput,
    PasteTextInput, PressKeysInput, PressMouseInput, ReadFileInput, ScrollInput, TraceMouseInput,
    TypeKeysInput, TypeTextInput, WaitInput, WriteFileInput,
};
use crate::error::{ActuationError, ActuationResult};

/// Fails with [`ActuationError::InvalidInput`] when either axis is not finite
/// or is negative.
pub fn validate_coordinates(coordinates: &Coordinates) -> ActuationResult<()> {
    check_axis("x", coordinates.x)?;
    check_axis("y", coordinates.y)
}

fn check_axis(axis: &str, value: f64) -> ActuationResult<()> {
    if !value.is_finite() {
        return Err(ActuationError::invalid_input(format!(
            "{} coordinate must be a finite number, got {}",
            axis, value
        )));
    }
    if value < 0.0 {
        return Err(ActuationError::invalid_input(format!(
            "{} coordinate cannot be negative, got {}",
            axis, value
        )));
    }
    Ok(())
}

fn validate_optional(coordinates: Option<&Coordinates>) -> ActuationResult<()> {
    coordinates.map_or(Ok(()), validate_coordinates)
}

fn validate_path(path: &[Coordinates]) -> ActuationResult<()> {
    if path.is_empty() {
        return Err(ActuationError::invalid_input("path cannot be empty"));
    }
    path.iter().try_for_each(validate_coordinates)
}

fn validate_count(field: &str, count: u32) -> ActuationResult<()> {
    if count < 1 {
        return Err(ActuationError::invalid_input(format!(
            "{} must be at least 1, got {}",
            field, count
        )));
    }
    Ok(())
}

fn validate_keys(keys: &[String]) -> ActuationResult<()> {
    if keys.is_empty() {
        return Err(ActuationError::invalid_input("keys cannot be empty"));
    }
    Ok(())
}

pub fn validate_file_path(path: &str) -> ActuationResult<()> {
    if path.trim().is_empty() {
        return Err(ActuationError::invalid_input("file path cannot be empty"));
    }
    Ok(())
}

/// Payload shape checks for one action input.
pub trait Validate {
    fn validate(&self) -> ActuationResult<()>;
}

impl Validate for MoveMouseInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_coordinates(&self.coordinates)
    }
}

impl Validate for TraceMouseInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_path(&self.path)
    }
}

impl Validate for ClickMouseInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_optional(self.coordinates.as_ref())?;
        validate_count("clickCount", self.click_count)
    }
}

impl Validate for PressMouseInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_optional(self.coordinates.as_ref())
    }
}

impl Validate for DragMouseInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_path(&self.path)
    }
}

impl Validate for ScrollInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_optional(self.coordinates.as_ref())?;
        validate_count("scrollCount", self.scroll_count)
    }
}

impl Validate for TypeKeysInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_keys(&self.keys)
    }
}

impl Validate for PressKeysInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_keys(&self.keys)
    }
}

impl Validate for TypeTextInput {
    fn validate(&self) -> ActuationResult<()> {
        Ok(())
    }
}

impl Validate for PasteTextInput {
    fn validate(&self) -> ActuationResult<()> {
        Ok(())
    }
}

impl Validate for WaitInput {
    fn validate(&self) -> ActuationResult<()> {
        Ok(())
    }
}

impl Validate for ApplicationInput {
    fn validate(&self) -> ActuationResult<()> {
        if self.application.trim().is_empty() {
            return Err(ActuationError::invalid_input("application cannot be empty"));
        }
        Ok(())
    }
}

impl Validate for ReadFileInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_file_path(&self.path)
    }
}

impl Validate for WriteFileInput {
    fn validate(&self) -> ActuationResult<()> {
        validate_file_path(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Button, Press};

    fn assert_invalid(result: ActuationResult<()>, needle: &str) {
        match result {
            Err(ActuationError::InvalidInput(reason)) => {
                assert!(reason.contains(needle), "{reason:?} should mention {needle:?}")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn accepts_origin_and_large_values() {
        assert!(validate_coordinates(&Coordinates::new(0.0, 0.0)).is_ok());
        assert!(validate_coordinates(&Coordinates::new(100_000.0, 4.5)).is_ok());
    }

    #[test]
    fn rejects_negative_axes() {
        assert_invalid(
            validate_coordinates(&Coordinates::new(-1.0, 5.0)),
            "x coordinate cannot be negative",
        );
        assert_invalid(
            validate_coordinates(&Coordinates::new(3.0, -0.5)),
            "y coordinate cannot be negative",
        );
    }

    #[test]
    fn rejects_non_finite_axes() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_invalid(
                validate_coordinates(&Coordinates::new(value, 1.0)),
                "must be a finite number",
            );
            assert_invalid(
                validate_coordinates(&Coordinates::new(1.0, value)),
                "y coordinate",
            );
        }
    }

    #[test]
    fn path_checks_every_point() {
        let input = TraceMouseInput {
            path: vec![Coordinates::new(1.0, 1.0), Coordinates::new(2.0, -3.0)],
            hold_keys: Vec::new(),
        };
        assert_invalid(input.validate(), "cannot be negative");

        let empty = DragMouseInput {
            path: Vec::new(),
            button: Button::Left,
            hold_keys: Vec::new(),
        };
        assert_invalid(empty.validate(), "path cannot be empty");
    }

    #[test]
    fn click_count_must_be_positive() {
        let input = ClickMouseInput {
            coordinates: None,
            button: Button::Right,
            click_count: 0,
            hold_keys: Vec::new(),
        };
        assert_invalid(input.validate(), "clickCount must be at least 1");
    }

    #[test]
    fn optional_coordinates_are_checked_when_present() {
        let input = PressMouseInput {
            coordinates: Some(Coordinates::new(f64::NAN, 0.0)),
            button: Button::Left,
            press: Press::Down,
        };
        assert_invalid(input.validate(), "finite");

        let absent = PressMouseInput {
            coordinates: None,
            button: Button::Left,
            press: Press::Up,
        };
        assert!(absent.validate().is_ok());
    }

    #[test]
    fn keys_and_paths_must_not_be_empty() {
        let keys = PressKeysInput {
            keys: Vec::new(),
            press: Press::Down,
        };
        assert_invalid(keys.validate(), "keys cannot be empty");

        let file = ReadFileInput {
            path: "  ".to_string(),
        };
        assert_invalid(file.validate(), "file path cannot be empty");
    }
}
