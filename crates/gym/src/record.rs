//! Flat-array round-tripping for structured records.

use crate::GymError;

/// A record with a fixed, ordered set of named numeric fields.
///
/// `from_array(&x.to_array())` must reproduce `x` exactly. `FIELDS` lists the
/// field names in array order; [`State`](crate::State) uses them to enforce
/// that its three sub-records never share a name.
pub trait ArrayRecord: Sized {
    const FIELDS: &'static [&'static str];

    fn to_array(&self) -> Vec<f64>;

    /// # Errors
    ///
    /// Returns [`GymError::ArrayLength`] when `values` does not have exactly
    /// [`Self::width`] elements, or [`GymError::InvalidField`] when a value
    /// is not valid for its field.
    fn from_array(values: &[f64]) -> Result<Self, GymError>;

    #[must_use]
    fn width() -> usize {
        Self::FIELDS.len()
    }

    /// Length check shared by `from_array` implementations.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::ArrayLength`] on mismatch.
    fn check_width(values: &[f64]) -> Result<(), GymError> {
        if values.len() == Self::width() {
            Ok(())
        } else {
            Err(GymError::ArrayLength {
                record: std::any::type_name::<Self>(),
                expected: Self::width(),
                got: values.len(),
            })
        }
    }
}

/// Reads a counter stored in a float slot.
///
/// # Errors
///
/// Returns [`GymError::InvalidField`] unless `value` is a non-negative
/// integer representable as `u32`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn integral_field(field: &str, value: f64) -> Result<u32, GymError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(GymError::InvalidField {
            field: field.to_owned(),
            value,
            reason: "expected an integer",
        });
    }
    if value < 0.0 || value > f64::from(u32::MAX) {
        return Err(GymError::InvalidField {
            field: field.to_owned(),
            value,
            reason: "out of range for a counter",
        });
    }
    Ok(value as u32)
}
