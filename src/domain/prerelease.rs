//! Pre-release identifiers of the form `label.N`
//!
//! A version's pre-release text is free-form (`[0-9A-Za-z-.]+`), but chroniq
//! only knows how to increment the `label.N` shape, e.g. `alpha.1` or `rc.12`.

use crate::error::{ChroniqError, Result};
use std::fmt;

/// Pre-release identifier with a numeric iteration
///
/// # Examples
/// - "alpha.1" -> PreRelease { label: "alpha", iteration: 1 }
/// - "rc.3" -> PreRelease { label: "rc", iteration: 3 }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub label: String,
    pub iteration: u64,
}

impl PreRelease {
    /// Start a new pre-release cycle for `label` at iteration 1
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - `label.1`
    /// * `Err(EmptyLabel)` - If the label is empty
    /// * `Err(InvalidLabel)` - If the label contains anything but ASCII alphanumerics and '-'
    pub fn start(label: &str) -> Result<Self> {
        validate_label(label)?;
        Ok(PreRelease {
            label: label.to_string(),
            iteration: 1,
        })
    }

    /// Parse text that is exactly `{label}.{N}`
    ///
    /// Returns `None` for anything else: no dot, a dotted label, a
    /// non-numeric or zero-padded iteration.
    pub fn parse(text: &str) -> Option<Self> {
        let (label, iteration) = text.rsplit_once('.')?;
        if validate_label(label).is_err() || !is_canonical_number(iteration) {
            return None;
        }

        Some(PreRelease {
            label: label.to_string(),
            iteration: iteration.parse().ok()?,
        })
    }

    /// Compute the pre-release that follows `current` for `label`
    ///
    /// Same label continues the count (`alpha.1` -> `alpha.2`); anything else
    /// restarts at `label.1`.
    pub fn next(current: &str, label: &str) -> Result<Self> {
        let started = Self::start(label)?;
        match Self::parse(current) {
            Some(existing) if existing.label == label => existing.increment_iteration(),
            _ => Ok(started),
        }
    }

    /// Increment the iteration number
    ///
    /// # Returns
    /// * `Err(Overflow)` - If the iteration is already `u64::MAX`
    pub fn increment_iteration(&self) -> Result<Self> {
        let iteration = self
            .iteration
            .checked_add(1)
            .ok_or_else(|| ChroniqError::Overflow(self.to_string()))?;
        Ok(PreRelease {
            label: self.label.clone(),
            iteration,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.iteration)
    }
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(ChroniqError::EmptyLabel);
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ChroniqError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

fn is_canonical_number(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_iteration() {
        let pr = PreRelease::parse("beta.1").unwrap();
        assert_eq!(pr.label, "beta");
        assert_eq!(pr.iteration, 1);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert_eq!(PreRelease::parse("alpha"), None);
        assert_eq!(PreRelease::parse("alpha.x"), None);
        assert_eq!(PreRelease::parse("alpha.01"), None);
        assert_eq!(PreRelease::parse("alpha.beta.1"), None);
        assert_eq!(PreRelease::parse(".1"), None);
        assert_eq!(PreRelease::parse(""), None);
    }

    #[test]
    fn test_start_validates_label() {
        assert!(matches!(PreRelease::start(""), Err(ChroniqError::EmptyLabel)));
        assert!(matches!(
            PreRelease::start("rc.1"),
            Err(ChroniqError::InvalidLabel(_))
        ));
        assert_eq!(PreRelease::start("rc").unwrap().to_string(), "rc.1");
    }

    #[test]
    fn test_next_same_label_increments() {
        assert_eq!(PreRelease::next("alpha.1", "alpha").unwrap().to_string(), "alpha.2");
        assert_eq!(PreRelease::next("rc.99", "rc").unwrap().to_string(), "rc.100");
    }

    #[test]
    fn test_next_different_label_restarts() {
        assert_eq!(PreRelease::next("alpha.4", "beta").unwrap().to_string(), "beta.1");
        assert_eq!(PreRelease::next("", "alpha").unwrap().to_string(), "alpha.1");
        assert_eq!(PreRelease::next("alpha", "alpha").unwrap().to_string(), "alpha.1");
    }

    #[test]
    fn test_next_at_max_iteration_overflows() {
        assert!(matches!(
            PreRelease::next("alpha.18446744073709551615", "alpha"),
            Err(ChroniqError::Overflow(_))
        ));
        assert_eq!(
            PreRelease::next("alpha.18446744073709551614", "alpha")
                .unwrap()
                .iteration,
            u64::MAX
        );
    }

    #[test]
    fn test_parse_iteration_beyond_u64_is_not_label_n() {
        assert_eq!(PreRelease::parse("alpha.18446744073709551616"), None);
    }

    #[test]
    fn test_next_empty_label_fails_even_with_current() {
        assert!(matches!(
            PreRelease::next("alpha.1", ""),
            Err(ChroniqError::EmptyLabel)
        ));
    }
}
