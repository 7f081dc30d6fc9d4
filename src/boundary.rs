//! Scoped failure capture for render regions.
//!
//! A [`Boundary`] wraps one independently-failable view region. Its guarded
//! scope runs the region's render; an `Err` is captured and the caller swaps
//! in a recovery panel instead. Once tripped, the subtree is skipped on later
//! frames until [`Boundary::reset`] clears the capture and the next frame
//! re-attempts the subtree from scratch. Each region owns its own instance,
//! and switching top-level modes replaces the instance wholesale, so one
//! failing region never blanks a sibling.

use crate::api::FetchError;

/// A failure raised while turning state into output, or a fetch failure
/// surfacing through the region that depends on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderFailure {
    message: String,
}

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&FetchError> for RenderFailure {
    fn from(error: &FetchError) -> Self {
        Self::new(error.to_string())
    }
}

#[derive(Debug, Default)]
pub struct Boundary {
    captured: Option<RenderFailure>,
}

impl Boundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tripped(&self) -> bool {
        self.captured.is_some()
    }

    /// Clear the capture; the next guarded render runs the subtree again.
    pub fn reset(&mut self) {
        self.captured = None;
    }

    /// Run `render` unless a failure is already captured. Returns the capture
    /// (fresh or held) so the caller can draw the recovery panel over the
    /// region's area.
    pub fn guard<F>(&mut self, render: F) -> Option<&RenderFailure>
    where
        F: FnOnce() -> Result<(), RenderFailure>,
    {
        if self.captured.is_none() {
            if let Err(failure) = render() {
                self.captured = Some(failure);
            }
        }
        self.captured.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_through_a_clean_render() {
        let mut boundary = Boundary::new();
        let mut ran = false;

        let captured = boundary.guard(|| {
            ran = true;
            Ok(())
        });

        assert!(ran);
        assert!(captured.is_none());
        assert!(!boundary.is_tripped());
    }

    #[test]
    fn guard_captures_a_failure_and_skips_the_subtree_afterwards() {
        let mut boundary = Boundary::new();
        let mut runs = 0;

        let captured = boundary.guard(|| Err(RenderFailure::new("stats out of range")));
        assert_eq!(captured.map(RenderFailure::message), Some("stats out of range"));

        let captured = boundary.guard(|| {
            runs += 1;
            Ok(())
        });
        assert_eq!(runs, 0, "tripped boundary must not re-run the subtree");
        assert!(captured.is_some());
    }

    #[test]
    fn reset_clears_the_capture_and_reattempts() {
        let mut boundary = Boundary::new();
        boundary.guard(|| Err(RenderFailure::new("Failed to fetch data: status 404")));
        assert!(boundary.is_tripped());

        boundary.reset();
        assert!(!boundary.is_tripped());

        let mut ran = false;
        let captured = boundary.guard(|| {
            ran = true;
            Ok(())
        });
        assert!(ran);
        assert!(captured.is_none());
    }

    #[test]
    fn fetch_errors_convert_with_their_message() {
        let failure = RenderFailure::from(&FetchError::Status(500));
        assert_eq!(failure.message(), "Failed to fetch data: status 500");
    }
}
