//! Page navigator: one listing-page navigation with challenge handling.

use tracing::{debug, info};

use super::challenge::{
    ClearOutcome, ROBOT_CHECK_SELECTOR, clear_age_gate, clear_robot_check,
};
use crate::browser::{BrowserError, BrowserPage, STATUS_NOT_FOUND};

/// Result of one challenge-aware navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavOutcome {
    /// HTTP status of the final main-document response.
    pub status: u16,
    /// Outcome of the bot-check pass.
    pub robot_check: ClearOutcome,
    /// Outcome of the age-gate pass.
    pub age_gate: ClearOutcome,
}

impl NavOutcome {
    /// Whether the site signalled end-of-pages for this dataset.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }
}

/// Navigates to a listing page, clearing interactive obstacles on the way.
///
/// A 404 returns immediately: it is the site's end-of-dataset signal and no
/// challenge can change it. Otherwise, if the bot-verification control is
/// present after the load, the robot check is cleared best-effort and the
/// same navigation is re-issued once, whatever the clearing outcome. The
/// age gate is always probed afterward (a no-op when absent).
///
/// # Errors
///
/// Returns [`BrowserError::Navigation`] on any transport-level failure;
/// the pagination controller treats that as dataset termination.
pub async fn navigate_with_challenges(
    page: &dyn BrowserPage,
    url: &str,
) -> Result<NavOutcome, BrowserError> {
    let mut status = page.goto(url).await?;
    if status == STATUS_NOT_FOUND {
        debug!(url, "listing page not found");
        return Ok(NavOutcome {
            status,
            robot_check: ClearOutcome::NotPresent,
            age_gate: ClearOutcome::NotPresent,
        });
    }

    let mut robot_check = ClearOutcome::NotPresent;
    if page.exists(ROBOT_CHECK_SELECTOR).await.unwrap_or(false) {
        robot_check = clear_robot_check(page).await;
        // The check page holds no listing either way, so the navigation is
        // re-issued even when the clearing attempt failed.
        info!(url, outcome = ?robot_check, "re-issuing navigation after robot check");
        status = page.goto(url).await?;
    }

    let age_gate = clear_age_gate(page).await;

    Ok(NavOutcome {
        status,
        robot_check,
        age_gate,
    })
}
