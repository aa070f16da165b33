//! Challenge resolver for the site's interactive obstacles.
//!
//! Two obstacles appear between a navigation and usable listing content: a
//! bot-verification control and an age gate. Both are cleared best-effort:
//! the caller keeps navigating regardless of the outcome, since a missed
//! obstacle only yields an empty extraction that pagination termination
//! already handles. Failures are reported as an explicit outcome variant
//! rather than swallowed, so callers and tests can tell the paths apart.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::BrowserPage;

/// Selector for the site's bot-verification control.
pub const ROBOT_CHECK_SELECTOR: &str = "input[value='I am not a robot']";

/// In-page routine that re-authenticates past the bot check.
pub const ROBOT_CHECK_SCRIPT: &str = "reauth()";

/// Selector for the age gate's confirm control.
pub const AGE_GATE_SELECTOR: &str = "#age-button-yes";

/// Settle delay after clearing the bot check, letting any redirect land.
const ROBOT_CHECK_SETTLE: Duration = Duration::from_secs(1);

/// Settle delay after confirming the age gate.
const AGE_GATE_SETTLE: Duration = Duration::from_millis(500);

/// Result of one obstacle-clearing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The obstacle was present and the clearing routine ran to completion.
    Cleared,
    /// No obstacle was found on the page.
    NotPresent,
    /// The obstacle was probed or handled but something failed along the
    /// way; the page may or may not be usable.
    AttemptFailed,
}

/// Probes for the bot-verification control and clears it if present.
///
/// Runs the page's re-authentication routine, waits for the content-loaded
/// state, then pauses briefly so any redirect settles. Never returns an
/// error: internal failures become [`ClearOutcome::AttemptFailed`].
pub async fn clear_robot_check(page: &dyn BrowserPage) -> ClearOutcome {
    match page.exists(ROBOT_CHECK_SELECTOR).await {
        Ok(false) => return ClearOutcome::NotPresent,
        Ok(true) => {}
        Err(e) => {
            warn!(error = %e, "robot check probe failed");
            return ClearOutcome::AttemptFailed;
        }
    }

    info!("handling robot check");
    if let Err(e) = page.evaluate(ROBOT_CHECK_SCRIPT).await {
        warn!(error = %e, "robot check script failed");
        return ClearOutcome::AttemptFailed;
    }
    if let Err(e) = page.wait_for_load().await {
        warn!(error = %e, "robot check load wait failed");
        return ClearOutcome::AttemptFailed;
    }
    tokio::time::sleep(ROBOT_CHECK_SETTLE).await;
    ClearOutcome::Cleared
}

/// Probes for the age gate and confirms it if present.
///
/// Idempotent when no gate is shown. Never returns an error: internal
/// failures become [`ClearOutcome::AttemptFailed`].
pub async fn clear_age_gate(page: &dyn BrowserPage) -> ClearOutcome {
    match page.exists(AGE_GATE_SELECTOR).await {
        Ok(false) => return ClearOutcome::NotPresent,
        Ok(true) => {}
        Err(e) => {
            warn!(error = %e, "age gate probe failed");
            return ClearOutcome::AttemptFailed;
        }
    }

    debug!("confirming age gate");
    if let Err(e) = page.click(AGE_GATE_SELECTOR).await {
        warn!(error = %e, "age gate click failed");
        return ClearOutcome::AttemptFailed;
    }
    tokio::time::sleep(AGE_GATE_SETTLE).await;
    ClearOutcome::Cleared
}
