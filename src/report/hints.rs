//! Next-step hints shown after a run.
//!
//! Suggests the logical next action based on how the run ended.

/// Hint after a run where everything verified.
pub fn after_successful_run() -> &'static str {
    "Open a new shell (or source your profile) to pick up environment changes."
}

/// Hint after a run where some capabilities failed.
pub fn after_failed_run(failed: &[String]) -> String {
    if failed.is_empty() {
        return "Re-run `kitup` to retry.".to_string();
    }
    format!(
        "Fix the {} above, then re-run `kitup`. Satisfied capabilities are skipped.",
        plural(failed.len(), "capability", "capabilities")
    )
}

/// Hint after an interrupted run.
pub fn after_interrupt() -> &'static str {
    "Run was interrupted. Re-run `kitup` to continue where it stopped."
}

/// Hint after a dry run.
pub fn after_dry_run() -> &'static str {
    "Run `kitup run` without --dry-run to apply these changes."
}

/// Hint after `kitup check` found missing capabilities.
pub fn after_check(missing: &[String]) -> String {
    format!(
        "Run `kitup` to provision: {}",
        missing.join(", ")
    )
}

/// Hint when the user declines the confirmation prompt.
pub fn after_decline() -> &'static str {
    "Nothing was installed. Run `kitup run --yes` to skip the prompt."
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("1 {}", one)
    } else {
        format!("{} {}", count, many)
    }
}
