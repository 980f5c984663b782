//! # Invite List Metrics
//!
//! Prometheus metrics for the invite list.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! gc-invite-list = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `invite_list_recomputes_total` - Counter of emitted aggregation results
//! - `invite_list_empty_results_total` - Counter of results that were only the empty placeholder
//! - `invite_list_selections_total` - Counter of finished selections (by outcome)
//! - `invite_list_confirmation_prompts_total` - Counter of confirmation prompts shown
//! - `invite_list_active_subscriptions` - Gauge of live result subscriptions

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total aggregation results emitted
    pub static ref RECOMPUTES: IntCounter = register_int_counter!(
        "invite_list_recomputes_total",
        "Total number of aggregation results emitted"
    )
    .expect("Failed to create RECOMPUTES metric");

    /// Results consisting only of the empty placeholder
    pub static ref EMPTY_RESULTS: IntCounter = register_int_counter!(
        "invite_list_empty_results_total",
        "Total number of results that showed the empty placeholder"
    )
    .expect("Failed to create EMPTY_RESULTS metric");

    /// Finished selections, labeled by outcome
    pub static ref SELECTIONS: IntCounterVec = register_int_counter_vec!(
        "invite_list_selections_total",
        "Total number of finished peer selections",
        &["outcome"]
    )
    .expect("Failed to create SELECTIONS metric");

    /// Confirmation prompts shown
    pub static ref CONFIRMATION_PROMPTS: IntCounter = register_int_counter!(
        "invite_list_confirmation_prompts_total",
        "Total number of add-to-group confirmation prompts shown"
    )
    .expect("Failed to create CONFIRMATION_PROMPTS metric");

    /// Live result subscriptions
    pub static ref ACTIVE_SUBSCRIPTIONS: IntGauge = register_int_gauge!(
        "invite_list_active_subscriptions",
        "Number of live invite-list subscriptions"
    )
    .expect("Failed to create ACTIVE_SUBSCRIPTIONS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an emitted result
#[cfg(feature = "metrics")]
pub fn record_recompute(empty_placeholder: bool) {
    RECOMPUTES.inc();
    if empty_placeholder {
        EMPTY_RESULTS.inc();
    }
}

/// Record a finished selection (`accepted`, `declined`, `failed`, `cancelled`, `busy`)
#[cfg(feature = "metrics")]
pub fn record_selection(outcome: &str) {
    SELECTIONS.with_label_values(&[outcome]).inc();
}

/// Record a confirmation prompt
#[cfg(feature = "metrics")]
pub fn record_confirmation_prompt() {
    CONFIRMATION_PROMPTS.inc();
}

/// Record a subscription opened
#[cfg(feature = "metrics")]
pub fn subscription_opened() {
    ACTIVE_SUBSCRIPTIONS.inc();
}

/// Record a subscription released
#[cfg(feature = "metrics")]
pub fn subscription_released() {
    ACTIVE_SUBSCRIPTIONS.dec();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_recompute(_empty_placeholder: bool) {}

#[cfg(not(feature = "metrics"))]
pub fn record_selection(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_confirmation_prompt() {}

#[cfg(not(feature = "metrics"))]
pub fn subscription_opened() {}

#[cfg(not(feature = "metrics"))]
pub fn subscription_released() {}
