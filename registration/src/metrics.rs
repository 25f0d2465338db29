//! Metric names and descriptions.
//!
//! Counters are emitted through the `metrics` facade; installing an
//! exporter is the application's job.

use metrics::describe_counter;

/// Check-ins written, labelled by `override`.
pub const CHECKIN_RECORDED: &str = "checkin_recorded_total";

/// Check-ins refused for lack of an attending RSVP.
pub const CHECKIN_REJECTED: &str = "checkin_rejected_total";

/// Role grants that failed after the check-in was written.
pub const ROLE_GRANT_FAILED: &str = "role_grant_failed_total";

/// Transmissions accepted by the mail provider.
pub const MAIL_DISPATCHED: &str = "mail_dispatched_total";

/// Recipients included in accepted transmissions.
pub const MAIL_RECIPIENTS: &str = "mail_recipients_total";

/// Transmissions that failed or were abandoned.
pub const MAIL_DISPATCH_FAILED: &str = "mail_dispatch_failed_total";

/// Register descriptions for every counter this crate emits.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(CHECKIN_RECORDED, "Total number of check-ins written");
    describe_counter!(
        CHECKIN_REJECTED,
        "Total number of check-ins refused for lack of an attending RSVP"
    );
    describe_counter!(
        ROLE_GRANT_FAILED,
        "Total number of attendee role grants that failed after check-in"
    );
    describe_counter!(MAIL_DISPATCHED, "Total number of transmissions accepted");
    describe_counter!(MAIL_RECIPIENTS, "Total number of recipients mailed");
    describe_counter!(
        MAIL_DISPATCH_FAILED,
        "Total number of transmissions that failed or were abandoned"
    );
}
