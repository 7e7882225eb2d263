/// Title/venue classification into an impact profile.
///
/// Severity and duration are two independent first-match-wins walks over
/// the rule table. A matching duration rule may also carry a severity cap,
/// which is applied to whatever severity the first walk produced.

use crate::model::ImpactProfile;
use crate::rules::ImpactRules;

/// Classify an event. Never fails: unmatched text falls through to the
/// table defaults.
pub fn classify(rules: &ImpactRules, title: &str, venue: &str) -> ImpactProfile {
    let title = title.to_lowercase();
    let venue = venue.to_lowercase();

    let mut base_severity = rules
        .severity
        .iter()
        .find(|rule| rule.matches(&title, &venue))
        .map(|rule| rule.severity)
        .unwrap_or(rules.default_severity);

    let duration_hours = match rules.duration.iter().find(|rule| rule.matches(&title)) {
        Some(rule) => {
            if let Some(cap) = rule.severity_cap {
                base_severity = base_severity.min(cap);
            }
            rule.hours
        }
        None => rules.default_duration_hours,
    };

    ImpactProfile { base_severity, duration_hours }
}
