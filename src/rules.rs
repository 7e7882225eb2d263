/// Impact rule table loader - parses impact_rules.toml
///
/// Severity and duration rules, window multipliers and rush lengths are
/// data, not code. The classifier walks these lists in file order, so the
/// order of `[[severity]]` and `[[duration]]` entries is significant.
///
/// `ImpactRules::default()` is the rule set shipped in `impact_rules.toml`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::model::ValetError;

/// Upper bound for any duration, lead or tail in the table.
pub const MAX_RULE_HOURS: f64 = 24.0;

fn valid_hours(h: f64) -> bool {
    h.is_finite() && h > 0.0 && h <= MAX_RULE_HOURS
}

// ============================================================================
// TOML Configuration Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImpactRules {
    /// Identifies the tuning revision in logs and output diagnostics
    pub version: String,
    pub default_severity: u8,
    pub default_duration_hours: f64,
    pub factors: WindowFactors,
    pub windows: WindowLengths,
    #[serde(default)]
    pub severity: Vec<SeverityRule>,
    #[serde(default)]
    pub duration: Vec<DurationRule>,
}

/// Multipliers applied to base severity for the arrival and during windows.
/// Departure always carries the full base severity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WindowFactors {
    pub arrival: f64,
    pub during: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WindowLengths {
    pub arrival_lead_hours: f64,
    pub departure_tail_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeverityRule {
    pub severity: u8,
    #[serde(default)]
    pub title_any: Vec<String>,
    #[serde(default)]
    pub venue_any: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DurationRule {
    pub hours: f64,
    #[serde(default)]
    pub title_any: Vec<String>,
    /// Upper bound applied to the severity when this rule is the one that matched
    pub severity_cap: Option<u8>,
}

// ============================================================================
// Matching
// ============================================================================

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw.as_str()))
}

impl SeverityRule {
    /// Both arguments must already be lower-cased.
    pub fn matches(&self, title: &str, venue: &str) -> bool {
        contains_any(title, &self.title_any) || contains_any(venue, &self.venue_any)
    }
}

impl DurationRule {
    /// `title` must already be lower-cased.
    pub fn matches(&self, title: &str) -> bool {
        contains_any(title, &self.title_any)
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl ImpactRules {
    /// Load a rule table from TOML, lower-case its keywords and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ValetError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ValetError> {
        let mut rules: ImpactRules = toml::from_str(content)?;
        rules.normalize();
        rules.validate()?;
        Ok(rules)
    }

    fn normalize(&mut self) {
        let lower = |words: &mut Vec<String>| {
            for word in words.iter_mut() {
                *word = word.to_lowercase();
            }
        };
        for rule in &mut self.severity {
            lower(&mut rule.title_any);
            lower(&mut rule.venue_any);
        }
        for rule in &mut self.duration {
            lower(&mut rule.title_any);
        }
    }

    /// Rejects tables that could yield a severity outside 1..=10 or a
    /// duration outside (0, 24] hours.
    pub fn validate(&self) -> Result<(), ValetError> {
        let invalid = |msg: String| Err(ValetError::InvalidRules(msg));
        let in_scale = |s: u8| (1..=10).contains(&s);

        if self.version.trim().is_empty() {
            return invalid("version must not be empty".to_string());
        }
        if !in_scale(self.default_severity) {
            return invalid(format!("default_severity {} outside 1..=10", self.default_severity));
        }
        if !valid_hours(self.default_duration_hours) {
            return invalid(format!(
                "default_duration_hours {} outside (0, {}]",
                self.default_duration_hours, MAX_RULE_HOURS
            ));
        }
        for (name, factor) in [("arrival", self.factors.arrival), ("during", self.factors.during)] {
            if !(0.0..=1.0).contains(&factor) {
                return invalid(format!("{} factor {} outside [0, 1]", name, factor));
            }
        }
        if !valid_hours(self.windows.arrival_lead_hours) || !valid_hours(self.windows.departure_tail_hours) {
            return invalid(format!("window lengths must be within (0, {}] hours", MAX_RULE_HOURS));
        }

        for (i, rule) in self.severity.iter().enumerate() {
            if !in_scale(rule.severity) {
                return invalid(format!("severity rule {} has severity {} outside 1..=10", i + 1, rule.severity));
            }
            if rule.title_any.is_empty() && rule.venue_any.is_empty() {
                return invalid(format!("severity rule {} has no keywords", i + 1));
            }
        }
        for (i, rule) in self.duration.iter().enumerate() {
            if !valid_hours(rule.hours) {
                return invalid(format!(
                    "duration rule {} has hours {} outside (0, {}]",
                    i + 1,
                    rule.hours,
                    MAX_RULE_HOURS
                ));
            }
            if rule.title_any.is_empty() {
                return invalid(format!("duration rule {} has no keywords", i + 1));
            }
            if let Some(cap) = rule.severity_cap {
                if !in_scale(cap) {
                    return invalid(format!("duration rule {} has severity_cap {} outside 1..=10", i + 1, cap));
                }
            }
        }

        Ok(())
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for ImpactRules {
    fn default() -> Self {
        let severity = |severity, title: &[&str], venue: &[&str]| SeverityRule {
            severity,
            title_any: words(title),
            venue_any: words(venue),
        };
        let duration = |hours, title: &[&str], severity_cap| DurationRule {
            hours,
            title_any: words(title),
            severity_cap,
        };

        Self {
            version: "2024-fall".to_string(),
            default_severity: 3,
            default_duration_hours: 2.0,
            factors: WindowFactors { arrival: 0.8, during: 0.2 },
            windows: WindowLengths { arrival_lead_hours: 1.5, departure_tail_hours: 1.0 },
            severity: vec![
                // Parades and Panoply always dominate venue-based scoring
                severity(10, &["havoc", "parade", "panoply"], &["propst"]),
                severity(7, &[], &["concert hall", "mark c"]),
                severity(6, &[], &["mars music"]),
                severity(4, &[], &["hall", "convention"]),
                severity(4, &[], &["big spring", "park"]),
            ],
            duration: vec![
                duration(8.0, &["panoply"], None),
                duration(2.0, &["parade"], None),
                duration(2.5, &["havoc"], None),
                duration(3.0, &["tour", "comedy", "concert", "live"], None),
                duration(4.0, &["rally", "festival", "market"], None),
                duration(6.0, &["expo", "banquet"], Some(5)),
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
