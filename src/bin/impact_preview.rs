#!/usr/bin/env rust
//! Impact Preview
//!
//! Shows how the rule table scores a single listing without running the
//! collectors. Useful when tuning impact_rules.toml.
//!
//! Usage:
//!   cargo run --bin impact_preview -- "Downtown Parade" "Main Street" "5:00 PM"
//!   cargo run --bin impact_preview -- "Fall Home Expo" "Convention Hall"
//!
//! Options:
//!   --rules PATH    Rule table to use (default: built-in rules)

use std::env;
use valetops_service::analysis::classifier::classify;
use valetops_service::analysis::time_parse::parse_time;
use valetops_service::analysis::timeline::build_timeline;
use valetops_service::rules::ImpactRules;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎯 Impact Preview");
    println!("=================\n");

    let args: Vec<String> = env::args().collect();
    let mut rules_path: Option<String> = None;
    let mut positional = Vec::new();

    let mut i = 1;
    while i < args.len() {
        if args[i] == "--rules" {
            rules_path = args.get(i + 1).cloned();
            if rules_path.is_none() {
                return Err("--rules requires a path".into());
            }
            i += 2;
        } else {
            positional.push(args[i].clone());
            i += 1;
        }
    }

    if positional.len() < 2 {
        eprintln!("Usage: {} TITLE VENUE [TIME] [--rules PATH]", args[0]);
        std::process::exit(1);
    }

    let rules = match &rules_path {
        Some(path) => ImpactRules::load(path)?,
        None => ImpactRules::default(),
    };

    let title = &positional[0];
    let venue = &positional[1];
    let time = positional.get(2).map(String::as_str);

    let profile = classify(&rules, title, venue);
    let start = parse_time(time);
    let timeline = build_timeline(&rules, &profile, start);

    println!("   Rules:    {}", rules.version);
    println!("   Title:    {}", title);
    println!("   Venue:    {}", venue);
    match start {
        Some(t) => println!("   Start:    {:02}:{:02} {:?}", t.hour, t.minute, t.meridiem),
        None => println!("   Start:    (none found)"),
    }
    println!("   Severity: {}", profile.base_severity);
    println!("   Duration: {} h\n", profile.duration_hours);

    let preview = serde_json::json!({
        "base_severity": profile.base_severity,
        "duration_hours": profile.duration_hours,
        "impact_timeline": timeline,
    });
    println!("{}", serde_json::to_string_pretty(&preview)?);

    Ok(())
}
