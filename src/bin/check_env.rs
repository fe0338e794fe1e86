//! Standalone check that the model API key is present and looks like a Google key.
//!
//! Usage: `check-env [--reveal]`. The key is masked unless `--reveal` is given.
//! Exits non-zero when the key is missing or has an unexpected prefix.

use std::process::ExitCode;

const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];
const EXPECTED_PREFIX: &str = "AIza";

fn mask(key: &str) -> String {
  let shown: String = key.chars().take(EXPECTED_PREFIX.len()).collect();
  let hidden = key.chars().count().saturating_sub(shown.chars().count());
  format!("{}{}", shown, "*".repeat(hidden))
}

/// Outcome of the check: the lines to print and whether it passed.
#[derive(Debug, PartialEq, Eq)]
struct Report {
  lines: Vec<String>,
  ok: bool,
}

/// Same lookup seam as the server's settings loader, so tests can feed a map.
fn check(get: impl Fn(&str) -> Option<String>, reveal: bool) -> Report {
  let found = KEY_VARS
    .iter()
    .find_map(|var| get(var).filter(|v| !v.trim().is_empty()).map(|v| (*var, v)));

  let Some((var, key)) = found else {
    return Report {
      lines: vec![format!("❌ API Key missing: set one of {}", KEY_VARS.join(", "))],
      ok: false,
    };
  };

  let shown = if reveal { key.clone() } else { mask(&key) };
  let mut lines = vec![format!("API Key loaded from {}: {}", var, shown)];
  let ok = key.starts_with(EXPECTED_PREFIX);
  lines.push(if ok { "✅ API Key seems valid format" } else { "❌ API Key missing or invalid" }.to_string());
  Report { lines, ok }
}

fn main() -> ExitCode {
  let reveal = std::env::args().skip(1).any(|a| a == "--reveal");
  let report = check(|var| std::env::var(var).ok(), reveal);
  for line in &report.lines {
    println!("{}", line);
  }
  if report.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
