// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation framework for the `validate_*` binaries.
//!
//! The original research scripts reported everything as free-form prints;
//! here every claim becomes an explicit pass/fail check against an expected
//! value, with the tolerance applied printed alongside.
//!
//! Every validation binary follows the same contract:
//! - Expected values hardcoded from the corpus's own documented examples
//! - Explicit pass/fail per check with human-readable output
//! - Exit code 0 = all passed, 1 = at least one failed, 2 = skipped
//!
//! # Usage
//!
//! ```
//! use matroidlab::validation::Validator;
//!
//! let mut v = Validator::new("doc-test");
//! v.check("pi", std::f64::consts::PI, 3.14159, 1e-4);
//! v.check_count("records", 10, 10);
//! v.check_true("non-empty", true);
//! assert_eq!(v.counts(), (3, 3));
//! ```

/// Accumulated validation state: banner, per-check lines, summary.
pub struct Validator {
    name: String,
    passed: u32,
    total: u32,
}

impl Validator {
    /// Create a new validator for the given binary name and print its banner.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        println!("────────────────────────────────────────────────────────");
        println!("  {name}");
        println!("────────────────────────────────────────────────────────\n");
        Self {
            name,
            passed: 0,
            total: 0,
        }
    }

    /// Print a section header (no check counted).
    pub fn section(&self, label: &str) {
        println!("\n── {label} ──");
    }

    /// Check an f64 value against expected within absolute tolerance.
    /// Tolerance `0.0` requires exact match.
    pub fn check(&mut self, label: &str, actual: f64, expected: f64, tolerance: f64) {
        let pass = (actual - expected).abs() <= tolerance;
        self.record(pass);
        let tag = if pass { "OK" } else { "FAIL" };
        println!("  [{tag}]  {label}: {actual:.6} (expected {expected:.6}, tol {tolerance:.6})");
    }

    /// Check an exact count — no floating-point conversion.
    pub fn check_count(&mut self, label: &str, actual: usize, expected: usize) {
        let pass = actual == expected;
        self.record(pass);
        let tag = if pass { "OK" } else { "FAIL" };
        println!("  [{tag}]  {label}: {actual} (expected {expected})");
    }

    /// Check a boolean condition.
    pub fn check_true(&mut self, label: &str, condition: bool) {
        self.record(condition);
        let tag = if condition { "OK" } else { "FAIL" };
        println!("  [{tag}]  {label}");
    }

    fn record(&mut self, pass: bool) {
        self.total += 1;
        if pass {
            self.passed += 1;
        }
    }

    /// Retrieve current (passed, total) for external logic.
    #[must_use]
    pub const fn counts(&self) -> (u32, u32) {
        (self.passed, self.total)
    }

    /// Print the summary line without exiting. Returns whether all passed.
    #[must_use]
    pub fn summarize(&self) -> bool {
        println!("\n────────────────────────────────────────────────────────");
        println!("  {}: {}/{} checks passed", self.name, self.passed, self.total);
        if self.passed == self.total {
            println!("  RESULT: PASS");
        } else {
            println!("  RESULT: FAIL ({} checks failed)", self.total - self.passed);
        }
        println!("────────────────────────────────────────────────────────");
        self.passed == self.total
    }

    /// Print summary and exit with 0 (pass) or 1 (fail).
    pub fn finish(self) -> ! {
        let ok = self.summarize();
        std::process::exit(i32::from(!ok))
    }
}

/// Exit with code 2 indicating the run was skipped (data unavailable).
pub fn exit_skipped(reason: &str) -> ! {
    println!("  SKIP: {reason}");
    println!("  (exit 2 = skipped, not a failure)");
    std::process::exit(2)
}

/// Resolve a data file or directory using env-var override or a
/// manifest-relative default.
///
/// Checks `env_var` first (runtime override, e.g. `MATROIDLAB_ATTRIBUTES`),
/// then falls back to `CARGO_MANIFEST_DIR/{default_subpath}`.
#[must_use]
pub fn data_dir(env_var: &str, default_subpath: &str) -> std::path::PathBuf {
    std::env::var(env_var).map_or_else(
        |_| std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(default_subpath),
        std::path::PathBuf::from,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_accumulates() {
        let mut v = Validator::new("test");
        v.check("ok", 1.0, 1.0, 0.0);
        v.check("fail", 2.0, 1.0, 0.0);
        v.check_count("count_ok", 5, 5);
        v.check_count("count_fail", 4, 5);
        v.check_true("true_ok", true);
        assert_eq!(v.counts(), (3, 5));
    }

    #[test]
    fn validator_within_tolerance() {
        let mut v = Validator::new("tol");
        v.check("close", 42.001, 42.0, 0.01);
        assert_eq!(v.counts(), (1, 1));
    }

    #[test]
    fn section_does_not_count() {
        let v = Validator::new("sections");
        v.section("some section");
        assert_eq!(v.counts(), (0, 0));
    }

    #[test]
    fn summarize_pass_and_fail() {
        let mut pass = Validator::new("all-pass");
        pass.check_count("n", 1, 1);
        assert!(pass.summarize());

        let mut fail = Validator::new("one-fail");
        fail.check_count("n", 1, 2);
        assert!(!fail.summarize());
    }

    #[test]
    fn data_dir_fallback_uses_manifest() {
        let dir = data_dir("MATROIDLAB_NONEXISTENT_12345", "data/test");
        let s = dir.to_string_lossy();
        assert!(s.contains("data/test"), "path should contain subpath");
    }

    #[test]
    fn data_dir_env_override() {
        let key = "MATROIDLAB_TEST_DATA_DIR_UNIT";
        // SAFETY: test-only env mutation; unique key avoids cross-test races.
        unsafe { std::env::set_var(key, "/tmp/override") };
        let dir = data_dir(key, "data/default");
        assert_eq!(dir, std::path::PathBuf::from("/tmp/override"));
        // SAFETY: cleanup matching the set_var above.
        unsafe { std::env::remove_var(key) };
    }
}
