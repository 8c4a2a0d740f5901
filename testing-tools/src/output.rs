use colored::*;
use std::time::{Duration, Instant};

use crate::api_client::Delivery;

#[derive(Debug)]
pub struct TestResult {
    pub scenario: String,
    pub passed: bool,
    pub message: Option<String>,
    pub duration: Duration,
}

impl TestResult {
    /// Compares what the receiver answered with what the scenario expects.
    /// `expected_body` of `None` skips the body check.
    pub fn check(
        scenario: &str,
        delivery: &Delivery,
        expected_status: u16,
        expected_body: Option<&str>,
        start: Instant,
    ) -> Self {
        let status_ok = delivery.status == expected_status;
        let body_ok = expected_body.map_or(true, |expected| delivery.body == expected);

        let message = if status_ok && body_ok {
            println!("{} Receiver answered as expected", "✓".green());
            None
        } else {
            println!("{} Unexpected answer from receiver", "✗".red());
            Some(format!(
                "Expected {} {:?}, got {} {:?}",
                expected_status,
                expected_body.unwrap_or("<any>"),
                delivery.status,
                delivery.body
            ))
        };

        TestResult {
            scenario: scenario.to_string(),
            passed: message.is_none(),
            message,
            duration: start.elapsed(),
        }
    }
}

pub fn print_delivery(delivery: &Delivery) {
    let status = if delivery.status < 300 {
        delivery.status.to_string().green()
    } else {
        delivery.status.to_string().yellow()
    };

    println!("   {} {}", status.bold(), delivery.body.dimmed());
}

pub fn print_test_summary(results: &[TestResult]) {
    println!("\n{}", "=== TEST SUMMARY ===".bright_white().bold());

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    for result in results {
        let status = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("[{}] {} ({:?})", status, result.scenario, result.duration);

        if let Some(msg) = &result.message {
            println!("      {}", msg.dimmed());
        }
    }

    println!(
        "\n{}: {} passed, {} failed",
        "Results".bold(),
        passed.to_string().green(),
        failed.to_string().red()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(status: u16, body: &str) -> Delivery {
        Delivery {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_check_passes_on_matching_status_and_body() {
        let result = TestResult::check("ok", &delivery(200, "OK"), 200, Some("OK"), Instant::now());
        assert!(result.passed);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_check_ignores_body_when_not_expected() {
        let result = TestResult::check("any", &delivery(401, "nope"), 401, None, Instant::now());
        assert!(result.passed);
    }

    #[test]
    fn test_check_fails_on_body_mismatch() {
        let result = TestResult::check(
            "mismatch",
            &delivery(200, r#"{"challenge":"abc"}"#),
            200,
            Some(r#"{"challenge": "abc"}"#),
            Instant::now(),
        );
        assert!(!result.passed);
        assert!(result.message.unwrap().contains("Expected 200"));
    }
}
