//! Hardware motor test simulator.
//!
//! Simulates qualification testing of a motor controller: startup behavior,
//! speed accuracy against a target RPM, and load performance at increasing
//! load points. Results are posted to the TestTrace server and a JSON report
//! is written to disk.
//!
//! Usage:
//!   cargo run --bin motor-test [-- --device-id ID --serial SERIAL --rpm RPM]

use std::env;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde_json::{json, Map, Value};

const DEFAULT_URL: &str = "http://localhost:8000";
const DEFAULT_TARGET_RPM: f64 = 3000.0;

/// A single measurement with optional limits and a PASS/FAIL verdict.
fn measurement(value: f64, unit: &str, limits: Value) -> Value {
    let status = if within_limits(value, &limits) {
        "PASS"
    } else {
        "FAIL"
    };
    json!({
        "value": value,
        "unit": unit,
        "limits": limits,
        "status": status,
    })
}

/// Check a value against `{ "min": .., "max": .. }` limits; missing bounds pass.
fn within_limits(value: f64, limits: &Value) -> bool {
    if let Some(min) = limits.get("min").and_then(Value::as_f64) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = limits.get("max").and_then(Value::as_f64) {
        if value > max {
            return false;
        }
    }
    true
}

fn all_passed(measurements: &Map<String, Value>) -> bool {
    measurements
        .values()
        .all(|m| m.get("status").and_then(Value::as_str) == Some("PASS"))
}

struct MotorTest {
    base_url: String,
    device_id: String,
    serial_number: String,
    target_rpm: f64,
    http: reqwest::Client,
    run_id: Option<i64>,
    phases: Vec<Value>,
}

impl MotorTest {
    fn new(base_url: String, device_id: String, serial_number: String, target_rpm: f64) -> Self {
        MotorTest {
            base_url,
            device_id,
            serial_number,
            target_rpm,
            http: reqwest::Client::new(),
            run_id: None,
            phases: Vec::new(),
        }
    }

    async fn create_test_run(&mut self) -> Result<(), reqwest::Error> {
        let payload = json!({
            "name": format!("Motor Test - {}", self.serial_number),
            "uut_id": self.device_id,
            "uut_serial": self.serial_number,
            "meta_data": {
                "target_rpm": self.target_rpm,
                "test_type": "Motor Qualification",
                "firmware_version": "2.5.1",
                "hardware_version": "4.2",
            },
        });

        let run: Value = self
            .http
            .post(format!("{}/test-runs", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.run_id = run["id"].as_i64();
        println!("Created motor test run (ID: {})", run["id"]);
        Ok(())
    }

    async fn post_phase(
        &mut self,
        name: &str,
        measurements: Map<String, Value>,
        duration: f64,
    ) -> Result<bool, reqwest::Error> {
        let passed = all_passed(&measurements);
        let status = if passed { "passed" } else { "failed" };

        let payload = json!({
            "name": name,
            "test_run_id": self.run_id,
            "status": status,
            "measurements": measurements,
            "duration": duration,
        });

        self.http
            .post(format!("{}/test-phases", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        println!("  Phase status: {}", status.to_uppercase());
        self.phases.push(json!({
            "name": name,
            "status": status,
            "duration": duration,
            "measurements": payload["measurements"],
        }));

        Ok(passed)
    }

    async fn test_motor_startup(&mut self) -> Result<bool, reqwest::Error> {
        println!("\nRunning motor startup test...");
        tokio::time::sleep(Duration::from_millis(500)).await;

        let startup_time = rand::thread_rng().gen_range(0.8..1.5);
        let current_spike = rand::thread_rng().gen_range(1.5..2.5);

        let mut m = Map::new();
        m.insert(
            "startup_time".to_string(),
            measurement(startup_time, "s", json!({ "max": 1.2 })),
        );
        m.insert(
            "startup_current".to_string(),
            measurement(current_spike, "A", json!({ "max": 2.0 })),
        );

        println!("  Startup Time: {:.2}s (limit: 1.2s)", startup_time);
        println!("  Current Spike: {:.2}A (limit: 2.0A)", current_spike);

        self.post_phase("Motor Startup", m, 2.0).await
    }

    async fn test_speed_accuracy(&mut self) -> Result<bool, reqwest::Error> {
        println!("\nRunning speed accuracy test...");
        tokio::time::sleep(Duration::from_millis(500)).await;

        let actual_rpm = self.target_rpm + rand::thread_rng().gen_range(-150.0..150.0);
        let speed_error = (actual_rpm - self.target_rpm) / self.target_rpm * 100.0;

        let mut m = Map::new();
        m.insert(
            "actual_rpm".to_string(),
            measurement(
                actual_rpm,
                "RPM",
                json!({
                    "min": self.target_rpm * 0.95,
                    "max": self.target_rpm * 1.05,
                }),
            ),
        );
        m.insert(
            "speed_error".to_string(),
            measurement(speed_error, "%", json!({ "min": -5.0, "max": 5.0 })),
        );

        println!("  Target RPM: {}", self.target_rpm);
        println!("  Actual RPM: {:.1}", actual_rpm);
        println!("  Speed Error: {:.2}% (limit: +/-5.0%)", speed_error);

        self.post_phase("Speed Accuracy", m, 3.0).await
    }

    async fn test_load_performance(&mut self) -> Result<bool, reqwest::Error> {
        println!("\nRunning load performance test...");

        let mut m = Map::new();
        for load in [25u32, 50, 75, 100] {
            println!("  Testing at {}% load...", load);
            tokio::time::sleep(Duration::from_millis(250)).await;

            let fraction = load as f64 / 100.0;
            let current_draw =
                fraction * 5.0 * (1.0 + rand::thread_rng().gen_range(-0.15..0.15));
            let temp_rise = fraction * 40.0 * (1.0 + rand::thread_rng().gen_range(-0.1..0.3));

            // Limits: 120% of expected current, 125% of expected temperature rise
            let current_limit = fraction * 5.0 * 1.2;
            let temp_limit = fraction * 40.0 * 1.25;

            m.insert(
                format!("load_{}pct_current", load),
                measurement(current_draw, "A", json!({ "max": current_limit })),
            );
            m.insert(
                format!("load_{}pct_temp_rise", load),
                measurement(temp_rise, "degC", json!({ "max": temp_limit })),
            );

            println!("    Current: {:.2}A (limit: {:.2}A)", current_draw, current_limit);
            println!("    Temp Rise: {:.1}degC (limit: {:.1}degC)", temp_rise, temp_limit);
        }

        self.post_phase("Load Performance", m, 4.0).await
    }

    async fn complete(&self, status: &str) -> Result<(), reqwest::Error> {
        let run_id = self.run_id.expect("run must be created first");
        self.http
            .put(format!("{}/test-runs/{}/status", self.base_url, run_id))
            .json(&json!({ "status": status }))
            .send()
            .await?
            .error_for_status()?;

        println!("\nCompleted motor test run with status: {}", status.to_uppercase());
        Ok(())
    }

    /// Write a JSON report of the whole run to the output directory.
    fn generate_report(&self, output_dir: &Path, status: &str) -> std::io::Result<String> {
        std::fs::create_dir_all(output_dir)?;

        let report = json!({
            "test_run": {
                "id": self.run_id,
                "name": format!("Motor Test - {}", self.serial_number),
                "device_id": self.device_id,
                "serial_number": self.serial_number,
                "target_rpm": self.target_rpm,
                "status": status,
                "generated_at": chrono::Utc::now().to_rfc3339(),
            },
            "phases": self.phases,
        });

        let filename = output_dir
            .join(format!(
                "motor_test_report_{}.json",
                self.run_id.unwrap_or_else(|| chrono::Utc::now().timestamp())
            ))
            .display()
            .to_string();

        std::fs::write(&filename, serde_json::to_string_pretty(&report)?)?;
        println!("Generated test report: {}", filename);
        Ok(filename)
    }
}

fn print_usage() {
    println!("Usage: motor-test [--device-id ID] [--serial SERIAL] [--rpm RPM] [--url URL]");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let mut base_url = DEFAULT_URL.to_string();
    let mut device_id: Option<String> = None;
    let mut serial: Option<String> = None;
    let mut target_rpm = DEFAULT_TARGET_RPM;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--device-id" => {
                i += 1;
                if i < args.len() {
                    device_id = Some(args[i].clone());
                }
            }
            "--serial" => {
                i += 1;
                if i < args.len() {
                    serial = Some(args[i].clone());
                }
            }
            "--rpm" => {
                i += 1;
                if i < args.len() {
                    target_rpm = match args[i].parse() {
                        Ok(rpm) => rpm,
                        Err(_) => {
                            eprintln!("Invalid RPM: {}", args[i]);
                            std::process::exit(1);
                        }
                    };
                }
            }
            "--url" => {
                i += 1;
                if i < args.len() {
                    base_url = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let now = chrono::Utc::now().timestamp();
    let device_id = device_id.unwrap_or_else(|| format!("MOTOR-{}", now));
    let serial = serial.unwrap_or_else(|| format!("SN{}", now));

    let mut test = MotorTest::new(base_url, device_id, serial, target_rpm);

    let result = async {
        test.create_test_run().await?;
        let startup_ok = test.test_motor_startup().await?;
        let speed_ok = test.test_speed_accuracy().await?;
        let load_ok = test.test_load_performance().await?;

        let status = if startup_ok && speed_ok && load_ok {
            "passed"
        } else {
            "failed"
        };
        test.complete(status).await?;
        Ok::<&str, reqwest::Error>(status)
    }
    .await;

    match result {
        Ok(status) => {
            if let Err(e) = test.generate_report(Path::new("reports"), status) {
                eprintln!("Failed to write report: {}", e);
            }
        }
        Err(e) => {
            eprintln!("Error talking to TestTrace server: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limits() {
        assert!(within_limits(1.0, &json!({ "max": 1.2 })));
        assert!(!within_limits(1.3, &json!({ "max": 1.2 })));
        assert!(within_limits(0.0, &json!({ "min": -5.0, "max": 5.0 })));
        assert!(!within_limits(-6.0, &json!({ "min": -5.0, "max": 5.0 })));
        // Missing bounds pass
        assert!(within_limits(1e9, &json!({})));
    }

    #[test]
    fn test_measurement_verdicts() {
        let m = measurement(1.0, "s", json!({ "max": 1.2 }));
        assert_eq!(m["status"], "PASS");

        let m = measurement(2.5, "A", json!({ "max": 2.0 }));
        assert_eq!(m["status"], "FAIL");
    }

    #[test]
    fn test_report_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let test = MotorTest::new(
            "http://localhost:8000".to_string(),
            "MOTOR-1".to_string(),
            "SN1".to_string(),
            3000.0,
        );

        let filename = test.generate_report(dir.path(), "passed").unwrap();
        let body = std::fs::read_to_string(&filename).unwrap();
        let report: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(report["test_run"]["status"], "passed");
        assert_eq!(report["test_run"]["serial_number"], "SN1");
    }

    #[test]
    fn test_all_passed() {
        let mut m = Map::new();
        m.insert("a".to_string(), measurement(1.0, "s", json!({ "max": 2.0 })));
        m.insert("b".to_string(), measurement(1.0, "s", json!({ "max": 2.0 })));
        assert!(all_passed(&m));

        m.insert("c".to_string(), measurement(3.0, "s", json!({ "max": 2.0 })));
        assert!(!all_passed(&m));
    }
}
