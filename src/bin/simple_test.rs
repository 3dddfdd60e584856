//! Simple test simulator.
//!
//! Demonstrates how to create and store test data in the TestTrace platform:
//! a basic test sequence with an initialization phase, a voltage measurement,
//! and a temperature measurement, followed by an overall status update.
//!
//! Usage:
//!   cargo run --bin simple-test [-- --url http://localhost:8000]

use std::env;
use std::time::Duration;

use rand::Rng;
use serde_json::{json, Value};

const DEFAULT_URL: &str = "http://localhost:8000";

struct TestTraceClient {
    base_url: String,
    http: reqwest::Client,
}

impl TestTraceClient {
    fn new(base_url: String) -> Self {
        TestTraceClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Create a new test run.
    async fn create_test_run(
        &self,
        name: &str,
        uut_id: &str,
        uut_serial: &str,
        meta_data: Value,
    ) -> Result<Value, reqwest::Error> {
        let payload = json!({
            "name": name,
            "uut_id": uut_id,
            "uut_serial": uut_serial,
            "meta_data": meta_data,
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

        println!("Created test run: {} (ID: {})", run["name"], run["id"]);
        Ok(run)
    }

    /// Add a test phase to an existing run.
    async fn add_test_phase(
        &self,
        test_run_id: i64,
        name: &str,
        status: &str,
        measurements: Value,
        duration: f64,
    ) -> Result<Value, reqwest::Error> {
        let payload = json!({
            "name": name,
            "test_run_id": test_run_id,
            "status": status,
            "measurements": measurements,
            "duration": duration,
            "description": "Phase created by simple-test",
        });

        let phase: Value = self
            .http
            .post(format!("{}/test-phases", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        println!("Added phase: {} with status: {}", phase["name"], phase["status"]);
        Ok(phase)
    }

    /// Update the overall run status.
    async fn update_run_status(
        &self,
        test_run_id: i64,
        status: &str,
    ) -> Result<(), reqwest::Error> {
        self.http
            .put(format!("{}/test-runs/{}/status", self.base_url, test_run_id))
            .json(&json!({ "status": status }))
            .send()
            .await?
            .error_for_status()?;

        println!("Updated run {} status to {}", test_run_id, status);
        Ok(())
    }
}

async fn run_fake_test(client: &TestTraceClient) -> Result<bool, reqwest::Error> {
    let now = chrono::Utc::now().timestamp();

    let run = client
        .create_test_run(
            "Example Simple Test",
            &format!("DEVICE-{}", now),
            &format!("SN-{}", now),
            json!({
                "version": "1.0.0",
                "operator": "Automated Script",
                "description": "A simple example test",
            }),
        )
        .await?;
    let run_id = run["id"].as_i64().expect("run id");

    // Initialization phase
    println!("\nRunning initialization phase...");
    tokio::time::sleep(Duration::from_millis(500)).await;
    client
        .add_test_phase(run_id, "Initialization", "passed", json!({}), 1.0)
        .await?;

    // Voltage measurement phase: 3.3V +/- 0.2V against 3.2..3.4 limits
    println!("\nRunning voltage measurement phase...");
    tokio::time::sleep(Duration::from_millis(500)).await;
    let voltage: f64 = 3.3 + rand::thread_rng().gen_range(-0.2..0.2);
    let voltage_in_range = (3.2..=3.4).contains(&voltage);
    client
        .add_test_phase(
            run_id,
            "Voltage Measurement",
            if voltage_in_range { "passed" } else { "failed" },
            json!({
                "voltage": {
                    "value": (voltage * 100.0).round() / 100.0,
                    "unit": "V",
                    "limits": { "min": 3.2, "max": 3.4 },
                    "status": if voltage_in_range { "PASS" } else { "FAIL" },
                }
            }),
            1.5,
        )
        .await?;

    // Temperature measurement phase: 25C +/- 10C against 20..30 limits
    println!("\nRunning temperature measurement phase...");
    tokio::time::sleep(Duration::from_millis(500)).await;
    let temperature: f64 = 25.0 + rand::thread_rng().gen_range(-10.0..10.0);
    let temp_in_range = (20.0..=30.0).contains(&temperature);
    client
        .add_test_phase(
            run_id,
            "Temperature Measurement",
            if temp_in_range { "passed" } else { "failed" },
            json!({
                "temperature": {
                    "value": (temperature * 10.0).round() / 10.0,
                    "unit": "degC",
                    "limits": { "min": 20.0, "max": 30.0 },
                    "status": if temp_in_range { "PASS" } else { "FAIL" },
                }
            }),
            2.0,
        )
        .await?;

    let all_passed = voltage_in_range && temp_in_range;
    let overall = if all_passed { "passed" } else { "failed" };
    client.update_run_status(run_id, overall).await?;

    println!("\nTest complete: {}", overall.to_uppercase());
    Ok(all_passed)
}

fn print_usage() {
    println!("Usage: simple-test [--url URL]");
    println!();
    println!("Options:");
    println!("  --url URL    TestTrace server base URL (default: {})", DEFAULT_URL);
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let mut base_url = DEFAULT_URL.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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

    let client = TestTraceClient::new(base_url);
    match run_fake_test(&client).await {
        Ok(true) => println!("All phases passed"),
        Ok(false) => println!("Some phases failed (run marked failed on the server)"),
        Err(e) => {
            eprintln!("Error talking to TestTrace server: {}", e);
            std::process::exit(1);
        }
    }
}
