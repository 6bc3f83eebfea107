//! Main test runner that orchestrates the server and Playwright

use std::path::PathBuf;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightHandle};
use crate::server::{ServerConfig, ServerHandle};
use crate::spec::TestSpec;
use crate::suites;

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub error: Option<String>,
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Main E2E test runner
pub struct TestRunner {
    server_config: ServerConfig,
    playwright_config: PlaywrightConfig,
    server: Option<ServerHandle>,
    specs_dir: PathBuf,
    output_dir: PathBuf,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            server_config: config.server,
            playwright_config: config.playwright,
            server: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Start the server
    pub async fn start_server(&mut self) -> E2eResult<()> {
        if self.server.is_some() {
            return Ok(());
        }

        let server = ServerHandle::spawn(self.server_config.clone()).await?;
        self.playwright_config.base_url = server.base_url().to_string();
        self.server = Some(server);
        Ok(())
    }

    /// Stop the server
    pub fn stop_server(&mut self) -> E2eResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        Ok(())
    }

    /// Every runnable spec: the built-in page-object suites first, then
    /// any YAML specs from the specs directory.
    pub fn available_specs(&self) -> E2eResult<Vec<TestSpec>> {
        let mut specs = suites::all();
        specs.extend(TestSpec::load_all(&self.specs_dir)?);
        Ok(specs)
    }

    /// Run the built-in suites and all tests in the specs directory
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let specs = self.available_specs()?;
        self.run_specs(&specs).await
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let filtered: Vec<TestSpec> = self
            .available_specs()?
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a specific test by name
    pub async fn run_test(&mut self, name: &str) -> E2eResult<TestResult> {
        let spec = self
            .available_specs()?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Test not found: {}", name)))?;

        self.start_server().await?;
        self.run_spec(&spec).await
    }

    /// Run a list of test specs
    pub async fn run_specs(&mut self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        self.start_server().await?;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            let result = self.run_spec(spec).await?;
            if result.success {
                passed += 1;
                info!("ok {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "FAILED {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            total: specs.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Run a single test spec. Step failures are reported in the result;
    /// only harness-level faults (server down, node missing) are errors.
    pub async fn run_spec(&mut self, spec: &TestSpec) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        let mut pw_config = self.playwright_config.clone();
        pw_config.viewport_width = spec.viewport.width;
        pw_config.viewport_height = spec.viewport.height;

        let playwright = PlaywrightHandle::new(pw_config)?;
        let total_steps = spec.step_count();

        match playwright.run_steps(&spec.steps).await {
            Ok(outcome) => Ok(TestResult {
                name: spec.name.clone(),
                success: true,
                duration_ms: start.elapsed().as_millis() as u64,
                completed_steps: outcome.completed_steps,
                total_steps,
                error: None,
            }),
            Err(E2eError::StepFailed {
                index,
                step,
                reason,
            }) => Ok(TestResult {
                name: spec.name.clone(),
                success: false,
                duration_ms: start.elapsed().as_millis() as u64,
                completed_steps: index.saturating_sub(1),
                total_steps,
                error: Some(format!("step {} ({}): {}", index, step, reason)),
            }),
            Err(e) => Err(e),
        }
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_server();
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub server: ServerConfig,
    pub playwright: PlaywrightConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            playwright: PlaywrightConfig::default(),
            specs_dir: PathBuf::from("tests/specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_specs_list_builtin_suites_before_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("90_custom.yaml"),
            "name: custom-flow\ntags: [custom]\nsteps: []\n",
        )
        .unwrap();

        let runner = TestRunner::with_config(RunnerConfig {
            specs_dir: dir.path().to_path_buf(),
            ..Default::default()
        });
        let names: Vec<String> = runner
            .available_specs()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();

        let login_pos = names.iter().position(|n| n == "login-success").unwrap();
        let crud_pos = names.iter().position(|n| n == "user-crud").unwrap();
        let custom_pos = names.iter().position(|n| n == "custom-flow").unwrap();
        assert!(login_pos < crud_pos && crud_pos < custom_pos);
    }

    #[test]
    fn suite_result_serializes_to_json() {
        let suite = TestSuiteResult {
            total: 2,
            passed: 1,
            failed: 1,
            duration_ms: 1234,
            results: vec![TestResult {
                name: "login-success".to_string(),
                success: true,
                duration_ms: 600,
                completed_steps: 5,
                total_steps: 5,
                error: None,
            }],
        };
        let json = serde_json::to_string(&suite).unwrap();
        assert!(json.contains("\"passed\":1"));
        assert!(json.contains("login-success"));
    }
}
