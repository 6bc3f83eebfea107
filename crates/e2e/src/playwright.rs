//! Playwright browser automation.
//!
//! The whole spec is compiled to a single Node script and run once, so
//! page state (timers, dialogs, filled inputs) carries across steps.
//! Progress markers on stdout tell the runner how far the script got.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::spec::{DialogAction, TestStep, WaitState};

const STEP_MARKER: &str = "__STEP_OK";
const DEFAULT_CLICK_TIMEOUT_MS: u64 = 5000;
const DEFAULT_ASSERT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            viewport_width: 1280,
            viewport_height: 720,
            browser: Browser::Chromium,
            headless: true,
        }
    }
}

/// Outcome of one script run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub completed_steps: usize,
    pub total_steps: usize,
}

/// Playwright browser handle
pub struct PlaywrightHandle {
    config: PlaywrightConfig,
}

impl PlaywrightHandle {
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;
        std::fs::create_dir_all(&config.screenshot_dir)?;
        Ok(Self { config })
    }

    /// Check that node can resolve the playwright package.
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("node")
            .args(["-e", "require('playwright')"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Execute a list of steps as one browser session.
    pub async fn run_steps(&self, steps: &[TestStep]) -> E2eResult<RunOutcome> {
        let names = step_names(steps);
        let script = self.build_script(steps);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("spec.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        // Run from the invoking directory so node_modules resolution
        // finds the installed playwright package.
        let output = TokioCommand::new("node").arg(&script_path).output().await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let completed = last_completed_step(&stdout);

        if output.status.success() {
            return Ok(RunOutcome {
                completed_steps: completed,
                total_steps: names.len(),
            });
        }

        let failed_index = completed; // zero-based index of the step that failed
        let step = names
            .get(failed_index)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let reason = parse_failure_reason(&stderr)
            .unwrap_or_else(|| format!("stdout: {}\nstderr: {}", stdout.trim(), stderr.trim()));

        Err(E2eError::StepFailed {
            index: failed_index + 1,
            step,
            reason,
        })
    }

    /// Build the Node script for a set of steps.
    pub fn build_script(&self, steps: &[TestStep]) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

async function assertElement(page, selector, checks) {{
  const locator = page.locator(selector);
  const timeout = checks.timeout || {assert_timeout};
  if (checks.visible === true) await locator.first().waitFor({{ state: 'visible', timeout }});
  if (checks.visible === false) await locator.first().waitFor({{ state: 'hidden', timeout }});
  if (checks.count != null) {{
    const n = await locator.count();
    if (n !== checks.count) throw new Error(`count of ${{selector}} is ${{n}}, expected ${{checks.count}}`);
  }}
  if (checks.text != null) {{
    const t = ((await locator.first().textContent()) || '').trim();
    if (t !== checks.text) throw new Error(`text of ${{selector}} is "${{t}}", expected "${{checks.text}}"`);
  }}
  if (checks.textContains != null) {{
    const t = ((await locator.first().textContent()) || '');
    if (!t.includes(checks.textContains)) throw new Error(`text of ${{selector}} does not contain "${{checks.textContains}}"`);
  }}
  if (checks.enabled != null) {{
    const e = await locator.first().isEnabled();
    if (e !== checks.enabled) throw new Error(`enabled state of ${{selector}} is ${{e}}, expected ${{checks.enabled}}`);
  }}
  if (checks.value != null) {{
    const v = await locator.first().inputValue();
    if (v !== checks.value) throw new Error(`value of ${{selector}} is "${{v}}", expected "${{checks.value}}"`);
  }}
  if (checks.attribute != null) {{
    const a = await locator.first().getAttribute(checks.attribute.name);
    if (checks.attribute.value != null && a !== checks.attribute.value)
      throw new Error(`attribute ${{checks.attribute.name}} of ${{selector}} is "${{a}}", expected "${{checks.attribute.value}}"`);
    if (checks.attribute.contains != null && (a === null || !a.includes(checks.attribute.contains)))
      throw new Error(`attribute ${{checks.attribute.name}} of ${{selector}} does not contain "${{checks.attribute.contains}}"`);
  }}
}}

async function safeClick(page, selector, timeout) {{
  const locator = page.locator(selector);
  await locator.waitFor({{ state: 'visible', timeout }});
  await locator.scrollIntoViewIfNeeded();
  await locator.click({{ timeout }});
}}

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = '{base_url}';
  let step = 0;

  try {{
"#,
            assert_timeout = DEFAULT_ASSERT_TIMEOUT_MS,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport_width,
            height = self.config.viewport_height,
            base_url = js_str_inner(&self.config.base_url),
        ));

        let mut index = 0usize;
        let mut scope_id = 0usize;
        self.emit_steps(&mut script, steps, &mut index, &mut scope_id, 2);

        script.push_str(
            r#"
    console.log(JSON.stringify({ success: true, steps: step }));
  } catch (error) {
    console.error(JSON.stringify({ success: false, failed_step: step + 1, error: error.message }));
    process.exit(1);
  } finally {
    await browser.close();
  }
})();
"#,
        );
        script
    }

    fn emit_steps(
        &self,
        out: &mut String,
        steps: &[TestStep],
        index: &mut usize,
        scope_id: &mut usize,
        depth: usize,
    ) {
        let pad = "  ".repeat(depth);
        for step in steps {
            *index += 1;
            out.push_str(&format!("\n{}// Step {}: {}\n", pad, index, step_name(step)));
            match step {
                TestStep::DialogScope { dialog, steps } => {
                    *scope_id += 1;
                    let handler = format!("onDialog{}", scope_id);
                    let method = match dialog {
                        DialogAction::Accept => "accept",
                        DialogAction::Dismiss => "dismiss",
                    };
                    out.push_str(&format!(
                        "{pad}const {handler} = (dialog) => {{ dialog.{method}().catch(() => {{}}); }};\n{pad}page.on('dialog', {handler});\n",
                    ));
                    self.emit_steps(out, steps, index, scope_id, depth);
                    out.push_str(&format!("{pad}page.off('dialog', {handler});\n"));
                }
                other => {
                    out.push_str(&self.step_js(other, &pad));
                }
            }
            out.push_str(&mark(&pad));
        }
    }

    fn step_js(&self, step: &TestStep, pad: &str) -> String {
        match step {
            TestStep::Navigate {
                url,
                wait_for_selector,
            } => {
                let mut js = format!(
                    "{pad}await page.goto(baseUrl + {}, {{ waitUntil: 'networkidle' }});\n",
                    js_str(url),
                );
                if let Some(sel) = wait_for_selector {
                    js.push_str(&format!(
                        "{pad}await page.waitForSelector({});\n",
                        js_str(sel),
                    ));
                }
                js
            }
            TestStep::Click {
                selector,
                timeout_ms,
            } => format!(
                "{pad}await page.click({}, {{ timeout: {} }});\n",
                js_str(selector),
                timeout_ms.unwrap_or(DEFAULT_CLICK_TIMEOUT_MS),
            ),
            TestStep::SafeClick {
                selector,
                timeout_ms,
            } => format!(
                "{pad}await safeClick(page, {}, {});\n",
                js_str(selector),
                timeout_ms.unwrap_or(DEFAULT_CLICK_TIMEOUT_MS),
            ),
            TestStep::Fill {
                selector,
                value,
                clear_first,
            } => {
                let mut js = String::new();
                if *clear_first {
                    js.push_str(&format!("{pad}await page.fill({}, '');\n", js_str(selector)));
                }
                js.push_str(&format!(
                    "{pad}await page.fill({}, {});\n",
                    js_str(selector),
                    js_str(value),
                ));
                js
            }
            TestStep::Press { selector, key } => match selector {
                Some(sel) => format!(
                    "{pad}await page.locator({}).press({});\n",
                    js_str(sel),
                    js_str(key),
                ),
                None => format!("{pad}await page.keyboard.press({});\n", js_str(key)),
            },
            TestStep::Wait {
                selector,
                timeout_ms,
                state,
            } => {
                let state_str = match state {
                    WaitState::Visible => "visible",
                    WaitState::Hidden => "hidden",
                    WaitState::Attached => "attached",
                    WaitState::Detached => "detached",
                };
                format!(
                    "{pad}await page.waitForSelector({}, {{ state: '{}', timeout: {} }});\n",
                    js_str(selector),
                    state_str,
                    timeout_ms,
                )
            }
            TestStep::Sleep { ms } => format!("{pad}await page.waitForTimeout({});\n", ms),
            TestStep::Assert {
                selector,
                visible,
                text,
                text_contains,
                count,
                enabled,
                value,
                attribute,
            } => {
                let mut checks = serde_json::json!({
                    "visible": visible,
                    "text": text,
                    "textContains": text_contains,
                    "count": count,
                    "enabled": enabled,
                    "value": value,
                });
                if let Some(attr) = attribute {
                    checks["attribute"] = serde_json::json!({
                        "name": attr.name,
                        "value": attr.value,
                        "contains": attr.contains,
                    });
                }
                format!(
                    "{pad}await assertElement(page, {}, {});\n",
                    js_str(selector),
                    checks,
                )
            }
            TestStep::Screenshot { name, full_page } => {
                let path = self.config.screenshot_dir.join(format!("{}.png", name));
                format!(
                    "{pad}await page.screenshot({{ path: {}, fullPage: {} }});\n",
                    js_str(&path.to_string_lossy()),
                    full_page,
                )
            }
            TestStep::Hover { selector } => {
                format!("{pad}await page.hover({});\n", js_str(selector))
            }
            TestStep::Focus { selector } => {
                format!("{pad}await page.focus({});\n", js_str(selector))
            }
            TestStep::Select { selector, value } => format!(
                "{pad}await page.selectOption({}, {});\n",
                js_str(selector),
                js_str(value),
            ),
            TestStep::Check { selector } => {
                format!("{pad}await page.check({});\n", js_str(selector))
            }
            TestStep::Uncheck { selector } => {
                format!("{pad}await page.uncheck({});\n", js_str(selector))
            }
            TestStep::Evaluate { script } => {
                format!("{pad}await page.evaluate({});\n", js_str(script))
            }
            TestStep::Log { message } => {
                format!("{pad}console.log({});\n", js_str(message))
            }
            // Handled by emit_steps.
            TestStep::DialogScope { .. } => String::new(),
        }
    }
}

fn mark(pad: &str) -> String {
    format!("{pad}console.log(`{STEP_MARKER} ${{++step}}`);\n")
}

/// Human-readable name of a step, used in failure reports.
pub fn step_name(step: &TestStep) -> String {
    match step {
        TestStep::Navigate { url, .. } => format!("navigate:{}", url),
        TestStep::Click { selector, .. } => format!("click:{}", selector),
        TestStep::SafeClick { selector, .. } => format!("safe_click:{}", selector),
        TestStep::Fill { selector, .. } => format!("fill:{}", selector),
        TestStep::Press { key, .. } => format!("press:{}", key),
        TestStep::Wait { selector, .. } => format!("wait:{}", selector),
        TestStep::Sleep { ms } => format!("sleep:{}ms", ms),
        TestStep::Assert { selector, .. } => format!("assert:{}", selector),
        TestStep::Screenshot { name, .. } => format!("screenshot:{}", name),
        TestStep::Hover { selector } => format!("hover:{}", selector),
        TestStep::Focus { selector } => format!("focus:{}", selector),
        TestStep::Select { selector, .. } => format!("select:{}", selector),
        TestStep::Check { selector } => format!("check:{}", selector),
        TestStep::Uncheck { selector } => format!("uncheck:{}", selector),
        TestStep::Evaluate { .. } => "evaluate".to_string(),
        TestStep::DialogScope { dialog, .. } => format!("dialog_scope:{:?}", dialog),
        TestStep::Log { message } => {
            format!("log:{}", &message[..message.len().min(30)])
        }
    }
}

/// Flatten steps into marker order. A dialog scope reports its marker
/// after its inner steps, so its name comes after theirs.
fn step_names(steps: &[TestStep]) -> Vec<String> {
    fn walk(steps: &[TestStep], out: &mut Vec<String>) {
        for step in steps {
            if let TestStep::DialogScope { steps, .. } = step {
                walk(steps, out);
            }
            out.push(step_name(step));
        }
    }
    let mut out = Vec::new();
    walk(steps, &mut out);
    out
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__STEP_OK (\d+)").expect("static pattern"))
}

/// Highest step number the script reported before exiting.
fn last_completed_step(stdout: &str) -> usize {
    marker_re()
        .captures_iter(stdout)
        .filter_map(|c| c[1].parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}

#[derive(Deserialize)]
struct ScriptFailure {
    error: String,
}

fn parse_failure_reason(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .rev()
        .find_map(|line| serde_json::from_str::<ScriptFailure>(line.trim()).ok())
        .map(|f| f.error)
}

fn js_str(s: &str) -> String {
    format!("'{}'", js_str_inner(s))
}

fn js_str_inner(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> PlaywrightHandle {
        // Bypass the install check for script-generation tests.
        PlaywrightHandle {
            config: PlaywrightConfig::default(),
        }
    }

    #[test]
    fn script_navigates_with_network_idle() {
        let steps = vec![TestStep::Navigate {
            url: "/testing/login".to_string(),
            wait_for_selector: Some("[data-testid=\"login-form\"]".to_string()),
        }];
        let script = handle().build_script(&steps);
        assert!(script.contains("waitUntil: 'networkidle'"));
        assert!(script.contains("waitForSelector('[data-testid=\"login-form\"]')"));
        assert!(script.contains("__STEP_OK"));
    }

    #[test]
    fn dialog_scope_installs_and_removes_handler() {
        let steps = vec![TestStep::DialogScope {
            dialog: DialogAction::Accept,
            steps: vec![TestStep::Click {
                selector: "[data-testid=\"user-delete-btn-1\"]".to_string(),
                timeout_ms: None,
            }],
        }];
        let script = handle().build_script(&steps);
        assert!(script.contains("page.on('dialog', onDialog1)"));
        assert!(script.contains("dialog.accept()"));
        assert!(script.contains("page.off('dialog', onDialog1)"));
        // The handler is removed after the inner click.
        let on_pos = script.find("page.on('dialog'").unwrap();
        let click_pos = script.find("user-delete-btn-1").unwrap();
        let off_pos = script.find("page.off('dialog'").unwrap();
        assert!(on_pos < click_pos && click_pos < off_pos);
    }

    #[test]
    fn safe_click_scrolls_into_view() {
        let steps = vec![TestStep::SafeClick {
            selector: "[data-testid=\"pagination-next\"]".to_string(),
            timeout_ms: Some(2000),
        }];
        let script = handle().build_script(&steps);
        assert!(script.contains("scrollIntoViewIfNeeded"));
        assert!(script.contains("safeClick(page, '[data-testid=\"pagination-next\"]', 2000)"));
    }

    #[test]
    fn assertion_checks_are_embedded_as_json() {
        let steps = vec![TestStep::Assert {
            selector: "[data-testid=\"toast-message-success\"]".to_string(),
            visible: Some(true),
            text: None,
            text_contains: Some("completed".to_string()),
            count: None,
            enabled: None,
            value: None,
            attribute: None,
        }];
        let script = handle().build_script(&steps);
        assert!(script.contains("assertElement(page,"));
        assert!(script.contains("\"visible\":true"));
        assert!(script.contains("\"textContains\":\"completed\""));
        // No dependency on the @playwright/test expect API.
        assert!(!script.contains("expect("));
    }

    #[test]
    fn single_quotes_are_escaped() {
        let steps = vec![TestStep::Fill {
            selector: "#name".to_string(),
            value: "O'Brien".to_string(),
            clear_first: false,
        }];
        let script = handle().build_script(&steps);
        assert!(script.contains("O\\'Brien"));
    }

    #[test]
    fn progress_markers_are_parsed_from_stdout() {
        let stdout = "noise\n__STEP_OK 1\n__STEP_OK 2\n__STEP_OK 3\n";
        assert_eq!(last_completed_step(stdout), 3);
        assert_eq!(last_completed_step("no markers"), 0);
    }

    #[test]
    fn failure_reason_is_parsed_from_stderr() {
        let stderr = r#"{"success":false,"failed_step":2,"error":"timeout exceeded"}"#;
        assert_eq!(
            parse_failure_reason(stderr).as_deref(),
            Some("timeout exceeded")
        );
        assert!(parse_failure_reason("garbage").is_none());
    }
}
