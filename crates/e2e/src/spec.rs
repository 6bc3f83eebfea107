//! Declarative YAML test specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete test specification parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport size for the browser
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

fn default_viewport() -> Viewport {
    Viewport {
        width: 1280,
        height: 720,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A single step in a test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to base). Waits for the network to go
    /// idle so timers on the page start from a settled state.
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Scroll an element into view, then click it. For targets that may
    /// sit below the fold.
    SafeClick {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Press a key
    Press {
        #[serde(default)]
        selector: Option<String>,
        key: String,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly; prefer `wait`)
    Sleep { ms: u64 },

    /// Assert something about an element
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        enabled: Option<bool>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        attribute: Option<AttributeAssertion>,
    },

    /// Take a screenshot (artifact only, no comparison)
    Screenshot {
        name: String,
        #[serde(default)]
        full_page: bool,
    },

    /// Hover over an element
    Hover { selector: String },

    /// Focus an element
    Focus { selector: String },

    /// Select an option from a dropdown
    Select { selector: String, value: String },

    /// Check a checkbox
    Check { selector: String },

    /// Uncheck a checkbox
    Uncheck { selector: String },

    /// Execute custom JavaScript in the page
    Evaluate { script: String },

    /// Run inner steps with a native-dialog handler installed, then
    /// remove the handler. Native confirm/alert dialogs are otherwise
    /// auto-dismissed by the browser driver, so any step that triggers
    /// one must sit inside a scope.
    DialogScope {
        dialog: DialogAction,
        steps: Vec<TestStep>,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

fn default_wait_timeout() -> u64 {
    10_000
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogAction {
    Accept,
    Dismiss,
}

/// Attribute check on an element. `value` asserts exact equality,
/// `contains` a substring; either may be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all test specs from a directory, sorted by file name so runs
    /// are deterministic.
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let entries: Vec<_> = walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();

        let mut specs = Vec::new();
        for entry in entries {
            let spec = Self::from_file(entry.path()).map_err(|e| {
                E2eError::SpecParse(format!("{}: {}", entry.path().display(), e))
            })?;
            specs.push(spec);
        }
        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Total step count including steps nested in dialog scopes.
    pub fn step_count(&self) -> usize {
        fn count(steps: &[TestStep]) -> usize {
            steps
                .iter()
                .map(|s| match s {
                    TestStep::DialogScope { steps, .. } => 1 + count(steps),
                    _ => 1,
                })
                .sum()
        }
        count(&self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_spec() {
        let yaml = r#"
name: login-flow
description: Sign in with the sandbox credentials
tags:
  - auth
  - smoke
steps:
  - action: navigate
    url: /testing/login
    wait_for_selector: '[data-testid="login-form"]'
  - action: fill
    selector: '[data-testid="login-username-input"]'
    value: qa_tester
  - action: click
    selector: '[data-testid="login-submit-btn"]'
"#;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.name, "login-flow");
        assert_eq!(spec.steps.len(), 3);
        assert_eq!(spec.viewport.width, 1280);
    }

    #[test]
    fn parse_dialog_scope_spec() {
        let yaml = r#"
name: delete-user
steps:
  - action: dialog_scope
    dialog: accept
    steps:
      - action: safe_click
        selector: '[data-testid="user-delete-btn-1"]'
      - action: wait
        selector: '[data-testid="user-item-1"]'
        state: detached
"#;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        match &spec.steps[0] {
            TestStep::DialogScope { dialog, steps } => {
                assert_eq!(*dialog, DialogAction::Accept);
                assert_eq!(steps.len(), 2);
            }
            other => panic!("expected dialog scope, got {:?}", other),
        }
        assert_eq!(spec.step_count(), 3);
    }

    #[test]
    fn wait_defaults_to_visible() {
        let yaml = r#"
name: wait-default
steps:
  - action: wait
    selector: '[data-testid="delayed-element"]'
"#;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        match &spec.steps[0] {
            TestStep::Wait {
                timeout_ms, state, ..
            } => {
                assert_eq!(*timeout_ms, 10_000);
                assert!(matches!(state, WaitState::Visible));
            }
            other => panic!("expected wait, got {:?}", other),
        }
    }

    #[test]
    fn filter_by_tag_matches_exactly() {
        let yaml_a = "name: a\ntags: [smoke]\nsteps: []\n";
        let yaml_b = "name: b\ntags: [tables]\nsteps: []\n";
        let specs = vec![
            TestSpec::from_yaml(yaml_a).unwrap(),
            TestSpec::from_yaml(yaml_b).unwrap(),
        ];
        let filtered = TestSpec::filter_by_tag(&specs, "smoke");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "a");
    }
}
