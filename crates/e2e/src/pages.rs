//! Typed page objects for the playground pages.
//!
//! Each page object knows its route and test identifiers and produces
//! step sequences for the common flows, so YAML specs and Rust-driven
//! suites share one vocabulary for selectors.

use crate::spec::{DialogAction, TestStep, WaitState};

/// Selector for a `data-testid` attribute.
pub fn tid(name: &str) -> String {
    format!("[data-testid=\"{}\"]", name)
}

fn wait_visible(name: &str, timeout_ms: u64) -> TestStep {
    TestStep::Wait {
        selector: tid(name),
        timeout_ms,
        state: WaitState::Visible,
    }
}

/// Login simulation page.
pub struct LoginPage;

impl LoginPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/login".to_string(),
            wait_for_selector: Some(tid("login-form")),
        }
    }

    /// Fill both fields and submit.
    pub fn login(username: &str, password: &str) -> Vec<TestStep> {
        vec![
            TestStep::Fill {
                selector: tid("login-username-input"),
                value: username.to_string(),
                clear_first: true,
            },
            TestStep::Fill {
                selector: tid("login-password-input"),
                value: password.to_string(),
                clear_first: true,
            },
            TestStep::Click {
                selector: tid("login-submit-btn"),
                timeout_ms: None,
            },
        ]
    }

    pub fn expect_error() -> TestStep {
        TestStep::Assert {
            selector: tid("login-error-message"),
            visible: Some(true),
            text: None,
            text_contains: None,
            count: None,
            enabled: None,
            value: None,
            attribute: None,
        }
    }

    pub fn expect_success_modal() -> TestStep {
        wait_visible("login-success-modal", 10_000)
    }

    /// Close the success modal. This clears both credential fields.
    pub fn dismiss_success() -> Vec<TestStep> {
        vec![
            TestStep::Click {
                selector: tid("login-success-close-btn"),
                timeout_ms: None,
            },
            TestStep::Wait {
                selector: tid("login-success-overlay"),
                timeout_ms: 5000,
                state: WaitState::Hidden,
            },
            TestStep::Assert {
                selector: tid("login-username-input"),
                visible: None,
                text: None,
                text_contains: None,
                count: None,
                enabled: None,
                value: Some(String::new()),
                attribute: None,
            },
            TestStep::Assert {
                selector: tid("login-password-input"),
                visible: None,
                text: None,
                text_contains: None,
                count: None,
                enabled: None,
                value: Some(String::new()),
                attribute: None,
            },
        ]
    }
}

/// Async interactions page.
pub struct AsyncPage;

impl AsyncPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/async".to_string(),
            wait_for_selector: Some(tid("async-loader-btn")),
        }
    }

    pub fn start_loader() -> TestStep {
        TestStep::Click {
            selector: tid("async-loader-btn"),
            timeout_ms: None,
        }
    }

    /// The loader completes after 3s; allow headroom, never a bare sleep.
    pub fn expect_loader_done() -> TestStep {
        wait_visible("async-success-msg", 6000)
    }

    pub fn trigger_appear() -> TestStep {
        TestStep::Click {
            selector: tid("trigger-appear-btn"),
            timeout_ms: None,
        }
    }

    /// The delayed element attaches after 5s.
    pub fn wait_for_appear() -> TestStep {
        wait_visible("delayed-element", 8000)
    }

    pub fn trigger_disappear() -> TestStep {
        TestStep::Click {
            selector: tid("trigger-disappear-btn"),
            timeout_ms: None,
        }
    }

    /// The target detaches from the DOM after 5s.
    pub fn wait_for_disappear() -> TestStep {
        TestStep::Wait {
            selector: tid("element-to-hide"),
            timeout_ms: 8000,
            state: WaitState::Detached,
        }
    }
}

/// Floating UI components page.
pub struct UiPage;

impl UiPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/ui".to_string(),
            wait_for_selector: Some(tid("open-modal-btn")),
        }
    }

    pub fn open_modal() -> Vec<TestStep> {
        vec![
            TestStep::Click {
                selector: tid("open-modal-btn"),
                timeout_ms: None,
            },
            wait_visible("modal-dialog", 5000),
        ]
    }

    pub fn accept_modal() -> Vec<TestStep> {
        vec![
            TestStep::Click {
                selector: tid("modal-accept-btn"),
                timeout_ms: None,
            },
            TestStep::Wait {
                selector: tid("modal-overlay"),
                timeout_ms: 5000,
                state: WaitState::Hidden,
            },
        ]
    }

    pub fn fire_success_toast() -> TestStep {
        TestStep::Click {
            selector: tid("toast-success-btn"),
            timeout_ms: None,
        }
    }

    pub fn fire_error_toast() -> TestStep {
        TestStep::Click {
            selector: tid("toast-error-btn"),
            timeout_ms: None,
        }
    }

    pub fn expect_toast(kind: &str) -> TestStep {
        wait_visible(&format!("toast-message-{}", kind), 3000)
    }

    /// Each toast self-expires 3s after it was shown.
    pub fn wait_toast_gone(kind: &str) -> TestStep {
        TestStep::Wait {
            selector: tid(&format!("toast-message-{}", kind)),
            timeout_ms: 5000,
            state: WaitState::Detached,
        }
    }
}

/// Classic forms page.
pub struct BasicFormsPage;

impl BasicFormsPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/forms/basic".to_string(),
            wait_for_selector: Some(tid("classic-form")),
        }
    }

    pub fn fill_valid(email: &str) -> Vec<TestStep> {
        vec![
            TestStep::Fill {
                selector: tid("form-email"),
                value: email.to_string(),
                clear_first: true,
            },
            TestStep::Select {
                selector: tid("form-select"),
                value: "opt1".to_string(),
            },
            TestStep::Check {
                selector: tid("form-terms"),
            },
        ]
    }

    /// Submission raises a native alert, so the click sits in a scope.
    pub fn submit_expecting_alert() -> TestStep {
        TestStep::DialogScope {
            dialog: DialogAction::Accept,
            steps: vec![TestStep::SafeClick {
                selector: tid("submit-btn"),
                timeout_ms: None,
            }],
        }
    }
}

/// Tables page.
pub struct TablesPage;

impl TablesPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/tables".to_string(),
            wait_for_selector: Some(tid("data-table")),
        }
    }

    /// Type a query and submit the search form.
    pub fn search(query: &str) -> Vec<TestStep> {
        vec![
            TestStep::Fill {
                selector: tid("table-search-input"),
                value: query.to_string(),
                clear_first: true,
            },
            TestStep::Press {
                selector: Some(tid("table-search-input")),
                key: "Enter".to_string(),
            },
            wait_visible("data-table", 5000),
        ]
    }

    pub fn sort_by(column: &str) -> Vec<TestStep> {
        vec![
            TestStep::SafeClick {
                selector: format!("{} a", tid(&format!("col-header-{}", column))),
                timeout_ms: None,
            },
            wait_visible("data-table", 5000),
        ]
    }

    pub fn next_page() -> Vec<TestStep> {
        vec![
            TestStep::SafeClick {
                selector: tid("pagination-next"),
                timeout_ms: None,
            },
            wait_visible("data-table", 5000),
        ]
    }

    pub fn expect_row(id: i64) -> TestStep {
        wait_visible(&format!("row-{}", id), 5000)
    }

    pub fn expect_row_count(count: usize) -> TestStep {
        TestStep::Assert {
            selector: format!("{} tbody tr", tid("data-table")),
            visible: None,
            text: None,
            text_contains: None,
            count: Some(count),
            enabled: None,
            value: None,
            attribute: None,
        }
    }
}

/// User management page.
pub struct UsersPage;

impl UsersPage {
    pub fn goto() -> TestStep {
        TestStep::Navigate {
            url: "/testing/users".to_string(),
            wait_for_selector: Some(tid("user-new-btn")),
        }
    }

    pub fn create_user(email: &str, name: &str, role: &str) -> Vec<TestStep> {
        vec![
            TestStep::Click {
                selector: tid("user-new-btn"),
                timeout_ms: None,
            },
            wait_visible("users-modal", 5000),
            TestStep::Fill {
                selector: tid("user-email-input"),
                value: email.to_string(),
                clear_first: true,
            },
            TestStep::Fill {
                selector: tid("user-name-input"),
                value: name.to_string(),
                clear_first: true,
            },
            TestStep::Select {
                selector: tid("user-role-select"),
                value: role.to_string(),
            },
            TestStep::Click {
                selector: tid("user-save-btn"),
                timeout_ms: None,
            },
        ]
    }

    pub fn expect_user_listed(name: &str) -> TestStep {
        TestStep::Assert {
            selector: tid("users-list"),
            visible: Some(true),
            text: None,
            text_contains: Some(name.to_string()),
            count: None,
            enabled: None,
            value: None,
            attribute: None,
        }
    }

    /// Deletion pops a native confirm; the scoped handler answers it.
    pub fn delete_user(id: i64, confirm: bool) -> TestStep {
        Self::delete_via(tid(&format!("user-delete-btn-{}", id)), confirm)
    }

    /// Delete whichever record is listed first, for flows where the id
    /// was assigned by the server during the run.
    pub fn delete_first_listed(confirm: bool) -> TestStep {
        Self::delete_via("[data-testid^=\"user-delete-btn-\"]".to_string(), confirm)
    }

    fn delete_via(selector: String, confirm: bool) -> TestStep {
        TestStep::DialogScope {
            dialog: if confirm {
                DialogAction::Accept
            } else {
                DialogAction::Dismiss
            },
            steps: vec![TestStep::SafeClick {
                selector,
                timeout_ms: None,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tid_builds_attribute_selectors() {
        assert_eq!(tid("login-form"), "[data-testid=\"login-form\"]");
    }

    #[test]
    fn login_flow_fills_before_submitting() {
        let steps = LoginPage::login("qa_tester", "password123");
        assert_eq!(steps.len(), 3);
        assert!(matches!(&steps[0], TestStep::Fill { clear_first: true, .. }));
        assert!(matches!(&steps[2], TestStep::Click { .. }));
    }

    #[test]
    fn dismissing_success_checks_cleared_fields() {
        let steps = LoginPage::dismiss_success();
        let cleared: Vec<_> = steps
            .iter()
            .filter(|s| matches!(s, TestStep::Assert { value: Some(v), .. } if v.is_empty()))
            .collect();
        assert_eq!(cleared.len(), 2);
    }

    #[test]
    fn delete_user_wraps_click_in_dialog_scope() {
        match UsersPage::delete_user(42, true) {
            TestStep::DialogScope { dialog, steps } => {
                assert_eq!(dialog, DialogAction::Accept);
                assert!(matches!(&steps[0], TestStep::SafeClick { selector, .. }
                    if selector.contains("user-delete-btn-42")));
            }
            other => panic!("expected dialog scope, got {:?}", other),
        }
        assert!(matches!(
            UsersPage::delete_user(42, false),
            TestStep::DialogScope { dialog: DialogAction::Dismiss, .. }
        ));
    }

    #[test]
    fn delete_first_listed_targets_the_testid_prefix() {
        match UsersPage::delete_first_listed(true) {
            TestStep::DialogScope { steps, .. } => {
                assert!(matches!(&steps[0], TestStep::SafeClick { selector, .. }
                    if selector == "[data-testid^=\"user-delete-btn-\"]"));
            }
            other => panic!("expected dialog scope, got {:?}", other),
        }
    }

    #[test]
    fn async_waits_use_explicit_states_not_sleeps() {
        for step in [
            AsyncPage::expect_loader_done(),
            AsyncPage::wait_for_appear(),
            AsyncPage::wait_for_disappear(),
        ] {
            assert!(matches!(step, TestStep::Wait { .. }));
        }
    }
}
