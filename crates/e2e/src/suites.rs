//! Built-in scenario suites composed from the page objects.
//!
//! These are the canonical flows for every playground page that has a
//! page object. The runner executes them before any YAML specs, so the
//! page-object layer is exercised on every run; YAML remains the
//! extension point for ad-hoc declarative scenarios.

use crate::pages::{
    tid, AsyncPage, BasicFormsPage, LoginPage, TablesPage, UiPage, UsersPage,
};
use crate::spec::{TestSpec, TestStep, Viewport, WaitState};

fn suite(name: &str, description: &str, tags: &[&str], steps: Vec<TestStep>) -> TestSpec {
    TestSpec {
        name: name.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        viewport: Viewport {
            width: 1280,
            height: 720,
        },
        steps,
    }
}

fn assert_enabled(testid: &str, enabled: bool) -> TestStep {
    TestStep::Assert {
        selector: tid(testid),
        visible: None,
        text: None,
        text_contains: None,
        count: None,
        enabled: Some(enabled),
        value: None,
        attribute: None,
    }
}

fn wait_for(testid: &str, state: WaitState, timeout_ms: u64) -> TestStep {
    TestStep::Wait {
        selector: tid(testid),
        timeout_ms,
        state,
    }
}

/// Every built-in suite, in execution order.
pub fn all() -> Vec<TestSpec> {
    vec![
        login_success(),
        login_failure(),
        basic_form(),
        tables(),
        toasts_and_modal(),
        async_widgets(),
        user_crud(),
    ]
}

pub fn login_success() -> TestSpec {
    let mut steps = vec![LoginPage::goto()];
    steps.extend(LoginPage::login("qa_tester", "password123"));
    steps.push(LoginPage::expect_success_modal());
    steps.extend(LoginPage::dismiss_success());
    suite(
        "login-success",
        "The sandbox pair reaches the success modal; dismissing it clears both fields",
        &["auth", "smoke"],
        steps,
    )
}

pub fn login_failure() -> TestSpec {
    let mut steps = vec![LoginPage::goto()];
    steps.extend(LoginPage::login("qa_tester", "wrong_password"));
    steps.push(LoginPage::expect_error());
    // The form is editable again and the success surface never showed.
    steps.push(assert_enabled("login-username-input", true));
    steps.push(assert_enabled("login-submit-btn", true));
    steps.push(TestStep::Assert {
        selector: tid("login-success-overlay"),
        visible: Some(false),
        text: None,
        text_contains: None,
        count: None,
        enabled: None,
        value: None,
        attribute: None,
    });
    suite(
        "login-failure",
        "A wrong pair shows the error banner and re-enables the form",
        &["auth"],
        steps,
    )
}

pub fn basic_form() -> TestSpec {
    let mut steps = vec![BasicFormsPage::goto()];
    steps.extend(BasicFormsPage::fill_valid("ada@qa-sandbox.com"));
    steps.push(BasicFormsPage::submit_expecting_alert());
    steps.push(TestStep::SafeClick {
        selector: tid("reset-btn"),
        timeout_ms: None,
    });
    steps.push(TestStep::Assert {
        selector: tid("form-email"),
        visible: None,
        text: None,
        text_contains: None,
        count: None,
        enabled: None,
        value: Some(String::new()),
        attribute: None,
    });
    suite(
        "basic-form",
        "Submitting the classic form raises a native alert; reset clears the fields",
        &["forms"],
        steps,
    )
}

pub fn tables() -> TestSpec {
    let mut steps = vec![TablesPage::goto(), TablesPage::expect_row_count(10)];
    steps.extend(TablesPage::next_page());
    steps.push(TablesPage::expect_row(1010));
    // Same-column sort flips direction and resets to page 1.
    steps.extend(TablesPage::sort_by("id"));
    steps.push(TablesPage::expect_row(1024));
    steps.extend(TablesPage::sort_by("id"));
    steps.push(TablesPage::expect_row(1000));
    steps.extend(TablesPage::search("tester25"));
    steps.push(TablesPage::expect_row(1024));
    steps.push(TablesPage::expect_row_count(1));
    steps.extend(TablesPage::search("no-such-row"));
    steps.push(wait_for("table-empty", WaitState::Visible, 5000));
    suite(
        "tables",
        "Pagination, sort toggling and search over the 25-row fixture",
        &["tables"],
        steps,
    )
}

pub fn toasts_and_modal() -> TestSpec {
    let mut steps = vec![UiPage::goto()];
    steps.extend(UiPage::open_modal());
    steps.extend(UiPage::accept_modal());
    steps.push(UiPage::fire_success_toast());
    steps.push(UiPage::expect_toast("success"));
    steps.push(UiPage::fire_error_toast());
    steps.push(UiPage::expect_toast("error"));
    steps.push(UiPage::wait_toast_gone("success"));
    steps.push(UiPage::wait_toast_gone("error"));
    suite(
        "toasts-and-modal",
        "Modal open/accept, then two toasts that each expire on their own",
        &["ui"],
        steps,
    )
}

pub fn async_widgets() -> TestSpec {
    let steps = vec![
        AsyncPage::goto(),
        AsyncPage::start_loader(),
        assert_enabled("async-loader-btn", false),
        AsyncPage::expect_loader_done(),
        assert_enabled("async-loader-btn", true),
        // Both one-shot timers armed together; each trigger stays dead
        // for the rest of the cycle.
        AsyncPage::trigger_appear(),
        AsyncPage::trigger_disappear(),
        AsyncPage::wait_for_appear(),
        AsyncPage::wait_for_disappear(),
        assert_enabled("trigger-appear-btn", false),
        assert_enabled("trigger-disappear-btn", false),
    ];
    suite(
        "async-widgets",
        "Loader completes and re-enables; appear/disappear fire once after their delay",
        &["async"],
        steps,
    )
}

pub fn user_crud() -> TestSpec {
    let mut steps = vec![
        UsersPage::goto(),
        wait_for("users-empty", WaitState::Visible, 5000),
    ];
    steps.extend(UsersPage::create_user("ada@qa-sandbox.com", "Ada", "editor"));
    steps.push(TestStep::Wait {
        selector: "[data-testid^=\"user-item-\"]".to_string(),
        timeout_ms: 10_000,
        state: WaitState::Visible,
    });
    steps.push(UsersPage::expect_user_listed("Ada"));
    // Dismissing the confirm keeps the record; accepting removes it.
    steps.push(UsersPage::delete_first_listed(false));
    steps.push(UsersPage::expect_user_listed("Ada"));
    steps.push(UsersPage::delete_first_listed(true));
    steps.push(wait_for("users-empty", WaitState::Visible, 10_000));
    suite(
        "user-crud",
        "Create a user through the modal, then delete it through the native confirm",
        &["users"],
        steps,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::DialogAction;
    use std::collections::HashSet;

    #[test]
    fn suite_names_are_unique_and_non_empty() {
        let suites = all();
        assert!(!suites.is_empty());
        let names: HashSet<_> = suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), suites.len());
        for s in &suites {
            assert!(!s.steps.is_empty(), "suite {} has no steps", s.name);
            assert!(!s.tags.is_empty(), "suite {} has no tags", s.name);
        }
    }

    #[test]
    fn login_success_ends_with_cleared_fields() {
        let spec = login_success();
        let cleared = spec
            .steps
            .iter()
            .filter(|s| {
                matches!(s, TestStep::Assert { value: Some(v), .. } if v.is_empty())
            })
            .count();
        assert_eq!(cleared, 2);
    }

    #[test]
    fn user_crud_answers_both_confirm_outcomes() {
        let spec = user_crud();
        let dialogs: Vec<_> = spec
            .steps
            .iter()
            .filter_map(|s| match s {
                TestStep::DialogScope { dialog, .. } => Some(*dialog),
                _ => None,
            })
            .collect();
        assert_eq!(
            dialogs,
            vec![DialogAction::Dismiss, DialogAction::Accept]
        );
    }

    #[test]
    fn tables_suite_searches_before_asserting_a_single_row() {
        let spec = tables();
        let search_pos = spec
            .steps
            .iter()
            .position(|s| matches!(s, TestStep::Fill { selector, .. }
                if selector.contains("table-search-input")))
            .unwrap();
        let count_one_pos = spec
            .steps
            .iter()
            .position(|s| matches!(s, TestStep::Assert { count: Some(1), .. }))
            .unwrap();
        assert!(search_pos < count_one_pos);
    }
}
