//! Playground page rendering.
//!
//! Every interactive element carries a stable `data-testid` used only by
//! the test harness. Locale changes displayed text, never identifiers or
//! behavior. Localized strings needed by page scripts are passed through
//! `data-*` attributes so the scripts themselves stay locale-free.

use sandbox_common::i18n::Msg;
use sandbox_common::{Locale, UserRecord};
use sandbox_surface::delayed::VISIBILITY_DELAY_MS;
use sandbox_surface::latency::LATENCY_MS;
use sandbox_surface::table::{self, SortDirection, SortKey, TableState};
use sandbox_surface::toast::TOAST_LIFETIME_MS;
use std::collections::HashMap;

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #18181b; }
nav { display: flex; gap: 1rem; padding: 1rem 2rem; background: #fff; border-bottom: 1px solid #e4e4e7; flex-wrap: wrap; }
main { max-width: 64rem; margin: 2rem auto; padding: 0 1rem; }
.card { background: #fff; border: 1px solid #e4e4e7; border-radius: 8px; padding: 1.5rem; margin-bottom: 1.5rem; }
.error-banner { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; padding: .75rem; border-radius: 6px; margin: .5rem 0; }
.success-banner { background: #f0fdf4; border: 1px solid #bbf7d0; color: #15803d; padding: .75rem; border-radius: 6px; margin: .5rem 0; }
.overlay { position: fixed; inset: 0; background: rgba(0,0,0,.5); display: flex; align-items: center; justify-content: center; z-index: 50; }
.dialog { background: #fff; border-radius: 8px; padding: 2rem; max-width: 24rem; width: 100%; }
.toast-container { position: fixed; bottom: 1rem; right: 1rem; display: flex; flex-direction: column; gap: .5rem; z-index: 50; }
.toast { padding: .75rem 1rem; border-radius: 6px; border: 1px solid; font-size: .9rem; }
.toast-success { background: #f0fdf4; border-color: #bbf7d0; color: #166534; }
.toast-error { background: #fef2f2; border-color: #fecaca; color: #991b1b; }
.tooltip-wrap { position: relative; display: inline-block; }
.tooltip-wrap .tooltip-body { visibility: hidden; position: absolute; bottom: 100%; left: 0; background: #18181b; color: #fff; padding: .4rem .6rem; border-radius: 4px; white-space: nowrap; font-size: .8rem; }
.tooltip-wrap:hover .tooltip-body { visibility: visible; }
table { width: 100%; border-collapse: collapse; font-size: .9rem; }
th, td { text-align: left; padding: .6rem .8rem; border-bottom: 1px solid #e4e4e7; }
th a { color: inherit; text-decoration: none; }
button { cursor: pointer; padding: .5rem 1rem; border-radius: 6px; border: 1px solid #d4d4d8; background: #18181b; color: #fff; }
button.secondary { background: #fff; color: #18181b; }
button:disabled { opacity: .5; cursor: not-allowed; }
input, select, textarea { padding: .5rem; border: 1px solid #d4d4d8; border-radius: 6px; font: inherit; }
label { display: block; margin: .6rem 0 .2rem; font-weight: 500; font-size: .9rem; }
.hint { font-size: .75rem; color: #71717a; }
.context-zone { height: 8rem; border: 2px dashed #d4d4d8; border-radius: 8px; display: flex; align-items: center; justify-content: center; color: #71717a; user-select: none; }
"#;

fn nav(locale: Locale) -> String {
    let lang = locale.code();
    let links = [
        ("/", Msg::NavHome),
        ("/testing/login", Msg::NavLogin),
        ("/testing/async", Msg::NavAsync),
        ("/testing/ui", Msg::NavUi),
        ("/testing/forms/basic", Msg::NavFormsBasic),
        ("/testing/forms/dynamic", Msg::NavFormsDynamic),
        ("/testing/calendar", Msg::NavCalendar),
        ("/testing/tables", Msg::NavTables),
        ("/testing/users", Msg::NavUsers),
    ];
    links
        .iter()
        .map(|(href, msg)| {
            format!(
                r#"<a href="{href}?lang={lang}" data-testid="nav-{slug}">{text}</a>"#,
                href = href,
                lang = lang,
                slug = if *href == "/" {
                    "home".to_string()
                } else {
                    href.trim_start_matches("/testing/").replace('/', "-")
                },
                text = msg.text(locale),
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ")
}

fn layout(locale: Locale, title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — QA Sandbox</title>
<style>{style}</style>
</head>
<body>
<nav data-testid="main-nav">
    {nav}
    <span style="margin-left:auto">
        <a href="?lang=en" data-testid="locale-en">EN</a>
        <a href="?lang=es" data-testid="locale-es">ES</a>
    </span>
</nav>
<main>
{body}
</main>
{script}
</body>
</html>
"#,
        lang = locale.code(),
        title = escape(title),
        style = STYLE,
        nav = nav(locale),
        body = body,
        script = if script.is_empty() {
            String::new()
        } else {
            format!("<script>\n{}\n</script>", script)
        },
    )
}

pub fn index(locale: Locale) -> String {
    let body = format!(
        r#"<h1 data-testid="index-title">{title}</h1>
<p>{intro}</p>
<ul data-testid="playground-list">
    <li><a href="/testing/login?lang={lang}">{login}</a></li>
    <li><a href="/testing/async?lang={lang}">{async_}</a></li>
    <li><a href="/testing/ui?lang={lang}">{ui}</a></li>
    <li><a href="/testing/forms/basic?lang={lang}">{forms}</a></li>
    <li><a href="/testing/forms/dynamic?lang={lang}">{dynamic}</a></li>
    <li><a href="/testing/calendar?lang={lang}">{calendar}</a></li>
    <li><a href="/testing/tables?lang={lang}">{tables}</a></li>
    <li><a href="/testing/users?lang={lang}">{users}</a></li>
</ul>"#,
        title = Msg::IndexTitle.text(locale),
        intro = Msg::IndexIntro.text(locale),
        lang = locale.code(),
        login = Msg::NavLogin.text(locale),
        async_ = Msg::NavAsync.text(locale),
        ui = Msg::NavUi.text(locale),
        forms = Msg::NavFormsBasic.text(locale),
        dynamic = Msg::NavFormsDynamic.text(locale),
        calendar = Msg::NavCalendar.text(locale),
        tables = Msg::NavTables.text(locale),
        users = Msg::NavUsers.text(locale),
    );
    layout(locale, Msg::IndexTitle.text(locale), &body, "")
}

// ============================================================================
// Login
// ============================================================================

const LOGIN_SCRIPT: &str = r#"
const form = document.querySelector('[data-testid="login-form"]');
const userInput = document.querySelector('[data-testid="login-username-input"]');
const passInput = document.querySelector('[data-testid="login-password-input"]');
const submitBtn = document.querySelector('[data-testid="login-submit-btn"]');
const errorBox = document.querySelector('[data-testid="login-error-message"]');
const overlay = document.querySelector('[data-testid="login-success-overlay"]');
const closeBtn = document.querySelector('[data-testid="login-success-close-btn"]');

form.addEventListener('submit', async (e) => {
    e.preventDefault();
    // Submit control disabled while pending: no duplicate submissions.
    submitBtn.disabled = true;
    userInput.disabled = true;
    passInput.disabled = true;
    submitBtn.textContent = submitBtn.dataset.labelPending;
    errorBox.hidden = true;
    try {
        const resp = await fetch('/api/auth/login', {
            method: 'POST',
            headers: { 'content-type': 'application/json' },
            body: JSON.stringify({ username: userInput.value, password: passInput.value }),
        });
        if (resp.ok) {
            overlay.hidden = false;
        } else {
            errorBox.hidden = false;
        }
    } catch (err) {
        errorBox.hidden = false;
    } finally {
        submitBtn.disabled = false;
        userInput.disabled = false;
        passInput.disabled = false;
        submitBtn.textContent = submitBtn.dataset.labelIdle;
    }
});

closeBtn.addEventListener('click', () => {
    // Dismissal is the only path that clears the fields.
    overlay.hidden = true;
    userInput.value = '';
    passInput.value = '';
});
"#;

pub fn login(locale: Locale, hint_user: &str, hint_pass: &str) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<p>{subtitle}</p>
<div class="card">
<form data-testid="login-form">
    <div class="error-banner" data-testid="login-error-message" hidden>{error}</div>
    <label for="username">{user_label}</label>
    <input id="username" data-testid="login-username-input" required>
    <p class="hint" data-testid="qa-hint-user">{hint_user_label} <code>{hint_user}</code></p>
    <label for="password">{pass_label}</label>
    <input id="password" type="password" data-testid="login-password-input" required>
    <p class="hint" data-testid="qa-hint-pass">{hint_pass_label} <code>{hint_pass}</code></p>
    <button type="submit" data-testid="login-submit-btn"
            data-label-idle="{submit}" data-label-pending="{pending}">{submit}</button>
</form>
</div>
<div class="overlay" data-testid="login-success-overlay" hidden>
    <div class="dialog" data-testid="login-success-modal">
        <h2>{success_title}</h2>
        <p>{success_body}</p>
        <button class="secondary" data-testid="login-success-close-btn">{success_close}</button>
    </div>
</div>"#,
        title = Msg::LoginTitle.text(locale),
        subtitle = Msg::LoginSubtitle.text(locale),
        error = Msg::LoginError.text(locale),
        user_label = Msg::LoginUsernameLabel.text(locale),
        pass_label = Msg::LoginPasswordLabel.text(locale),
        hint_user_label = Msg::LoginHintUser.text(locale),
        hint_pass_label = Msg::LoginHintPass.text(locale),
        hint_user = escape(hint_user),
        hint_pass = escape(hint_pass),
        submit = Msg::LoginSubmit.text(locale),
        pending = Msg::LoginSubmitPending.text(locale),
        success_title = Msg::LoginSuccessTitle.text(locale),
        success_body = Msg::LoginSuccessBody.text(locale),
        success_close = Msg::LoginSuccessClose.text(locale),
    );
    layout(locale, Msg::LoginTitle.text(locale), &body, LOGIN_SCRIPT)
}

// ============================================================================
// Async interactions
// ============================================================================

const ASYNC_SCRIPT: &str = r#"
const loaderBtn = document.querySelector('[data-testid="async-loader-btn"]');
const successMsg = document.querySelector('[data-testid="async-success-msg"]');
loaderBtn.addEventListener('click', () => {
    loaderBtn.disabled = true;
    loaderBtn.textContent = loaderBtn.dataset.labelPending;
    successMsg.hidden = true;
    setTimeout(() => {
        loaderBtn.disabled = false;
        loaderBtn.textContent = loaderBtn.dataset.labelIdle;
        successMsg.hidden = false;
    }, parseInt(loaderBtn.dataset.delayMs, 10));
});

const appearBtn = document.querySelector('[data-testid="trigger-appear-btn"]');
const appearSlot = document.getElementById('appear-slot');
appearBtn.addEventListener('click', () => {
    // One-shot: the trigger stays disabled for the rest of the cycle.
    appearBtn.disabled = true;
    setTimeout(() => {
        const el = document.createElement('div');
        el.className = 'success-banner';
        el.dataset.testid = 'delayed-element';
        el.textContent = appearBtn.dataset.msgRevealed;
        appearSlot.appendChild(el);
    }, parseInt(appearBtn.dataset.delayMs, 10));
});

const disappearBtn = document.querySelector('[data-testid="trigger-disappear-btn"]');
const target = document.querySelector('[data-testid="element-to-hide"]');
disappearBtn.addEventListener('click', () => {
    disappearBtn.disabled = true;
    setTimeout(() => { target.remove(); }, parseInt(disappearBtn.dataset.delayMs, 10));
});
"#;

pub fn async_interactions(locale: Locale) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <button data-testid="async-loader-btn" data-delay-ms="{latency_ms}"
            data-label-idle="{loader_start}" data-label-pending="{loader_pending}">{loader_start}</button>
    <div class="success-banner" data-testid="async-success-msg" hidden>{loader_done}</div>
</div>
<div class="card">
    <button class="secondary" data-testid="trigger-appear-btn" data-delay-ms="{visibility_ms}" data-msg-revealed="{revealed}">{appear_start}</button>
    <div id="appear-slot"></div>
</div>
<div class="card">
    <button class="secondary" data-testid="trigger-disappear-btn" data-delay-ms="{visibility_ms}">{disappear_start}</button>
    <div class="error-banner" data-testid="element-to-hide">{disappear_target}</div>
</div>"#,
        title = Msg::AsyncTitle.text(locale),
        latency_ms = LATENCY_MS,
        visibility_ms = VISIBILITY_DELAY_MS,
        loader_start = Msg::AsyncLoaderStart.text(locale),
        loader_pending = Msg::AsyncLoaderPending.text(locale),
        loader_done = Msg::AsyncLoaderDone.text(locale),
        appear_start = Msg::AsyncAppearStart.text(locale),
        revealed = Msg::AsyncAppearRevealed.text(locale),
        disappear_start = Msg::AsyncDisappearStart.text(locale),
        disappear_target = Msg::AsyncDisappearTarget.text(locale),
    );
    layout(locale, Msg::AsyncTitle.text(locale), &body, ASYNC_SCRIPT)
}

// ============================================================================
// Floating UI components
// ============================================================================

const UI_SCRIPT: &str = r#"
const modalOverlay = document.querySelector('[data-testid="modal-overlay"]');
document.querySelector('[data-testid="open-modal-btn"]').addEventListener('click', () => {
    modalOverlay.hidden = false;
});
for (const id of ['modal-close-icon', 'modal-cancel-btn', 'modal-accept-btn']) {
    document.querySelector(`[data-testid="${id}"]`).addEventListener('click', () => {
        modalOverlay.hidden = true;
    });
}

const toastContainer = document.querySelector('[data-testid="toast-container"]');
function addToast(kind) {
    const toast = document.createElement('div');
    toast.className = `toast toast-${kind}`;
    toast.dataset.testid = `toast-message-${kind}`;
    toast.textContent = toastContainer.dataset[kind === 'success' ? 'msgSuccess' : 'msgError'];
    toastContainer.appendChild(toast);
    // Each toast removes itself independently after its fixed lifetime.
    setTimeout(() => toast.remove(), parseInt(toastContainer.dataset.lifetimeMs, 10));
}
document.querySelector('[data-testid="toast-success-btn"]').addEventListener('click', () => addToast('success'));
document.querySelector('[data-testid="toast-error-btn"]').addEventListener('click', () => addToast('error'));

document.querySelector('[data-testid="context-menu-zone"]').addEventListener('contextmenu', (e) => {
    e.preventDefault();
    alert('context menu');
});
"#;

pub fn ui_components(locale: Locale) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <button data-testid="open-modal-btn">{open_modal}</button>
</div>
<div class="card">
    <button class="secondary" data-testid="toast-success-btn">{toast_success_btn}</button>
    <button class="secondary" data-testid="toast-error-btn">{toast_error_btn}</button>
</div>
<div class="card">
    <span class="tooltip-wrap">
        <span data-testid="tooltip-trigger">&#9432;</span>
        <span class="tooltip-body" data-testid="tooltip-content">{tooltip}</span>
    </span>
    <span class="tooltip-wrap">
        <button class="secondary" data-testid="hover-btn">Hover</button>
        <span class="tooltip-body" data-testid="hover-menu-content">{tooltip}</span>
    </span>
</div>
<div class="card">
    <div class="context-zone" data-testid="context-menu-zone">{context_zone}</div>
</div>
<div class="overlay" data-testid="modal-overlay" hidden>
    <div class="dialog" data-testid="modal-dialog">
        <h2 data-testid="modal-title">{modal_title}</h2>
        <button class="secondary" data-testid="modal-close-icon" style="float:right">&times;</button>
        <p data-testid="modal-content">{modal_body}</p>
        <button class="secondary" data-testid="modal-cancel-btn">{cancel}</button>
        <button data-testid="modal-accept-btn">{accept}</button>
    </div>
</div>
<div class="toast-container" data-testid="toast-container" data-lifetime-ms="{lifetime_ms}"
     data-msg-success="{toast_success}" data-msg-error="{toast_error}"></div>"#,
        title = Msg::UiTitle.text(locale),
        lifetime_ms = TOAST_LIFETIME_MS,
        open_modal = Msg::UiOpenModal.text(locale),
        toast_success_btn = Msg::UiToastSuccessBtn.text(locale),
        toast_error_btn = Msg::UiToastErrorBtn.text(locale),
        tooltip = Msg::UiTooltipText.text(locale),
        context_zone = Msg::UiContextZone.text(locale),
        modal_title = Msg::UiModalTitle.text(locale),
        modal_body = Msg::UiModalBody.text(locale),
        cancel = Msg::UiModalCancel.text(locale),
        accept = Msg::UiModalAccept.text(locale),
        toast_success = Msg::UiToastSuccess.text(locale),
        toast_error = Msg::UiToastError.text(locale),
    );
    layout(locale, Msg::UiTitle.text(locale), &body, UI_SCRIPT)
}

// ============================================================================
// Forms
// ============================================================================

const FORMS_SCRIPT: &str = r#"
const classicForm = document.querySelector('[data-testid="classic-form"]');
classicForm.addEventListener('submit', (e) => {
    e.preventDefault();
    alert(classicForm.dataset.msgSubmitted);
});
"#;

pub fn forms_basic(locale: Locale) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <label for="basic-text">Text</label>
    <input id="basic-text" data-testid="input-text">
    <label for="basic-password">Password</label>
    <input id="basic-password" type="password" minlength="8" data-testid="input-password">
    <label for="basic-number">Number</label>
    <input id="basic-number" type="number" min="1" max="100" data-testid="input-number">
    <label for="basic-disabled">Disabled</label>
    <input id="basic-disabled" disabled data-testid="input-disabled">
    <label for="basic-readonly">Readonly</label>
    <input id="basic-readonly" readonly value="Fixed content" data-testid="input-readonly">
    <label for="basic-textarea">Comments</label>
    <textarea id="basic-textarea" data-testid="textarea-comments"></textarea>
</div>
<div class="card">
    <input type="checkbox" id="check-op1" data-testid="checkbox-1"><label for="check-op1">Option 1</label>
    <input type="checkbox" id="check-op2" checked data-testid="checkbox-2"><label for="check-op2">Option 2</label>
    <input type="checkbox" id="check-disabled" disabled data-testid="checkbox-disabled"><label for="check-disabled">Disabled</label>
    <input type="radio" id="radio-op1" name="classic-radio" value="1" data-testid="radio-1"><label for="radio-op1">Radio 1</label>
    <input type="radio" id="radio-op2" name="classic-radio" value="2" data-testid="radio-2"><label for="radio-op2">Radio 2</label>
    <input type="radio" id="radio-disabled" disabled data-testid="radio-disabled"><label for="radio-disabled">Disabled</label>
</div>
<div class="card">
    <form data-testid="classic-form" data-msg-submitted="{submitted}">
        <label for="form-email">{email_label}</label>
        <input id="form-email" type="email" required data-testid="form-email">
        <label for="form-select">{select_label}</label>
        <select id="form-select" required data-testid="form-select">
            <option value="">—</option>
            <option value="opt1">Option A</option>
            <option value="opt2">Option B</option>
            <option value="opt3">Option C</option>
        </select>
        <input type="checkbox" id="form-terms" required data-testid="form-terms">
        <label for="form-terms">{terms_label}</label>
        <div>
            <button type="submit" data-testid="submit-btn">{submit}</button>
            <button type="reset" class="secondary" data-testid="reset-btn">{reset}</button>
        </div>
    </form>
</div>"#,
        title = Msg::FormsTitle.text(locale),
        submitted = Msg::FormsSubmitted.text(locale),
        email_label = Msg::FormsEmailLabel.text(locale),
        select_label = Msg::FormsSelectLabel.text(locale),
        terms_label = Msg::FormsTermsLabel.text(locale),
        submit = Msg::FormsSubmit.text(locale),
        reset = Msg::FormsReset.text(locale),
    );
    layout(locale, Msg::FormsTitle.text(locale), &body, FORMS_SCRIPT)
}

const DYNAMIC_FORMS_SCRIPT: &str = r#"
const fileInput = document.querySelector('[data-testid="file-input"]');
const fileName = document.querySelector('[data-testid="file-name"]');
fileInput.addEventListener('change', () => {
    if (fileInput.files.length > 0) {
        fileName.textContent = fileInput.files[0].name;
        fileName.hidden = false;
    }
});
"#;

pub fn forms_dynamic(locale: Locale) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <label for="date-picker">Date</label>
    <input id="date-picker" type="date" data-testid="date-picker">
    <label for="time-picker">Time</label>
    <input id="time-picker" type="time" data-testid="time-picker">
    <label for="range-slider">Range</label>
    <input id="range-slider" type="range" min="0" max="100" data-testid="range-slider">
</div>
<div class="card">
    <label for="file-upload">Upload</label>
    <input id="file-upload" type="file" data-testid="file-input">
    <p data-testid="file-name" hidden></p>
</div>"#,
        title = Msg::DynamicFormsTitle.text(locale),
    );
    layout(
        locale,
        Msg::DynamicFormsTitle.text(locale),
        &body,
        DYNAMIC_FORMS_SCRIPT,
    )
}

pub fn calendar(locale: Locale) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <label for="calendar-date">Date</label>
    <input id="calendar-date" type="date" data-testid="calendar-date-input">
    <label for="calendar-week">Week</label>
    <input id="calendar-week" type="week" data-testid="calendar-week-input">
    <label for="calendar-month">Month</label>
    <input id="calendar-month" type="month" data-testid="calendar-month-input">
    <label for="calendar-range-from">Range</label>
    <input id="calendar-range-from" type="date" data-testid="calendar-range-from">
    <input id="calendar-range-to" type="date" data-testid="calendar-range-to">
</div>"#,
        title = Msg::CalendarTitle.text(locale),
    );
    layout(locale, Msg::CalendarTitle.text(locale), &body, "")
}

// ============================================================================
// Tables
// ============================================================================

/// Parse the table controls from query parameters.
fn table_state_of(params: &HashMap<String, String>) -> TableState {
    let mut state = TableState::default();
    if let Some(q) = params.get("q") {
        state.search = q.clone();
    }
    if let Some(key) = params.get("sort").and_then(|v| SortKey::parse(v)) {
        state.sort_key = key;
    }
    if params.get("dir").map(String::as_str) == Some("desc") {
        state.direction = SortDirection::Desc;
    }
    if let Some(page) = params.get("page").and_then(|v| v.parse::<usize>().ok()) {
        state.set_page(page);
    }
    state
}

fn table_url(lang: &str, state: &TableState) -> String {
    format!(
        "/testing/tables?lang={}&q={}&sort={}&dir={}&page={}",
        lang,
        urlencode(&state.search),
        state.sort_key.as_str(),
        state.direction.as_str(),
        state.page,
    )
}

fn urlencode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

pub fn tables(locale: Locale, params: &HashMap<String, String>) -> String {
    let lang = locale.code();
    let state = table_state_of(params);
    let rows = table::sample_rows();
    let view = table::apply(&rows, &state);

    // Column header links encode the toggle: same column flips direction,
    // a new column resets to ascending, both reset to page 1.
    let headers = SortKey::ALL
        .iter()
        .map(|key| {
            let mut next = state.clone();
            next.toggle_sort(*key);
            let marker = if state.sort_key == *key {
                match state.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                }
            } else {
                ""
            };
            format!(
                r#"<th data-testid="col-header-{key}"><a href="{url}">{label}{marker}</a></th>"#,
                key = key.as_str(),
                url = table_url(lang, &next),
                label = key.as_str(),
                marker = marker,
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    let body_rows = if view.rows.is_empty() {
        format!(
            r#"<tr><td colspan="5" data-testid="table-empty">{} "{}"</td></tr>"#,
            Msg::TablesEmpty.text(locale),
            escape(&state.search),
        )
    } else {
        view.rows
            .iter()
            .map(|row| {
                format!(
                    r#"<tr data-testid="row-{id}"><td>{id}</td><td>{name}</td><td>{email}</td><td>{role}</td><td>{status}</td></tr>"#,
                    id = row.id,
                    name = escape(&row.name),
                    email = escape(&row.email),
                    role = escape(&row.role),
                    status = escape(&row.status),
                )
            })
            .collect::<Vec<_>>()
            .join("\n                ")
    };

    let mut prev_state = state.clone();
    prev_state.set_page(view.page.saturating_sub(1).max(1));
    let mut next_state = state.clone();
    next_state.set_page((view.page + 1).min(view.total_pages));

    let prev_disabled = if view.page <= 1 { " aria-disabled=\"true\"" } else { "" };
    let next_disabled = if view.page >= view.total_pages {
        " aria-disabled=\"true\""
    } else {
        ""
    };

    let body = format!(
        r#"<h1>{title}</h1>
<div class="card">
    <form method="get" action="/testing/tables">
        <input type="hidden" name="lang" value="{lang}">
        <input type="hidden" name="sort" value="{sort}">
        <input type="hidden" name="dir" value="{dir}">
        <input name="q" value="{q}" placeholder="{placeholder}" data-testid="table-search-input">
    </form>
    <p data-testid="table-summary">{summary} {shown} / {filtered}</p>
    <table data-testid="data-table">
        <thead>
            <tr>
                {headers}
            </tr>
        </thead>
        <tbody>
                {body_rows}
        </tbody>
    </table>
    <p data-testid="table-page-label">{page_of} {page} / {total_pages}</p>
    <a href="{prev_url}" data-testid="pagination-prev"{prev_disabled}>{prev}</a>
    <a href="{next_url}" data-testid="pagination-next"{next_disabled}>{next}</a>
</div>"#,
        title = Msg::TablesTitle.text(locale),
        lang = lang,
        sort = state.sort_key.as_str(),
        dir = state.direction.as_str(),
        q = escape(&state.search),
        placeholder = Msg::TablesSearchPlaceholder.text(locale),
        summary = Msg::TablesSummary.text(locale),
        shown = view.rows.len(),
        filtered = view.filtered_count,
        headers = headers,
        body_rows = body_rows,
        page_of = Msg::TablesPageOf.text(locale),
        page = view.page,
        total_pages = view.total_pages,
        prev_url = table_url(lang, &prev_state),
        next_url = table_url(lang, &next_state),
        prev_disabled = prev_disabled,
        next_disabled = next_disabled,
        prev = Msg::TablesPrev.text(locale),
        next = Msg::TablesNext.text(locale),
    );
    layout(locale, Msg::TablesTitle.text(locale), &body, "")
}

// ============================================================================
// Users
// ============================================================================

const USERS_SCRIPT: &str = r#"
const lang = document.documentElement.lang;
const dialog = document.querySelector('[data-testid="users-modal"]');
const emailInput = document.querySelector('[data-testid="user-email-input"]');
const nameInput = document.querySelector('[data-testid="user-name-input"]');
const roleSelect = document.querySelector('[data-testid="user-role-select"]');
const saveBtn = document.querySelector('[data-testid="user-save-btn"]');
let editingId = null;

function openDialog(user) {
    editingId = user ? user.id : null;
    emailInput.value = user ? user.email : '';
    nameInput.value = user ? user.name : '';
    roleSelect.value = user ? user.role : 'user';
    dialog.hidden = false;
}

document.querySelector('[data-testid="user-new-btn"]').addEventListener('click', () => openDialog(null));
document.querySelector('[data-testid="user-cancel-btn"]').addEventListener('click', () => {
    dialog.hidden = true;
});

for (const btn of document.querySelectorAll('[data-edit-user]')) {
    btn.addEventListener('click', () => openDialog(JSON.parse(btn.dataset.editUser)));
}

for (const btn of document.querySelectorAll('[data-delete-user]')) {
    btn.addEventListener('click', async () => {
        // Native confirm dialog: the harness exercises its scoped handler here.
        if (!confirm(btn.dataset.confirmMsg)) return;
        const resp = await fetch(`/api/users/${btn.dataset.deleteUser}?lang=${lang}`, { method: 'DELETE' });
        if (resp.ok) {
            location.reload();
        } else {
            alert(btn.dataset.failMsg);
        }
    });
}

saveBtn.addEventListener('click', async (e) => {
    e.preventDefault();
    saveBtn.disabled = true;
    const payload = { email: emailInput.value, name: nameInput.value, role: roleSelect.value };
    const url = editingId === null ? `/api/users?lang=${lang}` : `/api/users/${editingId}?lang=${lang}`;
    const method = editingId === null ? 'POST' : 'PUT';
    try {
        const resp = await fetch(url, {
            method,
            headers: { 'content-type': 'application/json' },
            body: JSON.stringify(payload),
        });
        if (resp.ok) {
            location.reload();
        } else {
            alert(saveBtn.dataset.failMsg);
        }
    } finally {
        saveBtn.disabled = false;
    }
});
"#;

pub fn users(locale: Locale, users: &[UserRecord], error: Option<&str>) -> String {
    let error_banner = match error {
        Some(_) => format!(
            r#"<div class="error-banner" data-testid="users-error">{}</div>"#,
            Msg::UsersOperationFailed.text(locale),
        ),
        None => String::new(),
    };

    let list = if users.is_empty() {
        format!(
            r#"<p data-testid="users-empty">{}</p>"#,
            Msg::UsersEmpty.text(locale)
        )
    } else {
        users
            .iter()
            .map(|user| {
                let edit_payload = escape(
                    &serde_json::to_string(user).unwrap_or_else(|_| "{}".to_string()),
                );
                format!(
                    r#"<div class="card" data-testid="user-item-{id}">
        <strong data-testid="user-name-{id}">{name}</strong>
        <span data-testid="user-email-{id}">{email}</span>
        <span data-testid="user-role-{id}">{role}</span>
        <button class="secondary" data-testid="user-edit-btn-{id}" data-edit-user="{edit_payload}">{edit}</button>
        <button class="secondary" data-testid="user-delete-btn-{id}" data-delete-user="{id}"
                data-confirm-msg="{confirm}" data-fail-msg="{fail}">{delete}</button>
    </div>"#,
                    id = user.id,
                    name = escape(&user.name),
                    email = escape(&user.email),
                    role = user.role.as_str(),
                    edit_payload = edit_payload,
                    edit = Msg::UsersEdit.text(locale),
                    delete = Msg::UsersDelete.text(locale),
                    confirm = Msg::UsersConfirmDelete.text(locale),
                    fail = Msg::UsersOperationFailed.text(locale),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<h1 data-testid="users-title">{title}</h1>
<p>{subtitle}</p>
{error_banner}
<button data-testid="user-new-btn">{new_user}</button>
<div data-testid="users-list">
{list}
</div>
<div class="overlay" data-testid="users-modal" hidden>
    <div class="dialog" role="dialog">
        <label for="user-email">Email</label>
        <input id="user-email" type="email" data-testid="user-email-input">
        <label for="user-name">Name</label>
        <input id="user-name" data-testid="user-name-input">
        <label for="user-role">Role</label>
        <select id="user-role" data-testid="user-role-select">
            <option value="user">user</option>
            <option value="admin">admin</option>
            <option value="editor">editor</option>
        </select>
        <div>
            <button class="secondary" data-testid="user-cancel-btn">{cancel}</button>
            <button data-testid="user-save-btn" data-fail-msg="{fail}">{save}</button>
        </div>
    </div>
</div>"#,
        title = Msg::UsersTitle.text(locale),
        subtitle = Msg::UsersSubtitle.text(locale),
        error_banner = error_banner,
        new_user = Msg::UsersNew.text(locale),
        list = list,
        cancel = Msg::UsersCancel.text(locale),
        save = Msg::UsersSave.text(locale),
        fail = Msg::UsersOperationFailed.text(locale),
    );
    layout(locale, Msg::UsersTitle.text(locale), &body, USERS_SCRIPT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandbox_common::Role;

    #[test]
    fn table_state_parses_query_params() {
        let mut params = HashMap::new();
        params.insert("q".to_string(), "admin".to_string());
        params.insert("sort".to_string(), "email".to_string());
        params.insert("dir".to_string(), "desc".to_string());
        params.insert("page".to_string(), "2".to_string());

        let state = table_state_of(&params);
        assert_eq!(state.search, "admin");
        assert_eq!(state.sort_key, SortKey::Email);
        assert_eq!(state.direction, SortDirection::Desc);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn bad_query_params_fall_back_to_defaults() {
        let mut params = HashMap::new();
        params.insert("sort".to_string(), "bogus".to_string());
        params.insert("page".to_string(), "zero".to_string());
        let state = table_state_of(&params);
        assert_eq!(state, TableState::default());
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>"a"&b</script>"#),
            "&lt;script&gt;&quot;a&quot;&amp;b&lt;/script&gt;"
        );
    }

    #[test]
    fn users_page_renders_rows_and_modal_testids() {
        let user = UserRecord {
            id: 7,
            email: "x@qa-sandbox.com".to_string(),
            name: "X".to_string(),
            role: Role::Admin,
            created_at: 0,
            updated_at: 0,
        };
        let html = users(Locale::En, &[user], None);
        assert!(html.contains("data-testid=\"user-item-7\""));
        assert!(html.contains("data-testid=\"user-delete-btn-7\""));
        assert!(html.contains("data-testid=\"users-modal\""));
        assert!(!html.contains("data-testid=\"users-empty\""));
    }

    #[test]
    fn empty_users_page_shows_empty_state() {
        let html = users(Locale::Es, &[], None);
        assert!(html.contains("data-testid=\"users-empty\""));
    }

    #[test]
    fn page_timers_use_the_shared_duration_constants() {
        let async_html = async_interactions(Locale::En);
        assert!(async_html.contains(&format!("data-delay-ms=\"{}\"", LATENCY_MS)));
        assert!(async_html.contains(&format!("data-delay-ms=\"{}\"", VISIBILITY_DELAY_MS)));
        assert!(async_html.contains("dataset.delayMs"));

        let ui_html = ui_components(Locale::En);
        assert!(ui_html.contains(&format!("data-lifetime-ms=\"{}\"", TOAST_LIFETIME_MS)));
        assert!(ui_html.contains("dataset.lifetimeMs"));
    }

    #[test]
    fn login_page_lists_the_sandbox_pair_as_hint() {
        let html = login(Locale::En, "qa_tester", "password123");
        assert!(html.contains("qa_tester"));
        assert!(html.contains("password123"));
        assert!(html.contains("data-testid=\"login-success-overlay\""));
    }
}
