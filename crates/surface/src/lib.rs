//! QA Sandbox test-surface state model
//!
//! Each testing page of the sandbox is backed by a small, independent
//! state machine simulating real-world asynchronous and validation
//! behavior: the login attempt, delayed-appearance elements, simulated
//! network latency, per-field form validation, the search/sort/paginate
//! table pipeline, and the toast queue.
//!
//! Timer-driven transitions are modelled as explicit tagged states polled
//! against a [`Clock`], so tests swap in a deterministic clock instead of
//! sleeping on the wall clock.

pub mod clock;
pub mod delayed;
pub mod form;
pub mod latency;
pub mod login;
pub mod session;
pub mod store;
pub mod table;
pub mod toast;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delayed::{DelayedVisibility, OneShotTimer};
pub use form::{DynamicForm, FieldError, FieldKind};
pub use latency::{AsyncLoader, LoaderState};
pub use login::{LoginMachine, LoginState};
pub use session::{AuthOutcome, CredentialProvider, Session, StaticCredentials};
pub use store::{MemoryUserStore, SqliteUserStore, UserStore};
pub use table::{SortDirection, SortKey, TableState, TableView};
pub use toast::{Toast, ToastKind, ToastQueue};
