//! UI-independent client flows
//!
//! Each flow is a plain state object a front end drives: it owns the cached
//! list it renders, validates input before anything is sent, and re-fetches
//! after every mutation so the view never shows a resolved item.
//!
//! - [`ListView`] - cached list with stale-response suppression
//! - [`RosterView`] - active employees
//! - [`TransferForm`] / [`ResignForm`] / [`OnboardForm`] - change submission
//! - [`ReviewFlow`] - approve/reject with confirmation

mod review;
mod roster;
mod submission;
mod view;

pub use review::{Decision, PendingDecision, ReviewFlow};
pub use roster::RosterView;
pub use submission::{AssignmentPicker, OnboardForm, ResignForm, TransferForm};
pub use view::{ListView, LoadTicket};
