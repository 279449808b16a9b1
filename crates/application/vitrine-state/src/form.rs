use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::store::{Middleware, Store};

/// Shown when a submission handler errors out instead of settling cleanly.
pub const GENERIC_SUBMIT_ERROR: &str = "Something went wrong. Please try again.";

/// Submission lifecycle of one mounted form.
///
/// `error` carries server-rejection messages not tied to a single field;
/// `field_errors` is maintained independently by field-level validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub is_submitting: bool,
    pub error: Option<String>,
    pub has_submitted: bool,
    pub field_errors: BTreeMap<String, String>,
    pub confirm_open: bool,
}

#[derive(Debug, Clone)]
pub enum FormAction {
    /// A submit trigger fired. Without a confirmation gate this starts the
    /// submission; with one, the gate decides.
    SubmitIntent,
    StartSubmitting,
    SettleSuccess,
    SettleError(String),
    SetFieldError { field: String, message: String },
    ClearFieldError(String),
    ClearFieldErrors,
    OpenConfirm,
    CancelConfirm,
}

pub fn reduce_form(mut state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::SubmitIntent | FormAction::StartSubmitting => {
            state.error = None;
            state.is_submitting = true;
            state.has_submitted = true;
        }

        FormAction::SettleSuccess => {
            state.is_submitting = false;
        }

        FormAction::SettleError(message) => {
            state.is_submitting = false;
            state.error = Some(message);
        }

        FormAction::SetFieldError { field, message } => {
            state.field_errors.insert(field, message);
        }
        FormAction::ClearFieldError(field) => {
            state.field_errors.remove(&field);
        }
        FormAction::ClearFieldErrors => state.field_errors.clear(),

        FormAction::OpenConfirm => state.confirm_open = true,
        FormAction::CancelConfirm => state.confirm_open = false,
    }
    state
}

/// Two-phase submit gate: the first intent opens the confirmation surface, a
/// second intent while it is open counts as the confirmation. Only one
/// confirmation can be pending per form instance.
pub fn confirm_gate() -> Middleware<FormState, FormAction> {
    Arc::new(|handle, action| match action {
        FormAction::SubmitIntent => {
            if handle.state().confirm_open {
                handle.forward(FormAction::CancelConfirm);
                handle.forward(FormAction::StartSubmitting);
            } else {
                handle.forward(FormAction::OpenConfirm);
            }
        }
        other => handle.forward(other),
    })
}

/// Where a settled submission sends the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side navigation; the form is expected to unmount.
    Redirect(String),
    /// Re-fetch the current route's data and reset the form to pristine.
    Refresh,
    /// Server rejected the submission with a user-facing message.
    Rejected(String),
}

/// Client-side navigation port.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, path: &str);
    fn refresh(&self);
}

/// Owns a form's store and drives the submission lifecycle around it.
///
/// Concurrency policy per the state machine contract: the controller tracks
/// `is_submitting` but does not queue or reject overlapping submits; callers
/// disable the trigger while a submission is outstanding.
pub struct FormController {
    store: Store<FormState, FormAction>,
    navigator: Arc<dyn Navigator>,
    generation: Arc<AtomicU64>,
}

impl FormController {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store: Store::new(reduce_form, FormState::default()),
            navigator,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A controller whose submits must be explicitly confirmed first.
    pub fn with_confirmation(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store: Store::new(reduce_form, FormState::default()).with_middleware(confirm_gate()),
            navigator,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &Store<FormState, FormAction> {
        &self.store
    }

    pub fn state(&self) -> FormState {
        self.store.state()
    }

    pub fn set_field_error(&self, field: impl Into<String>, message: impl Into<String>) {
        self.store.dispatch(FormAction::SetFieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn clear_field_error(&self, field: impl Into<String>) {
        self.store.dispatch(FormAction::ClearFieldError(field.into()));
    }

    pub fn cancel_confirm(&self) {
        self.store.dispatch(FormAction::CancelConfirm);
    }

    /// Invalidate any in-flight submission so a late settlement cannot touch
    /// state that no longer belongs to it (the unmount guard).
    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Fire a submit intent and, if the submission actually started, run the
    /// handler and settle. The intent is dispatched synchronously before any
    /// async work begins. Handler errors never propagate; they settle as the
    /// generic failure message.
    pub async fn submit<F, Fut>(&self, run: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<SubmitOutcome>>,
    {
        self.store.dispatch(FormAction::SubmitIntent);
        if !self.store.state().is_submitting {
            // Gated: the confirmation surface opened instead.
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let result = run().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }

        match result {
            Ok(SubmitOutcome::Redirect(path)) => {
                // The page unmounts after navigation; local state stays as-is.
                self.navigator.navigate(&path);
            }
            Ok(SubmitOutcome::Refresh) => {
                self.navigator.refresh();
                self.store.dispatch(FormAction::SettleSuccess);
                self.store.dispatch(FormAction::ClearFieldErrors);
            }
            Ok(SubmitOutcome::Rejected(message)) => {
                self.store.dispatch(FormAction::SettleError(message));
            }
            Err(err) => {
                tracing::warn!("form submission handler failed: {err:#}");
                self.store
                    .dispatch(FormAction::SettleError(GENERIC_SUBMIT_ERROR.to_string()));
            }
        }
    }
}
