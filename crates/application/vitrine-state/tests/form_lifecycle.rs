use std::sync::{Arc, Mutex};

use vitrine_state::{
    reduce_form, FormAction, FormController, FormState, Navigator, SubmitOutcome,
    GENERIC_SUBMIT_ERROR,
};

#[derive(Default)]
struct RecordingNavigator {
    navigations: Mutex<Vec<String>>,
    refreshes: Mutex<usize>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.navigations
            .lock()
            .unwrap()
            .push(path.to_string());
    }
    fn refresh(&self) {
        *self.refreshes.lock().unwrap() += 1;
    }
}

#[test]
fn start_submitting_clears_prior_error_and_marks_the_form() {
    let state = FormState {
        error: Some("old".into()),
        ..Default::default()
    };
    let state = reduce_form(state, FormAction::StartSubmitting);
    assert!(state.is_submitting);
    assert!(state.has_submitted);
    assert_eq!(state.error, None);
}

#[test]
fn failure_settlement_keeps_has_submitted_and_stores_the_message() {
    let state = reduce_form(FormState::default(), FormAction::StartSubmitting);
    let state = reduce_form(state, FormAction::SettleError("rejected".into()));
    assert!(!state.is_submitting);
    assert!(state.has_submitted);
    assert_eq!(state.error.as_deref(), Some("rejected"));
}

#[test]
fn field_errors_are_orthogonal_to_the_form_error() {
    let state = reduce_form(
        FormState::default(),
        FormAction::SetFieldError {
            field: "email".into(),
            message: "required".into(),
        },
    );
    let state = reduce_form(state, FormAction::SettleError("server said no".into()));
    assert_eq!(state.field_errors.get("email").map(String::as_str), Some("required"));
    let state = reduce_form(state, FormAction::ClearFieldError("email".into()));
    assert!(state.field_errors.is_empty());
    assert_eq!(state.error.as_deref(), Some("server said no"));
}

#[tokio::test]
async fn redirect_outcome_navigates_without_touching_local_state() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = FormController::new(nav.clone());

    controller
        .submit(|| async { Ok(SubmitOutcome::Redirect("/admin/products".into())) })
        .await;

    assert_eq!(nav.navigations.lock().unwrap().as_slice(), ["/admin/products"]);
    // The page is expected to unmount; the submitting flag is left as-is.
    assert!(controller.state().is_submitting);
}

#[tokio::test]
async fn refresh_outcome_resets_field_errors_to_pristine() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = FormController::new(nav.clone());
    controller.set_field_error("name_vi", "required");

    controller
        .submit(|| async { Ok(SubmitOutcome::Refresh) })
        .await;

    assert_eq!(*nav.refreshes.lock().unwrap(), 1);
    let state = controller.state();
    assert!(!state.is_submitting);
    assert!(state.has_submitted);
    assert!(state.field_errors.is_empty());
}

#[tokio::test]
async fn handler_errors_settle_as_the_generic_message() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = FormController::new(nav);

    controller
        .submit(|| async { Err(anyhow::anyhow!("db unreachable")) })
        .await;

    let state = controller.state();
    assert!(!state.is_submitting);
    assert_eq!(state.error.as_deref(), Some(GENERIC_SUBMIT_ERROR));
}

#[tokio::test]
async fn confirmation_gate_requires_a_second_submit_intent() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = FormController::with_confirmation(nav.clone());

    // First intent only opens the surface; the handler must not run.
    controller
        .submit(|| async {
            panic!("handler must not run before confirmation");
        })
        .await;
    let state = controller.state();
    assert!(state.confirm_open);
    assert!(!state.is_submitting);

    // Second intent is the confirmation.
    controller
        .submit(|| async { Ok(SubmitOutcome::Refresh) })
        .await;
    let state = controller.state();
    assert!(!state.confirm_open);
    assert!(state.has_submitted);
    assert_eq!(*nav.refreshes.lock().unwrap(), 1);
}

#[tokio::test]
async fn cancelling_the_confirmation_closes_it_without_side_effects() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = FormController::with_confirmation(nav.clone());

    controller.submit(|| async { unreachable!() }).await;
    assert!(controller.state().confirm_open);

    controller.cancel_confirm();
    let state = controller.state();
    assert!(!state.confirm_open);
    assert!(!state.is_submitting);
    assert_eq!(*nav.refreshes.lock().unwrap(), 0);
    assert!(nav.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stale_settlement_after_detach_does_not_update_state() {
    let nav = Arc::new(RecordingNavigator::default());
    let controller = Arc::new(FormController::new(nav));
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

    let submitting = {
        let controller = controller.clone();
        tokio::spawn(async move {
            controller
                .submit(|| async {
                    let _ = release_rx.await;
                    Ok(SubmitOutcome::Rejected("too late".into()))
                })
                .await;
        })
    };

    // The form unmounts while the submission is in flight.
    controller.detach();
    release_tx.send(()).unwrap();
    submitting.await.unwrap();

    let state = controller.state();
    assert_eq!(state.error, None);
    assert!(state.is_submitting, "stale settlement must not clear the flag");
}
