use std::sync::Arc;

use axum::{
    Form,
    extract::State as AxumState,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use tasting_survey_html::{Banner, parse_form, render_form, render_thank_you};
use tasting_survey_notify::NotifyErrorKind;
use tasting_survey_types::FormState;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    controller::{SubmitError, SubmitOutcome},
    session::{ResolvedSession, session_cookie, session_id},
    state::State,
};

const IN_PROGRESS: &str = "Your answers are being sent, please wait a moment.";
const TASK_FAILED: &str = "Sending was interrupted. Please reload the page to see whether it went out.";

pub async fn form_handler(AxumState(state): AxumState<Arc<State>>, headers: HeaderMap) -> Response {
    let id = session_id(&headers);
    let catalog = state.controller.catalog();

    // Only a posted form stores a session; showing the page just hands out an id.
    let submitted = match state.sessions.find(id) {
        Some(handle) => handle.lock().await.is_submitted(),
        None => false,
    };

    let page = if submitted {
        render_thank_you(catalog, &state.html)
    } else {
        render_form(catalog, &FormState::initial(catalog), None, &state.html)
    };

    let response = Html(page).into_response();
    match id {
        Some(_) => response,
        None => with_cookie(response, Uuid::new_v4()),
    }
}

pub async fn submit_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let session = state.sessions.open(session_id(&headers));
    let form = parse_form(pairs);
    let catalog = state.controller.catalog();

    let Ok(mut guard) = Arc::clone(&session.handle).try_lock_owned() else {
        info!(id = %session.id, "Submission already in progress");
        let banner = Banner::info(IN_PROGRESS);
        let page = render_form(catalog, &form, Some(&banner), &state.html);
        return cookie_for((StatusCode::CONFLICT, Html(page)).into_response(), &session);
    };

    // The attempt runs to completion even if the client goes away, so the
    // session is always marked once the mail is out.
    let attempt = {
        let state = Arc::clone(&state);
        let form = form.clone();
        tokio::spawn(async move { state.controller.submit(&mut guard, &form).await })
    };

    let response = match attempt.await {
        Ok(SubmitOutcome::Submitted { .. }) => Redirect::to("/").into_response(),
        Ok(SubmitOutcome::AlreadySubmitted) => {
            Html(render_thank_you(catalog, &state.html)).into_response()
        }
        Ok(SubmitOutcome::Failed(err)) => {
            warn!(id = %session.id, kind = %err.kind(), "Showing submission error");
            let banner = Banner::error(error_message(&err));
            let page = render_form(catalog, &form, Some(&banner), &state.html);
            (status_for(&err), Html(page)).into_response()
        }
        Err(err) => {
            error!(id = %session.id, %err, "Submission task failed");
            let banner = Banner::error(format!("{}: {TASK_FAILED}", NotifyErrorKind::Unknown));
            let page = render_form(catalog, &form, Some(&banner), &state.html);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
        }
    };

    cookie_for(response, &session)
}

pub async fn health_handler() -> &'static str {
    "ok"
}

fn status_for(err: &SubmitError) -> StatusCode {
    match err.kind() {
        NotifyErrorKind::Transport => StatusCode::SERVICE_UNAVAILABLE,
        NotifyErrorKind::Auth | NotifyErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_message(err: &SubmitError) -> String {
    if err.is_retryable() {
        format!("{}: {err}. Please try again.", err.kind())
    } else {
        format!("{}: {err}. Please contact the survey organizer.", err.kind())
    }
}

fn cookie_for(response: Response, session: &ResolvedSession) -> Response {
    if session.needs_cookie {
        with_cookie(response, session.id)
    } else {
        response
    }
}

fn with_cookie(mut response: Response, id: Uuid) -> Response {
    if let Ok(value) = HeaderValue::from_str(&session_cookie(id)) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}
