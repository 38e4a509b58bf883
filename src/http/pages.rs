//! Server-rendered pages.
//!
//! Markup is deliberately plain; every dynamic value goes through [`escape`].

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::sync::oneshot;

use crate::http::server::AppState;
use crate::views::{CallbackPhase, CallbackView, Navigator, ToggleOutcome, SETTLE_DELAY};

/// Upper bound for the session to reflect a toggle before the redirect.
const TOGGLE_SETTLE: Duration = Duration::from_secs(1);

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head_extra: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n{}</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        head_extra,
        body
    ))
}

fn render_home(state: &AppState, headers: &HeaderMap, error: Option<&str>) -> Html<String> {
    let status = state.home.status();
    let mut body = String::new();

    let _ = writeln!(body, "<h1>{}</h1>", escape(state.settings.app_name()));
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }

    let _ = writeln!(
        body,
        "<p class=\"status\" data-connected=\"{}\">{}</p>",
        status.connected, status.status_label
    );
    if let Some(address) = &status.address {
        let _ = writeln!(body, "<p class=\"address\">{}</p>", escape(address));
    }
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/toggle\"><button type=\"submit\">{}</button></form>",
        status.toggle_label
    );

    if state.demo.is_visible() {
        let disabled = if state.demo.can_submit() { "" } else { " disabled" };
        let label = if state.demo.is_busy() {
            "Sending..."
        } else {
            "Send 0.001 SOL to yourself"
        };
        let _ = writeln!(
            body,
            "<section class=\"demo\"><form method=\"post\" action=\"/transaction\">\
             <button type=\"submit\"{}>{}</button></form></section>",
            disabled, label
        );
    }

    if let Some(note) = state.demo.notification() {
        let kind = serde_json::to_value(note.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let _ = writeln!(
            body,
            "<div class=\"notification {}\">{}</div>",
            kind,
            escape(&note.message)
        );
    }

    let origin = AppState::request_origin(headers);
    let callback = state
        .profile
        .options(&state.settings, origin.as_ref())
        .auth_options
        .redirect_url;
    let _ = writeln!(
        body,
        "<footer>Allow-list this redirect URL in the wallet portal: <code>{}</code></footer>",
        escape(callback.as_str())
    );

    layout(state.settings.app_name(), "", &body)
}

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    render_home(&state, &headers, None)
}

pub async fn toggle(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.home.toggle().await {
        Ok(outcome) => {
            let want_connected = matches!(outcome, ToggleOutcome::Connected(_));
            let mut session = state.provider.state();
            let settled = tokio::time::timeout(
                TOGGLE_SETTLE,
                session.wait_for(|s| s.is_connected() == want_connected),
            )
            .await
            .is_ok();
            if !settled {
                tracing::debug!(want_connected, "Session did not settle before redirect");
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Wallet toggle failed");
            render_home(&state, &headers, Some(&e.to_string())).into_response()
        }
    }
}

pub async fn transaction(State(state): State<AppState>) -> Redirect {
    match state.demo.spawn_submit().await {
        Ok(Some(_)) => {}
        Ok(None) => tracing::debug!("Transaction button pressed while busy"),
        Err(e) => tracing::error!(error = %e, "Transaction task failed"),
    }
    Redirect::to("/")
}

/// Turns the view's navigation into the HTTP response.
struct ResponseNavigator {
    tx: Mutex<Option<oneshot::Sender<String>>>,
}

impl Navigator for ResponseNavigator {
    fn navigate(&self, route: &str) {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(tx) = sender {
            let _ = tx.send(route.to_string());
        }
    }
}

fn render_callback_failed(message: &str) -> Html<String> {
    let body = format!(
        "<h1>Connection failed</h1>\n<p class=\"error\">{}</p>\n<a href=\"/\">Go Back</a>\n",
        escape(message)
    );
    layout("Connection failed", "", &body)
}

fn render_callback_pending(status_text: &str) -> Html<String> {
    let body = format!("<div class=\"spinner\"></div>\n<p>{}</p>\n", escape(status_text));
    layout(
        "Signing in",
        "<meta http-equiv=\"refresh\" content=\"2;url=/\">\n",
        &body,
    )
}

/// OAuth return route.
///
/// The SDK consumes the query; the view decides where the user goes.
/// Returning early drops the view, which cancels any pending navigation.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (tx, rx) = oneshot::channel();
    let navigator = Arc::new(ResponseNavigator {
        tx: Mutex::new(Some(tx)),
    });
    let view = CallbackView::mount(state.provider.state(), navigator, SETTLE_DELAY);

    if let Err(e) = state.provider.handle_redirect(&params).await {
        tracing::warn!(error = %e, "SDK rejected the OAuth redirect");
        return render_callback_failed(&e.to_string()).into_response();
    }

    let mut phases = view.phases();
    let failed = async move {
        let message = phases.wait_for(CallbackPhase::is_terminal).await.ok().and_then(|p| {
            match &*p {
                CallbackPhase::Failed(message) => Some(message.clone()),
                _ => None,
            }
        });
        match message {
            Some(message) => message,
            // Connected: the navigation branch answers.
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        route = rx => match route {
            Ok(route) => Redirect::to(&route).into_response(),
            Err(_) => render_callback_pending(view.status_text()).into_response(),
        },
        message = failed => render_callback_failed(&message).into_response(),
        _ = tokio::time::sleep(state.callback_wait) => {
            render_callback_pending(view.status_text()).into_response()
        }
    }
}
