// Browser entry points. Markup is rendered by the front-end bundle; these
// shells only bootstrap it.
use auth_gateway::{Authenticated, MaybeAuthenticated};
use axum::response::{Html, IntoResponse, Redirect, Response};

pub async fn login(MaybeAuthenticated(session): MaybeAuthenticated) -> Response {
    if session.is_some() {
        return Redirect::to("/patients").into_response();
    }

    Html(
        r#"<!doctype html>
<html lang="en">
  <head><meta charset="utf-8"><title>MedRecords - Sign in</title></head>
  <body><div id="app" data-page="login"></div><script src="/static/app.js"></script></body>
</html>"#,
    )
    .into_response()
}

pub async fn patients(user: Authenticated) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
  <head><meta charset="utf-8"><title>MedRecords - Patients</title></head>
  <body><div id="app" data-page="patients" data-role="{}"></div><script src="/static/app.js"></script></body>
</html>"#,
        user.role
    ))
}

/// Unauthenticated demo surface, routed only when previews are enabled.
pub async fn preview() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="en">
  <head><meta charset="utf-8"><title>MedRecords - Preview</title></head>
  <body><div id="app" data-page="preview"></div><script src="/static/app.js"></script></body>
</html>"#,
    )
}
