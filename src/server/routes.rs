use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dashboard::Dashboard;
use crate::server::api;
use crate::server::session::SessionContext;

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Dispatch one request. `path` may carry a query string.
pub fn route_request(dashboard: &Dashboard, method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => json_response(api::health_payload(dashboard)),
        ("GET", "/api/registry") => json_response(api::registry_payload(dashboard)),
        ("GET", "/api/active") => json_response(api::active_payload(dashboard)),
        ("GET", "/api/license-types") => json_response(api::license_types_payload()),
        ("GET", "/api/lookup") => {
            let session = SessionContext::from_path(path);
            json_response(api::lookup_payload(dashboard, &session))
        }
        ("GET", "/api/map") => json_response(api::map_payload(dashboard)),
        ("GET", "/api/charts/license-status") => {
            json_response(api::license_status_chart_payload(dashboard))
        }
        ("GET", "/api/charts/license-type") => {
            json_response(api::license_type_chart_payload(dashboard))
        }
        ("GET", "/api/equity") => json_response(api::equity_payload(dashboard)),
        ("GET", "/api/quiz") => json_response(api::quiz_options_payload()),
        ("GET", "/api/quiz/history") => json_response(api::history_payload(dashboard)),
        ("POST", "/api/quiz") => submission_response(api::quiz_payload(dashboard, body), "quiz"),
        ("GET", "/api/feedback") => json_response(api::feedback_options_payload()),
        ("POST", "/api/feedback") => submission_response(api::feedback_payload(body), "feedback"),
        _ => error_response(404, "Route not found"),
    }
}

fn ok_json(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        content_type: "application/json",
        body,
    }
}

fn submission_response(
    result: Result<String, api::SubmitPayloadError>,
    kind: &'static str,
) -> HttpResponse {
    match result {
        Ok(payload) => ok_json(payload),
        Err(api::SubmitPayloadError::Parse(err)) => {
            error_response(400, &format!("Invalid request body: {err}"))
        }
        Err(api::SubmitPayloadError::Validation(msg)) => error_response(400, &msg),
        Err(api::SubmitPayloadError::Api(err)) => {
            tracing::error!(%err, kind, "submission failed");
            error_response(500, &err.to_string())
        }
    }
}

fn json_response(result: Result<String, api::ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => ok_json(payload),
        Err(err) => {
            tracing::error!(%err, "request failed");
            error_response(500, &err.to_string())
        }
    }
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Cannabis Dispensaries in Boston</title>
  <style>
    body { font-family: Calibri, Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    h1 { color: darkgreen; margin-bottom: 8px; }
    h3 { font-style: italic; color: darkslategrey; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, select { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Cannabis Dispensaries in Boston</h1>
  <p>This information is relevant to the State of Massachusetts as of December 2023.</p>

  <div class="card">
    <h3>Active Boston Dispensaries</h3>
    <button data-path="/api/active">Active licenses</button>
    <button data-path="/api/map">Map markers</button>
    <button data-path="/api/charts/license-status">License status chart</button>
    <button data-path="/api/charts/license-type">License type chart</button>
    <button data-path="/api/equity">Social Equity Program</button>
    <button data-path="/api/quiz/history">Quiz history</button>
  </div>

  <div class="card">
    <h3>Want to look at the dispensaries in your area?</h3>
    <label for="license-type">What type of store are you looking for?</label>
    <select id="license-type"></select>
    <label for="zip">What is your Zip Code?</label>
    <input id="zip" inputmode="numeric" />
    <div><button id="lookup-btn">Search</button></div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    const typeEl = document.getElementById('license-type');
    const zipEl = document.getElementById('zip');

    async function show(path) {
      output.textContent = 'Loading…';
      const response = await fetch(path);
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    }

    fetch('/api/license-types').then(r => r.json()).then(data => {
      for (const type of data.license_types) {
        const option = document.createElement('option');
        option.value = type;
        option.textContent = type;
        typeEl.appendChild(option);
      }
    });

    document.querySelectorAll('button[data-path]').forEach(btn => {
      btn.addEventListener('click', () => show(btn.dataset.path));
    });

    document.getElementById('lookup-btn').addEventListener('click', () => {
      const query = '?license_type=' + encodeURIComponent(typeEl.value) + '&zip=' + encodeURIComponent(zipEl.value);
      show('/api/lookup' + query);
    });
  </script>
</body>
</html>
"#
    .to_string()
}
