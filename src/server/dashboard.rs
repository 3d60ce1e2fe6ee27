//! HTML dashboard rendering
//!
//! Pure presentation over the registry snapshot: a card per site with its
//! status, last response time, check counters and uptime percentage. The
//! page refreshes itself every 10 seconds and offers a small form that
//! posts new sites to the API.

use handlebars::Handlebars;
use serde::Serialize;

use crate::models::SiteSnapshot;

/// Handlebars template for the dashboard page
const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Uptime Monitor</title>
  <meta http-equiv="refresh" content="10" />
  <style>
    body {
      font-family: Arial, sans-serif;
      background: #0f172a;
      color: #e5e7eb;
      margin: 0;
      padding: 20px;
    }
    h1 { text-align: center; margin-bottom: 20px; }
    form { display: flex; justify-content: center; gap: 8px; margin-bottom: 24px; }
    input[type=text] {
      width: 320px; padding: 8px; border-radius: 6px; border: 1px solid #334155;
      background: #1e293b; color: #e5e7eb;
    }
    button {
      padding: 8px 16px; border-radius: 6px; border: none;
      background: #2563eb; color: white; cursor: pointer;
    }
    .grid { display: flex; flex-wrap: wrap; gap: 16px; justify-content: center; }
    .card {
      background: #1e293b; border-radius: 10px; padding: 16px; width: 280px;
      box-shadow: 0 2px 8px rgba(0,0,0,0.4);
    }
    .url { font-weight: bold; word-break: break-all; margin-bottom: 8px; }
    .status { font-weight: bold; padding: 2px 8px; border-radius: 6px; display: inline-block; }
    .status.up { background: #14532d; color: #4ade80; }
    .status.down { background: #7f1d1d; color: #f87171; }
    .status.unknown { background: #374151; color: #9ca3af; }
    .meta { color: #94a3b8; font-size: 0.9em; margin-top: 4px; }
    .empty { text-align: center; color: #94a3b8; }
  </style>
</head>
<body>
  <h1>Uptime Monitor Dashboard</h1>
  <form onsubmit="addSite(event)">
    <input type="text" id="site-url" placeholder="example.com" />
    <button type="submit">Add site</button>
  </form>
  <div class="grid">
    {{#each sites}}
    <div class="card">
      <div class="url">{{url}}</div>
      <div class="status {{css_class}}">{{status}}</div>
      <div class="meta">Last Response: {{last_response}}</div>
      <div class="meta">Checks: {{total_checks}}</div>
      <div class="meta">Failures: {{failures}}</div>
      <div class="meta">Uptime: {{uptime}}%</div>
    </div>
    {{/each}}
  </div>
  {{#unless sites}}
  <p class="empty">No sites registered yet.</p>
  {{/unless}}
  <script>
    async function addSite(event) {
      event.preventDefault();
      const url = document.getElementById("site-url").value;
      if (!url) return;
      await fetch("/api/sites", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ url }),
      });
      location.reload();
    }
  </script>
</body>
</html>
"#;

/// One rendered dashboard card
#[derive(Debug, Serialize)]
struct DashboardRow {
    url: String,
    status: &'static str,
    css_class: &'static str,
    last_response: String,
    total_checks: u64,
    failures: u64,
    uptime: String,
}

#[derive(Debug, Serialize)]
struct DashboardData {
    sites: Vec<DashboardRow>,
}

impl From<&SiteSnapshot> for DashboardRow {
    fn from(snapshot: &SiteSnapshot) -> Self {
        Self {
            url: snapshot.url.clone(),
            status: snapshot.status.as_str(),
            css_class: snapshot.status.css_class(),
            last_response: match snapshot.last_latency_ms {
                Some(ms) => format!("{ms}ms"),
                None => String::from("N/A"),
            },
            total_checks: snapshot.total_checks,
            failures: snapshot.failures,
            uptime: format!("{:.2}", snapshot.uptime_percent),
        }
    }
}

/// Render the dashboard page for a snapshot
///
/// # Errors
///
/// Returns a render error if the template fails to expand; the template is
/// static, so this indicates a bug rather than bad input.
pub fn render(snapshot: &[SiteSnapshot]) -> Result<String, handlebars::RenderError> {
    let handlebars = Handlebars::new();

    let data = DashboardData {
        sites: snapshot.iter().map(DashboardRow::from).collect(),
    };

    handlebars.render_template(DASHBOARD_TEMPLATE, &data)
}
