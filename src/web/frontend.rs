//! Embedded HTML/CSS/JS shell page for the panel host.
//!
//! The page is compiled into the binary as a string constant. No external
//! assets, no build tools, no CDN dependencies. Its script only binds
//! `data-action` clicks to `POST /api/intent`; every piece of panel markup
//! comes from the server.

use crate::panel::error::DEFAULT_LOAD_MESSAGE;
use crate::panel::{DELETE_CONFIRMATION, LOADING_HTML};

/// Fill the shell page for page `page_id` with its current panel markup.
pub fn index_html(page_id: &str, panel_markup: &str) -> String {
    INDEX_HTML
        .replace("__PAGE_ID__", &js_string(page_id))
        .replace("__CONFIRM_MESSAGE__", &js_string(DELETE_CONFIRMATION))
        .replace("__LOAD_FAILED_MESSAGE__", &js_string(DEFAULT_LOAD_MESSAGE))
        .replace("__LOADING_HTML__", LOADING_HTML)
        .replace("__PANEL_HTML__", panel_markup)
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Parking Spot Details</title>
<style>
:root {
  --bg: #f6f7f9;
  --surface: #ffffff;
  --border: #dee2e6;
  --text: #212529;
  --muted: #6c757d;
  --primary: #0d6efd;
  --danger: #dc3545;
  --warning: #ffc107;
  --success: #198754;
  --secondary: #6c757d;
  --radius: 6px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }

.app { max-width: 960px; margin: 0 auto; padding: 24px; display: grid; grid-template-columns: 1fr 340px; gap: 24px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 16px; }
h1 { font-size: 20px; margin-bottom: 12px; }
form { display: flex; gap: 8px; }
input { flex: 1; padding: 6px 10px; border: 1px solid var(--border); border-radius: var(--radius); }

/* Panel markup classes */
.alert { padding: 8px 12px; border-radius: var(--radius); margin-bottom: 12px; border: 1px solid transparent; }
.alert-danger { background: #f8d7da; color: #842029; }
.alert-warning { background: #fff3cd; color: #664d03; }
.alert-success { background: #d1e7dd; color: #0f5132; }
.btn { display: block; width: 100%; padding: 6px 10px; border: 0; border-radius: var(--radius); color: #fff; cursor: pointer; }
.btn-danger { background: var(--danger); }
.btn-secondary { background: var(--secondary); }
.btn-primary { background: var(--primary); width: auto; }
.d-grid { display: grid; }
.gap-2 { gap: 8px; }
.mt-2 { margin-top: 8px; } .mt-3 { margin-top: 12px; } .mt-5 { margin-top: 40px; }
.mb-0 { margin-bottom: 0; } .mb-1 { margin-bottom: 4px; } .mb-2 { margin-bottom: 8px; } .mb-3 { margin-bottom: 12px; }
.py-2 { padding-top: 8px; padding-bottom: 8px; } .py-4 { padding-top: 24px; padding-bottom: 24px; }
.text-center { text-align: center; } .text-start { text-align: left; }
.text-muted { color: var(--muted); } .small { font-size: 0.875em; } .fst-italic { font-style: italic; }
.table { width: 100%; border-collapse: collapse; }
.table th, .table td { border: 1px solid var(--border); padding: 4px 6px; vertical-align: top; }
.table-light { background: #f8f9fa; }
.table-striped tbody tr:nth-child(odd) { background: #f2f2f2; }
.table-responsive { overflow-x: auto; }
.visually-hidden { position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0 0 0 0); }
.spinner-border { display: inline-block; width: 2rem; height: 2rem; border: 0.25em solid var(--primary); border-right-color: transparent; border-radius: 50%; animation: spin .75s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
hr { border: 0; border-top: 1px solid var(--border); margin: 12px 0; }
</style>
</head>
<body>
<div class="app">
  <section class="card">
    <h1>Parking Spots</h1>
    <form id="spot-form">
      <input id="spot-id" name="spot_id" placeholder="Spot id" autocomplete="off">
      <button type="submit" class="btn btn-primary" data-action="show-details">Show details</button>
    </form>
  </section>
  <aside class="card">
    <div id="details-content">__PANEL_HTML__</div>
  </aside>
</div>
<template id="loading-template">__LOADING_HTML__</template>
<script>
(function () {
  const panel = document.getElementById('details-content');
  const loading = document.getElementById('loading-template').innerHTML;
  const pageId = __PAGE_ID__;
  const confirmMessage = __CONFIRM_MESSAGE__;
  const loadFailedMessage = __LOAD_FAILED_MESSAGE__;

  function paintError(message) {
    const alertBox = document.createElement('div');
    alertBox.className = 'alert alert-danger';
    alertBox.textContent = 'Error: ' + message;
    panel.replaceChildren(alertBox);
  }

  async function send(action, spotId, confirmed) {
    const res = await fetch('/api/intent', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ page_id: pageId, action: action, spot_id: spotId, confirmed: confirmed }),
    });
    const data = await res.json();
    if (!res.ok) {
      if (action === 'show-details') {
        paintError(data.error || loadFailedMessage);
      } else {
        alert(data.error || 'Request failed.');
      }
      return;
    }
    // A newer intent from this page is still in flight and will paint.
    if (data.stale) return;
    data.notifications.forEach(function (m) { alert(m); });
    if (data.reload) {
      location.reload();
      return;
    }
    if (action !== 'delete-spot') {
      panel.innerHTML = data.panel;
    }
  }

  function trigger(el) {
    const action = el.dataset.action;
    let spotId = el.dataset.spotId || null;
    if (action === 'show-details' && !spotId) {
      const input = document.getElementById('spot-id');
      spotId = input.value.trim();
      if (!spotId) {
        input.focus();
        return;
      }
    }
    let confirmed = false;
    if (action === 'delete-spot') {
      confirmed = window.confirm(confirmMessage);
    }
    if (action === 'show-details') {
      panel.innerHTML = loading;
    }
    send(action, spotId, confirmed).catch(function () {
      if (action === 'show-details') {
        paintError(loadFailedMessage);
      } else {
        alert('An error occurred while contacting the panel host.');
      }
    });
  }

  document.getElementById('spot-form').addEventListener('submit', function (ev) {
    ev.preventDefault();
  });

  document.addEventListener('click', function (ev) {
    const el = ev.target.closest('[data-action]');
    if (!el) return;
    ev.preventDefault();
    trigger(el);
  });
})();
</script>
</body>
</html>
"##;
