use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::sync::{Cadence, SyncController};

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SyncController>,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/api/refetch", post(refetch_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the dashboard HTML page, injecting the refresh cadence.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_index(state.controller.cadence()))
}

fn render_index(cadence: Cadence) -> String {
    DASHBOARD_HTML.replace(
        "<body>",
        &format!(
            r#"<body data-match-secs="{}" data-commentary-secs="{}">"#,
            cadence.match_data.as_secs(),
            cadence.commentary.as_secs()
        ),
    )
}

/// GET /api/state
async fn state_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.view().await)
}

/// POST /api/refetch
async fn refetch_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.controller.refetch().await;
    StatusCode::ACCEPTED
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Live Cricket</title>
<style>
  :root {
    --bg: #0b1020;
    --card: #151b2e;
    --border: #263050;
    --accent: #3d8bfd;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e6e9f2;
    --muted: #8a93b2;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.3rem; font-weight: 700; }
  .badge { padding: .2rem .6rem; border-radius: 4px; font-size: .75rem; font-weight: 700; text-transform: uppercase; background: var(--red); color: #fff; }
  main { padding: 1.5rem 2rem; display: grid; grid-template-columns: 2fr 1fr; gap: 1.5rem; max-width: 1280px; margin: 0 auto; }
  @media (max-width: 900px) { main { grid-template-columns: 1fr; } }
  .col { display: grid; gap: 1.5rem; align-content: start; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .panel-body { padding: 1rem 1.2rem; }
  .score-row { display: flex; justify-content: space-between; align-items: baseline; padding: .5rem 0; }
  .score-row .team { font-size: 1.1rem; font-weight: 600; }
  .score-row .runs { font-size: 1.8rem; font-weight: 700; }
  .muted { color: var(--muted); font-size: .85rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .6rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .6rem 1rem; font-size: .88rem; border-bottom: 1px solid #1d2440; }
  .ball { display: flex; gap: .8rem; padding: .7rem 1.2rem; border-bottom: 1px solid #1d2440; font-size: .88rem; }
  .ball .over { color: var(--muted); min-width: 2.5rem; }
  .ball.boundary .over { color: var(--green); font-weight: 700; }
  .ball.wicket .over { color: var(--red); font-weight: 700; }
  .chat { padding: .6rem 1.2rem; border-bottom: 1px solid #1d2440; font-size: .88rem; }
  .chat .user { color: var(--accent); font-weight: 600; margin-right: .4rem; }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  .full { min-height: 80vh; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1rem; text-align: center; }
  .spinner { width: 48px; height: 48px; border-radius: 50%; border: 3px solid var(--border); border-top-color: var(--text); animation: spin 1s linear infinite; }
  @keyframes spin { to { transform: rotate(360deg); } }
  .btn { background: var(--accent); border: none; color: #fff; padding: .5rem 1.2rem; border-radius: 6px; cursor: pointer; font-size: .9rem; }
  .toast { position: fixed; bottom: 1rem; padding: .5rem 1rem; border-radius: 8px; font-size: .85rem; display: none; }
  #degraded { right: 1rem; background: rgba(255,79,106,.9); }
  #updating { left: 1rem; background: rgba(61,139,253,.9); }
  footer { text-align: center; color: var(--muted); font-size: .8rem; padding: 2rem; border-top: 1px solid var(--border); margin-top: 2rem; }
</style>
</head>
<body>
<header>
  <span class="badge" id="status-badge">Live</span>
  <h1 id="title">🏏 Live Cricket</h1>
  <span style="margin-left:auto;" class="muted" id="last-updated"></span>
</header>

<div id="screen"></div>

<div class="toast" id="degraded">⚠️ Connection issues - using cached data</div>
<div class="toast" id="updating">Updating…</div>

<footer>
  <div id="cadence"></div>
  <div id="footer-updated" style="margin-top:.5rem;"></div>
</footer>

<script>
const esc = s => String(s).replace(/[&<>"]/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;'}[c]));
const overs = s => `${s.overs}.${s.balls}`;
const timeAgo = ts => {
  const d = (Date.now() - new Date(ts).getTime()) / 1000;
  if (d < 60) return Math.round(d) + 's ago';
  if (d < 3600) return Math.round(d / 60) + 'm ago';
  return new Date(ts).toLocaleTimeString();
};

function fullScreen(inner) {
  document.getElementById('screen').innerHTML = `<div class="full">${inner}</div>`;
}

async function refetch() {
  await fetch('/api/refetch', { method: 'POST' });
  load();
}

function scoreRow(team, score) {
  const rrr = score.required_run_rate ? ` · RRR ${score.required_run_rate.toFixed(2)}` : '';
  return `<div class="score-row">
    <div><div class="team">${esc(team.name)}</div><div class="muted">${overs(score)} ov · RR ${score.run_rate.toFixed(2)}${rrr}</div></div>
    <div class="runs">${score.runs}/${score.wickets}</div>
  </div>`;
}

function renderLive(v) {
  const m = v.match_data;
  document.getElementById('title').textContent = `🏏 ${m.teams.team1.short_name} vs ${m.teams.team2.short_name} · ${m.match_type}`;
  document.getElementById('status-badge').textContent = m.status;
  const weather = m.weather ? ` · ${esc(m.weather.condition)} ${m.weather.temperature}°C` : '';

  const batters = [...m.teams.team1.players, ...m.teams.team2.players]
    .filter(p => p.is_on_field && p.batting)
    .map(p => `<tr><td>${esc(p.name)}</td><td>${p.batting.runs}</td><td>${p.batting.balls}</td><td>${p.batting.fours}</td><td>${p.batting.sixes}</td><td>${p.batting.strike_rate.toFixed(1)}</td></tr>`)
    .join('');

  let stats = '';
  if (v.statistics) {
    const parts = v.statistics.partnerships.map(p =>
      `<tr><td>${esc(p.player1)} &amp; ${esc(p.player2)}</td><td>${p.runs} (${p.balls})</td><td>${p.is_active ? 'active' : ''}</td></tr>`).join('');
    const phases = v.statistics.phase_scores.map(p =>
      `<tr><td>${esc(p.phase)}</td><td>${p.runs}/${p.wickets}</td><td>${p.run_rate.toFixed(2)}</td></tr>`).join('');
    stats = `<div class="panel"><div class="panel-header">Partnerships &amp; Phases</div>
      <table><tbody>${parts}${phases}</tbody></table></div>`;
  }

  const balls = v.commentary.length
    ? v.commentary.map(c => `<div class="ball ${c.is_wicket ? 'wicket' : c.is_boundary ? 'boundary' : ''}">
        <span class="over">${c.over}.${c.ball}</span><span>${esc(c.text)}</span></div>`).join('')
    : '<div class="empty">No commentary yet</div>';

  const chat = v.chat.length
    ? v.chat.map(c => `<div class="chat"><span class="user">${esc(c.user)}</span>${esc(c.message)}
        <div class="muted">${timeAgo(c.timestamp)}</div></div>`).join('')
    : '<div class="empty">Chat unavailable</div>';

  document.getElementById('screen').innerHTML = `<main>
    <div class="col">
      <div class="panel"><div class="panel-header">Scorecard</div><div class="panel-body">
        ${scoreRow(m.teams.team1, m.score.team1)}
        ${scoreRow(m.teams.team2, m.score.team2)}
        <div class="muted" style="margin-top:.6rem;">${esc(m.venue)} · Toss: ${esc(m.toss.winner)} chose to ${m.toss.decision}${weather}</div>
      </div></div>
      <div class="panel"><div class="panel-header">At the Crease</div>
        <table><thead><tr><th>Batter</th><th>R</th><th>B</th><th>4s</th><th>6s</th><th>SR</th></tr></thead>
        <tbody>${batters || '<tr><td colspan="6" class="empty">–</td></tr>'}</tbody></table></div>
      ${stats}
    </div>
    <div class="col">
      <div class="panel"><div class="panel-header">Commentary</div>${balls}</div>
      <div class="panel"><div class="panel-header">Live Chat</div>${chat}</div>
    </div>
  </main>`;
}

function render(v) {
  const mode = v.mode;
  document.getElementById('degraded').style.display = 'none';
  document.getElementById('updating').style.display = 'none';

  if (mode.kind === 'loading') {
    fullScreen('<div class="spinner"></div><div>Loading live match data...</div><div class="muted">Connecting to cricket servers...</div>');
  } else if (mode.kind === 'blocking_error') {
    fullScreen(`<div style="font-size:3rem;">⚠️</div><div>Unable to load match data</div>
      <div class="muted">${esc(mode.message)}</div><button class="btn" onclick="refetch()">Try Again</button>`);
  } else if (mode.kind === 'no_data') {
    fullScreen('<div>No match data available</div>');
  } else {
    renderLive(v);
    if (mode.degraded) document.getElementById('degraded').style.display = 'block';
    if (mode.updating) document.getElementById('updating').style.display = 'block';
  }

  const updated = v.last_update ? 'Last updated: ' + new Date(v.last_update).toLocaleString() : '';
  document.getElementById('last-updated').textContent = updated;
  document.getElementById('footer-updated').textContent = updated;
}

async function load() {
  try {
    const r = await fetch('/api/state');
    if (r.ok) render(await r.json());
  } catch (e) {
    console.error('dashboard poll failed', e);
  }
}

const ds = document.body.dataset;
document.getElementById('cadence').textContent =
  `Live updates every ${ds.matchSecs} seconds • Commentary refreshed every ${ds.commentarySecs} seconds`;

load();
setInterval(load, 2000);
</script>
</body>
</html>"#;
