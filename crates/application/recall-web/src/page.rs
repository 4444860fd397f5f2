//! Single-page front end: vehicle form, chart viewer and chat box.

use recall_charts::ChartKind;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 1040px; margin: 2rem auto; color: #222; }
section { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
input, select, button { font-size: 1rem; padding: .35rem .5rem; margin: .2rem; }
#chart { max-width: 100%; display: block; margin-top: .5rem; }
#status, #answer { white-space: pre-wrap; }
.error { color: #b00020; }
"#;

const SCRIPT: &str = r#"
async function post(path, body) {
  const res = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  return res;
}

async function errorText(res) {
  try { return (await res.json()).error; } catch (_) { return res.statusText; }
}

function show(id, text, failed) {
  const el = document.getElementById(id);
  el.textContent = text;
  el.className = failed ? 'error' : '';
}

document.getElementById('vehicle').addEventListener('submit', async (e) => {
  e.preventDefault();
  const f = e.target;
  const res = await post('/get_vehicle_data', {
    make: f.make.value, model: f.model.value, model_year: f.model_year.value,
  });
  show('status', res.ok ? (await res.json()).message : await errorText(res), !res.ok);
});

document.getElementById('show-chart').addEventListener('click', async () => {
  const chartType = document.getElementById('chart-type').value;
  const res = await post('/get_chart', { chart_type: chartType });
  const img = document.getElementById('chart');
  if (res.ok) {
    img.src = URL.createObjectURL(await res.blob());
    show('chart-status', '', false);
  } else {
    img.removeAttribute('src');
    show('chart-status', await errorText(res), true);
  }
});

document.getElementById('chat').addEventListener('submit', async (e) => {
  e.preventDefault();
  show('answer', 'Thinking...', false);
  const res = await post('/chatbot', { message: e.target.message.value });
  show('answer', res.ok ? (await res.json()).response : await errorText(res), !res.ok);
});
"#;

/// Render the index page with one option per chart type
pub fn index_html() -> String {
    let options: String = ChartKind::ALL
        .iter()
        .map(|kind| format!(r#"<option value="{}">{}</option>"#, kind.as_str(), kind.title()))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Vehicle Recall Explorer</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Vehicle Recall Explorer</h1>
<section>
  <h2>Vehicle</h2>
  <form id="vehicle">
    <input name="make" placeholder="Make" required>
    <input name="model" placeholder="Model" required>
    <input name="model_year" placeholder="Model year" required>
    <button type="submit">Save</button>
  </form>
  <div id="status"></div>
</section>
<section>
  <h2>Charts</h2>
  <select id="chart-type">{options}</select>
  <button id="show-chart">Show chart</button>
  <div id="chart-status"></div>
  <img id="chart" alt="">
</section>
<section>
  <h2>Ask about recalls</h2>
  <form id="chat">
    <input name="message" size="60" placeholder="Which component is recalled most often?" required>
    <button type="submit">Ask</button>
  </form>
  <div id="answer"></div>
</section>
<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}
