//! The chat page served at `/`.
//!
//! Markup and a small script only: the script opens `/ws`, renders `partial`
//! frames into the pending reply and locks it on `final` or `fallback`.

use adda_core::PersonaConfig;

const SCRIPT: &str = r#"
const persona = document.body.dataset.persona;
const log = document.getElementById('log');
const form = document.getElementById('composer');
const input = document.getElementById('input');
const clear = document.getElementById('clear');
const proto = location.protocol === 'https:' ? 'wss' : 'ws';
const ws = new WebSocket(`${proto}://${location.host}/ws?persona=${encodeURIComponent(persona)}`);
let pending = null;

function bubble(role, text) {
  const div = document.createElement('div');
  div.className = 'chat-message ' + role;
  div.textContent = text;
  log.appendChild(div);
  div.scrollIntoView({ block: 'end' });
  return div;
}

ws.onmessage = (event) => {
  const frame = JSON.parse(event.data);
  switch (frame.type) {
    case 'partial':
      if (!pending) pending = bubble('assistant', '');
      pending.textContent = frame.content;
      pending.scrollIntoView({ block: 'end' });
      break;
    case 'final':
    case 'fallback':
      if (!pending) pending = bubble('assistant', '');
      pending.textContent = frame.content;
      pending = null;
      input.disabled = false;
      input.focus();
      break;
    case 'cleared':
      log.replaceChildren();
      break;
    case 'error':
      bubble('notice', frame.content);
      input.disabled = false;
      break;
  }
};

ws.onclose = () => bubble('notice', 'Disconnected.');

form.addEventListener('submit', (event) => {
  event.preventDefault();
  const text = input.value.trim();
  if (!text || ws.readyState !== WebSocket.OPEN) return;
  bubble('user', text);
  ws.send(JSON.stringify({ type: 'chat', content: text }));
  input.value = '';
  input.disabled = true;
});

clear.addEventListener('click', () => ws.send(JSON.stringify({ type: 'clear' })));
"#;

const STYLE: &str = r#"
body { background: #0a0a0a; color: #fff; font-family: sans-serif; max-width: 46rem; margin: 0 auto; padding: 1rem; }
h1 { color: #ff6b35; text-align: center; }
.caption { text-align: center; font-style: italic; opacity: .8; }
.chat-message { padding: 1rem; border-radius: .5rem; margin-bottom: 1rem; white-space: pre-wrap; }
.assistant { border-left: 3px solid #ff6b35; }
.user { background: #1a1a1a; }
.notice, .config-error { color: #ff6b6b; }
form { display: flex; gap: .5rem; }
input { flex: 1; background: #1a1a1a; color: #fff; border: 1px solid #333; padding: .6rem; }
"#;

/// Escapes text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Renders the chat page for `persona`.
pub fn render_chat(persona: &PersonaConfig) -> String {
    let title = escape_html(persona.title());
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body data-persona="{key}">
<h1>{title}</h1>
<p class="caption">{caption}</p>
<div id="log"></div>
<form id="composer">
<input id="input" autocomplete="off" placeholder="{placeholder}">
<button type="submit">Send</button>
<button type="button" id="clear">{clear}</button>
</form>
<script>{SCRIPT}</script>
</body>
</html>"#,
        key = escape_html(&persona.key),
        caption = escape_html(&persona.presentation.caption),
        placeholder = escape_html(&persona.presentation.input_placeholder),
        clear = escape_html(&persona.presentation.clear_label),
    )
}

/// Renders the page shown instead of the chat when startup configuration failed.
pub fn render_halted(diagnostic: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Configuration error</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Configuration error</h1>
<p class="config-error">⚠️ {diagnostic}</p>
</body>
</html>"#,
        diagnostic = escape_html(diagnostic),
    )
}
