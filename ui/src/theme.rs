pub const GLOBAL_CSS: &str = r#"
:root {
  --bg: #f5f7fa;
  --panel: #ffffff;
  --border: #dde3ea;
  --text: #1f2937;
  --text-muted: #6b7280;
  --accent: #2563eb;
  --positive: #16a34a;
  --negative: #dc2626;
  --radius: 8px;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  background: var(--bg);
  color: var(--text);
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  font-size: 14px;
}

.page { min-height: 100vh; display: flex; flex-direction: column; }

.header {
  padding: 12px 24px;
  background: var(--panel);
  border-bottom: 1px solid var(--border);
}
.header h1 { margin: 0; font-size: 18px; }

.layout {
  flex: 1;
  display: grid;
  grid-template-columns: 320px 1fr;
  gap: 16px;
  padding: 16px 24px;
  align-items: start;
}

.panel {
  background: var(--panel);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}

.field { display: flex; flex-direction: column; gap: 4px; margin-bottom: 12px; }
.field span { color: var(--text-muted); font-size: 12px; }
.field-row { display: flex; gap: 8px; align-items: flex-end; margin-bottom: 12px; }
.field-row .field { flex: 1; margin-bottom: 0; }

input, select {
  padding: 6px 8px;
  border: 1px solid var(--border);
  border-radius: 4px;
  font: inherit;
}

button {
  padding: 6px 12px;
  border: 1px solid var(--border);
  border-radius: 4px;
  background: var(--panel);
  cursor: pointer;
  font: inherit;
}
button:hover { border-color: var(--accent); }
button:disabled { opacity: 0.5; cursor: default; }

button.primary {
  width: 100%;
  background: var(--accent);
  border-color: var(--accent);
  color: #fff;
  margin-top: 8px;
}

.error-box {
  margin-top: 12px;
  padding: 8px 10px;
  border-radius: 4px;
  background: #fee2e2;
  color: var(--negative);
}

.saved-list { list-style: none; margin: 0; padding: 0; }
.saved-list li { margin-bottom: 6px; }
.saved-list button { width: 100%; text-align: left; }

.placeholder {
  display: flex;
  align-items: center;
  justify-content: center;
  min-height: 160px;
  color: var(--text-muted);
}

.strategy-card {
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 10px;
  margin-bottom: 10px;
}
.strategy-card-head {
  display: flex;
  justify-content: space-between;
  align-items: center;
  margin-bottom: 8px;
}

.tabs { display: flex; gap: 6px; margin: 16px 0 8px; }
.tab { border-radius: 999px; }
.tab.active { background: var(--accent); border-color: var(--accent); color: #fff; }

table.metrics, table.report { width: 100%; border-collapse: collapse; }
table td, table th {
  padding: 6px 8px;
  border-bottom: 1px solid var(--border);
  text-align: left;
}
td.gain { color: var(--positive); }
td.loss { color: var(--negative); }

.chart-panel { margin-bottom: 8px; }
.chart-toolbar {
  display: flex;
  justify-content: space-between;
  align-items: center;
  gap: 8px;
  margin-bottom: 8px;
  flex-wrap: wrap;
}
.indicator-buttons { display: flex; gap: 6px; flex-wrap: wrap; }
.zoom-controls { display: flex; gap: 8px; align-items: center; }
.zoom-range { color: var(--text-muted); font-size: 12px; }

.chart-stack { display: flex; flex-direction: column; gap: 2px; }
.chart-stack canvas {
  display: block;
  width: 100%;
  border: 1px solid var(--border);
  border-radius: 4px;
  background: #fff;
}

.chart-hint { color: var(--text-muted); font-size: 12px; margin: 6px 0 0; }
"#;
