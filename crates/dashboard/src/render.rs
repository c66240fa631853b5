//! HTML rendering for the dashboard page

use chrono::{DateTime, Local};
use monitor_lib::{notifier::escape_html, ContainerStatus};

use crate::snapshot::DashboardSnapshot;

/// Seconds between browser refreshes
pub const REFRESH_SECS: u32 = 10;

const STYLE: &str = r#"
        body { font-family: 'Courier New', monospace; background: #1a1a1a; color: #00ff00; padding: 20px; }
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { border-bottom: 2px solid #00ff00; padding-bottom: 10px; }
        .metric-box { background: #2a2a2a; border: 1px solid #00ff00; padding: 15px; margin: 10px 0; border-radius: 5px; }
        .status-up { color: #00ff00; }
        .status-down { color: #ff0000; }
        .warning { color: #ffaa00; }
        .critical { color: #ff0000; }
        pre { background: #0a0a0a; padding: 10px; border-radius: 3px; overflow-x: auto; }
        .refresh-info { color: #888; font-size: 12px; text-align: right; }
"#;

fn status_class(status: ContainerStatus) -> &'static str {
    match status {
        ContainerStatus::Up => "status-up",
        ContainerStatus::Down | ContainerStatus::Unknown => "status-down",
    }
}

/// Render the full page for one snapshot
pub fn render_page(snapshot: &DashboardSnapshot, now: DateTime<Local>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Container Monitoring Dashboard</title>
    <meta http-equiv="refresh" content="{refresh}">
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>🔍 Container Monitoring Dashboard</h1>
        <div class="refresh-info">Auto-refresh: {refresh}s | Last update: {updated}</div>

        <div class="metric-box">
            <h2>📊 Current Status</h2>
            <p><strong>Container:</strong> <span class="{status_class}">{container_status}</span></p>
            <p><strong>HTTP Response:</strong> {http_code}</p>
            <p><strong>CPU Usage:</strong> <span class="{cpu_class}">{cpu}</span></p>
            <p><strong>Memory Usage:</strong> <span class="{mem_class}">{memory}</span></p>
            <p><strong>Latency:</strong> {latency}s</p>
        </div>

        <div class="metric-box">
            <h2>📈 Recent Metrics (Last 10 entries)</h2>
            <pre>{recent_metrics}</pre>
        </div>

        <div class="metric-box">
            <h2>🚦 Status History (Last 10 entries)</h2>
            <pre>{recent_status}</pre>
        </div>

        <div class="metric-box">
            <h2>⚠️ Alerts</h2>
            <pre>{alerts}</pre>
        </div>
    </div>
</body>
</html>
"#,
        refresh = REFRESH_SECS,
        style = STYLE,
        updated = now.format("%Y-%m-%d %H:%M:%S"),
        status_class = status_class(snapshot.status.container_status),
        container_status = snapshot.status.container_status,
        http_code = escape_html(&snapshot.status.http_code),
        cpu_class = snapshot.cpu_level().css_class(),
        cpu = snapshot.cpu_display(),
        mem_class = snapshot.memory_level().css_class(),
        memory = snapshot.memory_display(),
        latency = snapshot.latency_display(),
        recent_metrics = escape_html(&snapshot.recent_metrics),
        recent_status = escape_html(&snapshot.recent_status),
        alerts = escape_html(&snapshot.alert_text()),
    )
}
