use axum::response::Html;

const DASHBOARD_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Ad Interactions</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Helvetica Neue', Arial, sans-serif;
            background: #f5f7fa;
            min-height: 100vh;
            padding: 24px;
            color: #1a202c;
        }
        header {
            background: white;
            padding: 24px 32px;
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.06);
            margin-bottom: 24px;
            border: 1px solid #e2e8f0;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        h1 { color: #2d3748; font-size: 24px; font-weight: 600; letter-spacing: -0.025em; }
        nav a { color: #4a5568; margin-left: 16px; font-size: 14px; text-decoration: none; }
        .stats { display: flex; gap: 16px; margin-bottom: 24px; flex-wrap: wrap; }
        .stat {
            background: white;
            border: 1px solid #e2e8f0;
            border-radius: 8px;
            padding: 16px 24px;
            min-width: 200px;
        }
        .stat-label { font-size: 12px; color: #718096; text-transform: uppercase; letter-spacing: 0.05em; }
        .stat-value { font-size: 28px; font-weight: 600; color: #2d3748; margin-top: 4px; }
        table { width: 100%; background: white; border-collapse: collapse; border-radius: 8px; overflow: hidden; }
        th, td { padding: 12px 16px; text-align: left; border-bottom: 1px solid #e2e8f0; font-size: 14px; }
        th { background: #f7fafc; color: #4a5568; font-weight: 600; }
        .updated { animation: flash 1s ease-out; }
        @keyframes flash { from { background: #c6f6d5; } to { background: white; } }
        .status { font-size: 12px; color: #a0aec0; margin-top: 12px; }
    </style>
</head>
<body>
    <header>
        <h1>Ad Interactions</h1>
        <nav>
            <a href="/map">Map</a>
            <a href="/map_today">Today</a>
            <a href="/send_data">Send</a>
        </nav>
    </header>
    <div class="stats">
        <div class="stat"><div class="stat-label">Total interactions</div><div class="stat-value" id="total-interactions">0</div></div>
        <div class="stat"><div class="stat-label">Total earnings</div><div class="stat-value" id="total-earnings">0.00</div></div>
        <div class="stat"><div class="stat-label">Interactions today</div><div class="stat-value" id="interactions-today">0</div></div>
        <div class="stat"><div class="stat-label">Earnings today</div><div class="stat-value" id="earnings-today">0.00</div></div>
    </div>
    <table>
        <thead><tr><th>Ad</th><th>Interactions</th><th>Earnings</th></tr></thead>
        <tbody id="summary-rows"></tbody>
    </table>
    <div class="status" id="status">Connecting...</div>

    <script>
        function render(data) {
            document.getElementById('total-interactions').textContent = data.total_interactions;
            document.getElementById('total-earnings').textContent = data.total_earnings.toFixed(2);
            document.getElementById('interactions-today').textContent = data.interactions_today;
            document.getElementById('earnings-today').textContent = data.earnings_today.toFixed(2);

            const rows = document.getElementById('summary-rows');
            rows.innerHTML = '';
            data.table.forEach(row => {
                const tr = document.createElement('tr');
                [row.ad_id || '(none)', row.Interactions, row.Earnings.toFixed(2)].forEach(value => {
                    const td = document.createElement('td');
                    td.textContent = value;
                    tr.appendChild(td);
                });
                if (data.data_updated) tr.className = 'updated';
                rows.appendChild(tr);
            });
        }

        function connect() {
            const source = new EventSource('/api/events');
            source.onmessage = (message) => {
                const data = JSON.parse(message.data);
                render(data);
                document.getElementById('status').textContent = 'Last update ' + data.timestamp;
            };
            source.onerror = () => {
                document.getElementById('status').textContent = 'Disconnected, retrying...';
            };
        }

        fetch('/api/summary').then(r => r.json()).then(render).catch(console.error);
        connect();
    </script>
</body>
</html>
"#;

const MAP_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Interaction Map</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body { margin: 0; height: 100%; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif; }
        #map { height: calc(100% - 48px); }
        .bar { height: 48px; display: flex; align-items: center; padding: 0 16px; gap: 16px; background: #2d3748; color: white; }
        .bar a { color: #cbd5e0; text-decoration: none; font-size: 14px; }
    </style>
</head>
<body>
    <div class="bar">
        <strong id="title">All interactions</strong>
        <span id="count"></span>
        <a href="/">Dashboard</a>
        <a href="/map">All</a>
        <a href="/map_today">Today</a>
    </div>
    <div id="map"></div>
    <script>
        const today = window.location.pathname === '/map_today';
        document.getElementById('title').textContent = today ? "Today's interactions" : 'All interactions';

        const map = L.map('map').setView([20, 0], 2);
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap contributors'
        }).addTo(map);

        fetch(today ? '/api/locations?today=true' : '/api/locations')
            .then(r => r.json())
            .then(points => {
                document.getElementById('count').textContent = points.length + ' points';
                const markers = points.map(p => {
                    const label = p.source === 'event'
                        ? `${p.ad_id || '(none)'} &middot; ${p.interaction_type} &middot; ${p.timestamp}`
                        : `sample &middot; ${p.timestamp}`;
                    return L.circleMarker([p.lat, p.lon], {
                        radius: 6,
                        color: p.source === 'event' ? '#3182ce' : '#dd6b20'
                    }).bindPopup(label);
                });
                if (markers.length > 0) {
                    const group = L.featureGroup(markers).addTo(map);
                    map.fitBounds(group.getBounds().pad(0.2));
                }
            })
            .catch(console.error);
    </script>
</body>
</html>
"#;

const SEND_DATA_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Send Interaction</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif; background: #f5f7fa; padding: 24px; }
        form { background: white; border: 1px solid #e2e8f0; border-radius: 8px; padding: 24px; max-width: 420px; }
        label { display: block; font-size: 13px; color: #4a5568; margin: 12px 0 4px; }
        input, select { width: 100%; padding: 8px; border: 1px solid #cbd5e0; border-radius: 4px; }
        button { margin-top: 16px; padding: 8px 16px; background: #3182ce; color: white; border: none; border-radius: 4px; cursor: pointer; }
        pre { margin-top: 16px; background: #1a202c; color: #e2e8f0; padding: 12px; border-radius: 4px; max-width: 420px; overflow-x: auto; }
    </style>
</head>
<body>
    <form id="send-form">
        <label for="ad_id">Ad</label>
        <input id="ad_id" value="A1">
        <label for="interaction_type">Interaction</label>
        <select id="interaction_type">
            <option>SWIPE_UP</option>
            <option>SWIPE_DOWN</option>
            <option>SWIPE_RIGHT</option>
            <option>qr</option>
        </select>
        <label for="coordinates">Coordinates</label>
        <input id="coordinates" placeholder="(lat, lon)">
        <button type="submit">Send</button>
    </form>
    <pre id="result"></pre>
    <script>
        if (navigator.geolocation) {
            navigator.geolocation.getCurrentPosition(pos => {
                document.getElementById('coordinates').value =
                    `(${pos.coords.latitude}, ${pos.coords.longitude})`;
            });
        }

        document.getElementById('send-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const response = await fetch('/api/data', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({
                    ad_id: document.getElementById('ad_id').value,
                    interaction_type: document.getElementById('interaction_type').value,
                    coordinates: document.getElementById('coordinates').value
                })
            });
            const text = await response.text();
            try {
                document.getElementById('result').textContent = JSON.stringify(JSON.parse(text), null, 2);
            } catch (_) {
                document.getElementById('result').textContent = `${response.status}: ${text}`;
            }
        });
    </script>
</body>
</html>
"#;

pub async fn dashboard_handler() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn map_handler() -> Html<&'static str> {
    Html(MAP_HTML)
}

pub async fn send_data_handler() -> Html<&'static str> {
    Html(SEND_DATA_HTML)
}
