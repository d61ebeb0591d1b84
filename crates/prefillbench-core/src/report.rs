use std::collections::BTreeSet;

use prefillbench_types::ResultRecord;

/// Options for the rendered results page.
pub struct ReportOptions {
    pub title: String,
    /// Record field the dropdown filter matches on. Artifact variants
    /// disagree between `developer` and `provider`, so this stays
    /// configurable; an unknown field just leaves the dropdown with "all".
    pub category_field: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "LLM Prefilling".to_string(),
            category_field: "developer".to_string(),
        }
    }
}

fn field_value<'a>(record: &'a ResultRecord, field: &str) -> &'a str {
    match field {
        "model" => &record.model,
        "developer" => &record.developer,
        "prefix" => &record.prefix,
        "prompt" => &record.prompt,
        "response" => &record.response,
        "description" => &record.description,
        _ => "",
    }
}

/// Render the whole results page as one self-contained HTML document:
/// sortable model/prefix columns, a model substring filter, a categorical
/// dropdown with an "all" sentinel, and tinted rows for failed dispatches.
/// An empty record list renders the empty-state message and no table.
pub fn render_page(records: &[ResultRecord], options: &ReportOptions) -> String {
    let body = if records.is_empty() {
        r#"<p class="empty-state">No test results available yet. Run the test script to generate results.</p>"#
            .to_string()
    } else {
        table_section(records, options)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        .container {{
            max-width: 1400px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }}
        h1 {{
            margin: 0 0 10px 0;
            color: #333;
        }}
        .intro {{
            margin-bottom: 20px;
            color: #333;
        }}
        .intro a {{
            color: #007bff;
            text-decoration: underline;
        }}
        .timestamp {{
            color: #6c757d;
            font-size: 14px;
            margin-bottom: 20px;
        }}
        .empty-state {{
            color: #6c757d;
        }}
        .filters {{
            display: flex;
            gap: 16px;
            margin: 20px 0;
        }}
        .filters input {{
            flex: 0 1 320px;
            padding: 8px 10px;
            border: 1px solid #ced4da;
            border-radius: 4px;
            font-size: 14px;
        }}
        .filters select {{
            width: 180px;
            padding: 8px 10px;
            border: 1px solid #ced4da;
            border-radius: 4px;
            font-size: 14px;
            background: white;
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
            margin-top: 20px;
        }}
        th {{
            background: #343a40;
            color: white;
            padding: 12px;
            text-align: left;
            font-weight: 600;
            font-size: 13px;
            text-transform: uppercase;
            letter-spacing: 0.5px;
        }}
        th button {{
            all: unset;
            cursor: pointer;
            font: inherit;
            color: inherit;
        }}
        th button::after {{
            content: " ⇅";
            opacity: 0.6;
        }}
        td {{
            padding: 12px;
            border-bottom: 1px solid #dee2e6;
            vertical-align: top;
        }}
        tr.result:hover {{ background: #e9ecef; }}
        tr.result.error {{ background: #fef3f2; }}
        tr.result.error:hover {{ background: #fde3e1; }}
        tr.result.error td {{ color: #721c24; }}
        td pre {{
            margin: 0;
            padding: 8px;
            background: #f8f9fa;
            border-radius: 4px;
            font-size: 12px;
            max-height: 150px;
            overflow: auto;
            white-space: pre-wrap;
            word-break: break-word;
        }}
        tr.result.error td pre {{ background: #fde3e1; }}
        #no-match td {{
            text-align: center;
            color: #6c757d;
            padding: 24px;
        }}
    </style>
    <script>
        function applyFilters() {{
            const text = document.getElementById('model-filter').value.toLowerCase();
            const category = document.getElementById('category-filter').value;
            let visible = 0;
            document.querySelectorAll('#results tbody tr.result').forEach(function (row) {{
                const matchesText = row.dataset.model.toLowerCase().includes(text);
                const matchesCategory = category === 'all' || row.dataset.category === category;
                const show = matchesText && matchesCategory;
                row.style.display = show ? '' : 'none';
                if (show) visible++;
            }});
            const noMatch = document.getElementById('no-match');
            if (noMatch) noMatch.style.display = visible === 0 ? '' : 'none';
        }}

        const sortAscending = {{}};
        function sortBy(key) {{
            const ascending = sortAscending[key] = !sortAscending[key];
            const tbody = document.querySelector('#results tbody');
            const rows = Array.from(tbody.querySelectorAll('tr.result'));
            rows.sort(function (a, b) {{
                return a.dataset[key].localeCompare(b.dataset[key]);
            }});
            if (!ascending) rows.reverse();
            rows.forEach(function (row) {{ tbody.appendChild(row); }});
            const noMatch = document.getElementById('no-match');
            if (noMatch) tbody.appendChild(noMatch);
        }}
    </script>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="intro">
            <p>
                This page demonstrates how different language models respond to the
                same prompts with various prefillings intended to guide the model to
                generate specific formats or wanted content.
            </p>
            <p>
                To learn more about the prefilling technique, please check out
                <a href="https://docs.anthropic.com/en/docs/build-with-claude/prompt-engineering/prefill-claudes-response#example-structured-data-extraction-with-prefilling">this article</a>.
            </p>
        </div>
        <div class="timestamp">Generated: {timestamp}</div>
        {body}
    </div>
</body>
</html>"#,
        title = html_escape(&options.title),
        timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        body = body,
    )
}

fn table_section(records: &[ResultRecord], options: &ReportOptions) -> String {
    let field = options.category_field.as_str();

    let categories: BTreeSet<&str> = records
        .iter()
        .map(|r| field_value(r, field))
        .filter(|v| !v.is_empty())
        .collect();
    let mut category_options = String::new();
    for category in &categories {
        category_options.push_str(&format!(
            r#"<option value="{v}">{v}</option>"#,
            v = html_escape(category)
        ));
    }

    let mut rows = String::new();
    for record in records {
        let row_class = if record.has_error { "result error" } else { "result" };
        rows.push_str(&format!(
            r#"
            <tr class="{row_class}" data-model="{model}" data-prefix="{prefix}" data-category="{category}">
                <td>{model}</td>
                <td><pre>{prefix}</pre></td>
                <td><pre>{prompt}</pre></td>
                <td><pre>{response}</pre></td>
            </tr>
            "#,
            row_class = row_class,
            model = html_escape(&record.model),
            prefix = html_escape(&record.prefix),
            prompt = html_escape(&record.prompt),
            response = html_escape(&record.response),
            category = html_escape(field_value(record, field)),
        ));
    }

    format!(
        r#"<div class="filters">
            <input id="model-filter" type="text" placeholder="Filter by model..." oninput="applyFilters()">
            <select id="category-filter" onchange="applyFilters()">
                <option value="all">All {field_label}s</option>
                {category_options}
            </select>
        </div>
        <table id="results">
            <thead>
                <tr>
                    <th><button type="button" onclick="sortBy('model')">Model</button></th>
                    <th><button type="button" onclick="sortBy('prefix')">Prefix</button></th>
                    <th>Prompt</th>
                    <th>Response</th>
                </tr>
            </thead>
            <tbody>
                {rows}
                <tr id="no-match" style="display: none;">
                    <td colspan="4">No results.</td>
                </tr>
            </tbody>
        </table>"#,
        field_label = html_escape(field),
        category_options = category_options,
        rows = rows,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
