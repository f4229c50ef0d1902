//! HTML report output format.
//!
//! Generates a self-contained HTML document with inline styling.

use crate::model::Analysis;

/// Generate the HTML report as a string.
pub fn generate_html_string(analysis: &Analysis) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>refscan Report - {}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.5;
            padding: 2rem;
        }}
        header {{ margin-bottom: 1.5rem; }}
        h1 {{ font-size: 1.5rem; }}
        .meta {{ color: #666; font-size: 0.9rem; }}
        section {{ margin-bottom: 2rem; }}
        table, th, td {{ border: 1px solid black; border-collapse: collapse; }}
        th, td {{ padding: 0.25rem 0.5rem; text-align: left; }}
        th {{ background: #eee; }}
        td.mark {{ text-align: center; }}
        footer {{ color: #666; font-size: 0.8rem; }}
    </style>
</head>
<body>
    <header>
        <div class="meta">{} &middot; {}</div>
    </header>
"#,
        html_escape(&analysis.root.display().to_string()),
        html_escape(&analysis.root.display().to_string()),
        analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    push_framework_table(&mut html, analysis);
    push_reference_table(&mut html, analysis);

    html.push_str(
        r#"    <footer>Generated by refscan</footer>
</body>
</html>
"#,
    );

    html
}

fn push_framework_table(html: &mut String, analysis: &Analysis) {
    html.push_str(
        r#"    <section>
        <h1>.NET Framework versions</h1>
        <table>
            <thead>
                <tr>
                    <th>Project</th>
                    <th>TargetFrameworkVersion</th>
                </tr>
            </thead>
            <tbody>
"#,
    );

    for project in &analysis.projects {
        html.push_str(&format!(
            r#"                <tr>
                    <td title="{}">{}</td>
                    <td>{}</td>
                </tr>
"#,
            html_escape(&project.path.display().to_string()),
            html_escape(&project.name),
            html_escape(project.target_framework.as_deref().unwrap_or_default())
        ));
    }

    html.push_str(
        r#"            </tbody>
        </table>
    </section>
"#,
    );
}

fn push_reference_table(html: &mut String, analysis: &Analysis) {
    html.push_str(
        r#"    <section>
        <h1>References</h1>
        <table>
            <thead>
                <tr>
                    <th>Reference</th>
                    <th>Version</th>
                    <th>IsNuGetPackage</th>
                    <th>LatestVersion</th>
"#,
    );

    for project in &analysis.projects {
        html.push_str(&format!(
            "                    <th>{}</th>\n",
            html_escape(&project.name)
        ));
    }

    html.push_str(
        r#"                </tr>
            </thead>
            <tbody>
"#,
    );

    for (record, uses) in analysis.reference_rows() {
        html.push_str(&format!(
            r#"                <tr>
                    <td title="{}">{}</td>
                    <td>{}</td>
                    <td class="mark">{}</td>
                    <td>{}</td>
"#,
            html_escape(&record.full_name),
            html_escape(&record.name),
            html_escape(&record.version),
            record.status.marker(),
            html_escape(&record.status.latest_label().unwrap_or_default())
        ));

        for used in uses {
            html.push_str(&format!(
                "                    <td class=\"mark\">{}</td>\n",
                if *used { "*" } else { "" }
            ));
        }

        html.push_str("                </tr>\n");
    }

    html.push_str(
        r#"            </tbody>
        </table>
    </section>
"#,
    );
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
