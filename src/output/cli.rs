use crate::model::Analysis;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct FrameworkRow {
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "TargetFrameworkVersion")]
    target_framework: String,
}

/// Renders both report tables for the terminal.
pub fn generate_table_string(analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Analyzed {} projects in {} at {}\n\n",
        analysis.projects.len(),
        analysis.root.display(),
        analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let rows: Vec<FrameworkRow> = analysis
        .projects
        .iter()
        .map(|p| FrameworkRow {
            project: p.name.clone(),
            target_framework: p.target_framework.clone().unwrap_or_default(),
        })
        .collect();

    out.push_str(".NET Framework versions:\n");
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push_str("\n\n");

    out.push_str("References:\n");
    out.push_str(&reference_table(analysis));
    out.push('\n');

    out
}

fn reference_table(analysis: &Analysis) -> String {
    let mut builder = Builder::default();

    let mut header = vec![
        "Reference".to_string(),
        "Version".to_string(),
        "IsNuGetPackage".to_string(),
        "LatestVersion".to_string(),
    ];
    header.extend(analysis.projects.iter().map(|p| p.name.clone()));
    builder.push_record(header);

    for (record, uses) in analysis.reference_rows() {
        let mut row = vec![
            record.name.clone(),
            record.version.clone(),
            record.status.marker().to_string(),
            record.status.latest_label().unwrap_or_default(),
        ];
        row.extend(
            uses.iter()
                .map(|used| if *used { "*".to_string() } else { String::new() }),
        );
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
