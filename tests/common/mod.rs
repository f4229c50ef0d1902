#![allow(dead_code)]

use refscan::Config;
use serde_json::json;
use std::fs;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MSBUILD_NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Writes a classic project file declaring `references`.
pub fn write_project(dir: &Path, file: &str, framework: Option<&str>, references: &[&str]) {
    fs::create_dir_all(dir).unwrap();

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project ToolsVersion=\"15.0\" xmlns=\"{}\">\n",
        MSBUILD_NS
    );
    if let Some(framework) = framework {
        xml.push_str(&format!(
            "  <PropertyGroup>\n    <TargetFrameworkVersion>{}</TargetFrameworkVersion>\n  </PropertyGroup>\n",
            framework
        ));
    }
    xml.push_str("  <ItemGroup>\n");
    for reference in references {
        xml.push_str(&format!("    <Reference Include=\"{}\" />\n", reference));
    }
    xml.push_str("  </ItemGroup>\n</Project>\n");

    fs::write(dir.join(file), xml).unwrap();
}

/// Writes a `packages.config` listing `ids`.
pub fn write_manifest(dir: &Path, ids: &[&str]) {
    fs::create_dir_all(dir).unwrap();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n");
    for id in ids {
        xml.push_str(&format!(
            "  <package id=\"{}\" version=\"1.0.0\" targetFramework=\"net472\" />\n",
            id
        ));
    }
    xml.push_str("</packages>\n");

    fs::write(dir.join("packages.config"), xml).unwrap();
}

/// Starts a feed whose service index advertises a registration service.
pub async fn feed() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "3.0.0",
            "resources": [
                { "@id": format!("{}/query", server.uri()), "@type": "SearchQueryService" },
                { "@id": format!("{}/registration/", server.uri()), "@type": "RegistrationsBaseUrl" }
            ]
        })))
        .mount(&server)
        .await;

    server
}

/// Serves registration pages for `id`; the lookup must happen exactly `times` times.
pub async fn register(server: &MockServer, id: &str, uppers: &[&str], times: u64) {
    let items: Vec<_> = uppers
        .iter()
        .map(|upper| json!({ "lower": "1.0.0", "upper": upper }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/registration/{}/index.json", id.to_lowercase())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": items.len(), "items": items })))
        .expect(times)
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> Config {
    Config {
        service_index_url: format!("{}/v3/index.json", server.uri()),
        open_report: false,
        ..Config::default()
    }
}

/// Cell contents of the HTML reference row whose name cell is `name`.
pub fn reference_cells(html: &str, name: &str) -> Vec<String> {
    let name_cell = format!(">{}</td>", name);
    html.lines()
        .skip_while(|line| !line.trim_end().ends_with(&name_cell))
        .take_while(|line| line.trim() != "</tr>")
        .map(|line| {
            let line = line.trim();
            let start = line.find('>').map(|i| i + 1).unwrap_or(0);
            let end = line.rfind("</td>").unwrap_or(line.len());
            line[start..end].to_string()
        })
        .collect()
}
