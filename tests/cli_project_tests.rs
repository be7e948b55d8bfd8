//! Project loading, parallel checking and report rendering.

use serde_json::json;
use tmpl::tracing_config::LogFormat;
use tmpl::{Project, Reporter};

const HEROES: &str = include_str!("../crates/tmpl-host/tests/fixtures/heroes.json");

const BROKEN: &str = "{{title.nope}}\n{{count}}";
const CLEAN: &str = r#"<li *ngFor="let hero of heroes">{{hero.name | uppercase}}</li>"#;

fn project_json() -> String {
    let host: serde_json::Value = serde_json::from_str(HEROES).expect("heroes fixture");
    json!({
        "host": host,
        "templates": [
            {
                "fileName": "app.component.ts",
                "component": "AppComponent",
                "offset": 100,
                "source": BROKEN,
                "nodes": [{"kind": "text", "text": BROKEN}]
            },
            {
                "fileName": "list.component.html",
                "component": "AppComponent",
                "source": CLEAN,
                "nodes": [{
                    "kind": "element",
                    "name": "li",
                    "attrs": [{"name": "*ngFor", "value": "let hero of heroes"}],
                    "templateDirectives": [{
                        "type": {"name": "NgForOf"},
                        "inputs": [{"field": "ngForOf", "binding": "ngForOf"}]
                    }],
                    "children": [{"kind": "text", "text": "{{hero.name | uppercase}}"}]
                }]
            }
        ]
    })
    .to_string()
}

fn project() -> Project {
    Project::from_json(&project_json()).expect("project loads")
}

#[test]
fn test_check_all_reports_in_project_order() {
    let project = project();
    let reports = project.check_all();
    assert_eq!(reports.len(), 2);

    assert_eq!(reports[0].document.file_name(), "app.component.ts");
    assert_eq!(reports[0].error_count(), 1);
    assert!(reports[0].diagnostics[0].message_text().contains("'nope'"));

    assert_eq!(reports[1].document.file_name(), "list.component.html");
    assert!(reports[1].diagnostics.is_empty(), "{:?}", reports[1].diagnostics);
}

#[test]
fn test_document_at_respects_template_offsets() {
    let project = project();
    assert!(project.document_at("app.component.ts", 50).is_none());
    assert!(project.document_at("app.component.ts", 102).is_some());
    assert!(project.document_at("list.component.html", 3).is_some());
    assert!(project.document_at("missing.html", 0).is_none());
}

#[test]
fn test_queries_through_the_project_service() {
    let project = project();
    let document = project
        .document_at("list.component.html", 0)
        .expect("list template");
    let position = CLEAN.find("hero.name").expect("member") as u32 + 5;

    let completions = project
        .service()
        .completions_at(document, position)
        .expect("hero members");
    assert!(completions.names().contains(&"nickname"));

    let hover = project.service().hover_at(document, position).expect("hover");
    assert_eq!(hover.display(), "(property) Hero.name: string");
}

#[test]
fn test_reporter_renders_template_relative_locations() {
    let project = project();
    let reports = project.check_all();
    let rendered = Reporter::new(false).render(reports[0].document, &reports[0].diagnostics);

    let mut lines = rendered.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with("app.component.ts:1:3 - error TPL"), "{header}");
    assert!(header.contains("'nope'"), "{header}");

    let snippet = lines.next().expect("snippet line");
    assert!(snippet.ends_with("{{title.nope}}"), "{snippet}");
    let underline = lines.next().expect("underline line");
    let marks = underline.trim_start();
    assert!(!marks.is_empty() && marks.chars().all(|c| c == '~'), "{underline}");
    assert_eq!(underline.find('~'), snippet.find("title"));
}

#[test]
fn test_malformed_projects_fail_to_load() {
    assert!(Project::from_json("{ not json").is_err());

    let unknown_component = json!({
        "templates": [{
            "fileName": "a.html",
            "component": "Nowhere",
            "source": "{{x}}",
            "nodes": [{"kind": "text", "text": "{{x}}"}]
        }]
    });
    let error = Project::from_json(&unknown_component.to_string()).expect_err("unknown component");
    assert!(format!("{error:#}").contains("a.html"), "{error:#}");
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("bogus"), LogFormat::Text);
}
