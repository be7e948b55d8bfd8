//! Language service over the heroes host program.

use crate::document::TemplateDocument;
use crate::service::LanguageService;
use serde_json::json;
use tmpl_host::{HostQuery, TemplateOutline};

pub(crate) const HEROES: &str = include_str!("../../../tmpl-host/tests/fixtures/heroes.json");

/// Offset of every test template inside its component file.
pub(crate) const OFFSET: u32 = 100;

pub(crate) struct Heroes {
    pub(crate) query: HostQuery,
    pub(crate) service: LanguageService,
}

impl Heroes {
    pub(crate) fn new() -> Self {
        let query = HostQuery::from_json(HEROES).expect("heroes fixture loads");
        let service = LanguageService::new(query.clone().into_session());
        Self { query, service }
    }

    /// A template of `AppComponent` at [`OFFSET`] in `app.component.ts`.
    pub(crate) fn document(&self, source: &str, nodes: serde_json::Value) -> TemplateDocument {
        let outline: TemplateOutline = serde_json::from_value(json!({
            "fileName": "app.component.ts",
            "component": "AppComponent",
            "offset": OFFSET,
            "source": source,
            "nodes": nodes,
        }))
        .expect("outline json");
        let info = self.query.template_info(&outline).expect("template info");
        TemplateDocument::new(info, source)
    }

    /// A template that is a single interpolated text.
    pub(crate) fn text(&self, source: &str) -> TemplateDocument {
        self.document(source, json!([{"kind": "text", "text": source}]))
    }
}

/// File position of the byte `delta` bytes into the first `needle` in `source`.
pub(crate) fn position(source: &str, needle: &str, delta: usize) -> u32 {
    let start = source
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not in '{source}'"));
    (start + delta) as u32 + OFFSET
}

pub(crate) fn ngfor_directive() -> serde_json::Value {
    json!({
        "type": {"name": "NgForOf"},
        "selector": "[ngFor][ngForOf]",
        "inputs": [{"field": "ngForOf", "binding": "ngForOf"}]
    })
}

pub(crate) fn hero_detail_directive() -> serde_json::Value {
    json!({
        "type": {"name": "HeroDetailComponent"},
        "isComponent": true,
        "selector": "hero-detail",
        "inputs": [{"field": "hero", "binding": "hero"}],
        "outputs": [{"field": "deleted", "binding": "deleted"}]
    })
}

pub(crate) fn ng_model_directive() -> serde_json::Value {
    json!({
        "type": {"name": "NgModel"},
        "selector": "[ngModel]",
        "exportAs": ["ngModel"],
        "inputs": [{"field": "value", "binding": "ngModel"}],
        "outputs": [{"field": "update", "binding": "ngModelChange"}]
    })
}
