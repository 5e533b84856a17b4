//! Conditional text blocks (`[AUTHORS]`, `[VEHICLE]`, ...)
//!
//! A block is an uppercase bracketed marker whose text is composed from the form
//! data at instance time. Handlers are looked up by name in a [`BlockRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::values::{numbered_entities, text_of};

lazy_static! {
    static ref BLOCK: Regex = Regex::new(r"\[([A-Z][A-Z0-9_]*)\]").unwrap();
}

const AUTHOR_TYPES: &[&str] = &["author", "autor", "requerente"];
const AUTHORITY_TYPES: &[&str] = &["authority", "autoridade"];
const NAME_FIELDS: &[&str] = &["name", "nome"];
const DOCUMENT_FIELDS: &[&str] = &["cpf", "cnpj", "document", "documento", "rg"];

/// Renders one block from the submitted data
pub trait BlockHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Alternative marker names (translations)
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// `None` when the data holds nothing to render
    fn render(&self, data: &Map<String, Value>) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockResolution {
    pub text: String,
    pub resolved: Vec<String>,
    /// Unknown block names, left in the text as visible markers
    pub unresolved: Vec<String>,
    /// Known blocks with no data to render
    pub empty: Vec<String>,
}

#[derive(Clone, Default)]
pub struct BlockRegistry {
    handlers: HashMap<String, Arc<dyn BlockHandler>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AuthorsBlock));
        registry.register(Arc::new(AuthorPluralBlock));
        registry.register(Arc::new(AuthoritiesBlock));
        registry.register(Arc::new(VehicleBlock));
        registry
    }

    /// Register under the handler's name and aliases; replaces earlier handlers
    pub fn register(&mut self, handler: Arc<dyn BlockHandler>) {
        for alias in handler.aliases() {
            self.handlers.insert(alias.to_string(), Arc::clone(&handler));
        }
        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn BlockHandler>> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRegistry").field("blocks", &self.names()).finish()
    }
}

/// Replace every block marker in `text`.
///
/// Unknown names become `[UNRESOLVED BLOCK: NAME]`; known blocks without data become
/// `[MISSING DATA: NAME]`. Markers inside `[[...]]` placeholders are left alone.
pub fn resolve_conditional_blocks(
    text: &str,
    data: &Map<String, Value>,
    registry: &BlockRegistry,
) -> BlockResolution {
    let mut resolution = BlockResolution::default();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in BLOCK.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let nested = text[..whole.start()].ends_with('[') && text[whole.end()..].starts_with(']');
        if nested {
            continue;
        }

        out.push_str(&text[last..whole.start()]);
        let name = name.as_str();
        match registry.get(name) {
            Some(handler) => match handler.render(data) {
                Some(rendered) => {
                    out.push_str(&rendered);
                    resolution.resolved.push(name.to_string());
                }
                None => {
                    out.push_str(&format!("[MISSING DATA: {}]", name));
                    resolution.empty.push(name.to_string());
                }
            },
            None => {
                warn!(block = name, "Unknown conditional block");
                out.push_str(&format!("[UNRESOLVED BLOCK: {}]", name));
                resolution.unresolved.push(name.to_string());
            }
        }
        last = whole.end();
    }

    out.push_str(&text[last..]);
    resolution.text = out;
    resolution
}

/// "A", "A and B", "A, B and C"
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn entity_labels(
    data: &Map<String, Value>,
    types: &[&str],
    detail_fields: &[&str],
    detail_label: impl Fn(&str) -> String,
) -> Vec<String> {
    numbered_entities(data, types)
        .values()
        .filter_map(|fields| {
            let name = text_of(fields, NAME_FIELDS)?;
            Some(match crate::values::first_present(fields, detail_fields) {
                Some((key, value)) => format!(
                    "{} ({} {})",
                    name,
                    detail_label(key),
                    crate::values::value_as_text(value).unwrap_or_default()
                ),
                None => name,
            })
        })
        .collect()
}

fn authors(data: &Map<String, Value>) -> Vec<String> {
    let mut labels = entity_labels(data, AUTHOR_TYPES, DOCUMENT_FIELDS, |k| k.to_uppercase());
    if labels.is_empty() {
        if let Some(single) = text_of(data, &["author_name", "autor_nome", "client_name", "cliente_nome"]) {
            labels.push(single);
        }
    }
    labels
}

pub struct AuthorsBlock;

impl BlockHandler for AuthorsBlock {
    fn name(&self) -> &'static str {
        "AUTHORS"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["AUTORES"]
    }

    fn render(&self, data: &Map<String, Value>) -> Option<String> {
        let labels = authors(data);
        (!labels.is_empty()).then(|| join_list(&labels))
    }
}

pub struct AuthorPluralBlock;

impl BlockHandler for AuthorPluralBlock {
    fn name(&self) -> &'static str {
        "AUTHOR_PLURAL"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["AUTOR_PLURAL"]
    }

    fn render(&self, data: &Map<String, Value>) -> Option<String> {
        match authors(data).len() {
            0 => None,
            1 => Some("the author".to_string()),
            _ => Some("the authors".to_string()),
        }
    }
}

pub struct AuthoritiesBlock;

impl BlockHandler for AuthoritiesBlock {
    fn name(&self) -> &'static str {
        "AUTHORITIES"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["AUTORIDADES"]
    }

    fn render(&self, data: &Map<String, Value>) -> Option<String> {
        let mut labels = entity_labels(data, AUTHORITY_TYPES, &["code", "codigo"], |_| "code".to_string());
        if labels.is_empty() {
            if let Some(single) = text_of(data, &["authority_name", "autoridade_nome"]) {
                labels.push(single);
            }
        }
        (!labels.is_empty()).then(|| join_list(&labels))
    }
}

pub struct VehicleBlock;

impl BlockHandler for VehicleBlock {
    fn name(&self) -> &'static str {
        "VEHICLE"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["VEICULO"]
    }

    fn render(&self, data: &Map<String, Value>) -> Option<String> {
        let make = text_of(data, &["vehicle_make", "veiculo_marca", "marca"]);
        let model = text_of(data, &["vehicle_model", "veiculo_modelo", "modelo"]);
        let plate = text_of(data, &["vehicle_plate", "veiculo_placa", "placa"]);
        if model.is_none() && plate.is_none() {
            return None;
        }

        let mut parts = Vec::new();
        let title: Vec<String> = [make, model].into_iter().flatten().collect();
        if !title.is_empty() {
            parts.push(title.join(" "));
        }
        if let Some(year) = text_of(data, &["vehicle_year", "veiculo_ano", "ano_veiculo"]) {
            parts.push(year);
        }
        if let Some(color) = text_of(data, &["vehicle_color", "veiculo_cor", "cor"]) {
            parts.push(color);
        }
        if let Some(plate) = plate {
            parts.push(format!("plate {}", plate));
        }
        if let Some(renavam) = text_of(data, &["vehicle_renavam", "veiculo_renavam", "renavam"]) {
            parts.push(format!("RENAVAM {}", renavam));
        }
        Some(parts.join(", "))
    }
}
