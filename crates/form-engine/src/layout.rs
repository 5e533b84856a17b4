//! Section layouts

use std::collections::BTreeMap;

use extraction_engine::parse_numbered_name;
use shared_types::{
    AutocompleteConfig, ConvertedTemplate, EntityBinding, FieldType, FormComponent, FormLayout,
    Navigation, PlaceholderCategory, Section, TemplateField,
};

use crate::generator::GeneratorConfig;

pub const AUTHOR_TYPES: &[&str] = &["author", "autor"];
pub const AUTHORITY_TYPES: &[&str] = &["authority", "autoridade"];

/// Groups with more fields than this start collapsible
const COLLAPSIBLE_THRESHOLD: usize = 5;

pub fn component_for(field: &TemplateField) -> FormComponent {
    let component = match field.field_type {
        FieldType::Textarea => "textarea",
        FieldType::Select => "select",
        FieldType::Checkbox => "checkbox",
        FieldType::Date => "date",
        _ => "input",
    };
    let width = match field.field_type {
        FieldType::Textarea => 12,
        FieldType::Checkbox | FieldType::Date | FieldType::Number | FieldType::Currency => 4,
        _ => 6,
    };

    FormComponent {
        name: field.name.clone(),
        label: field.label.clone(),
        component: component.to_string(),
        field_type: field.field_type,
        required: field.required,
        placeholder: field.placeholder_text.clone(),
        help_text: (!field.description.is_empty()).then(|| field.description.clone()),
        options: field.options.clone(),
        validation: field.validation_rules.clone(),
        default_value: field.default_value.clone(),
        sample_value: None,
        width,
    }
}

fn section(id: impl Into<String>, title: impl Into<String>, fields: Vec<FormComponent>) -> Section {
    Section {
        id: id.into(),
        title: title.into(),
        description: None,
        fields,
        collapsible: false,
        collapsed: false,
        navigation: None,
        entity: None,
    }
}

pub fn build_sections(template: &ConvertedTemplate, layout: FormLayout, config: &GeneratorConfig) -> Vec<Section> {
    let components: Vec<FormComponent> = template.fields.iter().map(component_for).collect();

    match layout {
        FormLayout::SingleColumn => vec![section("main", template.name.clone(), components)],
        FormLayout::TwoColumn => two_columns(components),
        FormLayout::Grouped => grouped(template),
        FormLayout::Wizard => wizard(components, config.wizard_page_size),
        FormLayout::MultiAuthor => entity_sections(template, AUTHOR_TYPES, "Author", config.max_authors, None),
        FormLayout::AuthoritySelection => entity_sections(
            template,
            AUTHORITY_TYPES,
            "Authority",
            config.max_authorities,
            Some(AutocompleteConfig {
                source: "authorities".to_string(),
                min_chars: 2,
                search_fields: vec!["name".to_string(), "code".to_string(), "city".to_string()],
            }),
        ),
    }
}

/// Left column gets the extra field when the count is odd
fn two_columns(mut components: Vec<FormComponent>) -> Vec<Section> {
    let split = components.len().div_ceil(2);
    let right = components.split_off(split);
    vec![
        section("column_1", "Column 1", components),
        section("column_2", "Column 2", right),
    ]
}

fn grouped(template: &ConvertedTemplate) -> Vec<Section> {
    PlaceholderCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let fields: Vec<FormComponent> = template
                .fields
                .iter()
                .filter(|f| f.category == category)
                .map(component_for)
                .collect();
            if fields.is_empty() {
                return None;
            }
            let mut s = section(category.as_str(), category.label(), fields);
            s.collapsible = s.fields.len() > COLLAPSIBLE_THRESHOLD;
            Some(s)
        })
        .collect()
}

fn wizard(components: Vec<FormComponent>, page_size: usize) -> Vec<Section> {
    let page_size = page_size.max(1);
    let total_steps = components.len().div_ceil(page_size);

    components
        .chunks(page_size)
        .enumerate()
        .map(|(i, page)| {
            let step = i + 1;
            let mut s = section(
                format!("step_{}", step),
                format!("Step {} of {}", step, total_steps),
                page.to_vec(),
            );
            s.navigation = Some(Navigation {
                step,
                total_steps,
                previous: step > 1,
                next: step < total_steps,
            });
            s
        })
        .collect()
}

/// One section per numbered entity, after a general section for everything else
fn entity_sections(
    template: &ConvertedTemplate,
    types: &[&str],
    label: &str,
    max_entities: usize,
    autocomplete: Option<AutocompleteConfig>,
) -> Vec<Section> {
    let mut general = Vec::new();
    let mut entities: BTreeMap<usize, (String, Vec<FormComponent>)> = BTreeMap::new();

    for field in &template.fields {
        match parse_numbered_name(&field.name) {
            Some(parsed) if types.contains(&parsed.entity_type.as_str()) => {
                entities
                    .entry(parsed.index)
                    .or_insert_with(|| (parsed.entity_type.clone(), Vec::new()))
                    .1
                    .push(component_for(field));
            }
            _ => general.push(component_for(field)),
        }
    }

    let highest = entities.keys().next_back().copied().unwrap_or(0);
    let max_count = max_entities.max(highest);

    let mut sections = Vec::with_capacity(entities.len() + 1);
    if !general.is_empty() {
        sections.push(section("general", "General Information", general));
    }
    for (index, (entity_type, fields)) in entities {
        let mut s = section(format!("{}_{}", entity_type, index), format!("{} {}", label, index), fields);
        s.collapsible = index > 1;
        s.entity = Some(EntityBinding {
            entity_type,
            index,
            max_count,
            repeatable: true,
            autocomplete: autocomplete.clone(),
        });
        sections.push(s);
    }
    sections
}
