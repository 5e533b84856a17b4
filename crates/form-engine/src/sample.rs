//! Example values shown in generated forms

use extraction_engine::patterns::NameTokens;
use serde_json::{json, Value};
use shared_types::{FieldType, TemplateField};

/// Keyword-matched examples, checked in order
const SAMPLES: &[(&[&str], &str)] = &[
    (&["email", "e-mail"], "maria.silva@example.com"),
    (&["cnpj"], "12.345.678/0001-95"),
    (&["cpf"], "123.456.789-09"),
    (&["rg"], "12.345.678-9"),
    (&["cep"], "01310-100"),
    (&["telefone", "phone", "celular", "whatsapp"], "(11) 98765-4321"),
    (&["oab"], "SP 123456"),
    (&["placa", "plate"], "ABC1D23"),
    (&["renavam"], "00123456789"),
    (&["processo", "process"], "0001234-56.2024.8.26.0100"),
    (&["autoridade", "authority", "orgao"], "DETRAN-SP"),
    (&["endereco", "endereço", "address"], "Av. Paulista, 1000 - São Paulo/SP"),
    (&["cidade", "city", "comarca"], "São Paulo"),
    (&["profissao", "profession"], "Engenheira"),
    (&["nacionalidade", "nationality"], "Brasileira"),
    (&["nome", "name"], "Maria da Silva"),
];

pub fn sample_value(field: &TemplateField) -> Value {
    let tokens = NameTokens::new(&field.name);
    match field.field_type {
        FieldType::Select => {
            return field
                .options
                .as_ref()
                .and_then(|o| o.first())
                .map(|o| json!(o))
                .unwrap_or(Value::Null)
        }
        FieldType::Checkbox => return json!(true),
        FieldType::Date => return json!("15/03/2024"),
        FieldType::Currency => return json!("1.500,00"),
        _ => {}
    }

    if let Some((_, sample)) = SAMPLES.iter().find(|(keywords, _)| tokens.matches_any(keywords)) {
        return json!(sample);
    }

    match field.field_type {
        FieldType::Number => json!(42),
        FieldType::Textarea => json!("Descreva aqui os fatos relevantes."),
        _ => json!(format!("Example {}", field.label.to_lowercase())),
    }
}
