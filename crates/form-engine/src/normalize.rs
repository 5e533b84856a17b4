//! Field name normalization and label generation

/// Acronyms kept uppercase in labels
const ACRONYMS: &[&str] = &["cpf", "cnpj", "rg", "cep", "oab", "uf", "cnh", "renavam", "id", "ait"];

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Canonical snake_case field name.
///
/// Output is `[a-z0-9_]`, never starts with a digit or underscore, and has no
/// repeated or trailing underscores. Applying it twice changes nothing.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_lower = false;

    for c in name.trim().chars() {
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();

        for lower in c.to_lowercase() {
            let folded = fold_accent(lower);
            if folded.is_ascii_alphanumeric() {
                out.push(folded);
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
    }

    let trimmed = out.trim_matches('_');
    let mut collapsed = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    match collapsed.chars().next() {
        None => "field".to_string(),
        Some(c) if c.is_ascii_digit() => format!("field_{}", collapsed),
        Some(_) => collapsed,
    }
}

/// Human label from a field name: `cliente_cpf` -> `Cliente CPF`
pub fn generate_label(name: &str) -> String {
    normalize_name(name)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            if ACRONYMS.contains(&word) {
                return word.to_uppercase();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Cliente Nome"), "cliente_nome");
        assert_eq!(normalize_name("  endereço--completo "), "endereco_completo");
        assert_eq!(normalize_name("clientName"), "client_name");
        assert_eq!(normalize_name("CLIENT_NAME"), "client_name");
        assert_eq!(normalize_name("__x__"), "x");
        assert_eq!(normalize_name("1st_party"), "field_1st_party");
        assert_eq!(normalize_name("***"), "field");
    }

    #[test]
    fn test_generate_label() {
        assert_eq!(generate_label("cliente_cpf"), "Cliente CPF");
        assert_eq!(generate_label("data_notificacao"), "Data Notificacao");
        assert_eq!(generate_label("author_1_name"), "Author 1 Name");
    }
}
