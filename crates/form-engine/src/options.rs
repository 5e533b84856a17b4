//! Option lists for select fields

use extraction_engine::patterns::NameTokens;

pub const MARRIED: &str = "Casado(a)";

pub const MARITAL_STATUS_OPTIONS: &[&str] = &[
    "Solteiro(a)",
    MARRIED,
    "Divorciado(a)",
    "Viúvo(a)",
    "Separado(a)",
    "União Estável",
];

pub const STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub const PERSON_TYPE_OPTIONS: &[&str] = &["Pessoa Física", "Pessoa Jurídica"];

pub const GENDER_OPTIONS: &[&str] = &["Masculino", "Feminino", "Outro", "Prefiro não informar"];

pub const STATUS_OPTIONS: &[&str] = &["Ativo", "Inativo", "Pendente"];

pub const VEHICLE_CATEGORY_OPTIONS: &[&str] = &[
    "Automóvel",
    "Motocicleta",
    "Caminhão",
    "Ônibus",
    "Utilitário",
];

pub const GENERIC_OPTIONS: &[&str] = &["Option 1", "Option 2", "Option 3"];

/// Ordered lookup; more specific names first
const OPTION_TABLE: &[(&[&str], &[&str])] = &[
    (&["estado_civil", "marital"], MARITAL_STATUS_OPTIONS),
    (&["veiculo", "vehicle"], VEHICLE_CATEGORY_OPTIONS),
    (&["tipo_pessoa", "person_type", "pessoa"], PERSON_TYPE_OPTIONS),
    (&["sexo", "gender", "genero", "gênero"], GENDER_OPTIONS),
    (&["uf", "estado", "state"], STATE_CODES),
    (&["status", "situacao", "situação"], STATUS_OPTIONS),
];

pub fn options_for(name: &str) -> Vec<String> {
    let tokens = NameTokens::new(name);
    OPTION_TABLE
        .iter()
        .find(|(keywords, _)| tokens.matches_any(keywords))
        .map(|(_, options)| *options)
        .unwrap_or(GENERIC_OPTIONS)
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_option_lists() {
        assert_eq!(options_for("estado_civil").len(), 6);
        assert_eq!(options_for("cliente_uf").len(), 27);
        assert_eq!(options_for("tipo_pessoa"), vec!["Pessoa Física", "Pessoa Jurídica"]);
        assert_eq!(options_for("categoria_veiculo")[0], "Automóvel");
        assert_eq!(options_for("status_contrato"), vec!["Ativo", "Inativo", "Pendente"]);
    }

    #[test]
    fn test_unknown_select_gets_generic_options() {
        assert_eq!(options_for("tipo_servico"), vec!["Option 1", "Option 2", "Option 3"]);
    }
}
