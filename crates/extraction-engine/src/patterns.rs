//! Token syntaxes and keyword tables for placeholder classification
//!
//! The keyword tables are hand-tuned heuristics (Portuguese and English legal
//! vocabulary). Matching rule: keywords of three characters or fewer must equal a
//! whole name segment (`rg` matches `client_rg`, not `cargo`); longer keywords
//! match anywhere in the lowercased name.

use lazy_static::lazy_static;
use regex::Regex;

use shared_types::{InferredType, PlaceholderCategory};

lazy_static! {
    /// Recognized token syntaxes, in priority order
    pub static ref TOKEN_PATTERNS: Vec<(&'static str, Regex)> = vec![
        ("double_brace", Regex::new(r"\{\{\s*([^\W\d][\w\-\. ]{0,80}?)\s*\}\}").unwrap()),
        ("dollar_brace", Regex::new(r"\$\{\s*([^\W\d][\w\-\. ]{0,80}?)\s*\}").unwrap()),
        ("double_bracket", Regex::new(r"\[\[\s*([^\W\d][\w\-\. ]{0,80}?)\s*\]\]").unwrap()),
        ("angle", Regex::new(r"<<\s*([^\W\d][\w\-\. ]{0,80}?)\s*>>").unwrap()),
        ("single_brace", Regex::new(r"\{\s*([^\W\d][\w\-\. ]{0,80}?)\s*\}").unwrap()),
        ("single_bracket", Regex::new(r"\[\s*([^\W\d][\w\-\. ]{0,80}?)\s*\]").unwrap()),
        ("percent", Regex::new(r"%([^\W\d][\w\-\.]{0,80}?)%").unwrap()),
        ("hash", Regex::new(r"#([A-Z][A-Z0-9_]{0,80})#").unwrap()),
    ];

    /// Uppercase single-bracket markers are conditional blocks, not placeholders
    pub static ref BLOCK_MARKER: Regex = Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap();

    /// Cheap check used by quick scans
    pub static ref ANY_TOKEN: Regex =
        Regex::new(r"\{\{[^{}]+\}\}|\$\{[^{}]+\}|\[\[[^\[\]]+\]\]|<<[^<>]+>>|#[A-Z][A-Z0-9_]*#").unwrap();
}

/// Client / party identification keywords
pub const CLIENT_KEYWORDS: &[&str] = &[
    "cliente",
    "client",
    "requerente",
    "contratante",
    "outorgante",
    "nome",
    "name",
    "cpf",
    "rg",
    "email",
    "e-mail",
    "telefone",
    "phone",
    "celular",
    "endereco",
    "endereço",
    "address",
    "nascimento",
    "birth",
    "estado_civil",
    "marital",
    "profissao",
    "profissão",
    "profession",
    "nacionalidade",
    "nationality",
];

/// Court, proceeding and authority keywords
pub const LEGAL_KEYWORDS: &[&str] = &[
    "processo",
    "process",
    "vara",
    "comarca",
    "tribunal",
    "court",
    "juiz",
    "judge",
    "advogado",
    "lawyer",
    "attorney",
    "oab",
    "autoridade",
    "authority",
    "infracao",
    "infração",
    "infraction",
    "autuacao",
    "autuação",
    "artigo",
    "article",
    "lei",
    "law",
    "orgao",
    "órgão",
];

/// Contract and document reference keywords
pub const DOCUMENT_KEYWORDS: &[&str] = &[
    "documento",
    "document",
    "contrato",
    "contract",
    "clausula",
    "cláusula",
    "clause",
    "anexo",
    "annex",
    "titulo",
    "título",
    "title",
    "objeto",
    "protocolo",
    "protocol",
    "certidao",
    "certidão",
    "certificate",
    "registro",
    "registry",
];

/// Money keywords
pub const FINANCIAL_KEYWORDS: &[&str] = &[
    "valor",
    "value",
    "preco",
    "preço",
    "price",
    "pagamento",
    "payment",
    "multa",
    "fine",
    "taxa",
    "fee",
    "juros",
    "interest",
    "honorario",
    "honorário",
    "salario",
    "salário",
    "salary",
    "amount",
    "montante",
    "parcela",
    "installment",
    "desconto",
    "discount",
    "banco",
    "bank",
    "conta",
    "account",
];

/// Date and time keywords
pub const TEMPORAL_KEYWORDS: &[&str] = &[
    "data",
    "date",
    "prazo",
    "deadline",
    "dia",
    "day",
    "mes",
    "mês",
    "month",
    "ano",
    "year",
    "hora",
    "hour",
    "time",
    "vencimento",
    "due",
    "periodo",
    "período",
    "period",
    "inicio",
    "início",
    "start",
    "termino",
    "término",
    "end",
];

/// Category groups, first match wins
pub const CATEGORY_GROUPS: &[(PlaceholderCategory, &[&str])] = &[
    (PlaceholderCategory::Client, CLIENT_KEYWORDS),
    (PlaceholderCategory::Legal, LEGAL_KEYWORDS),
    (PlaceholderCategory::Document, DOCUMENT_KEYWORDS),
    (PlaceholderCategory::Financial, FINANCIAL_KEYWORDS),
    (PlaceholderCategory::Temporal, TEMPORAL_KEYWORDS),
];

pub const EMAIL_TYPE_KEYWORDS: &[&str] = &["email", "e-mail", "e_mail"];

pub const PHONE_TYPE_KEYWORDS: &[&str] = &[
    "telefone", "phone", "celular", "cel", "fone", "whatsapp", "tel", "mobile",
];

pub const DATE_TYPE_KEYWORDS: &[&str] = &[
    "data",
    "date",
    "nascimento",
    "birth",
    "vencimento",
    "prazo",
    "deadline",
    "dia",
];

pub const NUMBER_TYPE_KEYWORDS: &[&str] = &[
    "numero",
    "número",
    "number",
    "num",
    "cpf",
    "cnpj",
    "rg",
    "cep",
    "processo",
    "process",
    "quantidade",
    "quantity",
    "qtd",
    "pontos",
    "points",
    "idade",
    "age",
    "renavam",
    "matricula",
    "matrícula",
];

pub const ADDRESS_TYPE_KEYWORDS: &[&str] = &[
    "endereco",
    "endereço",
    "address",
    "logradouro",
    "rua",
    "street",
    "bairro",
    "neighborhood",
];

pub const CURRENCY_TYPE_KEYWORDS: &[&str] = &[
    "valor",
    "value",
    "preco",
    "preço",
    "price",
    "salario",
    "salário",
    "salary",
    "honorarios",
    "honorários",
    "multa",
    "amount",
    "montante",
    "custo",
    "cost",
];

pub const TEXTAREA_TYPE_KEYWORDS: &[&str] = &[
    "observacao",
    "observação",
    "observacoes",
    "observações",
    "notes",
    "note",
    "descricao",
    "descrição",
    "description",
    "comentario",
    "comment",
    "detalhes",
    "details",
    "fundamentacao",
    "fundamentação",
    "justificativa",
];

pub const SELECT_TYPE_KEYWORDS: &[&str] = &[
    "tipo",
    "type",
    "categoria",
    "category",
    "status",
    "situacao",
    "situação",
    "estado_civil",
    "marital",
    "uf",
    "estado",
    "state",
    "sexo",
    "gender",
    "genero",
    "gênero",
];

pub const BOOLEAN_TYPE_KEYWORDS: &[&str] = &[
    "ativo",
    "active",
    "confirmado",
    "confirmed",
    "aceite",
    "aceito",
    "accepted",
    "possui",
    "has",
    "is",
    "concorda",
    "agree",
    "autoriza",
];

/// Type inference groups, first match wins
pub const TYPE_GROUPS: &[(InferredType, &[&str])] = &[
    (InferredType::Email, EMAIL_TYPE_KEYWORDS),
    (InferredType::Phone, PHONE_TYPE_KEYWORDS),
    (InferredType::Date, DATE_TYPE_KEYWORDS),
    (InferredType::Number, NUMBER_TYPE_KEYWORDS),
    (InferredType::Address, ADDRESS_TYPE_KEYWORDS),
    (InferredType::Currency, CURRENCY_TYPE_KEYWORDS),
    (InferredType::Textarea, TEXTAREA_TYPE_KEYWORDS),
    (InferredType::Select, SELECT_TYPE_KEYWORDS),
    (InferredType::Boolean, BOOLEAN_TYPE_KEYWORDS),
];

/// Identity and contact keywords that make a placeholder required
pub const REQUIRED_KEYWORDS: &[&str] = &[
    "nome",
    "name",
    "cpf",
    "cnpj",
    "rg",
    "email",
    "e-mail",
    "nascimento",
    "birth",
    "endereco",
    "endereço",
    "address",
];

/// Lowercased name split into its segments
#[derive(Debug, Clone)]
pub struct NameTokens {
    pub lower: String,
    pub segments: Vec<String>,
}

impl NameTokens {
    pub fn new(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let segments = lower
            .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { lower, segments }
    }

    pub fn matches(&self, keyword: &str) -> bool {
        if keyword.chars().count() <= 3 {
            self.segments.iter().any(|s| s == keyword)
        } else {
            self.lower.contains(keyword)
        }
    }

    pub fn matches_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.matches(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_keywords_need_whole_segment() {
        assert!(NameTokens::new("cliente_rg").matches("rg"));
        assert!(!NameTokens::new("cargo").matches("rg"));
        assert!(NameTokens::new("Has-HOA").matches("has"));
    }

    #[test]
    fn test_long_keywords_match_substrings() {
        assert!(NameTokens::new("clientName").matches("client"));
        assert!(NameTokens::new("ClientName").matches("name"));
    }

    #[test]
    fn test_token_patterns_compile_in_priority_order() {
        let ids: Vec<_> = TOKEN_PATTERNS.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.first(), Some(&"double_brace"));
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_block_marker_is_uppercase_only() {
        assert!(BLOCK_MARKER.is_match("AUTHORS"));
        assert!(BLOCK_MARKER.is_match("AUTHOR_PLURAL"));
        assert!(!BLOCK_MARKER.is_match("client_name"));
    }
}
