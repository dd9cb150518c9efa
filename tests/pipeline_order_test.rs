//! Rule ordering and rule-set construction.

use typed_model::domain::{
    DigitSweep, EntityEntry, EntityRule, LabelEntry, LabelScope, WhitespaceNormalizer,
};
use typed_model::{Config, ModelError, RedactionRule, RuleSet, RulesConfig, Stage};

#[test]
fn test_standard_stages_never_go_backwards() {
    let rules = RuleSet::standard().unwrap();
    let stages = rules.stages();

    assert!(stages.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(stages.first(), Some(&Stage::Entity));
    assert_eq!(stages.last(), Some(&Stage::Whitespace));
    assert!(stages.contains(&Stage::Label));
    assert!(stages.contains(&Stage::StructuredToken));
    assert!(stages.contains(&Stage::Fallback));
    assert!(stages.contains(&Stage::DigitSweep));
}

#[test]
fn test_out_of_order_rules_rejected() {
    let entity = EntityRule::compile(&EntityEntry::new("Fulano", "XXXXX")).unwrap();
    let rules: Vec<Box<dyn RedactionRule>> = vec![Box::new(DigitSweep), Box::new(entity)];

    let err = RuleSet::new(rules).unwrap_err();
    match err {
        ModelError::InvalidInput { reason, .. } => {
            assert!(reason.contains("must not run after"), "{}", reason)
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_ordered_custom_rules_accepted() {
    let entity = EntityRule::compile(&EntityEntry::new("Fulano", "XXXXX")).unwrap();
    let rules: Vec<Box<dyn RedactionRule>> = vec![
        Box::new(entity),
        Box::new(DigitSweep),
        Box::new(WhitespaceNormalizer),
    ];

    let rules = RuleSet::new(rules).unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(rules.sanitize_line("  Fulano   nasceu em 1980 "), "XXXXX nasceu em 0000");
}

#[test]
fn test_label_scenario_yields_exact_template() {
    let rules = RuleSet::standard().unwrap();
    assert_eq!(
        rules.sanitize_line("Requerente: Banco XYZ S.A."),
        "Requerente: Juízo da 0ª Vara da Comarca de CCCCCCCC"
    );
    assert_eq!(
        rules.sanitize_line("perante o Juízo da 2ª Vara Mista de Sousa"),
        "perante o Juízo da 0ª Vara da Comarca de CCCCCCCC."
    );
    assert_eq!(
        rules.sanitize_line("João Pessoa, 15 de março de 2024."),
        "João Pessoa, 00 de abril de 0000."
    );
}

#[test]
fn test_entities_run_before_fallback_tokens() {
    // The full name wins over the bare first-name fallback
    let rules = RuleSet::standard().unwrap();
    assert_eq!(
        rules.sanitize_line("Autora: Mara do Socorro da Silva"),
        "Autora: AAAAA AAAAAAA AAAAA AA"
    );
}

#[test]
fn test_entities_tolerate_layout_spacing() {
    let rules = RuleSet::standard().unwrap();
    assert_eq!(
        rules.sanitize_line("Mara   do Socorro  da   Silva"),
        "AAAAA AAAAAAA AAAAA AA"
    );
}

#[test]
fn test_structured_tokens_run_before_digit_sweep() {
    // Shape-aware masks leave separators in place
    let rules = RuleSet::standard().unwrap();
    assert_eq!(
        rules.sanitize_line("CNPJ 12.345.678/0001-90"),
        "CNPJ 00.000.000/0000-00"
    );
}

#[test]
fn test_clause_label_stops_at_delimiter() {
    let rules = RuleSet::standard().unwrap();
    assert_eq!(
        rules.sanitize_line("ação movida em face de Empresa Qualquer Ltda, conforme"),
        "ação movida em face de BBBBB BBBBBBB BBBBB BB, conforme"
    );
}

#[test]
fn test_config_built_rule_set() {
    let config = RulesConfig {
        entities: vec![EntityEntry::new("Fulano de Tal", "XXXXX XX XXX")],
        labels: vec![LabelEntry::new(
            "autor",
            r"\bautor:",
            "Autor: YYYYY",
            LabelScope::Line,
        )],
        denylist: vec!["beltrano".to_string()],
    };
    let rules = RuleSet::from_config(&config).unwrap();

    assert_eq!(rules.sanitize_line("Fulano  de Tal e Beltrano"), "XXXXX XX XXX e PPPPP");
    assert_eq!(rules.sanitize_line("AUTOR: qualquer um"), "Autor: YYYYY");
    // Built-in tables are replaced, not merged
    assert_eq!(rules.sanitize_line("Mara"), "Mara");
}

#[test]
fn test_empty_tables_leave_token_and_digit_stages() {
    let config = RulesConfig {
        entities: Vec::new(),
        labels: Vec::new(),
        denylist: Vec::new(),
    };
    let rules = RuleSet::from_config(&config).unwrap();
    assert_eq!(
        rules.sanitize_line("Mara, CPF 123.456.789-01"),
        "Mara, CPF 000.000.000-00"
    );
}

#[test]
fn test_invalid_configured_pattern_reported() {
    let config = Config::from_toml(
        r#"
[[rules.entities]]
pattern = "Fulano ("
replacement = "XXXXX"
"#,
    )
    .unwrap();

    let err = RuleSet::from_config(&config.rules).unwrap_err();
    assert!(matches!(err, ModelError::Pattern { .. }));
}
