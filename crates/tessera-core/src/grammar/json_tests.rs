use indoc::indoc;

use super::*;

#[test]
fn parse_minimal_grammar() {
    let json = indoc! {r#"
        {
          "name": "let",
          "rules": {
            "let_decl": { "type": "SYMBOL", "name": "identifier" },
            "identifier": { "type": "PATTERN", "value": "[a-z]+" }
          }
        }
    "#};

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.name, "let");
    assert_eq!(grammar.start_rule(), Some("let_decl"));
    assert_eq!(grammar.rules.len(), 2);
    assert!(grammar.extras.is_empty());
}

#[test]
fn rule_order_is_preserved() {
    let json = indoc! {r#"
        {
          "name": "order",
          "rules": {
            "zeta": { "type": "STRING", "value": "z" },
            "alpha": { "type": "STRING", "value": "a" },
            "mid": { "type": "STRING", "value": "m" }
          }
        }
    "#};

    let grammar = Grammar::from_json(json).unwrap();
    let names: Vec<_> = grammar.rules.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn parse_nested_rules() {
    let json = indoc! {r#"
        {
          "name": "nested",
          "rules": {
            "root": {
              "type": "PREC_LEFT",
              "value": 2,
              "content": {
                "type": "SEQ",
                "members": [
                  { "type": "FIELD", "name": "left", "content": { "type": "SYMBOL", "name": "root" } },
                  { "type": "CHOICE", "members": [ { "type": "STRING", "value": "+" }, { "type": "BLANK" } ] },
                  { "type": "REPEAT1", "content": { "type": "PATTERN", "value": "\\d", "flags": "i" } },
                  { "type": "ALIAS", "value": "op", "named": false, "content": { "type": "STRING", "value": "-" } },
                  { "type": "IMMEDIATE_TOKEN", "content": { "type": "STRING", "value": "." } }
                ]
              }
            }
          }
        }
    "#};

    let grammar = Grammar::from_json(json).unwrap();
    let Rule::PrecLeft { value, content } = &grammar.rules[0].1 else {
        panic!("expected PREC_LEFT");
    };
    assert_eq!(*value, Precedence::Integer(2));
    let Rule::Seq(members) = content.as_ref() else {
        panic!("expected SEQ");
    };
    assert!(matches!(&members[0], Rule::Field { name, .. } if name == "left"));
    assert!(matches!(&members[1], Rule::Choice(m) if m.len() == 2));
    assert!(matches!(&members[2], Rule::Repeat1(inner)
        if matches!(inner.as_ref(), Rule::Pattern { flags: Some(f), .. } if f == "i")));
    assert!(matches!(&members[3], Rule::Alias { named: false, value, .. } if value == "op"));
    assert!(matches!(&members[4], Rule::ImmediateToken(_)));
}

#[test]
fn parse_top_level_lists() {
    let json = indoc! {r#"
        {
          "$schema": "https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json",
          "name": "lists",
          "word": "identifier",
          "rules": {
            "root": { "type": "SYMBOL", "name": "identifier" },
            "identifier": { "type": "PATTERN", "value": "\\w+" }
          },
          "extras": [ { "type": "PATTERN", "value": "\\s" } ],
          "externals": [ { "type": "SYMBOL", "name": "indent" } ],
          "inline": ["_value"],
          "conflicts": [["root", "identifier"]],
          "supertypes": ["_expression"],
          "precedences": [[ { "type": "STRING", "value": "call" }, { "type": "SYMBOL", "name": "root" } ]]
        }
    "#};

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.word.as_deref(), Some("identifier"));
    assert_eq!(grammar.extras.len(), 1);
    assert_eq!(grammar.externals, vec![Rule::Symbol("indent".into())]);
    assert_eq!(grammar.inline, vec!["_value".to_string()]);
    assert_eq!(grammar.conflicts.len(), 1);
    assert_eq!(
        grammar.precedences[0],
        vec![
            PrecedenceEntry::Name("call".into()),
            PrecedenceEntry::Symbol("root".into())
        ]
    );
}

#[test]
fn invalid_json_is_an_error() {
    let err = Grammar::from_json("{ not json").unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
    assert!(err.to_string().starts_with("JSON parse error"));
}

#[test]
fn unknown_rule_type_is_an_error() {
    let json = r#"{ "name": "x", "rules": { "a": { "type": "WAT" } } }"#;
    assert!(Grammar::from_json(json).is_err());
}
