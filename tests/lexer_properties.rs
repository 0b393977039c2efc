// Property tests for the lexer and expression parser

use proptest::prelude::*;
use sfe::parser::ast::{BinaryOp, Expr};
use sfe::parser::lexer::{lookup_keyword, Lexer, TokenKind, KEYWORDS};
use sfe::parser::Parser;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .tokenize()
        .expect("Lexing failed")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_filter("Not a keyword", |s| lookup_keyword(s).is_none())
}

// Left-to-right evaluation of a `+`/`-` chain
fn eval(expr: &Expr) -> i64 {
    match expr {
        Expr::Int(value) => i64::from(*value),
        Expr::Binary {
            op: BinaryOp::Add,
            lhs,
            rhs,
        } => eval(lhs) + eval(rhs),
        Expr::Binary {
            op: BinaryOp::Sub,
            lhs,
            rhs,
        } => eval(lhs) - eval(rhs),
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_every_keyword_lexes_to_its_token() {
    for (text, kind) in KEYWORDS {
        assert_eq!(kinds(text), vec![kind.clone(), TokenKind::Eoi], "{}", text);
    }
}

proptest! {
    #[test]
    fn prop_identifiers_keep_their_text(name in identifier()) {
        prop_assert_eq!(kinds(&name), vec![TokenKind::Ident(name.clone()), TokenKind::Eoi]);
    }

    #[test]
    fn prop_decimal_literals(value in 0..=i32::MAX) {
        prop_assert_eq!(kinds(&value.to_string())[0].clone(), TokenKind::Number(value));
    }

    #[test]
    fn prop_hex_literals_ignore_case(value in 0..=i32::MAX) {
        prop_assert_eq!(kinds(&format!("${:x}", value))[0].clone(), TokenKind::Number(value));
        prop_assert_eq!(kinds(&format!("${:X}", value))[0].clone(), TokenKind::Number(value));
    }

    #[test]
    fn prop_octal_literals(value in 0..=i32::MAX) {
        prop_assert_eq!(kinds(&format!("&{:o}", value))[0].clone(), TokenKind::Number(value));
    }

    #[test]
    fn prop_literals_beyond_i32_are_rejected(value in (i32::MAX as u64 + 1)..=u64::from(u32::MAX) * 4) {
        let decimal = value.to_string();
        let hex = format!("${:x}", value);
        prop_assert!(Lexer::new(&decimal).tokenize().is_err());
        prop_assert!(Lexer::new(&hex).tokenize().is_err());
    }

    #[test]
    fn prop_additive_chains_associate_left(
        first in 0..1000i32,
        rest in prop::collection::vec((prop::sample::select(vec!['+', '-']), 0..1000i32), 0..8)
    ) {
        let mut source = first.to_string();
        let mut expected = i64::from(first);
        for (op, value) in &rest {
            source.push_str(&format!(" {} {}", op, value));
            if *op == '+' {
                expected += i64::from(*value);
            } else {
                expected -= i64::from(*value);
            }
        }

        let expr = Parser::new(&source).unwrap().parse_expression().unwrap();
        prop_assert_eq!(eval(&expr), expected, "{}", source);
    }
}
