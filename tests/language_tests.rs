// Integration tests for parsing, desugaring and name resolution

use sfe::ir::backend::GlobalRegistry;
use sfe::lower::LowerError;
use sfe::parser::ast::*;
use sfe::parser::{READ_FORMAT, WRITELN_FORMAT};
use sfe::CompileError;

fn main_stmts(source: &str) -> Vec<Stmt> {
    let program = sfe::parse_source(source).expect("Parsing failed");
    let main = program.main().expect("no main function");
    main.body.as_ref().expect("main has no body").stmts.clone()
}

fn compile(source: &str) -> Result<sfe::Translation, CompileError> {
    sfe::compile(source, &mut GlobalRegistry::new())
}

fn lower_error(source: &str) -> LowerError {
    match compile(source) {
        Err(CompileError::Lower(e)) => e,
        other => panic!("expected a lowering error, got {:?}", other),
    }
}

fn writeln_var(name: &str) -> Stmt {
    Stmt::Write {
        format: WRITELN_FORMAT.to_string(),
        value: Expr::var(name),
    }
}

fn inc(name: &str) -> Stmt {
    Stmt::Assign {
        op: AssignOp::AddAssign,
        target: Expr::var(name),
        value: Expr::Int(1),
    }
}

#[test]
fn test_for_to_expands_to_loop() {
    let stmts = main_stmts("program p; var i : integer; begin for i := 1 to 10 do writeln(i) end.");

    let expected = vec![
        Stmt::assign(Expr::var("i"), Expr::Int(1)),
        Stmt::Loop(Block::of(vec![
            Stmt::BreakIf(Expr::binary(BinaryOp::Gt, Expr::var("i"), Expr::Int(10))),
            writeln_var("i"),
            inc("i"),
        ])),
    ];
    assert_eq!(stmts, expected);
}

#[test]
fn test_for_downto_expands_to_loop() {
    let stmts = main_stmts("program p; var i : integer; begin for i := 10 downto 1 do writeln(i) end.");

    let expected = vec![
        Stmt::assign(Expr::var("i"), Expr::Int(10)),
        Stmt::Loop(Block::of(vec![
            Stmt::BreakIf(Expr::binary(BinaryOp::Lt, Expr::var("i"), Expr::Int(1))),
            writeln_var("i"),
            Stmt::Assign {
                op: AssignOp::SubAssign,
                target: Expr::var("i"),
                value: Expr::Int(1),
            },
        ])),
    ];
    assert_eq!(stmts, expected);
}

#[test]
fn test_for_step_matches_inc() {
    let for_loop = main_stmts("program p; var i : integer; begin for i := 1 to 2 do end.");
    let incremented = main_stmts("program p; var i : integer; begin inc(i) end.");

    let Stmt::Loop(body) = &for_loop[1] else {
        panic!("second statement is not a loop");
    };
    assert_eq!(body.stmts.last(), incremented.first());
}

#[test]
fn test_for_downto_lowers_to_loop_with_exit() {
    let translation =
        compile("program p; var i : integer; begin for i := 3 downto 1 do writeln(i) end.")
            .expect("Compilation failed");

    let expected = [
        "(translation_unit p",
        "  (function main int()",
        "    (bind_expr (vars i)",
        "      (decl_expr",
        "        (var_decl i int))",
        "      (modify_expr",
        "        (var_decl i int)",
        "        (int_cst 3))",
        "      (loop_expr",
        "        (bind_expr (vars)",
        "          (exit_expr",
        "            (lt_expr",
        "              (var_decl i int)",
        "              (int_cst 1)))",
        "          (call_expr",
        "            (function_decl printf int(char*, ...) external)",
        "            (string_cst \"%d\\n\")",
        "            (var_decl i int))",
        "          (predecrement_expr",
        "            (var_decl i int)",
        "            (int_cst 1)))))))",
        "",
    ]
    .join("\n");
    assert_eq!(translation.dump(), expected);
}

#[test]
fn test_for_and_hand_built_loop_lower_identically() {
    let source = "program p; var i : integer; begin for i := 1 to 3 do writeln(i) end.";
    let parsed = sfe::parse_source(source).expect("Parsing failed");

    let mut built = Program::new("p");
    built.functions.push(FunctionDecl {
        name: MAIN_FUNCTION.to_string(),
        args: Vec::new(),
        result: Some(TypeNode::Int),
        body: Some(Block::new(
            vec![LocalDecl::Var(VarDecl {
                name: "i".to_string(),
                ty: TypeNode::Int,
            })],
            vec![
                Stmt::assign(Expr::var("i"), Expr::Int(1)),
                Stmt::Loop(Block::of(vec![
                    Stmt::BreakIf(Expr::binary(BinaryOp::Gt, Expr::var("i"), Expr::Int(3))),
                    writeln_var("i"),
                    inc("i"),
                ])),
            ],
        )),
    });

    let from_source = sfe::translate(&parsed, &mut GlobalRegistry::new()).unwrap();
    let from_ast = sfe::translate(&built, &mut GlobalRegistry::new()).unwrap();
    assert_eq!(from_source.dump(), from_ast.dump());
    assert!(from_source.dump().contains("(gt_expr\n"));
    assert!(from_source.dump().contains("(preincrement_expr\n"));
}

#[test]
fn test_while_expands_to_negated_break() {
    let stmts = main_stmts("program p; var x : integer; begin while x < 3 do inc(x) end.");

    let expected = vec![Stmt::Loop(Block::of(vec![
        Stmt::BreakIf(Expr::unary(
            UnaryOp::Not,
            Expr::binary(BinaryOp::Lt, Expr::var("x"), Expr::Int(3)),
        )),
        inc("x"),
    ]))];
    assert_eq!(stmts, expected);
}

#[test]
fn test_io_sugar() {
    let stmts = main_stmts("program p; var x : integer; begin readln(x); write('hi') end.");
    assert_eq!(
        stmts,
        vec![
            Stmt::Read {
                format: READ_FORMAT.to_string(),
                target: Expr::var("x"),
            },
            Stmt::Write {
                format: "%s".to_string(),
                value: Expr::Str("hi".to_string()),
            },
        ]
    );
}

#[test]
fn test_unary_minus_binds_looser_than_multiplication() {
    let stmts = main_stmts("program p; var x, a, b : integer; begin x := -a * b end.");
    assert_eq!(
        stmts,
        vec![Stmt::assign(
            Expr::var("x"),
            Expr::unary(
                UnaryOp::Neg,
                Expr::binary(BinaryOp::Mul, Expr::var("a"), Expr::var("b"))
            )
        )]
    );
}

#[test]
fn test_relational_operators_do_not_chain() {
    let err = sfe::parse_source("program p; var x : integer; begin x := 1 < 2 < 3 end.").unwrap_err();
    assert!(err.message.starts_with("Unexpected"), "{}", err);
}

#[test]
fn test_numeric_literal_bases() {
    let stmts = main_stmts("program p; var x : integer; begin x := $ff + &17 + 9 end.");
    assert_eq!(
        stmts,
        vec![Stmt::assign(
            Expr::var("x"),
            Expr::binary(
                BinaryOp::Add,
                Expr::binary(BinaryOp::Add, Expr::Int(255), Expr::Int(15)),
                Expr::Int(9)
            )
        )]
    );
}

#[test]
fn test_literal_overflow_is_a_compile_error() {
    let err = compile("program p; var x : integer; begin x := $80000000 end.").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
    assert!(err.to_string().contains("too large"), "{}", err);
}

#[test]
fn test_invalid_array_range() {
    let err = sfe::parse_source("program p; var a : array [3 .. 3] of integer; begin end.").unwrap_err();
    assert!(err.message.contains("Invalid array range"), "{}", err);
}

#[test]
fn test_globals_are_not_visible_in_functions() {
    assert_eq!(
        lower_error(
            "program p;
             var g : integer;
             procedure q(); begin g := 1 end;
             begin q() end."
        ),
        LowerError::UnknownVariable {
            name: "g".to_string()
        }
    );
}

#[test]
fn test_function_must_be_declared_before_use() {
    assert_eq!(
        lower_error(
            "program p;
             procedure a(); begin b() end;
             procedure b(); begin end;
             begin a() end."
        ),
        LowerError::UnknownFunction {
            name: "b".to_string()
        }
    );
}

#[test]
fn test_nested_block_shadowing_is_rejected() {
    assert_eq!(
        lower_error("program p; var x : integer; begin var x : integer; begin x := 1 end end."),
        LowerError::DuplicateVariable {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_array_and_scalar_namespaces_are_separate() {
    assert!(compile(
        "program p;
         var a : integer; a : array [0 .. 1] of integer;
         begin a := a[0] end."
    )
    .is_ok());
}

#[test]
fn test_unknown_array() {
    assert_eq!(
        lower_error("program p; var x : integer; begin x := v[1] end."),
        LowerError::UnknownArray {
            name: "v".to_string()
        }
    );
}

#[test]
fn test_call_arity_is_checked() {
    assert_eq!(
        lower_error(
            "program p;
             function f(a : integer; b : integer) : integer; begin f := a + b end;
             begin writeln(f(1)) end."
        ),
        LowerError::ArgumentCountMismatch {
            name: "f".to_string(),
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_user_main_conflicts_with_program_block() {
    for source in [
        "program p; function main() : integer; begin end; begin end.",
        "program p; procedure main(); begin end; begin end.",
    ] {
        assert_eq!(
            lower_error(source),
            LowerError::FunctionRedefined {
                name: MAIN_FUNCTION.to_string()
            },
            "{}",
            source
        );
    }
}

#[test]
fn test_error_messages_name_the_identifier() {
    let err = compile("program p; begin counter := 1 end.").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Translation error: Unknown variable `counter'"
    );
}
