// Integration tests compiling the sample programs under demos/

use sfe::ir::backend::GlobalRegistry;
use sfe::ir::IrNode;
use std::fs;
use std::path::Path;

fn compile_demo(name: &str) -> (sfe::Translation, GlobalRegistry) {
    let path = Path::new("demos").join(name);
    let source = fs::read_to_string(&path).expect("Failed to read demo file");

    let mut backend = GlobalRegistry::new();
    let translation = sfe::compile(&source, &mut backend)
        .unwrap_or_else(|e| panic!("{} failed to compile: {}", name, e));
    (translation, backend)
}

#[test]
fn test_factorial_demo() {
    let (translation, backend) = compile_demo("factorial.p");
    assert_eq!(backend.function_names(&translation.ir), vec!["fact", "main"]);

    let dump = translation.dump();
    assert!(dump.starts_with("(translation_unit factorial"));
    assert!(dump.contains("(function_decl scanf int(char*, ...) external)"));
    assert!(dump.contains("(string_cst \"n! = \")"));
}

#[test]
fn test_arrays_demo() {
    let (translation, _) = compile_demo("arrays.p");
    let dump = translation.dump();

    assert!(dump.contains("(var_decl squares int[5])"));
    assert!(dump.contains("(var_decl grid int[3][3])"));
    assert!(dump.contains("(var_decl bias const int = 100)"));
    // lower bound -2 shifts every index up by two
    assert!(dump.contains("(plus_expr\n"));
    assert!(dump.contains("(int_cst 2)))"));
}

#[test]
fn test_parity_demo_resolves_forward_declaration() {
    let (translation, backend) = compile_demo("parity.p");
    assert_eq!(
        backend.function_names(&translation.ir),
        vec!["even", "odd", "main"]
    );

    // both the forward declaration and the definition refer to one node
    let odd = translation.function("odd").unwrap();
    let even = translation.function("even").unwrap();
    assert!(odd < even);
}

#[test]
fn test_loops_demo() {
    let (translation, backend) = compile_demo("loops.p");
    assert_eq!(
        backend.function_names(&translation.ir),
        vec!["gcd", "countdown", "main"]
    );

    let countdown = translation.function("countdown").unwrap();
    match translation.ir.get(countdown) {
        IrNode::FunctionDecl { ty, body, .. } => {
            assert_eq!(ty.to_string(), "void(int)");
            assert!(body.is_some());
        }
        other => panic!("unexpected node {:?}", other),
    }

    let dump = translation.dump();
    assert!(dump.contains("(loop_expr"));
    assert!(dump.contains("(exit_expr\n"));
    assert!(dump.contains("(predecrement_expr\n"));
    assert!(dump.contains("(return_expr\n"));
}

#[test]
fn test_demo_listing_round_trips_through_parser() {
    let path = Path::new("demos").join("loops.p");
    let source = fs::read_to_string(path).expect("Failed to read demo file");
    let program = sfe::parse_source(&source).expect("Parsing failed");

    let listing = program.to_string();
    assert!(listing.starts_with("program loops\n"));
    assert!(listing.contains("procedure countdown(\n"));
    assert!(listing.contains("loop\n"));
    assert!(listing.contains("break if\n"));
}
