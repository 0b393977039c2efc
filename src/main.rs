// sfe: front end driver for the teaching language

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sfe::ir::backend::GlobalRegistry;
use sfe::parse_source;
use sfe::translate;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SFE_LOG";

#[derive(Debug, Default)]
struct Options {
    print_ast: bool,
    print_ir: bool,
    files: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--ast" => options.print_ast = true,
            "--ir" => options.print_ir = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option `{}'", flag)),
            _ => options.files.push(arg),
        }
    }
    Ok(options)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Compile one file, reporting progress on stdout. `Ok(false)` means the
/// program was rejected.
fn compile_file(path: &str, options: &Options) -> anyhow::Result<bool> {
    println!("Parsing `{}'", path);
    let source = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read `{}'", path))?;

    let program = match parse_source(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            println!("Failed to parse file `{}'", path);
            return Ok(false);
        }
    };
    println!("File `{}' parsed successfully", path);
    if options.print_ast {
        program.print(&mut std::io::stdout())?;
    }

    let mut backend = GlobalRegistry::new();
    let translation = match translate(&program, &mut backend) {
        Ok(translation) => translation,
        Err(e) => {
            eprintln!("{}", e);
            println!("Failed to translate file `{}'", path);
            return Ok(false);
        }
    };
    println!("File `{}' translated successfully", path);
    info!(
        functions = ?backend.function_names(&translation.ir),
        "registered global functions"
    );
    if options.print_ir {
        print!("{}", translation.dump());
    }

    Ok(true)
}

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "sfe".to_string());
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if options.files.is_empty() {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} [--ast] [--ir] <file.p>...", program_name);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} demos/factorial.p          # Compile a sample program", program_name);
        eprintln!("  {} --ast --ir myprogram.p     # Also print the AST and IR", program_name);
        eprintln!();
        eprintln!("Set {}=debug to trace symbol resolution.", LOG_ENV);
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &options.files {
        match compile_file(path, &options) {
            Ok(true) => {}
            Ok(false) => failed = true,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["--ir", "a.p", "b.p"])).unwrap();
        assert!(options.print_ir);
        assert!(!options.print_ast);
        assert_eq!(options.files, vec!["a.p", "b.p"]);
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args(args(&["--optimize"])).is_err());
    }
}
