use std::fs::read_to_string;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser as ClapParser};
use log::{debug, info};
use thiserror::Error;

use codegen::gen_assm;
use emission::output;
use lexer::Lexer;
use mir::{debug_tacky, gen_tacky, write_tacky};
use parser::Parser;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = "Runs the ccomp C compiler")]
struct CLI {
    /// Path to C source file
    path: String,

    /// Specifies a point in compilation process to stop, only one(1) option can be specified at a time
    #[command(flatten)]
    stage_options: StageOptions,

    /// Where to write the assembly, defaults to the source path with a ".s" extension
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Write out tacky code next to the assembly output
    #[arg(short = 'd')]
    debug: bool,

    /// Log each compiler stage
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Run C compiler with optional arguments
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct StageOptions {
    /// Stop after lexer, printing every token
    #[arg(long)]
    lex: bool,

    /// Stop after parser, printing the AST
    #[arg(long)]
    parse: bool,

    /// Stop after TACKY generation, printing the TACKY
    #[arg(long)]
    tacky: bool,

    /// Print the final assembly tree and write the assembly file
    #[arg(long)]
    codegen: bool,
}

/// Which stage the compiler should stop at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopStage {
    Lexer,
    Parser,
    Tacky,
    CodeGen,
}

impl StopStage {
    fn from_args(options: &StageOptions) -> Option<StopStage> {
        if options.lex {
            Some(StopStage::Lexer)
        } else if options.parse {
            Some(StopStage::Parser)
        } else if options.tacky {
            Some(StopStage::Tacky)
        } else if options.codegen {
            Some(StopStage::CodeGen)
        } else {
            None
        }
    }
}

pub fn main() -> Result<()> {
    let args = CLI::parse();

    init_logging(args.verbose);

    let stop_stage = StopStage::from_args(&args.stage_options);
    let assembly_path = match &args.output {
        Some(path) => path.clone(),
        None => default_assembly_path(&args.path),
    };

    run_driver(&args.path, &stop_stage, &assembly_path, args.debug)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn default_assembly_path(path: &str) -> String {
    Path::new(path).with_extension("s").display().to_string()
}

fn run_driver(
    path: &str,
    stop_stage: &Option<StopStage>,
    assembly_path: &str,
    debug: bool,
) -> Result<()> {
    info!("compiling {}", path);

    let source =
        read_to_string(path).with_context(|| format!("Unable to read source file: {}", path))?;

    if !source.is_ascii() {
        bail!("Source file {} contains non-ASCII characters", path);
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    compile(
        &source,
        &file_name,
        stop_stage,
        assembly_path,
        debug,
        &mut stdout,
    )
}

/// Actually run our compiler stages: Lexer, Parser, Tacky, Codegen, Emission
/// Stage output requested by `stop_stage` is written to `out`
/// If no StopStage is specified, only the assembly file is written
fn compile<W: Write>(
    source: &str,
    file_name: &str,
    stop_stage: &Option<StopStage>,
    assm_path: &str,
    debug: bool,
    out: &mut W,
) -> Result<()> {
    if let Some(StopStage::Lexer) = stop_stage {
        return lex(source, file_name, out);
    }

    // report every lexical error up front instead of only the first one the parser trips over
    let errors: Vec<String> = Lexer::new(source)
        .tokenize()
        .filter_map(|t| t.err())
        .map(|err| format!("{}: {}", file_name, err))
        .collect();

    if !errors.is_empty() {
        return Err(CompileErr::Lexer(errors).into());
    }

    let mut parser = Parser::new(Lexer::new(source));
    let ast = parser.parse()?;

    if let Some(StopStage::Parser) = stop_stage {
        writeln!(out, "{:#?}", ast)?;
        return Ok(());
    }

    let tacky = gen_tacky(&ast);

    if debug {
        let tacky_name = Path::new(assm_path).with_extension("tacky");
        debug!("writing TACKY to {}", tacky_name.display());

        debug_tacky(&tacky, tacky_name.display().to_string())?;
    }

    if let Some(StopStage::Tacky) = stop_stage {
        write_tacky(out, &tacky)?;
        return Ok(());
    }

    let assm_ast = gen_assm(&tacky)?;

    if let Some(StopStage::CodeGen) = stop_stage {
        writeln!(out, "{:#?}", assm_ast)?;
    }

    output(assm_path, &assm_ast)?;
    info!("wrote assembly to {}", assm_path);

    Ok(())
}

/// Print every token, then fail if any of them could not be lexed
fn lex<W: Write>(source: &str, file_name: &str, out: &mut W) -> Result<()> {
    let mut error_count = 0;

    for result in Lexer::new(source).tokenize() {
        match result {
            Ok(token) => writeln!(out, "Token: {:?} => {}", token.kind, token.text(source))?,
            Err(err) => {
                writeln!(out, "error: {}", err)?;
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        return Err(CompileErr::LexCount {
            file_name: file_name.to_string(),
            count: error_count,
        }
        .into());
    }

    Ok(())
}

#[derive(Error, Debug)]
enum CompileErr {
    #[error("Lexer encountered {} error(s):\n{}", .0.len(), .0.join("\n"))]
    Lexer(Vec<String>),
    #[error("{file_name}: {count} lexical error(s)")]
    LexCount { file_name: String, count: usize },
}
