//! Compile command - translate source files to JavaScript.

use crate::config::CobraConfig;
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use cobra_syntax::{CompileOptions, compile_with, read_python, tokenize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compile indentation-based scripts to JavaScript
#[derive(Parser, Debug)]
#[command(name = "cobra", version, about)]
pub struct CompileArgs {
    /// Input source files, use - for stdin
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write one output file per input into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = Emit::Js)]
    pub emit: Emit,

    /// Project root used to find .cobra/config.toml
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Lex the source exactly as written, without stripping shared indentation
    #[arg(long)]
    pub no_dedent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// JavaScript source
    Js,
    /// Token stream as JSON
    Tokens,
    /// Syntax tree as JSON
    Ast,
}

impl Emit {
    fn extension<'a>(&self, config: &'a CobraConfig) -> &'a str {
        match self {
            Emit::Js => config.extension(),
            Emit::Tokens => "tokens.json",
            Emit::Ast => "ast.json",
        }
    }
}

/// Run the compile command. Returns false if any input failed.
pub fn run(args: &CompileArgs, config: &CobraConfig) -> Result<bool> {
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output accepts a single input; use --out-dir for several");
    }

    let options = CompileOptions {
        dedent: config.dedent() && !args.no_dedent,
    };

    let mut ok = true;
    for input in &args.inputs {
        if let Err(e) = compile_one(input, args, config, options) {
            eprintln!("error: {e:#}");
            ok = false;
        }
    }
    Ok(ok)
}

fn compile_one(
    input: &Path,
    args: &CompileArgs,
    config: &CobraConfig,
    options: CompileOptions,
) -> Result<()> {
    let name = display_name(input);
    let source = read_input(input)?;
    let code = render(&source, args.emit, options).with_context(|| name.clone())?;

    let target = match (&args.output, &args.out_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(output_file_name(input, args.emit.extension(config)))),
        (None, None) => None,
    };

    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, format!("{code}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(input = %name, output = %path.display(), "compiled");
        }
        None => {
            println!("{code}");
            tracing::info!(input = %name, "compiled to stdout");
        }
    }
    Ok(())
}

fn render(source: &str, emit: Emit, options: CompileOptions) -> Result<String> {
    let code = match emit {
        Emit::Js => compile_with(source, options)?,
        Emit::Tokens => {
            let prepared = options.prepare(source);
            let tokens = tokenize(&prepared)?;
            serde_json::to_string_pretty(&tokens)?
        }
        Emit::Ast => {
            let prepared = options.prepare(source);
            let program = read_python(&prepared)?;
            serde_json::to_string_pretty(&program)?
        }
    };
    Ok(code)
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

fn display_name(input: &Path) -> String {
    if input.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

fn output_file_name(input: &Path, extension: &str) -> String {
    let stem = if input.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string())
    };
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(Path::new("src/app.py"), "js"), "app.js");
        assert_eq!(
            output_file_name(Path::new("-"), "ast.json"),
            "stdin.ast.json"
        );
    }

    #[test]
    fn test_render_modes() {
        let options = CompileOptions::default();
        let js = render("x = 2", Emit::Js, options).unwrap();
        assert_eq!(js, "var x;\nx = 2;");

        let ast = render("x = 2", Emit::Ast, options).unwrap();
        let ast: serde_json::Value = serde_json::from_str(&ast).unwrap();
        assert_eq!(ast["body"][0]["kind"], "assign");
        assert_eq!(ast["body"][0]["target"], "x");
        assert_eq!(ast["body"][0]["value"]["text"], "2");

        let tokens = render("x = 2", Emit::Tokens, options).unwrap();
        let tokens: serde_json::Value = serde_json::from_str(&tokens).unwrap();
        assert_eq!(tokens.as_array().map(Vec::len), Some(5));
        assert_eq!(tokens[0]["kind"]["type"], "ident");
        assert_eq!(tokens[0]["text"], "x");
    }

    #[test]
    fn test_render_reports_errors() {
        let err = render("x = (1", Emit::Js, CompileOptions::default()).unwrap_err();
        assert!(err.to_string().contains("expected ')'"));
    }
}
