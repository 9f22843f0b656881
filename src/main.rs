// cfront: C/C++ source to AST, printed as JSON or as an outline

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use log::LevelFilter;

use cfront::config::ParserConfig;
use cfront::parser::lexer::Dialect;
use cfront::visualize::TreePrinter;
use cfront::{parse_with, serialize, ParseOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    C,
    Cpp,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::C => Dialect::C,
            DialectArg::Cpp => Dialect::Cpp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `{ "program": ..., "errors": [...] }`
    Json,
    /// Indented node outline
    Tree,
    /// Diagnostics only, grouped by lexer and parser
    Errors,
}

/// Command line arguments
#[derive(Debug, ClapParser)]
#[clap(author, version, about = "Parses C and C++ source into an abstract syntax tree")]
struct Args {
    /// Source file to parse
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    file: PathBuf,

    /// Language dialect; inferred from the file extension when omitted
    #[clap(long, value_enum)]
    dialect: Option<DialectArg>,

    #[clap(long, value_enum, default_value = "json")]
    format: Format,

    /// Recursion ceiling for nested constructs
    #[clap(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Print JSON on a single line
    #[clap(long)]
    compact: bool,

    /// Exit with status 1 when any error was collected
    #[clap(long)]
    strict: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn dialect(&self) -> Dialect {
        match self.dialect {
            Some(arg) => arg.into(),
            None => self
                .file
                .extension()
                .and_then(|ext| ext.to_str())
                .map(Dialect::from_extension)
                .unwrap_or_default(),
        }
    }

    fn config(&self) -> ParserConfig {
        let config = ParserConfig::new(self.dialect());
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }

    fn unit_name(&self) -> String {
        self.file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("translation_unit")
            .to_string()
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn read_source(path: &Path) -> Result<String, CliError> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn render(args: &Args, output: &ParseOutput) -> Result<String, CliError> {
    let pretty = !args.compact;
    let text = match args.format {
        Format::Json => serialize::to_json(output, pretty)?,
        Format::Tree => TreePrinter::render(&output.program),
        Format::Errors => serialize::errors_to_json(&output.errors, pretty)?,
    };
    Ok(text)
}

fn run(args: &Args) -> Result<ParseOutput, CliError> {
    let source = read_source(&args.file)?;
    let config = args.config();
    log::info!(
        "parsing {} as {:?} (max depth {})",
        args.file.display(),
        config.dialect,
        config.max_depth
    );

    let output = parse_with(&source, config, &args.unit_name());
    println!("{}", render(args, &output)?.trim_end());

    for err in &output.errors {
        log::info!("{}", err);
    }
    Ok(output)
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(output) if args.strict && output.has_errors() => {
            eprintln!("{} error(s) in {}", output.errors.len(), args.file.display());
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from(["cfront", "main.c"]).expect("could not parse args");
        assert_eq!(args.file, Path::new("main.c"));
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.dialect(), Dialect::C);
        assert_eq!(args.unit_name(), "main");
        assert_eq!(args.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_explicit_options() {
        let args = Args::try_parse_from([
            "cfront",
            "lib.h",
            "--dialect",
            "cpp",
            "--format",
            "tree",
            "--max-depth",
            "32",
            "--compact",
            "--strict",
            "-vv",
        ])
        .expect("could not parse args");
        assert_eq!(args.dialect(), Dialect::Cpp);
        assert_eq!(args.format, Format::Tree);
        assert_eq!(args.config().max_depth, 32);
        assert!(args.compact && args.strict);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_extension_inference() {
        let args = Args::try_parse_from(["cfront", "widget.cpp"]).expect("could not parse args");
        assert_eq!(args.dialect(), Dialect::Cpp);
        let args = Args::try_parse_from(["cfront", "noext"]).expect("could not parse args");
        assert_eq!(args.dialect(), Dialect::Cpp);
    }

    #[test]
    fn test_missing_file() {
        let err = read_source(Path::new("/nonexistent/input.c")).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
        assert_eq!(err.to_string(), "File '/nonexistent/input.c' not found");
    }
}
