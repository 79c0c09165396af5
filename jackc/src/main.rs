use anyhow::{bail, Result};
use jackc::error::Error;
use jackc::pipeline::Source;
use jackc::util::display::{codeprint, tokens_xml};
use jackc::util::msg::Msg;
use jackc::{Config, LabelScheme};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Jack source files or directories
    #[clap(default_value = ".")]
    input: Vec<PathBuf>,

    /// Directory for generated files (default: next to each source)
    #[clap(short, long)]
    out_dir: Option<PathBuf>,

    /// YAML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Label numbering scheme
    #[clap(long, value_enum)]
    labels: Option<LabelScheme>,

    /// Also write <File>T.xml token dumps
    #[clap(long)]
    tokens: bool,

    /// Print generated code
    #[clap(short, long)]
    dump: bool,

    /// Read generated code back before writing it
    #[clap(long)]
    check: bool,

    /// More logging (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[clap(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            Msg::Error(format!("{e:#}")).print_plain();
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every file and class compiled
fn run(args: &Args) -> Result<bool> {
    // 1. Configuration: file, then flags
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(labels) = args.labels {
        config.labels = labels;
    }
    if let Some(dir) = &args.out_dir {
        config.out_dir = Some(dir.clone());
    }
    if let Some(dir) = &config.out_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::FileCreate(dir.display().to_string(), e))?;
    }

    // 2. Read sources
    let mut sources = Vec::new();
    for path in collect_inputs(&args.input)? {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
        tracing::info!("< {}", path.display());
        sources.push(Source { path, text });
    }
    if sources.is_empty() {
        bail!("No .jack files found");
    }

    // 3. Tokenize, parse, generate
    let outcome = jackc::run(&sources, &config);

    // 4. Report per file
    for (source, unit) in sources.iter().zip(&outcome.units) {
        let file = source.path.display().to_string();
        for (line, lexeme) in unit.rejected() {
            Msg::Warn(format!("Unrecognized input `{lexeme}` skipped"))
                .print((file.as_str(), line, source_line(&source.text, line)));
        }
        if let Err(e) = &unit.classes {
            let raw = source_line(&source.text, e.line());
            Msg::Error(e.to_string()).print((file.as_str(), e.line(), raw));
        }
        if args.tokens {
            let stem = file_stem(&source.path);
            let out = out_path(&config, &source.path, &format!("{stem}T.xml"));
            write(&out, &tokens_xml(&unit.tokens))?;
        }
    }

    // 5. Write per class
    let unverified = if args.check { outcome.verify() } else { Vec::new() };
    for compiled in &outcome.compiled {
        let code = match &compiled.code {
            Ok(code) => code,
            Err(e) => {
                let file = compiled.path.display().to_string();
                let text = sources
                    .iter()
                    .find(|source| source.path == compiled.path)
                    .map_or("", |source| source.text.as_str());
                let raw = source_line(text, e.line());
                Msg::Error(e.to_string()).print((file.as_str(), e.line(), raw));
                Msg::Note(format!("No output for class `{}`", compiled.class)).print_plain();
                continue;
            }
        };
        if let Some((_, e)) = unverified.iter().find(|(class, _)| *class == compiled.class) {
            Msg::Error(e.to_string()).print_plain();
            Msg::Note(format!("No output for class `{}`", compiled.class)).print_plain();
            continue;
        }
        if args.dump {
            codeprint(&compiled.class, code);
        }
        let out = out_path(&config, &compiled.path, &format!("{}.vm", compiled.class));
        write(&out, &code.to_string())?;
    }

    Ok(!outcome.failed() && unverified.is_empty())
}

/// Files as given; directories expand to their `.jack` files, sorted
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input)
                .map_err(|e| Error::FileOpen(input.display().to_string(), e))?;
            let mut found = Vec::new();
            for entry in entries {
                let path = entry
                    .map_err(|e| Error::FileOpen(input.display().to_string(), e))?
                    .path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "jack") {
                    found.push(path);
                }
            }
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn out_path(config: &Config, source: &Path, name: &str) -> PathBuf {
    match &config.out_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::FileCreate(path.display().to_string(), e))?;
    tracing::info!("> {}", path.display());
    Ok(())
}

fn source_line(text: &str, line: usize) -> &str {
    text.lines().nth(line.saturating_sub(1)).unwrap_or("")
}
