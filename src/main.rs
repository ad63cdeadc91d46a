mod debug_report;

use rozklad::{DataError, Dispatcher, Options, Request, read_file};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION: &str = "cli";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging();

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    for issue in &dispatcher.load_report().issues {
        eprintln!("warning: {issue}");
    }

    if let Err(err) = run(&dispatcher, &config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    routes: PathBuf,
    gazetteers: Vec<PathBuf>,
    config: Option<PathBuf>,
    fuzzy_threshold: Option<u8>,
    session: String,
    input: Option<String>,
    json: bool,
    trace: bool,
    color: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ROZKLAD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_dispatcher(config: &CliConfig) -> Result<Dispatcher, DataError> {
    let mut options = match &config.config {
        Some(path) => Options::from_json(&read_file(path)?)?,
        None => Options::default(),
    };
    if let Some(threshold) = config.fuzzy_threshold {
        options.fuzzy_threshold = threshold;
    }

    let mut builder = Dispatcher::builder().options(options).routes_json(read_file(&config.routes)?);
    for path in &config.gazetteers {
        builder = builder.gazetteer_json(read_file(path)?);
    }
    builder.build()
}

fn run(dispatcher: &Dispatcher, config: &CliConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(message) = &config.input {
        return handle_line(dispatcher, config, message, &mut out);
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        handle_line(dispatcher, config, &line, &mut out)?;
    }
    Ok(())
}

fn handle_line(dispatcher: &Dispatcher, config: &CliConfig, line: &str, out: &mut impl Write) -> io::Result<()> {
    let request = if config.json {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => request,
            Err(err) => {
                eprintln!("warning: skipping malformed request: {err}");
                return Ok(());
            }
        }
    } else {
        Request::new(config.session.as_str(), line)
    };

    let report = dispatcher.handle_verbose(&request);
    if config.trace {
        out.flush()?;
        debug_report::print_turn(&report, config.color);
    }

    if config.json {
        let encoded = serde_json::to_string(&report.response).map_err(io::Error::other)?;
        writeln!(out, "{encoded}")?;
    } else {
        writeln!(out, "{}", report.response.reply)?;
    }
    out.flush()
}

fn parse_args() -> Result<CliConfig, String> {
    let mut routes: Option<PathBuf> = None;
    let mut gazetteers = Vec::new();
    let mut config: Option<PathBuf> = None;
    let mut fuzzy_threshold = None;
    let mut session = DEFAULT_SESSION.to_string();
    let mut input: Option<String> = None;
    let mut json = false;
    let mut trace = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            match inline.clone() {
                Some(v) => Ok(v),
                None => args.next().ok_or_else(|| format!("error: {name} expects a value")),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("rozklad {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--trace" => trace = true,
            "--routes" => routes = Some(PathBuf::from(value("--routes")?)),
            "--gazetteer" => gazetteers.push(PathBuf::from(value("--gazetteer")?)),
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--session" => session = value("--session")?,
            "--fuzzy-threshold" => {
                let raw = value("--fuzzy-threshold")?;
                fuzzy_threshold = Some(parse_threshold(&raw)?);
            }
            "--input" | "-i" => {
                let v = value("--input")?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(v);
            }
            _ => return Err(format!("error: unknown option '{arg}'\n\n{}", help_text())),
        }
    }

    let routes = routes.ok_or_else(|| format!("error: --routes is required\n\n{}", help_text()))?;
    if session.trim().is_empty() {
        return Err("error: --session must not be empty".to_string());
    }
    if input.as_deref().is_some_and(|m| m.trim().is_empty()) {
        return Err("error: --input must not be empty".to_string());
    }

    Ok(CliConfig { routes, gazetteers, config, fuzzy_threshold, session, input, json, trace, color })
}

fn parse_threshold(value: &str) -> Result<u8, String> {
    value
        .parse::<u8>()
        .ok()
        .filter(|t| *t <= 100)
        .ok_or_else(|| format!("error: invalid --fuzzy-threshold '{value}' (expected 0..=100)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "rozklad {version}

Bus-route dispatcher chat engine CLI. Reads one message per line from stdin.

Usage:
  rozklad --routes <file> [OPTIONS]
  rozklad --routes <file> [OPTIONS] --input <text>

Options:
  --routes <file>            Route data (JSON array, or an object with a \"routes\" array).
  --gazetteer <file>         Extra city spellings {{\"canonical\": [\"form\", ...]}}.
                             May be given more than once.
  --config <file>            Options as JSON; missing fields keep their defaults.
  --fuzzy-threshold <n>      Minimum fuzzy city score, 0..=100 (overrides --config).
  --session <id>             Session id for plain-text input. Default: {default_session}
  -i, --input <text>         Handle a single message instead of reading stdin.
  --json                     Each input line is a Request, each output line a Response.
  --trace                    Print a per-turn report (analysis, state, timings).
  --color                    Force ANSI color output in the trace.
  --no-color                 Disable ANSI color output in the trace.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  ROZKLAD_LOG                Log filter, for example rozklad=debug. Default: warn

Exit codes:
  0  Success.
  1  Data could not be loaded, or an I/O error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        default_session = DEFAULT_SESSION
    )
}
