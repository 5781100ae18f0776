//! Purpose: `fieldwire` CLI entry point.
//! Role: Binary crate root; parses args, validates serve config, runs the HTTP server.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: The router and codec set are built once, before the listener accepts requests.
use std::io::{self, IsTerminal};
use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use serde_json::{Value, json};

use fieldwire::api::{Error, ErrorKind, to_exit_code};
use fieldwire::serve::{self, DEFAULT_BIND, DEFAULT_MAX_BODY_BYTES, ROUTES, ServeConfig};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fieldwire",
    version,
    about = "HTTP JSON API with typed field codecs",
    after_help = r#"EXAMPLES
  $ fieldwire serve
  $ curl -s localhost:9700/date-time -d '{"time_at":"2020-01-01T02:02:05+07:00"}'
  $ curl -s localhost:9700/array-string -d '{"list":"1,2,3,4"}'"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(
        about = "Serve the codec endpoints over HTTP (loopback by default)",
        after_help = r#"EXAMPLES
  $ fieldwire serve
  $ fieldwire serve --bind 127.0.0.1:9701
  $ fieldwire serve check --json

NOTES
  - Loopback is the default; non-loopback binds require --allow-non-loopback
  - Set RUST_LOG (e.g. RUST_LOG=debug) to see rejected fields in the log"#
    )]
    Serve {
        #[command(subcommand)]
        subcommand: Option<ServeSubcommand>,
        #[command(flatten)]
        run: ServeRunArgs,
    },
}

#[derive(Subcommand, Debug)]
enum ServeSubcommand {
    #[command(about = "Validate serve config and print endpoints without binding")]
    Check {
        #[arg(long, help = "Emit the report as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ServeRunArgs {
    #[arg(
        long,
        default_value = DEFAULT_BIND,
        help = "Bind address",
        help_heading = "Connection"
    )]
    bind: String,
    #[arg(
        long,
        help = "Allow non-loopback binds",
        help_heading = "Safety"
    )]
    allow_non_loopback: bool,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        help = "Max request body size in bytes",
        help_heading = "Safety"
    )]
    max_body_bytes: u64,
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `fieldwire --help` for usage."));
            }
        },
    };

    match cli.command {
        Command::Serve { subcommand, run } => {
            let config = serve_config_from_run_args(run)?;
            match subcommand {
                Some(ServeSubcommand::Check { json }) => {
                    serve::validate_config(&config)?;
                    emit_serve_check_report(&config, json);
                    Ok(RunOutcome::ok())
                }
                None => {
                    emit_serve_startup_guidance(&config);
                    let runtime = tokio::runtime::Builder::new_multi_thread()
                        .enable_all()
                        .build()
                        .map_err(|err| {
                            Error::new(ErrorKind::Internal)
                                .with_message("failed to start runtime")
                                .with_source(err)
                        })?;
                    runtime.block_on(serve::serve(config))?;
                    Ok(RunOutcome::ok())
                }
            }
        }
    }
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or("invalid arguments");
    first.trim_start_matches("error: ").trim().to_string()
}

fn serve_config_from_run_args(run: ServeRunArgs) -> Result<ServeConfig, Error> {
    let bind: SocketAddr = run.bind.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid bind address")
            .with_hint("Use a host:port value like 127.0.0.1:9700.")
    })?;
    Ok(ServeConfig {
        bind,
        max_body_bytes: run.max_body_bytes,
        allow_non_loopback: run.allow_non_loopback,
    })
}

fn endpoint_urls(config: &ServeConfig) -> Vec<(&'static str, String)> {
    ROUTES
        .iter()
        .map(|(method, path)| (*method, format!("http://{}{path}", config.bind)))
        .collect()
}

fn emit_serve_startup_guidance(config: &ServeConfig) {
    if !io::stderr().is_terminal() {
        return;
    }
    eprintln!("fieldwire serving on http://{}", config.bind);
    for (method, url) in endpoint_urls(config) {
        eprintln!("  {method} {url}");
    }
    eprintln!("Press Ctrl-C to stop.");
}

fn emit_serve_check_report(config: &ServeConfig, json: bool) {
    if json {
        let endpoints: Vec<Value> = endpoint_urls(config)
            .into_iter()
            .map(|(method, url)| json!({ "method": method, "url": url }))
            .collect();
        let report = json!({
            "ok": true,
            "bind": config.bind.to_string(),
            "max_body_bytes": config.max_body_bytes,
            "allow_non_loopback": config.allow_non_loopback,
            "endpoints": endpoints,
        });
        println!("{report}");
        return;
    }

    println!("config ok");
    println!("bind: {}", config.bind);
    println!("max body bytes: {}", config.max_body_bytes);
    for (method, url) in endpoint_urls(config) {
        println!("endpoint: {method} {url}");
    }
}

fn error_json(err: &Error) -> Value {
    let mut inner = serde_json::Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("error")),
    );
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    json!({ "error": Value::Object(inner) })
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {}", err.message().unwrap_or("error"));
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}
