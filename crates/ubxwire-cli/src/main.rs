use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use ubxwire_core::{
    ErrorPolicy, Message, MessageMode, Protocol, ReaderConfig, SchemaRegistry, StreamReader,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("UBXWIRE_BUILD_COMMIT"),
    "\ndate: ",
    env!("UBXWIRE_BUILD_DATE"),
);

const EXAMPLES: &str = "Examples:\n  ubxwire stream decode capture.ubx --schemas schemas/ubx.json -o report.json\n  ubxwire stream decode 'logs/*.ubx' --stdout --pretty --ubx-only\n  ubxwire frame encode --class 0x06 --id 0x08 --payload e80301000100";

#[derive(Parser, Debug)]
#[command(name = "ubxwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode and encode u-blox UBX frames in mixed UBX/NMEA/RTCM3 receiver streams.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on captured receiver streams.
    Stream {
        #[command(subcommand)]
        command: StreamCommands,
    },
    /// Operations on single UBX frames.
    Frame {
        #[command(subcommand)]
        command: FrameCommands,
    },
}

#[derive(Subcommand, Debug)]
enum StreamCommands {
    /// Decode a capture file into a JSON report.
    Decode(DecodeArgs),
}

#[derive(Subcommand, Debug)]
enum FrameCommands {
    /// Build a frame with a fresh checksum and print it as hex.
    Encode {
        /// Message class (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_byte)]
        class: u8,

        /// Message id (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_byte)]
        id: u8,

        /// Payload bytes as hex
        #[arg(long, default_value = "")]
        payload: String,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path (or glob matching one file) of a raw receiver capture
    input: PathBuf,

    /// JSON schema catalog; without it every UBX payload stays opaque
    #[arg(long)]
    schemas: Option<PathBuf>,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Reader options as JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do with bad frames: raise, log or ignore
    #[arg(long)]
    policy: Option<ErrorPolicy>,

    /// Decode UBX payloads as get, set or poll messages
    #[arg(long)]
    mode: Option<MessageMode>,

    /// Only report UBX messages of this class
    #[arg(long, value_parser = parse_byte)]
    class: Option<u8>,

    /// Only report UBX messages with this id
    #[arg(long, value_parser = parse_byte)]
    id: Option<u8>,

    /// Skip NMEA and RTCM3 frames
    #[arg(long)]
    ubx_only: bool,

    /// Keep bitfields as raw integers
    #[arg(long)]
    raw_bitfields: bool,

    /// Keep scaled fields as raw integers
    #[arg(long)]
    no_scaling: bool,

    /// Decode frames even when their checksum is wrong
    #[arg(long)]
    no_checksum: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let result = match cli.command {
        Commands::Stream { command } => match command {
            StreamCommands::Decode(args) => cmd_stream_decode(args, cli.quiet),
        },
        Commands::Frame { command } => match command {
            FrameCommands::Encode { class, id, payload } => cmd_frame_encode(class, id, &payload),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[derive(Debug, Serialize)]
struct DecodeReport {
    input: InputInfo,
    summary: Summary,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct InputInfo {
    path: String,
    bytes: u64,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    messages: usize,
    ubx: usize,
    nmea: usize,
    rtcm3: usize,
    decoded: usize,
    opaque: usize,
}

impl Summary {
    fn record(&mut self, message: &Message) {
        self.messages += 1;
        match message.protocol() {
            Protocol::Ubx => self.ubx += 1,
            Protocol::Nmea => self.nmea += 1,
            Protocol::Rtcm3 => self.rtcm3 += 1,
        }
        match message.as_ubx() {
            Some(ubx) if ubx.is_opaque() => self.opaque += 1,
            Some(_) => self.decoded += 1,
            None => {}
        }
    }
}

fn cmd_stream_decode(args: DecodeArgs, quiet: bool) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let output = if args.stdout {
        None
    } else {
        Some(args.output.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };
    if let Some(output_path) = output.as_ref() {
        ensure_distinct_output(output_path, &input_abs)?;
    }

    let config = reader_config(&args)?;
    let schemas = match args.schemas.as_ref() {
        Some(path) => SchemaRegistry::load(path).map_err(|err| {
            CliError::new(
                format!("invalid schema catalog {}: {err}", path.display()),
                Some("expected a JSON document with a \"messages\" array".to_string()),
            )
        })?,
        None => SchemaRegistry::new(),
    };

    let file = File::open(&resolved_input)
        .with_context(|| format!("Failed to open input file: {}", resolved_input.display()))?;
    let bytes = file
        .metadata()
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?
        .len();

    let reader = StreamReader::from_reader(BufReader::new(file), schemas, config);
    let mut summary = Summary::default();
    let mut messages = Vec::new();
    for result in reader {
        let message = result.map_err(|err| {
            let hint = err
                .is_recoverable()
                .then(|| "use --policy log or --policy ignore to skip bad frames".to_string());
            CliError::new(format!("decode failed: {err}"), hint)
        })?;
        summary.record(&message);
        messages.push(message);
    }

    let report = DecodeReport {
        input: InputInfo {
            path: resolved_input.display().to_string(),
            bytes,
        },
        summary,
        messages,
    };
    let json = serialize_report(&report, args.pretty, args.compact)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} messages -> {}",
            report.summary.messages,
            output.display()
        );
    }
    Ok(())
}

fn cmd_frame_encode(class: u8, id: u8, payload: &str) -> Result<(), CliError> {
    let payload = parse_hex(payload)?;
    let frame = ubxwire_core::encode_frame(class, id, &payload).map_err(|err| {
        CliError::new(
            format!("cannot encode frame: {err}"),
            Some("payloads are limited to 65535 bytes".to_string()),
        )
    })?;
    println!("{}", hex::encode(&frame));
    Ok(())
}

fn reader_config(args: &DecodeArgs) -> Result<ReaderConfig, CliError> {
    let mut config = match args.config.as_ref() {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&text).map_err(|err| {
                CliError::new(
                    format!("invalid config file {}: {err}", path.display()),
                    Some("see ReaderConfig for the accepted keys".to_string()),
                )
            })?
        }
        None => ReaderConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.error_policy = policy;
    }
    if let Some(mode) = args.mode {
        config.message_mode = mode;
    }
    if args.class.is_some() {
        config.filter_class = args.class;
    }
    if args.id.is_some() {
        config.filter_id = args.id;
    }
    if args.ubx_only {
        config.recognized_protocols_only = true;
    }
    if args.raw_bitfields {
        config.decode_bitfields = false;
    }
    if args.no_scaling {
        config.apply_scaling = false;
    }
    if args.no_checksum {
        config.validate_checksum = false;
    }
    Ok(config)
}

fn serialize_report(report: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn ensure_distinct_output(output: &Path, input_abs: &Path) -> Result<(), CliError> {
    let output_dir = output
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", output.display()))?;
    if let Some(output_dir) = output_dir {
        let target = output_dir.join(
            output
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?,
        );
        if target == input_abs {
            return Err(CliError::new(
                format!("output path must differ from input: {}", output.display()),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw receiver capture (.ubx, .bin, .log)".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a raw receiver capture (.ubx, .bin, .log)".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("'{value}' is not a byte (0-255 or 0x00-0xff)"))
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(&digits).map_err(|err| {
        CliError::new(
            format!("invalid hex payload '{text}': {err}"),
            Some("use an even number of hex digits, e.g. 0601".to_string()),
        )
    })
}
