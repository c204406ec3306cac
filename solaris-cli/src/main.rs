//! Solaris Telemetry CLI Application
//!
//! Command-line front end for the solaris-decoder library. It reads the raw
//! byte stream of a Solaris RPS controller (a capture file or stdin, e.g. a
//! serial device piped in), runs it through the decoder the way a polling
//! host would, and prints every published observation.

use anyhow::{Context, Result};
use clap::Parser;
use solaris_decoder::{Language, SolarisDecoder};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod output;

use config::{AppConfig, OutputFormat};

/// Read chunk size, roughly what a UART FIFO hands over per poll
const READ_CHUNK: usize = 64;

/// Solaris RPS telemetry decoder
#[derive(Parser, Debug)]
#[command(name = "solaris-cli")]
#[command(about = "Decode DAIKIN/ROTEX Solaris RPS serial telemetry", long_about = None)]
#[command(version)]
struct Args {
    /// Raw capture to decode (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Language for sensor names and error descriptions (de, en, fr, it, es)
    #[arg(short, long, value_name = "LANG")]
    language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print the sensor table and exit
    #[arg(long)]
    list_sensors: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Solaris CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", solaris_decoder::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    // Command-line flags override the config file
    if let Some(code) = &args.language {
        config.decoder.language = Language::from_code_or_default(code);
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    if args.list_sensors {
        output::print_sensor_table(config.decoder.language);
        return Ok(());
    }

    decode_stream(&args, &config)
}

/// Feed the input to the decoder chunk by chunk until EOF
fn decode_stream(args: &Args, config: &AppConfig) -> Result<()> {
    let fields = config.output.fields()?;
    let sinks = output::stdout_sinks(&fields, config.decoder.language, config.output.format);
    let mut decoder = SolarisDecoder::new(config.decoder.clone(), sinks)
        .context("Failed to create decoder")?;
    decoder.dump_config();

    let mut reader: Box<dyn Read> = match &args.input {
        Some(path) => {
            log::info!("Decoding capture: {:?}", path);
            Box::new(File::open(path).with_context(|| format!("Failed to open input: {:?}", path))?)
        }
        None => {
            log::info!("Decoding stdin");
            Box::new(io::stdin().lock())
        }
    };

    let start = Instant::now();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        decoder.process(&chunk[..n], elapsed_ms(&start));
    }
    decoder.tick(elapsed_ms(&start));

    if !decoder.pending_bytes().is_empty() {
        log::warn!(
            "Input ended with an unterminated line ({} chars)",
            decoder.pending_bytes().len()
        );
    }

    let stats = decoder.stats();
    log::info!(
        "Lines: {}, records: {}, banners: {}, rejected: {}, timeouts: {}",
        stats.lines,
        stats.records,
        stats.banners,
        stats.rejected,
        stats.timeouts
    );

    Ok(())
}

fn elapsed_ms(start: &Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "solaris-cli",
            "-i",
            "capture.bin",
            "-l",
            "fr",
            "-f",
            "json",
            "-vv",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("capture.bin")));
        assert_eq!(args.language.as_deref(), Some("fr"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.verbose, 2);
        assert!(!args.list_sensors);
    }
}
