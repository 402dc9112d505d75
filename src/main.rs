//! Command-line front end.
//!
//! ```bash
//! # compress
//! text-huffman --input les-mis.txt --output compressed.txt
//!
//! # decompress, dumping the rebuilt tree as graphviz
//! text-huffman -d -i compressed.txt -o les-mis.txt --graphviz graphviz
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use text_huffman::{
    CodecConfig, CompressionStats, FrequencyReporter, GraphvizExporter, HuffmanCodec,
    HuffmanError, Result,
};

#[derive(Parser, Debug)]
#[command(name = "text-huffman")]
#[command(version)]
#[command(about = "Huffman compression for UTF-8 text", long_about = None)]
struct Args {
    /// File to compress, or to decompress with --decompress
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the result
    #[arg(short, long, default_value = "compressed.txt")]
    output: PathBuf,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Directory for graphviz exports of the queue and tree
    #[arg(long)]
    graphviz: Option<PathBuf>,

    /// Print the character frequency table (compression only)
    #[arg(long)]
    frequencies: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Both paths name one existing file. The output may not exist yet.
fn same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn run(args: &Args) -> Result<CompressionStats> {
    // creating the output truncates it before the input is read
    if same_file(&args.input, &args.output) {
        return Err(HuffmanError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is both input and output", args.input.display()),
        )));
    }

    let config = CodecConfig::default();
    let graphviz = args.graphviz.as_ref().map(GraphvizExporter::new);
    let input = File::open(&args.input)?;
    let output = io::BufWriter::new(File::create(&args.output)?);

    let result = if args.decompress {
        HuffmanCodec::decode_with(input, output, &config, graphviz)
    } else {
        let report = args
            .frequencies
            .then(|| FrequencyReporter::new(io::stdout().lock()));
        HuffmanCodec::encode_with(input, output, &config, (graphviz, report))
    };

    // never leave a half-written file that looks like a result
    if result.is_err() {
        if let Err(e) = fs::remove_file(&args.output) {
            error!("failed to remove {}: {}", args.output.display(), e);
        }
    }
    result
}

fn kilobytes(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len() / 1024).unwrap_or(0)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    match run(&args) {
        Ok(stats) => {
            info!(
                "Input {} ({} KB) successfully written to {} ({} KB)",
                args.input.display(),
                kilobytes(&args.input),
                args.output.display(),
                kilobytes(&args.output)
            );
            info!(
                symbols = stats.symbols,
                distinct = stats.distinct_symbols,
                "compression ratio {:.1}%",
                stats.ratio() * 100.0
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let verb = if args.decompress { "decompress" } else { "compress" };
            error!(category = e.category(), "failed to {} {}: {}", verb, args.input.display(), e);
            ExitCode::FAILURE
        }
    }
}
