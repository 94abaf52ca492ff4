use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

use quadtree_raster_codec::codec::{decode_with_progress, encode_with_progress};
use quadtree_raster_codec::error::CodecErrorKind;
use quadtree_raster_codec::logger::{NullSink, ProgressSink, TerminalSink};
use quadtree_raster_codec::tree::{builder, lossy};
use quadtree_raster_codec::{pgm, raster, CodecError};

/// Helper for `main`; prints a message to stderr and exits the process.
fn error_exit(msg: &str, code: i32) -> ! {
    eprintln!("{msg}");
    std::process::exit(code)
}

/// Translates a [`CodecError`] into an exit code per the error taxonomy
/// of spec.md §7.
fn exit_code_for(err: &CodecError) -> i32 {
    match err.kind {
        CodecErrorKind::InvalidParameter => 2,
        CodecErrorKind::Io => 3,
        CodecErrorKind::Format => 4,
        CodecErrorKind::Size => 5,
        CodecErrorKind::OutOfMemory => 6,
    }
}

fn die_on(err: CodecError) -> ! {
    let code = exit_code_for(&err);
    if err.is_format() {
        eprintln!("hint: the input does not look like a valid QTC/PGM file for this codec");
    }
    error_exit(&err.to_string(), code)
}

const DEFAULT_COMPRESS_OUTPUT: &str = "default_compress_output.qtc";
const DEFAULT_DECOMPRESS_OUTPUT: &str = "default_compress_input.pgm";

/// Converts to and from a quadtree-based raster compression format (QTC).
///
/// Exit status: zero on success; non-zero on failure, with the code
/// reflecting the kind of failure (invalid parameter: 2, I/O: 3, format: 4,
/// size: 5, out of memory: 6).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Select compression mode (mutually exclusive with -u).
    #[arg(short = 'c', long = "compress", conflicts_with = "decompress")]
    compress: bool,

    /// Select decompression mode (mutually exclusive with -c).
    #[arg(short = 'u', long = "decompress")]
    decompress: bool,

    /// Input file.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Lossy parameter alpha; must be strictly positive. The lossy pass
    /// runs only when alpha > 1.
    #[arg(short = 'a', long = "alpha")]
    alpha: Option<f64>,

    /// Also emit a segmentation-grid PGM to the given path.
    #[arg(short = 'g', long = "grid")]
    grid: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() {
    let cli = Cli::parse();
    quadtree_raster_codec::logger::init(cli.verbose.log_level_filter() as i8 - 2);

    match (cli.compress, cli.decompress) {
        (true, true) => unreachable!("clap enforces -c/-u mutual exclusion"),
        (false, false) => error_exit("One of -c/--compress and -u/--decompress must be present", 2),
        (true, false) => run_compress(&cli),
        (false, true) => run_decompress(&cli),
    }
}

fn progress_sink(cli: &Cli) -> Box<dyn ProgressSink> {
    if cli.verbose.log_level_filter() > log::LevelFilter::Warn {
        Box::new(TerminalSink::new())
    } else {
        Box::new(NullSink)
    }
}

fn run_compress(cli: &Cli) {
    if let Some(alpha) = cli.alpha {
        if alpha <= 0.0 {
            error_exit("-a/--alpha must be strictly positive", 2);
        }
    }

    let input_file = File::open(&cli.input).unwrap_or_else(|e| {
        error_exit(&format!("could not open input file: {e}"), 3);
    });
    let mut reader = BufReader::new(input_file);
    let pixels = pgm::read(&mut reader).unwrap_or_else(|e| die_on(e));

    let mut tree = builder::build(&pixels).unwrap_or_else(|e| die_on(e));

    if let Some(alpha) = cli.alpha {
        if alpha > 1.0 {
            lossy::apply(&mut tree, alpha).unwrap_or_else(|e| die_on(e));
        }
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPRESS_OUTPUT));
    let output_file = File::create(&output_path).unwrap_or_else(|e| {
        error_exit(&format!("could not create output file: {e}"), 3);
    });
    let mut writer = BufWriter::new(output_file);
    let sink = progress_sink(cli);
    encode_with_progress(&tree, &mut writer, &*sink).unwrap_or_else(|e| die_on(e));

    if let Some(grid_path) = &cli.grid {
        let grid_image = quadtree_raster_codec::grid::render(&tree).unwrap_or_else(|e| die_on(e));
        let grid_file = File::create(grid_path).unwrap_or_else(|e| {
            error_exit(&format!("could not create grid file: {e}"), 3);
        });
        let mut grid_writer = BufWriter::new(grid_file);
        pgm::write(&grid_image, &mut grid_writer).unwrap_or_else(|e| die_on(e));
    }

    log::info!(
        "wrote {} ({} nodes, {} retained leaves)",
        output_path.display(),
        tree.node_count(),
        tree.retained_leaf_count()
    );
}

fn run_decompress(cli: &Cli) {
    let input_file = File::open(&cli.input).unwrap_or_else(|e| {
        error_exit(&format!("could not open input file: {e}"), 3);
    });
    let mut reader = BufReader::new(input_file);
    let sink = progress_sink(cli);
    let tree = decode_with_progress(&mut reader, &*sink).unwrap_or_else(|e| die_on(e));

    let pixels = raster::reconstruct(&tree).unwrap_or_else(|e| die_on(e));

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DECOMPRESS_OUTPUT));
    let output_file = File::create(&output_path).unwrap_or_else(|e| {
        error_exit(&format!("could not create output file: {e}"), 3);
    });
    let mut writer = BufWriter::new(output_file);
    pgm::write(&pixels, &mut writer).unwrap_or_else(|e| die_on(e));

    if let Some(grid_path) = &cli.grid {
        let grid_image = quadtree_raster_codec::grid::render(&tree).unwrap_or_else(|e| die_on(e));
        let grid_file = File::create(grid_path).unwrap_or_else(|e| {
            error_exit(&format!("could not create grid file: {e}"), 3);
        });
        let mut grid_writer = BufWriter::new(grid_file);
        pgm::write(&grid_image, &mut grid_writer).unwrap_or_else(|e| die_on(e));
    }

    log::info!("wrote {}", output_path.display());
}
