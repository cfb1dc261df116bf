use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use walkdir::WalkDir;

use enscript_parser_rs::logger::{log_error, log_info, set_log_file, set_log_prefix};
use enscript_parser_rs::report::DEFAULT_MAX_OUTPUT_CHARS;
use enscript_parser_rs::{DecodeOptions, DecodeResult, EncodedScriptFile, Report};

#[derive(Parser)]
#[command(
    name = "enscript",
    version,
    about = "Decode Microsoft Encoded Script (.vbe/.jse) samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one or more inputs and emit the recovered script text.
    Decode(Box<DecodeArgs>),
    /// Inspect the encoded block of a single file.
    Inspect(InspectArgs),
}

#[derive(Parser, Clone)]
struct DecodeArgs {
    /// Input files or directories (recurses directories).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write `<name>.enscript.txt` files here instead of printing, mirroring
    /// the layout below each input directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print each report as a JSON object.
    #[arg(long, conflicts_with = "out_dir")]
    json: bool,

    #[command(flatten)]
    limits: LimitArgs,

    /// Number of concurrent worker threads.
    #[arg(long)]
    jobs: Option<usize>,

    /// Stop on first error.
    #[arg(long)]
    fail_fast: bool,

    /// Also write diagnostics to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Parser, Clone)]
struct LimitArgs {
    /// Maximum number of decoded characters kept per sample.
    #[arg(long = "max-chars", default_value_t = DEFAULT_MAX_OUTPUT_CHARS)]
    max_chars: usize,

    /// Skip files larger than this many bytes.
    #[arg(long = "max-input-bytes")]
    max_input_bytes: Option<u64>,
}

impl LimitArgs {
    fn options(&self) -> DecodeOptions {
        let options = DecodeOptions::new().with_max_output_chars(self.max_chars);
        match self.max_input_bytes {
            Some(limit) => options.with_max_input_bytes(limit),
            None => options,
        }
    }
}

#[derive(Parser, Clone)]
struct InspectArgs {
    input: PathBuf,
    /// Emit JSON instead of human readable output.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    limits: LimitArgs,
}

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Decode(args) => run_decode(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_decode(args: &DecodeArgs) -> Result<(), AnyError> {
    if let Some(path) = &args.log_file {
        set_log_file(path)?;
    }
    if let Some(jobs) = args.jobs {
        // Best-effort: configure global rayon pool once. Ignore error if already set.
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global();
    }
    let options = args.limits.options();
    options.validate()?;
    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    let files = discover_inputs(&args.inputs);
    let tasks: Vec<(PathBuf, Option<PathBuf>)> = match &args.out_dir {
        Some(dir) => {
            let outputs = plan_outputs(dir, &files);
            files
                .into_iter()
                .map(|(_root, input)| input)
                .zip(outputs.into_iter().map(Some))
                .collect()
        }
        None => files.into_iter().map(|(_root, input)| (input, None)).collect(),
    };
    let process = |(input, output): &(PathBuf, Option<PathBuf>)| -> Result<bool, AnyError> {
        decode_one(input, output.as_deref(), &options, args.json)
            .map_err(|e| format!("{}: {e}", input.display()).into())
    };

    let outcomes = if args.fail_fast {
        tasks
            .par_iter()
            .map(process)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let results = tasks
            .par_iter()
            .map(|task| {
                let res = process(task);
                if let Err(ref e) = res {
                    log_error(&e.to_string());
                }
                res
            })
            .collect::<Vec<_>>();
        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            eprintln!("completed with {failures} failures");
        }
        results.into_iter().filter_map(Result::ok).collect()
    };

    let decoded = outcomes.iter().filter(|found| **found).count();
    log_info(&format!(
        "decoded {decoded} of {} file(s) scanned",
        tasks.len()
    ));
    Ok(())
}

/// Returns whether the file held an encoded block.
fn decode_one(
    input: &Path,
    output: Option<&Path>,
    options: &DecodeOptions,
    json: bool,
) -> Result<bool, AnyError> {
    let _log_prefix = set_log_prefix(input.to_string_lossy());
    let file = EncodedScriptFile::open_with_options(input, options.clone())?;
    let report = file.report();
    if report.is_empty() {
        return Ok(false);
    }

    if let Some(output) = output {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(text) = report.enscript() {
            fs::write(output, text.as_bytes())?;
        }
        println!("{} -> {}", input.display(), output.display());
    } else if json {
        #[derive(serde::Serialize)]
        struct DecodeJson<'a> {
            path: String,
            report: &'a Report,
        }
        let payload = DecodeJson {
            path: input.display().to_string(),
            report: &report,
        };
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        println!("==> {} <==", input.display());
        if let Some(text) = report.enscript() {
            println!("{text}");
        }
    }
    Ok(true)
}

fn run_inspect(args: &InspectArgs) -> Result<(), AnyError> {
    let _log_prefix = set_log_prefix(args.input.to_string_lossy());
    let file = EncodedScriptFile::open_with_options(&args.input, args.limits.options())?;
    let result = file.decode();

    if args.json {
        #[derive(serde::Serialize)]
        struct InspectJson {
            encoded: bool,
            region_start: Option<usize>,
            region_end: Option<usize>,
            declared_len: Option<u32>,
            decoded_len: Option<usize>,
            transforms: Option<usize>,
            unmapped_escapes: Option<usize>,
            checksum_computed: Option<u32>,
            checksum_stored: Option<u32>,
            checksum_valid: Option<bool>,
        }
        let script = result.decoded();
        let payload = InspectJson {
            encoded: result.is_encoded(),
            region_start: script.map(|s| s.region.start),
            region_end: script.map(|s| s.region.end),
            declared_len: script.and_then(|s| s.declared_len),
            decoded_len: script.map(|s| s.bytes.len()),
            transforms: script.map(|s| s.transforms),
            unmapped_escapes: script.map(|s| s.unmapped_escapes),
            checksum_computed: script.map(|s| s.checksum.computed()),
            checksum_stored: script.and_then(|s| s.checksum.stored()),
            checksum_valid: script.map(|s| s.checksum_valid()),
        };
        serde_json::to_writer_pretty(std::io::stdout(), &payload)?;
        println!();
        return Ok(());
    }

    match result {
        DecodeResult::NotEncoded => println!("{}: no encoded block", args.input.display()),
        DecodeResult::Decoded(script) => {
            let declared = script
                .declared_len
                .map_or_else(|| "unreadable".to_owned(), |len| len.to_string());
            println!(
                "Region: {start}..{end}  Length: {len} (declared {declared})",
                start = script.region.start,
                end = script.region.end,
                len = script.region.len(),
            );
            println!(
                "Decoded: {} bytes  Transforms: {}  Unmapped escapes: {}",
                script.bytes.len(),
                script.transforms,
                script.unmapped_escapes
            );
            println!("Checksum: {}", script.checksum);
        }
    }
    Ok(())
}

/// Returns `(root, file)` pairs; `root` is the directory outputs are made
/// relative to.
fn discover_inputs(inputs: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if path.is_file() {
                    files.push((input.clone(), path.to_path_buf()));
                }
            }
        } else if input.is_file() {
            let root = input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            files.push((root, input.clone()));
        } else {
            // Non-existent paths are ignored; shell globbing typically expands patterns.
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    files.dedup_by(|a, b| a.1 == b.1);
    files
}

fn compute_output_path(dir: &Path, root: &Path, input: &Path) -> PathBuf {
    use std::ffi::OsStr;
    let rel = input.strip_prefix(root).unwrap_or(input);
    let rel = if rel.is_absolute() || rel.as_os_str().is_empty() {
        Path::new(input.file_name().unwrap_or_else(|| OsStr::new("output")))
    } else {
        rel
    };
    let mut renamed = rel.as_os_str().to_os_string();
    renamed.push(".enscript.txt");
    dir.join(renamed)
}

/// Output path per input, numbering any path already claimed by an earlier
/// input (`x.vbe.enscript.txt`, `x.vbe.1.enscript.txt`, ...).
fn plan_outputs(dir: &Path, files: &[(PathBuf, PathBuf)]) -> Vec<PathBuf> {
    let mut taken = HashSet::with_capacity(files.len());
    files
        .iter()
        .map(|(root, input)| {
            let base = compute_output_path(dir, root, input);
            let mut output = base.clone();
            let mut n = 0usize;
            while !taken.insert(output.clone()) {
                n += 1;
                let stem = base.to_string_lossy();
                let stem = stem.strip_suffix(".enscript.txt").unwrap_or(&stem);
                output = PathBuf::from(format!("{stem}.{n}.enscript.txt"));
            }
            output
        })
        .collect()
}
