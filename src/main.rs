//! devscripts CLI - command line front end for the devscripts tools
//!
//! Each subcommand is a one-shot batch job: read its input, print a result,
//! exit non-zero on the first error.

use clap::{Parser, Subcommand};
use devscripts::{bench, BenchConfig, HexTrie, Manifest, Pattern, TimeFormat, TimedCommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "devscripts")]
#[command(about = "Hex prefix trie, demangler benchmark and isolate converter")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a prefix-count trie from a file of hex strings, one per line
    Trie {
        /// Input file
        file: PathBuf,
        /// Report the count for this prefix (repeatable)
        #[arg(short, long)]
        prefix: Vec<String>,
        /// Prefix length for the top list
        #[arg(short, long, default_value = "1")]
        depth: usize,
        /// Number of top prefixes to show
        #[arg(short, long, default_value = "16")]
        top: usize,
        /// List unique prefixes at least this many digits long
        #[arg(long, default_value = "9")]
        unique_min: usize,
        /// Print the whole trie as compact JSON instead of a summary
        #[arg(long)]
        dump: bool,
    },

    /// Benchmark an external demangler on growing pathological inputs
    Bench {
        /// JSON config file (default: <config dir>/devscripts/bench.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Resource-usage wrapper binary
        #[arg(long = "time")]
        time_bin: Option<PathBuf>,
        /// Argument for the wrapper (repeatable, replaces the configured list)
        #[arg(long = "time-arg", allow_hyphen_values = true)]
        time_args: Vec<String>,
        /// Report format printed by the wrapper
        #[arg(long)]
        time_format: Option<TimeFormat>,
        /// Demangler binary
        #[arg(long)]
        demangler: Option<PathBuf>,
        /// Argument for the demangler (repeatable, replaces the configured list)
        #[arg(long = "demangler-arg", allow_hyphen_values = true)]
        demangler_args: Vec<String>,
        /// Payload shape
        #[arg(short, long)]
        pattern: Option<Pattern>,
        /// First repeat count
        #[arg(long)]
        start: Option<usize>,
        /// Last repeat count (inclusive)
        #[arg(long)]
        limit: Option<usize>,
        /// Growth factor between runs
        #[arg(long)]
        factor: Option<usize>,
    },

    /// Write a single benchmark payload
    Payload {
        /// Payload shape
        #[arg(short, long, default_value = "nested-static")]
        pattern: Pattern,
        /// Repeat count
        #[arg(short, default_value = "10000")]
        n: usize,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert `gn desc ... runtime_deps` output into an isolate file
    ToIsolate {
        /// Input files; stdin if none or `-`
        files: Vec<PathBuf>,
        /// Emit JSON instead of a Python literal
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Trie {
            file,
            prefix,
            depth,
            top,
            unique_min,
            dump,
        } => {
            let trie = HexTrie::from_file(&file)?;
            if dump {
                let mut stdout = BufWriter::new(io::stdout().lock());
                trie.write_json(&mut stdout)?;
                writeln!(stdout)?;
                stdout.flush()?;
                return Ok(());
            }

            let top_items: Vec<_> = trie
                .top_prefixes(depth, top)
                .into_iter()
                .map(|(prefix, count)| serde_json::json!({ "prefix": prefix, "count": count }))
                .collect();
            let prefix_items = prefix
                .iter()
                .map(|p| -> devscripts::Result<serde_json::Value> {
                    Ok(serde_json::json!({
                        "prefix": p,
                        "count": trie.count(p)?
                    }))
                })
                .collect::<devscripts::Result<Vec<_>>>()?;
            let levels = trie.levels();
            output(
                &cli.format,
                &serde_json::json!({
                    "file": file.display().to_string(),
                    "strings": trie.len(),
                    "nodes": levels.iter().map(|l| l.nodes).sum::<usize>(),
                    "max_depth": levels.len(),
                    "levels": levels,
                    "depth": depth,
                    "top": top_items,
                    "prefixes": prefix_items,
                    "unique": trie.unique_prefixes(unique_min)
                }),
            )?;
        }

        Commands::Bench {
            config,
            time_bin,
            time_args,
            time_format,
            demangler,
            demangler_args,
            pattern,
            start,
            limit,
            factor,
        } => {
            let mut bench_config = BenchConfig::load(config.as_deref())?;
            if let Some(time_bin) = time_bin {
                bench_config.time_bin = time_bin;
            }
            if !time_args.is_empty() {
                bench_config.time_args = time_args;
            }
            if let Some(time_format) = time_format {
                bench_config.time_format = time_format;
            }
            if let Some(demangler) = demangler {
                bench_config.demangler = demangler;
            }
            if !demangler_args.is_empty() {
                bench_config.demangler_args = demangler_args;
            }
            if let Some(pattern) = pattern {
                bench_config.pattern = pattern;
            }
            if let Some(start) = start {
                bench_config.start = start;
            }
            if let Some(limit) = limit {
                bench_config.limit = limit;
            }
            if let Some(factor) = factor {
                bench_config.factor = factor;
            }

            let runner = TimedCommand::from_config(&bench_config);
            let format = cli.format;
            bench::run(&runner, &bench_config, |sample| match format {
                OutputFormat::Text => println!("{}", sample),
                OutputFormat::Json => println!("{}", serde_json::json!(sample)),
            })?;
        }

        Commands::Payload { pattern, n, output: path } => {
            let bytes = pattern
                .checked_len(n)
                .ok_or_else(|| anyhow::anyhow!("payload for n={} does not fit in memory", n))?;
            match path {
                Some(path) => {
                    write_payload(pattern, n, &path)?;
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "ok",
                            "path": path.display().to_string(),
                            "bytes": bytes
                        }),
                    )?;
                }
                None => pattern.write_to(n, io::stdout().lock())?,
            }
        }

        Commands::ToIsolate { files, json } => {
            let manifest = Manifest::from_inputs(&files)?;
            if json {
                println!("{}", manifest.to_json_pretty()?);
            } else {
                println!("{}", manifest.to_python_literal());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_payload(pattern: Pattern, n: usize, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)?;
    pattern.write_to(n, BufWriter::new(file))?;
    Ok(())
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Json => serde_json::to_writer(&mut stdout, value)?,
        OutputFormat::Text => serde_json::to_writer_pretty(&mut stdout, value)?,
    }
    writeln!(stdout)?;
    Ok(())
}
