//! # chatroster CLI
//!
//! Command-line interface for the chatroster library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chatroster::ChatrosterError;
use chatroster::cli::Args;
use chatroster::format::{OutputFormat, write_to_format};
use chatroster::ingest::ingest_file;
use chatroster::normalizer::ChatNormalizer;
use chatroster::observer::TracingObserver;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        if e.is_no_usable_data() {
            eprintln!("⚠️  {}", e);
            process::exit(2);
        }
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so the summary on stdout stays clean.
/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "chatroster=debug"
    } else {
        "chatroster=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<(), ChatrosterError> {
    let total_start = Instant::now();

    let output_path = adjust_output_extension(&args.output, args.format);

    // Print header
    println!("📦 chatroster v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:    {}", args.input);
    println!("💾 Output:   {}", output_path);
    println!("📄 Format:   {}", args.format);
    println!("🗣️  Dialect:  {}", args.dialect);
    println!();

    // Step 1: Normalize
    let normalizer =
        ChatNormalizer::with_config(args.normalizer_config()).with_observer(TracingObserver);
    println!("⏳ Normalizing transcript...");
    let parse_start = Instant::now();
    let (transcript, summary) = ingest_file(&normalizer, &args.input)?;
    let parse_time = parse_start.elapsed();
    println!(
        "   Read {} lines as {} ({:.2}s)",
        transcript.stats.lines,
        transcript.dialect,
        parse_time.as_secs_f64()
    );

    // Step 2: Write output in selected format
    let lib_format: OutputFormat = args.format.into();
    println!("💾 Writing {}...", lib_format);
    let write_start = Instant::now();
    write_to_format(&transcript.participants, &output_path, lib_format)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    // Summary
    let stats = &transcript.stats;
    println!();
    println!("📊 Summary:");
    println!("   Participants:  {}", summary.participants);
    println!("   Present:       {}", summary.present);
    println!("   Departed:      {}", summary.departed);
    println!("   Messages:      {}", summary.messages);
    println!("   System events: {}", stats.system_events);
    println!("   Skipped lines: {}", stats.skipped());
    if stats.unresolved_timestamps > 0 {
        println!("   Unresolved timestamps: {}", stats.unresolved_timestamps);
    }

    // Performance stats
    let total_time = total_start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let lines_per_sec = stats.lines as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} lines/sec", lines_per_sec);

    Ok(())
}

/// Adjusts output file extension based on format if using default output.
fn adjust_output_extension(output: &str, format: chatroster::cli::OutputFormat) -> String {
    if output != "roster.json" {
        return output.to_string();
    }

    let lib_format: OutputFormat = format.into();
    format!("roster.{}", lib_format.extension())
}
