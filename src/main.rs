use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use subnetter::config_loader;
use subnetter::orchestrator::{self, RunOptions};
use subnetter::output::OutputSink;
use subnetter::render::TemplateRenderer;

/// Divides networks based on a JSON description and generates config files
/// based on Jinja-style templates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File containing the network description in JSON (or YAML) format
    #[arg(short, long = "network")]
    network_file: PathBuf,

    /// Template rendered once per subnet
    #[arg(short, long)]
    template: PathBuf,

    /// Output each resulting network to a file
    #[arg(short, long)]
    file: bool,

    /// Folder to store files in
    #[arg(short, long = "output-dir", default_value = "./output")]
    output_dir: PathBuf,

    /// Keep dividing the remaining networks after one fails
    #[arg(long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Network description: {:?}", args.network_file);
    info!("Template: {:?}", args.template);

    let document = config_loader::load_document(&args.network_file)?;
    let renderer = TemplateRenderer::from_path(&args.template)
        .wrap_err_with(|| format!("Failed to load template {}", args.template.display()))?;

    let sink = if args.file {
        info!("Writing one file per subnet to {:?}", args.output_dir);
        OutputSink::Directory(args.output_dir.clone())
    } else {
        OutputSink::Stdout
    };

    let options = RunOptions {
        keep_going: args.keep_going,
    };
    let summary = orchestrator::run(&document, &renderer, &sink, options)?;

    info!(
        "Rendered {} subnet(s) across {} network(s)",
        summary.rendered, summary.networks
    );
    Ok(())
}
