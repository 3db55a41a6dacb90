use blogit::expand::{self, RunOptions};
use blogit::metadata::KamadakReader;
use blogit::{config, imaging, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "blogit")]
#[command(about = "Expand an HTML template and compile its photo galleries")]
#[command(long_about = "\
Expand an HTML template and compile its photo galleries

The template may contain %{name} placeholders, filled from sections of the
content file, and <galleria> blocks listing photos. Each photo is resized into
<outputdir>/images and <outputdir>/thumbs; the block becomes a Galleria widget.

Content file:

  [title]: Summer in Lisbon
  [intro]:
  <p>Three weeks of trams and sardines.</p>

Gallery block:

  <galleria width=\"1000\" height=\"700\" thumbheight=\"60\">
  beach.jpg \"low tide.jpg\"
  Caption for low tide.jpg
  </galleria>

Settings are read from blogit.toml next to the template, or from --config.
Run 'blogit gen-config' to print a documented blogit.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RunArgs {
    /// HTML template with %{name} placeholders and <galleria> blocks
    template: PathBuf,

    /// Content file with [key]: value sections
    content: PathBuf,

    /// Directory for the page and the images/ and thumbs/ folders
    #[arg(long, default_value = ".")]
    outputdir: PathBuf,

    /// Name of the generated page
    #[arg(long, default_value = expand::DEFAULT_OUTPUT_FILE)]
    outputfile: String,

    /// Directory relative image paths are resolved against
    #[arg(long, default_value = ".")]
    imagedir: PathBuf,

    /// Regenerate every resized image even if it already exists
    #[arg(long)]
    no_cache: bool,

    /// Config file (default: blogit.toml next to the template)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Expand a template into a page
    Run(RunArgs),
    /// Print a stock blogit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let config = match &args.config {
                Some(path) => config::load_config_file(path)?,
                None => config::load_config(template_dir(&args.template))?,
            };
            let backend = imaging::backend_for(&config.resize);

            let options = RunOptions {
                output_dir: args.outputdir,
                output_file: args.outputfile,
                image_root: args.imagedir,
                force: args.no_cache,
                config,
                ..RunOptions::new(args.template, args.content)
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event);
                }
            });
            let result = expand::run(&options, backend.as_ref(), &KamadakReader, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            println!("Cache: {}", result?.cache_stats);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Directory holding the template, where `blogit.toml` is looked up.
fn template_dir(template: &Path) -> &Path {
    template.parent().unwrap_or(Path::new("."))
}
