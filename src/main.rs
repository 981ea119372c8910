use clap::{Parser, Subcommand};
use salad_builder::catalog::Catalog;
use salad_builder::config::{self, SaladConfig};
use salad_builder::script::{self, ScriptError};
use salad_builder::session::{Outcome, Session};
use salad_builder::types::Category;
use salad_builder::{logging, output};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared flags for commands that print a nutrition report.
#[derive(clap::Args, Clone)]
struct ReportArgs {
    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "salad-builder")]
#[command(about = "Build a salad and see its nutrition facts")]
#[command(long_about = "\
Build a salad and see its nutrition facts

Ingredients come from a catalog file (JSON or TOML) with nutrition facts per
100 g. A salad is built by a script of commands, one per line:

  add <id> [grams]     add an ingredient in spoons (2 by default; grams
                       given are rounded to the nearest whole spoon)
  remove <id>          take it out again
  grams <id> <n>       set the amount in grams
  spoons <id> <n>      set the amount in spoons
  toggle <id>          switch between grams and spoons
  pick <id>            add if missing, remove if present
  clear                start over
  show                 print the salad and its nutrition

Spoon sizes depend on the category (bases 15 g, grains 40 g, proteins 30 g,
vegetables 25 g, cheese 20 g, fruits 30 g, toppings 10 g, dressings 15 g).

Run 'salad-builder gen-config' to generate a documented salad.toml.")]
#[command(version)]
struct Cli {
    /// Ingredient catalog (.json or .toml)
    #[arg(long, default_value = "catalog.json", global = true)]
    catalog: PathBuf,

    /// Config file (optional; stock defaults when missing)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog ingredients
    Catalog {
        /// Only show this category
        #[arg(long)]
        category: Option<Category>,
        /// Only show ingredients whose name or slogan contains this text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Run a command script and print the resulting salad
    Run {
        /// Script file, one command per line
        #[arg(value_name = "SCRIPT")]
        file: PathBuf,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Read commands from stdin, printing the salad on `show`
    Shell(ReportArgs),
    /// Validate the catalog and config without building anything
    Check,
    /// Print a stock salad.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Catalog { category, search } => {
            let catalog = Catalog::load(&cli.catalog)?;
            output::print_catalog(&catalog.filter(category, &search));
        }
        Command::Run { file, report } => {
            let mut session = open_session(&cli.catalog, &cli.config)?;
            let source = std::fs::read_to_string(&file)?;
            let commands = script::parse_script(&source)?;
            for snapshot in session.run_script(&commands)? {
                let shown = output::NutritionReport::build(&snapshot, session.daily_values());
                render(&shown, session.decimals(), &report)?;
                if !report.json {
                    println!();
                }
            }
            render(&session.report(), session.decimals(), &report)?;
        }
        Command::Shell(report) => {
            let mut session = open_session(&cli.catalog, &cli.config)?;
            let stdin = std::io::stdin();
            for (i, line) in stdin.lock().lines().enumerate() {
                let line = line?;
                let command = match script::parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(kind) => {
                        eprintln!("{}", ScriptError { line: i + 1, kind });
                        continue;
                    }
                };
                match session.execute(&command) {
                    Ok(Outcome::Show(_)) => render(&session.report(), session.decimals(), &report)?,
                    Ok(Outcome::Updated) => {}
                    Err(err) => eprintln!("line {}: {}", i + 1, err),
                }
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.catalog.display());
            let catalog = Catalog::load(&cli.catalog)?;
            for line in output::format_catalog_summary(&catalog) {
                println!("{}", line);
            }
            println!("==> Catalog and config are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and catalog and start an empty session.
fn open_session(catalog: &Path, config_path: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let config: SaladConfig = config::load_config(config_path)?;
    let catalog = Catalog::load(catalog)?;
    Ok(Session::with_config(Arc::new(catalog), &config)?)
}

fn render(
    report: &output::NutritionReport,
    decimals: usize,
    args: &ReportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        output::print_report_json(report)?;
    } else {
        output::print_report(report, decimals);
    }
    Ok(())
}
