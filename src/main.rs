use clap::{Parser, Subcommand};
use sitewire::{config, engine::Engine, event::Script, output, page::Page, render};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Flags for the replay command's extra artifacts.
#[derive(clap::Args, Clone)]
struct ReplayArgs {
    /// Write the trace as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write an HTML snapshot of the final page state to this file
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "sitewire")]
#[command(about = "Deterministic replay of page behaviors")]
#[command(long_about = "\
Deterministic replay of page behaviors

A page fixture describes the elements a server-rendered page would carry;
an interaction script drives clicks, keys, scrolling, and virtual time
against it. Sitewire wires the behavior modules onto the fixture exactly
once, replays the script, and reports every observable thing that happened.

Fixture layout:

  page.toml                        # Elements in document order
    path = \"/index.html\"           # Current location
    viewport = [375, 800]          # Width, height
    [[element]]                    # One table per element
    tag = \"section\"
    id = \"diensten\"                # Ids are unique
    parent = \"inhoud\"              # Ancestry by id reference
    offset_top = 600               # Geometry for scroll tracking
    height = 400

  script.toml                      # Steps applied in order
    [[step]]
    action = \"click\"               # click | keydown | scroll | resize |
    target = \"menu-toggle\"         # input | set_checked | submit |
                                   # image_error | ready | advance

Run 'sitewire gen-config' to generate a documented behavior.toml.")]
#[command(version)]
struct Cli {
    /// Page fixture
    #[arg(long, default_value = "page.toml", global = true)]
    page: PathBuf,

    /// Interaction script
    #[arg(long, default_value = "script.toml", global = true)]
    script: PathBuf,

    /// Behavior config (stock defaults apply when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay the interaction script against the page fixture
    Replay(ReplayArgs),
    /// Validate fixtures and report which modules would initialize
    Check,
    /// Print a stock behavior.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(args) => {
            let config = config::load_config(cli.config.as_deref())?;
            let mut page = Page::load(&cli.page)?;
            let script = Script::load(&cli.script)?;

            let mut engine = Engine::new(config);
            engine.attach(&mut page);
            engine.run_script(&mut page, &script)?;

            if let Some(json_path) = &args.json {
                let json = serde_json::to_string_pretty(engine.trace())?;
                std::fs::write(json_path, json)?;
            }
            if let Some(html_path) = &args.html {
                std::fs::write(html_path, render::snapshot(&page, engine.trace()))?;
            }
            output::print_replay_output(&page, engine.trace(), engine.now());
        }
        Command::Check => {
            let config = config::load_config(cli.config.as_deref())?;
            println!("==> Checking {}", cli.page.display());
            let mut page = Page::load(&cli.page)?;

            // the check runs as if the page reached interactive, so module
            // wiring is probed even for fixtures that start loading
            page.set_interactive();
            let mut engine = Engine::new(config);
            engine.attach(&mut page);
            output::print_check_output(&engine.module_status());

            if cli.script.exists() {
                let script = Script::load(&cli.script)?;
                for (index, step) in script.steps.iter().enumerate() {
                    step.resolve(&page, index)?;
                }
                println!(
                    "Script: {} ({} steps resolve)",
                    cli.script.display(),
                    script.steps.len()
                );
            }
            println!("==> Fixtures are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
