use clap::{Parser, Subcommand};
use scriabin::index::CompiledLayout;
use scriabin::layout::Layout;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "layouts/layout00.json")]
    layout: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn a text file into a MIDI file
    Compose(cmd::compose::ComposeArgs),
    /// Play a captured MIDI message log through the layout
    Replay(cmd::replay::ReplayArgs),
    /// Print the rules and note index of a layout
    Inspect(cmd::inspect::InspectArgs),
    /// Turn live MIDI input into key presses
    #[cfg(feature = "midi-io")]
    Listen(cmd::listen::ListenArgs),
    /// List MIDI input ports
    #[cfg(feature = "midi-io")]
    Ports,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "midi-io")]
    if let Commands::Ports = cli.command {
        if let Err(e) = cmd::listen::print_ports() {
            error!("{}", e);
            process::exit(1);
        }
        return;
    }

    info!("📂 Loading Layout: {}", cli.layout);
    let layout = Layout::load_from_file(&cli.layout).unwrap_or_else(|e| {
        error!("❌ Could not load layout '{}': {}", cli.layout, e);
        process::exit(1);
    });

    let issues = layout.lint();
    if !issues.is_empty() {
        warn!("⚠️  Layout has {} questionable rule entries (see `inspect`)", issues.len());
    }

    let compiled = CompiledLayout::compile(&layout);
    info!(
        "🎹 {} rules, {} mapped notes, {} mapped keys",
        compiled.rules().len(),
        compiled.note_index().len(),
        compiled.char_index().len()
    );

    let result = match cli.command {
        Commands::Compose(args) => cmd::compose::run(args, &compiled),
        Commands::Replay(args) => cmd::replay::run(args, &compiled),
        Commands::Inspect(args) => {
            cmd::inspect::run(args, &layout, &compiled);
            Ok(())
        }
        #[cfg(feature = "midi-io")]
        Commands::Listen(args) => cmd::listen::run(args, compiled),
        #[cfg(feature = "midi-io")]
        Commands::Ports => Ok(()),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
