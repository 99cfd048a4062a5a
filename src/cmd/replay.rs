use crate::reports;
use clap::Args;
use scriabin::config::DiagnosticsParams;
use scriabin::dispatch::Dispatcher;
use scriabin::error::ScResult;
use scriabin::index::CompiledLayout;
use scriabin::replay;
use scriabin::sink::ConsoleSink;
use std::fs::File;
use std::io::{self, BufReader};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Message log, one hex message per line; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub diagnostics: DiagnosticsParams,
}

pub fn run(args: ReplayArgs, layout: &CompiledLayout) -> ScResult<()> {
    let (messages, bad) = if args.input == "-" {
        replay::parse_messages(io::stdin().lock())
    } else {
        replay::parse_messages(BufReader::new(File::open(&args.input)?))
    };
    if !bad.is_empty() {
        warn!("⚠️  Skipped {} unreadable lines", bad.len());
    }

    let mut dispatcher = Dispatcher::new(args.diagnostics.miss_policy);
    let mut sink = ConsoleSink::new(io::stdout().lock());
    let delivered = replay::replay(&mut dispatcher, layout, &messages, &mut sink);

    info!(
        "▶️  Replayed {} messages, {} key events",
        messages.len(),
        delivered
    );
    reports::print_diagnostics(dispatcher.stats());
    Ok(())
}
