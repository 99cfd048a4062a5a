use crate::reports;
use clap::Args;
use scriabin::config::{DiagnosticsParams, ListenParams};
use scriabin::dispatch::Dispatcher;
use scriabin::error::ScResult;
use scriabin::index::CompiledLayout;
use scriabin::midi_in;
use scriabin::sink::ConsoleSink;
use std::io;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    #[command(flatten)]
    pub listen: ListenParams,

    #[command(flatten)]
    pub diagnostics: DiagnosticsParams,
}

pub fn run(args: ListenArgs, layout: CompiledLayout) -> ScResult<()> {
    let dispatcher = Dispatcher::new(args.diagnostics.miss_policy);
    let sink = ConsoleSink::new(io::stdout());
    let listener = midi_in::listen(Arc::new(layout), dispatcher, sink, &args.listen)?;

    info!("👂 Listening on '{}'. Press Enter to stop.", listener.port_name);
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    info!("Closing connection");
    let stats = listener.close();
    reports::print_diagnostics(&stats);
    Ok(())
}

pub fn print_ports() -> ScResult<()> {
    let ports = midi_in::list_ports()?;
    if ports.is_empty() {
        println!("No MIDI input ports found.");
    }
    for (i, name) in ports.iter().enumerate() {
        println!("{}: {}", i, name);
    }
    Ok(())
}
