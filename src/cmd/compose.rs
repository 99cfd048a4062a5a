use crate::reports;
use clap::Args;
use fastrand::Rng;
use scriabin::config::{ComposeParams, DiagnosticsParams};
use scriabin::error::{ScResult, ScriabinError};
use scriabin::index::CompiledLayout;
use scriabin::smf::Timeline;
use scriabin::synth::Synthesizer;
use std::fs;
use std::io::{self, Read};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Text to perform; `-` reads stdin
    #[arg(short, long)]
    pub text: String,

    #[arg(short, long, default_value = "out.mid")]
    pub output: String,

    /// Fail if any character of the text has no rule
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    #[command(flatten)]
    pub compose: ComposeParams,

    #[command(flatten)]
    pub diagnostics: DiagnosticsParams,
}

pub fn run(args: ComposeArgs, layout: &CompiledLayout) -> ScResult<()> {
    let text = read_text(&args.text)?;

    let mut synth = Synthesizer::new(args.diagnostics.miss_policy);
    let pairs = synth.on_text(layout, &text);
    let stats = *synth.stats();

    if args.strict && stats.unmapped_chars > 0 {
        return Err(ScriabinError::Unmapped(format!(
            "{} characters of '{}' have no rule",
            stats.unmapped_chars, args.text
        )));
    }

    let mut rng = match args.compose.seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    };
    let timeline = Timeline::from_pairs(&pairs, &args.compose, &mut rng)?;
    timeline.save(&args.output)?;

    info!(
        "🎼 Wrote {} notes ({} events) to {}",
        pairs.len(),
        timeline.events().len(),
        args.output
    );
    reports::print_diagnostics(&stats);
    Ok(())
}

fn read_text(source: &str) -> ScResult<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(source)?)
    }
}
