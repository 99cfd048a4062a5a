use crate::reports;
use clap::Args;
use scriabin::index::CompiledLayout;
use scriabin::layout::Layout;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Also print the character index
    #[arg(long, default_value_t = false)]
    pub chars: bool,
}

pub fn run(args: InspectArgs, layout: &Layout, compiled: &CompiledLayout) {
    let title = layout.name.as_deref().unwrap_or("(unnamed layout)");
    reports::print_rule_table(title, compiled);
    reports::print_note_index(compiled);
    if args.chars {
        reports::print_char_index(compiled);
    }
    reports::print_lint(&layout.lint());
}
