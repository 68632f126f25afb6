mod cli;
mod commands;

use cli::{ParseParams, ReparseParams, TableParams, TraceParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        Some(("reparse", m)) => {
            let params = ReparseParams::from_matches(m);
            commands::reparse::run(params.into());
        }
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        Some(("table", m)) => {
            let params = TableParams::from_matches(m);
            commands::table::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
