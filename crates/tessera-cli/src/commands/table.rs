//! Dump a parse table or write it as a binary artifact.

use std::fs;
use std::path::PathBuf;

use tessera_core::Colors;
use tessera_table::dump::{DumpOptions, dump};

use super::run_common::{LanguageSource, or_exit};

pub struct TableArgs {
    pub language: LanguageSource,
    pub emit: Option<PathBuf>,
    pub states: bool,
    pub color: bool,
}

pub fn run(args: TableArgs) {
    let language = or_exit(args.language.load());
    let table = language.table();

    let Some(out) = &args.emit else {
        let options = DumpOptions {
            states: args.states,
            colors: Colors::new(args.color),
        };
        print!("{}", dump(table, &options));
        return;
    };

    let bytes = or_exit(table.to_bytes().map_err(|e| e.to_string()));
    or_exit(fs::write(out, &bytes).map_err(|e| format!("failed to write {}: {e}", out.display())));
    eprintln!(
        "wrote {} ({} bytes, {} states, {} symbols)",
        out.display(),
        bytes.len(),
        table.state_count(),
        table.symbol_count()
    );
}
