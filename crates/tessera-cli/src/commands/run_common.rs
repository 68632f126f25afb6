//! Input loading shared by the commands.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_core::Grammar;
use tessera_runtime::{Language, ParseError};

/// Where the parse table comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LanguageSource {
    /// The Tessera grammar compiled into `tree-sitter-tessera`.
    #[default]
    Builtin,
    /// A tree-sitter `grammar.json`, compiled on the fly.
    Grammar(PathBuf),
    /// A binary table artifact written by `tessera table --emit`.
    Table(PathBuf),
}

impl LanguageSource {
    pub fn load(&self) -> Result<Arc<Language>, String> {
        match self {
            Self::Builtin => Ok(tree_sitter_tessera::language()),
            Self::Grammar(path) => {
                let json = read_file(path)?;
                let grammar =
                    Grammar::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
                let table = tessera_generate::generate(&grammar)
                    .map_err(|e| format!("{}: {e}", path.display()))?;
                Ok(Arc::new(Language::new(table)))
            }
            Self::Table(path) => {
                let bytes = fs::read(path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                Language::from_bytes(&bytes)
                    .map(Arc::new)
                    .map_err(|e| format!("{}: {e}", path.display()))
            }
        }
    }
}

/// Source text from `-s`, a file, or stdin when the path is `-`.
pub fn load_source(path: Option<&Path>, text: Option<&str>) -> Result<String, String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    let Some(path) = path else {
        return Err("source is required (SOURCE or -s TEXT)".to_string());
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(buf);
    }
    read_file(path)
}

pub fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}

pub fn or_exit<T>(result: Result<T, String>) -> T {
    match result {
        Ok(value) => value,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

/// Report a failed parse call and exit. A budget failure still prints its partial tree.
pub fn exit_on_parse_error(err: ParseError) -> ! {
    if let ParseError::BudgetExceeded { partial, .. } = &err {
        println!("{}", partial.root_node().to_sexp());
    }
    eprintln!("error: {}", err);
    std::process::exit(2);
}
