mod args;
mod commands;
mod dispatch;


pub use commands::build_cli;
pub use dispatch::{ParseParams, ReparseParams, TableParams, TraceParams};

/// `--color` setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("always") => Self::Always,
            Some("never") => Self::Never,
            _ => Self::Auto,
        }
    }

    /// `Auto` colors only when both stdout and stderr are terminals.
    pub fn enabled(self) -> bool {
        use std::io::IsTerminal;

        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal() && std::io::stderr().is_terminal(),
        }
    }
}
