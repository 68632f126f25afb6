//! Terminal colors for table dumps, parser traces and CLI output.
//!
//! Blue marks section headers and parser events. Green marks symbols and
//! source text. Red marks recovery and errors. Dim marks ranges and states.

/// A 16-color ANSI palette.
///
/// Every field is empty when colors are off, so callers interpolate fields
/// unconditionally. `Default` is the uncolored palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        red: "\x1b[31m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        red: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
