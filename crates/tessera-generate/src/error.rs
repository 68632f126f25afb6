//! Grammar compilation errors.

use tessera_table::TableError;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("rule `{rule}` references undefined symbol `{name}`")]
    UndefinedSymbol { rule: String, name: String },

    #[error("start rule `{0}` is a token")]
    LexicalStartRule(String),

    #[error("rule `{rule}`: {construct} is not supported")]
    Unsupported { rule: String, construct: String },

    #[error("rule `{rule}`: invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("token `{name}` matches the empty string")]
    EmptyToken { name: String },

    #[error("too many symbols: {0} (max 65534)")]
    TooManySymbols(usize),

    #[error("too many parse states: {0} (max 65534)")]
    TooManyStates(usize),

    #[error(transparent)]
    Table(#[from] TableError),
}
