//! `grammar.json` loading.
//!
//! Tree-sitter writes rules as objects tagged by an upper-case `type` field.
//! Postcard cannot decode internally tagged enums, so the JSON shape lives in a
//! separate mirror type that converts into [`Rule`].

use indexmap::IndexMap;
use serde::Deserialize;

use super::GrammarError;
use super::types::{Grammar, Precedence, PrecedenceEntry, Rule};

impl Grammar {
    /// Parse a tree-sitter `grammar.json` document.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let doc: JsonGrammar = serde_json::from_str(json)?;
        Ok(doc.into())
    }
}

#[derive(Debug, Deserialize)]
struct JsonGrammar {
    name: String,
    // IndexMap keeps definition order; the first rule is the start rule.
    rules: IndexMap<String, JsonRule>,
    #[serde(default)]
    extras: Vec<JsonRule>,
    #[serde(default)]
    precedences: Vec<Vec<JsonPrecedenceEntry>>,
    #[serde(default)]
    conflicts: Vec<Vec<String>>,
    #[serde(default)]
    externals: Vec<JsonRule>,
    #[serde(default)]
    inline: Vec<String>,
    #[serde(default)]
    supertypes: Vec<String>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    reserved: IndexMap<String, Vec<JsonRule>>,
    #[serde(default)]
    inherits: Option<String>,
}

impl From<JsonGrammar> for Grammar {
    fn from(doc: JsonGrammar) -> Self {
        fn rules(list: Vec<JsonRule>) -> Vec<Rule> {
            list.into_iter().map(Rule::from).collect()
        }

        Self {
            name: doc.name,
            rules: doc
                .rules
                .into_iter()
                .map(|(name, rule)| (name, rule.into()))
                .collect(),
            extras: rules(doc.extras),
            precedences: doc
                .precedences
                .into_iter()
                .map(|level| level.into_iter().map(Into::into).collect())
                .collect(),
            conflicts: doc.conflicts,
            externals: rules(doc.externals),
            inline: doc.inline,
            supertypes: doc.supertypes,
            word: doc.word,
            reserved: doc
                .reserved
                .into_iter()
                .map(|(context, words)| (context, rules(words)))
                .collect(),
            inherits: doc.inherits,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum JsonRule {
    Blank,
    String {
        value: String,
    },
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    Symbol {
        name: String,
    },
    Seq {
        members: Vec<JsonRule>,
    },
    Choice {
        members: Vec<JsonRule>,
    },
    Repeat {
        content: Box<JsonRule>,
    },
    Repeat1 {
        content: Box<JsonRule>,
    },
    Field {
        name: String,
        content: Box<JsonRule>,
    },
    Alias {
        content: Box<JsonRule>,
        value: String,
        named: bool,
    },
    Token {
        content: Box<JsonRule>,
    },
    ImmediateToken {
        content: Box<JsonRule>,
    },
    Prec {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecLeft {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecRight {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecDynamic {
        value: i32,
        content: Box<JsonRule>,
    },
    Reserved {
        context_name: String,
        content: Box<JsonRule>,
    },
}

impl From<JsonRule> for Rule {
    fn from(rule: JsonRule) -> Self {
        fn inner(content: Box<JsonRule>) -> Box<Rule> {
            Box::new(Rule::from(*content))
        }

        fn all(members: Vec<JsonRule>) -> Vec<Rule> {
            members.into_iter().map(Rule::from).collect()
        }

        match rule {
            JsonRule::Blank => Rule::Blank,
            JsonRule::String { value } => Rule::String(value),
            JsonRule::Pattern { value, flags } => Rule::Pattern { value, flags },
            JsonRule::Symbol { name } => Rule::Symbol(name),
            JsonRule::Seq { members } => Rule::Seq(all(members)),
            JsonRule::Choice { members } => Rule::Choice(all(members)),
            JsonRule::Repeat { content } => Rule::Repeat(inner(content)),
            JsonRule::Repeat1 { content } => Rule::Repeat1(inner(content)),
            JsonRule::Field { name, content } => Rule::Field {
                name,
                content: inner(content),
            },
            JsonRule::Alias {
                content,
                value,
                named,
            } => Rule::Alias {
                content: inner(content),
                value,
                named,
            },
            JsonRule::Token { content } => Rule::Token(inner(content)),
            JsonRule::ImmediateToken { content } => Rule::ImmediateToken(inner(content)),
            JsonRule::Prec { value, content } => Rule::Prec {
                value: value.into(),
                content: inner(content),
            },
            JsonRule::PrecLeft { value, content } => Rule::PrecLeft {
                value: value.into(),
                content: inner(content),
            },
            JsonRule::PrecRight { value, content } => Rule::PrecRight {
                value: value.into(),
                content: inner(content),
            },
            JsonRule::PrecDynamic { value, content } => Rule::PrecDynamic {
                value,
                content: inner(content),
            },
            JsonRule::Reserved {
                context_name,
                content,
            } => Rule::Reserved {
                context_name,
                content: inner(content),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonPrecedence {
    Integer(i32),
    Name(String),
}

impl From<JsonPrecedence> for Precedence {
    fn from(value: JsonPrecedence) -> Self {
        match value {
            JsonPrecedence::Integer(n) => Precedence::Integer(n),
            JsonPrecedence::Name(s) => Precedence::Name(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum JsonPrecedenceEntry {
    String { value: String },
    Symbol { name: String },
}

impl From<JsonPrecedenceEntry> for PrecedenceEntry {
    fn from(entry: JsonPrecedenceEntry) -> Self {
        match entry {
            JsonPrecedenceEntry::String { value } => PrecedenceEntry::Name(value),
            JsonPrecedenceEntry::Symbol { name } => PrecedenceEntry::Symbol(name),
        }
    }
}
