//! Grammar type definitions.

use serde::{Deserialize, Serialize};

/// Complete tree-sitter grammar.
///
/// Rule order is significant: the first rule is the start rule, and token and
/// production numbering follow definition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    /// Rules in definition order.
    pub rules: Vec<(String, Rule)>,
    /// Tokens allowed anywhere between other tokens (whitespace, comments).
    #[serde(default)]
    pub extras: Vec<Rule>,
    /// Named precedence orderings.
    #[serde(default)]
    pub precedences: Vec<Vec<PrecedenceEntry>>,
    /// Conflicts the grammar author expects a GLR parser to split on.
    #[serde(default)]
    pub conflicts: Vec<Vec<String>>,
    /// Tokens produced by the external scanner.
    #[serde(default)]
    pub externals: Vec<Rule>,
    /// Rules substituted at their use sites.
    #[serde(default)]
    pub inline: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Keyword extraction rule.
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub reserved: Vec<(String, Vec<Rule>)>,
    #[serde(default)]
    pub inherits: Option<String>,
}

impl Grammar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            extras: Vec::new(),
            precedences: Vec::new(),
            conflicts: Vec::new(),
            externals: Vec::new(),
            inline: Vec::new(),
            supertypes: Vec::new(),
            word: None,
            reserved: Vec::new(),
            inherits: None,
        }
    }

    /// Append a rule.
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((name.into(), rule));
        self
    }

    /// Append an extra.
    pub fn extra(mut self, rule: Rule) -> Self {
        self.extras.push(rule);
        self
    }

    /// Append an external token.
    pub fn external(mut self, rule: Rule) -> Self {
        self.externals.push(rule);
        self
    }

    /// Mark a rule for inlining.
    pub fn inline_rule(mut self, name: impl Into<String>) -> Self {
        self.inline.push(name.into());
        self
    }

    /// Declare an expected conflict between rules.
    pub fn conflict<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.conflicts.push(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Set the keyword extraction token.
    pub fn word(mut self, name: impl Into<String>) -> Self {
        self.word = Some(name.into());
        self
    }

    /// Look up a rule body by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// The start rule, if any rules are defined.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.first().map(|(n, _)| n.as_str())
    }
}

/// Grammar rule variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Epsilon (empty match).
    Blank,
    /// Literal token.
    String(String),
    /// Regex token.
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    /// Reference to another rule.
    Symbol(String),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    /// Zero or more repetitions.
    Repeat(Box<Rule>),
    /// One or more repetitions.
    Repeat1(Box<Rule>),
    /// Named field on every child produced by `content`.
    Field { name: String, content: Box<Rule> },
    /// Rename the node produced by `content`.
    Alias {
        content: Box<Rule>,
        value: String,
        named: bool,
    },
    /// Force `content` into a single token.
    Token(Box<Rule>),
    ImmediateToken(Box<Rule>),
    Prec {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecLeft {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecRight {
        value: Precedence,
        content: Box<Rule>,
    },
    /// Runtime precedence for GLR splits.
    PrecDynamic { value: i32, content: Box<Rule> },
    Reserved {
        context_name: String,
        content: Box<Rule>,
    },
}

/// Precedence value (numeric or named).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precedence {
    Integer(i32),
    Name(String),
}

/// Entry in a named precedence ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecedenceEntry {
    Name(String),
    Symbol(String),
}
