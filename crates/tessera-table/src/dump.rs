//! Human-readable table dump for debugging grammars.

use std::fmt::Write as _;

use tessera_core::{Colors, StateId, Symbol};

use crate::table::{
    Action, ConflictKind, ParseTable, ProductionInfo, Resolution, SymbolKind, TokenPattern,
};

pub struct DumpOptions {
    /// Include the per-state action and goto rows.
    pub states: bool,
    pub colors: Colors,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            states: false,
            colors: Colors::OFF,
        }
    }
}

/// Generate a human-readable dump of the parse table.
pub fn dump(table: &ParseTable, options: &DumpOptions) -> String {
    let mut out = String::new();
    let ctx = DumpContext::new(table, options.colors);

    dump_symbols(&mut out, &ctx);
    dump_tokens(&mut out, &ctx);
    dump_productions(&mut out, &ctx);
    dump_lex_modes(&mut out, &ctx);
    if options.states {
        dump_states(&mut out, &ctx);
    }
    dump_conflicts(&mut out, &ctx);

    out
}

struct DumpContext<'t> {
    table: &'t ParseTable,
    sym_width: usize,
    state_width: usize,
    prod_width: usize,
    colors: Colors,
}

impl<'t> DumpContext<'t> {
    fn new(table: &'t ParseTable, colors: Colors) -> Self {
        Self {
            table,
            sym_width: width_for_count(table.symbol_count()),
            state_width: width_for_count(table.state_count()),
            prod_width: width_for_count(table.production_count()),
            colors,
        }
    }

    /// Symbol as it would appear in a grammar: quoted if anonymous.
    fn symbol(&self, sym: Symbol) -> String {
        let name = self.table.symbol_name(sym);
        if sym.is_end() {
            return "$end".into();
        }
        if self.table.is_named(sym) {
            name.to_string()
        } else {
            format!("{name:?}")
        }
    }

    fn action(&self, action: Action) -> String {
        let sw = self.state_width;
        let pw = self.prod_width;
        match action {
            Action::Error => "error".into(),
            Action::Shift(s) => format!("shift S{s:0sw$}"),
            Action::Reduce(p) => format!("reduce P{p:0pw$}"),
            Action::Accept => "accept".into(),
        }
    }
}

fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10().floor() as usize + 1
    }
}

fn dump_symbols(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let w = ctx.sym_width;
    let data = ctx.table.data();

    writeln!(out, "{}[symbols]{}", c.blue, c.reset).unwrap();
    for (i, info) in data.symbols.iter().enumerate() {
        let kind = match info.kind {
            SymbolKind::End => "end",
            SymbolKind::Token => "token",
            SymbolKind::External => "external",
            SymbolKind::NonTerminal => "rule",
            SymbolKind::Auxiliary => "aux",
            SymbolKind::Alias => "alias",
        };
        let mut flags = String::new();
        if !info.visible {
            flags.push_str(" hidden");
        }
        let symbol = Symbol(i as u16);
        if ctx.table.is_extra(symbol) {
            flags.push_str(" extra");
        }
        if data.word == Some(symbol) {
            flags.push_str(" word");
        }
        if data.keywords.contains(&symbol) {
            flags.push_str(" keyword");
        }
        writeln!(
            out,
            "{i:0w$} {kind:<8} {}{}{}{}{flags}{}",
            c.green,
            ctx.symbol(symbol),
            c.reset,
            c.dim,
            c.reset
        )
        .unwrap();
    }
    out.push('\n');
}

fn dump_tokens(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let w = ctx.sym_width;

    writeln!(out, "{}[tokens]{}", c.blue, c.reset).unwrap();
    for token in &ctx.table.data().tokens {
        let pattern = match &token.pattern {
            TokenPattern::Literal(text) => format!("{text:?}"),
            TokenPattern::Regex { source, .. } => format!("/{source}/"),
        };
        let prio = if token.priority != 0 {
            format!("{}  ; priority {}{}", c.dim, token.priority, c.reset)
        } else {
            String::new()
        };
        writeln!(
            out,
            "{:0w$} {}{pattern}{}{prio}",
            token.symbol.0, c.green, c.reset
        )
        .unwrap();
    }
    out.push('\n');
}

fn production_line(ctx: &DumpContext, prod: &ProductionInfo) -> String {
    let table = ctx.table;
    let mut line = format!("{} ->", ctx.symbol(prod.lhs));
    if prod.rhs.is_empty() {
        line.push_str(" ε");
    }
    for (i, &sym) in prod.rhs.iter().enumerate() {
        line.push(' ');
        if let Some(field) = prod.field_at(i).and_then(|f| table.field_name(f)) {
            write!(line, "{field}:").unwrap();
        }
        line.push_str(&ctx.symbol(sym));
        if let Some(alias) = prod.alias_at(i) {
            write!(line, "@{}", ctx.symbol(alias)).unwrap();
        }
    }
    line
}

fn dump_productions(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let w = ctx.prod_width;

    writeln!(out, "{}[productions]{}", c.blue, c.reset).unwrap();
    for (i, prod) in ctx.table.data().productions.iter().enumerate() {
        let mut meta = Vec::new();
        if prod.precedence != 0 {
            meta.push(format!("prec {}", prod.precedence));
        }
        if let Some(assoc) = prod.assoc {
            meta.push(format!("{assoc:?}").to_lowercase());
        }
        let meta = if meta.is_empty() {
            String::new()
        } else {
            format!("{}  ; {}{}", c.dim, meta.join(", "), c.reset)
        };
        writeln!(out, "P{i:0w$} {}{meta}", production_line(ctx, prod)).unwrap();
    }
    out.push('\n');
}

fn dump_lex_modes(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let data = ctx.table.data();
    let error_mode = ctx.table.error_lex_mode() as usize;
    let mw = width_for_count(data.lex_modes.len());

    writeln!(out, "{}[lex_modes]{}", c.blue, c.reset).unwrap();
    for (i, mode) in data.lex_modes.iter().enumerate() {
        let tokens: Vec<_> = mode
            .tokens
            .iter()
            .chain(&mode.externals)
            .map(|&s| ctx.symbol(s))
            .collect();
        let label = if i == error_mode {
            format!("{}  ; error mode{}", c.dim, c.reset)
        } else {
            String::new()
        };
        let tokens = if tokens.is_empty() {
            "(none)".to_string()
        } else {
            tokens.join(" ")
        };
        writeln!(out, "L{i:0mw$} {tokens}{label}").unwrap();
    }
    out.push('\n');
}

fn dump_states(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let table = ctx.table;
    let sw = ctx.state_width;
    let nonterminals = table.data().nonterminal_count as usize;

    writeln!(out, "{}[states]{}", c.blue, c.reset).unwrap();
    for state in 0..table.state_count() as StateId {
        writeln!(
            out,
            "S{state:0sw$}{}  ; lex L{}{}",
            c.dim,
            table.lex_mode_for_state(state),
            c.reset
        )
        .unwrap();
        for sym in table.valid_terminals(state) {
            writeln!(
                out,
                "  {} {}",
                ctx.symbol(sym),
                ctx.action(table.action(state, sym))
            )
            .unwrap();
        }
        for column in 0..nonterminals {
            let sym = Symbol((table.terminal_count() + column) as u16);
            if let Some(target) = table.goto(state, sym) {
                writeln!(out, "  {} goto S{target:0sw$}", ctx.symbol(sym)).unwrap();
            }
        }
    }
    out.push('\n');
}

fn dump_conflicts(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let sw = ctx.state_width;

    writeln!(out, "{}[conflicts]{}", c.blue, c.reset).unwrap();
    for conflict in ctx.table.conflicts() {
        let kind = match conflict.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        let resolution = match conflict.resolution {
            Resolution::Precedence => "precedence",
            Resolution::Associativity => "associativity",
            Resolution::DefaultShift => "default shift",
            Resolution::DeclarationOrder => "declaration order",
        };
        let declared = if conflict.declared { ", declared" } else { "" };
        writeln!(
            out,
            "S{:0sw$} {} {kind}: {} over {}{}  ; {resolution}{declared}{}",
            conflict.state,
            ctx.symbol(conflict.lookahead),
            ctx.action(conflict.chosen),
            ctx.action(conflict.rejected),
            c.dim,
            c.reset
        )
        .unwrap();
    }
}
