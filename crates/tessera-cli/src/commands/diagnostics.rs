//! Syntax diagnostics for ERROR and MISSING nodes, rendered with annotate-snippets.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use tessera_runtime::{Node, Tree};

/// Longest excerpt of unexpected text quoted in a message.
const EXCERPT_CHARS: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub range: Range<usize>,
    pub message: String,
}

/// One diagnostic per outermost ERROR or MISSING node, in source order.
pub fn collect(tree: &Tree) -> Vec<SyntaxDiagnostic> {
    let mut out = Vec::new();
    visit(tree.root_node(), &mut out);
    out
}

fn visit(node: Node<'_>, out: &mut Vec<SyntaxDiagnostic>) {
    if node.is_missing() {
        out.push(SyntaxDiagnostic {
            range: node.byte_range(),
            message: format!("missing {}", describe(node)),
        });
        return;
    }

    if node.is_error() {
        let message = if node.byte_range().is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected {}", excerpt(node.text()))
        };
        out.push(SyntaxDiagnostic {
            range: node.byte_range(),
            message,
        });
        return;
    }

    if !node.has_error() {
        return;
    }
    for child in node.children() {
        visit(child, out);
    }
}

fn describe(node: Node<'_>) -> String {
    if node.is_named() {
        node.kind().to_string()
    } else {
        format!("{:?}", node.kind())
    }
}

fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    let mut short: String = line.chars().take(EXCERPT_CHARS).collect();
    if short.len() < text.len() {
        short.push_str("...");
    }
    format!("{:?}", short)
}

/// Render diagnostics against their source, one report per diagnostic.
pub fn render(
    diagnostics: &[SyntaxDiagnostic],
    source: &str,
    path: Option<&str>,
    colored: bool,
) -> String {
    let mut out = String::new();
    let renderer = if colored {
        Renderer::styled()
    } else {
        Renderer::plain()
    };

    for (i, diag) in diagnostics.iter().enumerate() {
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(adjust_range(&diag.range, source.len()))
                .label(&diag.message),
        );
        if let Some(p) = path {
            snippet = snippet.path(p);
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(&diag.message).element(snippet)];

        if i > 0 {
            out.push('\n');
        }
        write!(out, "{}", renderer.render(&report)).expect("String write never fails");
    }

    out
}

/// Widen empty ranges to one byte so MISSING markers point at something.
fn adjust_range(range: &Range<usize>, limit: usize) -> Range<usize> {
    if range.is_empty() {
        return range.start..(range.start + 1).min(limit);
    }
    range.clone()
}
