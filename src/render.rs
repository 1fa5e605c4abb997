//! Turns any node of the tree back into template source.
//!
//! For every input accepted by [`crate::parse`], rendering the resulting
//! tree reproduces the input, except that string, rune and numeric literals
//! are written in their canonical spelling.

use crate::{
    ast::{Action, Branch, Grouping, Pipeline, Pipelines, Tree, Variable, Variables},
    escape::{quote_rune, quote_string},
};

/// A node that can be written back out as template source.
pub trait Render {
    /// Appends the source text of this node to `out`.
    fn render_into(&self, out: &mut String);

    /// Returns the source text of this node.
    fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// Returns the source text represented by `node`.
pub fn render<N: Render + ?Sized>(node: &N) -> String {
    node.render()
}

impl Render for Tree {
    fn render_into(&self, out: &mut String) {
        for branch in self {
            branch.render_into(out);
        }
    }
}

impl Render for Branch {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Action(action) => action.render_into(out),
        }
    }
}

impl Render for Action {
    fn render_into(&self, out: &mut String) {
        out.push_str(&self.open);
        self.pipelines.render_into(out);
        out.push_str(&self.close);
    }
}

impl Render for Pipelines {
    fn render_into(&self, out: &mut String) {
        for pipeline in self {
            pipeline.render_into(out);
        }
    }
}

impl Render for Pipeline {
    fn render_into(&self, out: &mut String) {
        self.root.render_into(out);
        if let Some(pipe) = &self.pipe {
            out.push('|');
            pipe.render_into(out);
        }
    }
}

impl Render for Variables {
    fn render_into(&self, out: &mut String) {
        for variable in self {
            variable.render_into(out);
        }
    }
}

impl Render for Grouping {
    fn render_into(&self, out: &mut String) {
        out.push_str(&self.open);
        self.group.render_into(out);
        out.push_str(&self.close);
    }
}

impl Render for Variable {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Assign(text)
            | Self::Range(text)
            | Self::Ident(text)
            | Self::Keyword(text)
            | Self::Space(text)
            | Self::Comment(text) => out.push_str(text),
            Self::Literal(text) => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
            Self::String(value) => out.push_str(&quote_string(value)),
            Self::Rune(value) => out.push_str(&quote_rune(*value)),
            Self::Float(value) => out.push_str(&format_float(*value)),
            Self::Int(value) => out.push_str(&value.to_string()),
            Self::Grouping(grouping) => grouping.render_into(out),
        }
    }
}

/// Shortest representation that parses back to the same value, always with
/// a decimal point so the literal stays a float.
fn format_float(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}
