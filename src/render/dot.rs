use std::collections::HashSet;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::engine::{Node, Step, Task, Variable};
use crate::error::GraphError;
use crate::traverse::Visitor;

/// Styling applied to every task vertex of an exported graph.
///
/// Can be loaded from JSON, missing fields fall back to the defaults:
///
/// ```rust
/// use kumiki::DotStyle;
///
/// let style = DotStyle::from_json(r#"{ "color": "lightblue" }"#).unwrap();
/// assert_eq!(style.shape, "box");
/// assert_eq!(style.color, "lightblue");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStyle {
    pub shape: String,
    pub style: String,
    pub color: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            shape: "box".into(),
            style: "filled".into(),
            color: ".7 .3 1.0".into(),
        }
    }
}

impl DotStyle {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Exports computation graphs as Graphviz `digraph` descriptions.
///
/// Every parent-child edge gets one line, written right before the walk
/// descends into the child, children in reversed construction order.
///
/// Every task gets a styling line the first time the walk reaches it, before
/// any of its children. A shared task is walked once per incoming edge but
/// still gets exactly one styling line. Variables only show up as edge
/// endpoints.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    style: DotStyle,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: DotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &DotStyle {
        &self.style
    }

    /// Renders the description of `graph` into a string.
    pub fn to_dot<N: Node + ?Sized>(&self, graph: &N, name: &str) -> String {
        let mut out = String::new();
        self.write_dot(&mut out, &graph.to_step(), name)
            .expect("writing to a String cannot fail");
        out
    }

    /// Writes the description of `graph` to `stream`.
    pub fn export<N, W>(&self, graph: &N, stream: &mut W, name: &str) -> Result<(), GraphError>
    where
        N: Node + ?Sized,
        W: std::io::Write,
    {
        let dot = self.to_dot(graph, name);
        stream.write_all(dot.as_bytes())?;
        stream.flush()?;

        tracing::debug!(graph = name, bytes = dot.len(), "exported graph description");
        Ok(())
    }

    fn write_dot<T, W: Write>(&self, out: &mut W, root: &Step<T>, name: &str) -> fmt::Result {
        writeln!(out, "digraph {name} {{")?;

        let mut visitor = DotVisitor {
            out: &mut *out,
            style: &self.style,
            styled: HashSet::new(),
            result: Ok(()),
        };
        root.traverse(&mut visitor);
        visitor.result?;

        writeln!(out, "}}")
    }
}

struct DotVisitor<'a, W: Write> {
    out: &'a mut W,
    style: &'a DotStyle,
    styled: HashSet<*const ()>,
    result: fmt::Result,
}

impl<T, W: Write> Visitor<T> for DotVisitor<'_, W> {
    fn enter(&mut self, step: &Step<T>, parent: Option<&Task<T>>) {
        if self.result.is_ok() {
            self.result = self.lines(step, parent);
        }
    }
}

impl<W: Write> DotVisitor<'_, W> {
    fn lines<T>(&mut self, step: &Step<T>, parent: Option<&Task<T>>) -> fmt::Result {
        if let Some(parent) = parent {
            writeln!(self.out, "  {} -> {}", parent.get_name(), step.get_name())?;
        }

        if let Step::Task(task) = step {
            if self.styled.insert(task.addr()) {
                let DotStyle {
                    shape,
                    style,
                    color,
                } = self.style;
                writeln!(
                    self.out,
                    "  {}[shape={shape}, style={style},color=\"{color}\"]",
                    task.get_name()
                )?;
            }
        }

        Ok(())
    }
}

/// Writes the Graphviz description of `graph` to `stream` using the default
/// [`DotStyle`].
pub fn export_graph<N, W>(graph: &N, stream: &mut W, name: &str) -> Result<(), GraphError>
where
    N: Node + ?Sized,
    W: std::io::Write,
{
    Exporter::new().export(graph, stream, name)
}

impl<T> Step<T> {
    pub fn export_graph<W: std::io::Write>(&self, stream: &mut W, name: &str) -> Result<(), GraphError> {
        export_graph(self, stream, name)
    }

    pub fn to_dot(&self, name: &str) -> String {
        Exporter::new().to_dot(self, name)
    }
}

impl<T> Task<T> {
    pub fn export_graph<W: std::io::Write>(&self, stream: &mut W, name: &str) -> Result<(), GraphError> {
        export_graph(self, stream, name)
    }

    pub fn to_dot(&self, name: &str) -> String {
        Exporter::new().to_dot(self, name)
    }
}

impl<T> Variable<T> {
    pub fn to_dot(&self, name: &str) -> String {
        Exporter::new().to_dot(self, name)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{Operation, set_names};

    fn pipeline() -> Task<f32> {
        let a = Variable::new(1.0);
        let b = Variable::new(2.0);
        let c = Variable::new(3.0);
        let d = Variable::new(4.0);
        set_names!(a, b, c, d);

        let add_1 = Task::new(Operation::add(), [&a, &b]).unwrap();
        let add_2 = Task::new(Operation::add(), [&c, &d, &a]).unwrap();
        let mul_1 = Task::new(Operation::mul(), [&add_1, &add_2]).unwrap();
        set_names!(add_1, add_2, mul_1);

        mul_1
    }

    const PIPELINE: &str = "digraph pipeline {
  mul_1[shape=box, style=filled,color=\".7 .3 1.0\"]
  mul_1 -> add_2
  add_2[shape=box, style=filled,color=\".7 .3 1.0\"]
  add_2 -> a
  add_2 -> d
  add_2 -> c
  mul_1 -> add_1
  add_1[shape=box, style=filled,color=\".7 .3 1.0\"]
  add_1 -> b
  add_1 -> a
}
";

    #[test]
    fn test_export_pipeline() {
        let mul_1 = pipeline();

        let mut out = Vec::new();
        mul_1.export_graph(&mut out, "pipeline").unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), PIPELINE);
        assert_eq!(mul_1.to_dot("pipeline"), PIPELINE);
    }

    #[test]
    fn test_export_variable_only() {
        let a = Variable::new(1.0_f64);
        a.set_name("a");
        assert_eq!(a.to_dot("g"), "digraph g {\n}\n");
    }

    #[test]
    fn test_custom_style() {
        let a = Variable::new(1_i32);
        let sum = &a + 1;
        a.set_name("a");
        sum.set_name("sum");

        let style = DotStyle {
            shape: "ellipse".into(),
            ..DotStyle::default()
        };
        let dot = Exporter::new().with_style(style).to_dot(&sum, "g");

        assert_eq!(
            dot,
            "digraph g {\n  sum[shape=ellipse, style=filled,color=\".7 .3 1.0\"]\n  sum -> Variable\n  sum -> a\n}\n"
        );
    }

    #[test]
    fn test_shared_task_styled_once() {
        let a = Variable::new(1_i32);
        let shared = &a + &a;
        let root = &shared * &shared;
        a.set_name("a");
        shared.set_name("shared");
        root.set_name("root");

        let dot = root.to_dot("g");
        assert_eq!(dot.matches("shared[shape=box").count(), 1);
        assert_eq!(dot.matches("root -> shared").count(), 2);
        assert_eq!(dot.matches("shared -> a").count(), 4);
    }

    #[test]
    fn test_style_round_trip() {
        let style = DotStyle::default();
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(DotStyle::from_json(&json).unwrap(), style);
        assert!(matches!(
            DotStyle::from_json("{ \"shape\": 1 }"),
            Err(GraphError::Config(_))
        ));
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stream_failure() {
        let mul_1 = pipeline();
        let err = mul_1.export_graph(&mut Broken, "pipeline").unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
