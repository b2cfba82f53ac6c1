use std::fmt::{self, Display, Write};

use crate::engine::{Node, Step, Task, Variable};
use crate::traverse::Visitor;

/// Separator state of a task whose children are being printed.
struct Frame {
    symbol: Option<&'static str>,
    first: bool,
}

/// Prints a graph in the nested text form:
///
/// * a variable as `name ( value )`,
/// * a task with a symbol as `name ( last SYM ... SYM first )`,
/// * a task without a symbol as `name ( last , ... , first )`.
pub(crate) struct Printer<'a, W: Write> {
    out: &'a mut W,
    frames: Vec<Frame>,
    result: fmt::Result,
}

impl<'a, W: Write> Printer<'a, W> {
    pub(crate) fn new(out: &'a mut W) -> Self {
        Self {
            out,
            frames: Vec::new(),
            result: Ok(()),
        }
    }

    pub(crate) fn finish(self) -> fmt::Result {
        self.result
    }

    fn write(&mut self, args: fmt::Arguments<'_>) {
        if self.result.is_ok() {
            self.result = self.out.write_fmt(args);
        }
    }
}

impl<T: Display, W: Write> Visitor<T> for Printer<'_, W> {
    fn enter(&mut self, step: &Step<T>, parent: Option<&Task<T>>) {
        if let (Some(_), Some(frame)) = (parent, self.frames.last_mut()) {
            let symbol = frame.symbol;
            if !std::mem::replace(&mut frame.first, false) {
                match symbol {
                    Some(symbol) => self.write(format_args!(" {symbol} ")),
                    None => self.write(format_args!(" , ")),
                }
            }
        }

        match step {
            Step::Variable(variable) => {
                let value = variable.node.value.borrow();
                self.write(format_args!("{} ( {} )", variable.get_name(), *value));
            }
            Step::Task(task) => {
                self.write(format_args!("{} ( ", task.get_name()));
                self.frames.push(Frame {
                    symbol: task.operation().symbol(),
                    first: true,
                });
            }
        }
    }

    fn leave(&mut self, step: &Step<T>, _: Option<&Task<T>>) {
        if let Step::Task(_) = step {
            self.frames.pop();
            self.write(format_args!(" )"));
        }
    }
}

/// Renders `graph` in the nested text form.
///
/// # Panics
///
/// If the `Display` impl of a variable's value returns an error, like
/// [`ToString::to_string`].
///
/// ```rust
/// use kumiki::Variable;
///
/// let a = Variable::new(1);
/// let b = Variable::new(2);
/// a.set_name("a");
/// b.set_name("b");
///
/// let sum = &a + &b;
/// sum.set_name("sum");
///
/// assert_eq!(kumiki::render(&sum), "sum ( b ( 2 ) + a ( 1 ) )");
/// ```
pub fn render<N>(graph: &N) -> String
where
    N: Node + ?Sized,
    N::Value: Display,
{
    let mut out = String::new();
    let mut printer = Printer::new(&mut out);
    graph.to_step().traverse(&mut printer);
    printer
        .finish()
        .expect("a Display implementation returned an error unexpectedly");
    out
}

fn print<T: Display>(step: Step<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut printer = Printer::new(f);
    step.traverse(&mut printer);
    printer.finish()
}

impl<T: Display> Display for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print(self.clone(), f)
    }
}

impl<T: Display> Display for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print(self.to_step(), f)
    }
}

impl<T: Display> Display for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print(self.to_step(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, Operation, set_names};

    fn leaves() -> [Variable<f32>; 4] {
        let a = Variable::new(1.0);
        let b = Variable::new(2.0);
        let c = Variable::new(3.0);
        let d = Variable::new(4.0);
        set_names!(a, b, c, d);
        [a, b, c, d]
    }

    #[test]
    fn test_print_with_symbols() {
        let [a, b, c, d] = leaves();

        let add_1 = Task::new(Operation::add(), [&a, &b]).unwrap();
        let add_2 = Task::new(Operation::add(), [&c, &d, &a]).unwrap();
        let mul = Task::new(Operation::mul(), [&add_1, &add_2]).unwrap();
        set_names!(add_1, add_2, mul);

        assert_eq!(
            mul.to_string(),
            "mul ( add_2 ( a ( 1 ) + d ( 4 ) + c ( 3 ) ) * add_1 ( b ( 2 ) + a ( 1 ) ) )"
        );
        assert_eq!(render(&mul), mul.to_string());
    }

    #[test]
    fn test_print_without_symbols() {
        let [a, b, c, d] = leaves();

        let add = Operation::custom(Arity::Exact(2), |args: &[f32]| Ok(args[0] + args[1]));
        let mul = Operation::custom(Arity::Exact(2), |args: &[f32]| Ok(args[0] * args[1]));

        let add_1 = Task::new(add.clone(), [&a, &b]).unwrap();
        let add_2 = Task::new(add, [&c, &d]).unwrap();
        let mul = Task::new(mul, [&add_1, &add_2]).unwrap();
        set_names!(add_1, add_2, mul);

        assert_eq!(
            mul.to_string(),
            "mul ( add_2 ( d ( 4 ) , c ( 3 ) ) , add_1 ( b ( 2 ) , a ( 1 ) ) )"
        );
    }

    #[test]
    fn test_print_variable() {
        let [a, ..] = leaves();
        assert_eq!(a.to_string(), "a ( 1 )");
        assert_eq!(Step::from(&a).to_string(), "a ( 1 )");

        a.set(7.5);
        assert_eq!(a.to_string(), "a ( 7.5 )");
    }

    #[test]
    fn test_names_only_difference() {
        let build = |names: [&str; 3]| {
            let x = Variable::new(1_i32);
            let y = Variable::new(2_i32);
            let sum = &x - &y;
            x.set_name(names[0]);
            y.set_name(names[1]);
            sum.set_name(names[2]);
            render(&sum)
        };

        assert_eq!(build(["x", "y", "s"]), "s ( y ( 2 ) - x ( 1 ) )");
        assert_eq!(build(["p", "q", "r"]), "r ( q ( 2 ) - p ( 1 ) )");
    }

    #[derive(Clone)]
    struct Unprintable;

    impl Display for Unprintable {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    #[should_panic(expected = "a Display implementation returned an error unexpectedly")]
    fn test_render_surfaces_display_errors() {
        let value = Variable::new(Unprintable);
        render(&value);
    }

    #[test]
    fn test_print_default_names() {
        let sum = Variable::new(1_u8) + 2_u8;
        assert_eq!(sum.to_string(), "Task ( Variable ( 2 ) + Variable ( 1 ) )");
    }
}
