use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::prelude::*;
use crate::utils::errors::Result;

pub const BANNER: &str = "Enter an expression, or press return to end.";
pub const PROMPT: &str = "?  ";

/// # Derivation
/// Everything printed for one successfully parsed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derivation {
    pub expression: String,
    pub derivative: String,
    pub commands: Vec<StackCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_commands: Option<Vec<StackCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// # LineOutcome
/// What happened to one line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank line: the session is over.
    Finished,
    Derived(Derivation),
    /// The line did not parse; `discarded` is the unread rest of it.
    Rejected { message: String, discarded: String },
}

/// # Repl
/// Reads one expression per line, prints the stack code and text of its
/// derivative, and stops at the first blank line.
pub struct Repl {
    config: Config,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        Repl { config }
    }

    /// Differentiates an already parsed expression.
    pub fn derive(&self, tree: ExprTree) -> Derivation {
        let expression = tree.render();
        let original_commands = if self.config.show_original {
            Some(tree.stack_code(self.config.at))
        } else {
            None
        };
        let derivative = tree.into_derivative();
        debug!(
            nodes = derivative.node_count(),
            arena = derivative.arena().len(),
            "derivative built"
        );
        let value = if self.config.evaluate {
            Some(derivative.value(self.config.at))
        } else {
            None
        };
        Derivation {
            expression,
            derivative: derivative.render(),
            commands: derivative.stack_code(self.config.at),
            original_commands,
            value,
        }
    }

    /// Parses and differentiates one line without printing anything.
    pub fn process_line(&self, line: &str) -> Result<LineOutcome> {
        let mut stream = CharStream::new(line);
        stream.skip_blanks();
        if stream.is_at_newline() {
            return Ok(LineOutcome::Finished);
        }
        let parsed = Parser::new(&mut stream).parse_line();
        match parsed {
            Ok(tree) => Ok(LineOutcome::Derived(self.derive(tree))),
            Err(e) if e.is_parse_failure() => {
                let discarded = stream.consume_line();
                debug!(error = %e, %discarded, "rejected input");
                Ok(LineOutcome::Rejected {
                    message: e.to_string(),
                    discarded,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Processes one line and prints its outcome to `out`.
    pub fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> Result<LineOutcome> {
        let outcome = self.process_line(line)?;
        match &outcome {
            LineOutcome::Finished => self.write_done(out)?,
            LineOutcome::Derived(derivation) => self.write_derivation(derivation, out)?,
            LineOutcome::Rejected { message, discarded } => {
                self.write_rejection(message, discarded, out)?
            }
        }
        Ok(outcome)
    }

    /// Interactive loop on the terminal. End of input and Ctrl-C end the
    /// session like a blank line.
    pub fn run(&self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        let mut out = io::stdout();
        info!(at = self.config.at, "starting session");
        loop {
            if !self.config.json {
                write!(out, "\n\n{}\n\n", BANNER)?;
                out.flush()?;
            }
            let prompt = if self.config.json { "" } else { PROMPT };
            match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = editor.add_history_entry(line.as_str()) {
                            debug!(error = %e, "history entry not recorded");
                        }
                    }
                    if self.handle_line(&line, &mut out)? == LineOutcome::Finished {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    self.write_done(&mut out)?;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Handles a single expression given on the command line. Returns `false`
    /// when it was rejected.
    pub fn run_once<W: Write>(&self, expression: &str, out: &mut W) -> Result<bool> {
        let outcome = self.handle_line(expression, out)?;
        Ok(!matches!(outcome, LineOutcome::Rejected { .. }))
    }

    fn write_done<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.config.json {
            writeln!(out, "\n\nDone.")?;
        }
        Ok(())
    }

    fn write_derivation<W: Write>(&self, derivation: &Derivation, out: &mut W) -> Result<()> {
        if self.config.json {
            writeln!(out, "{}", serde_json::to_string(derivation)?)?;
            return Ok(());
        }
        if let Some(commands) = &derivation.original_commands {
            writeln!(out, "\nOrder of postfix evaluation is:\n")?;
            for command in commands {
                writeln!(out, "  {}", command)?;
            }
            writeln!(out, "\nStack code of the derivative:\n")?;
        }
        for command in &derivation.commands {
            writeln!(out, "  {}", command)?;
        }
        writeln!(out, "\nValue is {}", derivation.derivative)?;
        if let Some(value) = derivation.value {
            writeln!(out, "Derivative at x = {} is {}", self.config.at, value)?;
        }
        Ok(())
    }

    fn write_rejection<W: Write>(&self, message: &str, discarded: &str, out: &mut W) -> Result<()> {
        if self.config.json {
            let body = json!({ "error": message, "discarded": discarded });
            writeln!(out, "{}", body)?;
        } else {
            writeln!(out, "\n*** Error in input:    {}", message)?;
            writeln!(out, "*** Discarding input:  {}", discarded)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(repl: &Repl, line: &str) -> (LineOutcome, String) {
        let mut out = Vec::new();
        let outcome = repl.handle_line(line, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_blank_line_finishes() {
        let repl = Repl::new(Config::new());
        let (outcome, text) = output_of(&repl, "   ");
        assert_eq!(outcome, LineOutcome::Finished);
        assert_eq!(text.trim(), "Done.");
    }

    #[test]
    fn test_derivative_listing_and_text() {
        let repl = Repl::new(Config::new().with_at(3.0));
        let (outcome, text) = output_of(&repl, "x * x");
        let expected = "  Value of x is 3\n  Push 1\n  Operator *\n  Value of x is 3\n  Push 1\n  Operator *\n  Operator +\n\nValue is ( ( X * 1 ) + ( X * 1 ) )\n";
        assert_eq!(text, expected);
        match outcome {
            LineOutcome::Derived(d) => {
                assert_eq!(d.expression, "( X * X )");
                assert_eq!(d.value, None);
                assert_eq!(StackMachine::new().execute(&d.commands).unwrap(), 6.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_default_binding_is_zero() {
        let repl = Repl::new(Config::new());
        let (_, text) = output_of(&repl, "x");
        assert_eq!(text, "  Push 1\n\nValue is 1\n");
        let (_, text) = output_of(&repl, "3 * x");
        assert!(text.contains("  Value of x is 0\n"));
    }

    #[test]
    fn test_rejection_discards_rest_of_line() {
        let repl = Repl::new(Config::new());
        let (outcome, text) = output_of(&repl, "3 + * 2");
        assert_eq!(
            outcome,
            LineOutcome::Rejected {
                message: "Misplaced operator.".to_string(),
                discarded: "* 2".to_string(),
            }
        );
        assert!(text.contains("*** Error in input:    Misplaced operator.\n"));
        assert!(text.contains("*** Discarding input:  * 2\n"));
    }

    #[test]
    fn test_missing_parenthesis_rejection() {
        let repl = Repl::new(Config::new());
        let outcome = repl.process_line("(2 + 3").unwrap();
        assert_eq!(
            outcome,
            LineOutcome::Rejected {
                message: "Missing right parenthesis.".to_string(),
                discarded: String::new(),
            }
        );
    }

    #[test]
    fn test_out_of_range_literal_rejection() {
        let repl = Repl::new(Config::new());
        let outcome = repl.process_line("1e400 * x").unwrap();
        assert_eq!(
            outcome,
            LineOutcome::Rejected {
                message: "Number 1e400 is out of range.".to_string(),
                discarded: " * x".to_string(),
            }
        );
    }

    #[test]
    fn test_evaluate_and_show_original() {
        let config = Config::new()
            .with_at(2.0)
            .with_evaluate(true)
            .with_show_original(true);
        let repl = Repl::new(config);
        let (outcome, text) = output_of(&repl, "(1 + x) / x");
        assert!(text.starts_with("\nOrder of postfix evaluation is:\n\n  Push 1\n  Value of x is 2\n"));
        assert!(text.contains("Derivative at x = 2 is -0.25\n"));
        match outcome {
            LineOutcome::Derived(d) => {
                assert_eq!(d.value, Some(-0.25));
                assert_eq!(d.original_commands.map(|c| c.len()), Some(5));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_json_output() {
        let repl = Repl::new(Config::new().with_json(true).with_evaluate(true).with_at(3.0));
        let (_, text) = output_of(&repl, "x * x");
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["derivative"], "( ( X * 1 ) + ( X * 1 ) )");
        assert_eq!(parsed["value"], 6.0);
        assert_eq!(parsed["commands"].as_array().map(|c| c.len()), Some(7));
        assert!(parsed.get("original_commands").is_none());

        let (_, text) = output_of(&repl, "2 )");
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["error"], "Extra data after end of expression.");
        assert_eq!(parsed["discarded"], ")");
    }

    #[test]
    fn test_run_once() {
        let repl = Repl::new(Config::new());
        let mut out = Vec::new();
        assert!(repl.run_once("x - 1", &mut out).unwrap());
        assert!(!repl.run_once("x -", &mut out).unwrap());
    }
}
