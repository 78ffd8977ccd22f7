//! External-command parser adapter.
//!
//! Runs a parser program once per script fragment. The source text is
//! written to the program's stdin and the program is invoked with
//!
//! ```text
//! <program> [args...] --version <version> [--e4x] --offset <start_offset>
//! ```
//!
//! It must print one JSON document to stdout, either
//! `{"tree": <NodeSpec>, "warnings": [<SyntaxError>...]}` or
//! `{"error": {"offset": .., "message_key": .., "message_args": {..}}}`.

use crate::contract::{ParseError, ScriptParser};
use crate::tree::{NodeSpec, ParseTree};
use jsl_common::{JsVersion, SyntaxError};
use serde::Deserialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Deserialize)]
#[serde(untagged)]
enum ParserResponse {
    Tree {
        tree: NodeSpec,
        #[serde(default)]
        warnings: Vec<SyntaxError>,
    },
    Error {
        error: SyntaxError,
    },
}

#[derive(Clone, Debug)]
pub struct CommandParser {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandParser {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandParser {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Leading arguments passed before the contract arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn backend_error(&self, what: &str, detail: impl std::fmt::Display) -> ParseError {
        ParseError::Backend(format!("{} ({what}): {detail}", self.program.display()))
    }
}

impl ScriptParser for CommandParser {
    fn parse(
        &self,
        text: &str,
        version: &JsVersion,
        start_offset: u32,
    ) -> Result<ParseTree, ParseError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("--version")
            .arg(&version.version);
        if version.e4x {
            command.arg("--e4x");
        }
        command
            .arg("--offset")
            .arg(start_offset.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::trace!(program = %self.program.display(), start_offset, "spawning parser");
        let mut child = command
            .spawn()
            .map_err(|e| self.backend_error("spawn", e))?;

        // Feed stdin from another thread so a chatty parser cannot block on
        // a full stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let source = text.to_string();
            thread::spawn(move || match stdin.write_all(source.as_bytes()) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.backend_error("wait", e))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(result) => result.map_err(|e| self.backend_error("write", e))?,
                Err(_) => return Err(self.backend_error("write", "stdin writer panicked")),
            }
        }

        if output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.backend_error(
                "no output",
                format_args!("{} {}", output.status, stderr.trim()),
            ));
        }

        let response: ParserResponse = serde_json::from_slice(&output.stdout)
            .map_err(|e| self.backend_error("response", e))?;
        match response {
            ParserResponse::Tree { tree, warnings } => {
                Ok(ParseTree::from_spec(&tree)?.with_warnings(warnings))
            }
            ParserResponse::Error { error } => Err(ParseError::Syntax(error)),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn shell(script: &str) -> CommandParser {
        CommandParser::new("sh").with_args(["-c", script, "jsl-parser"])
    }

    #[test]
    fn test_tree_response() {
        let parser = shell(
            r#"cat >/dev/null; echo '{"tree":{"kind":"lc","start":5,"end":9,"kids":[{"kind":"semi","start":5,"end":9}]}}'"#,
        );
        let tree = parser.parse("x = 1", &JsVersion::default(), 5).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(tree.root()).kind, NodeKind::Lc);
        assert!(tree.warnings().is_empty());
    }

    #[test]
    fn test_error_response() {
        let parser = shell(
            r#"cat >/dev/null; echo '{"error":{"offset":3,"message_key":"syntax_error"}}'"#,
        );
        match parser.parse("a b", &JsVersion::default(), 0) {
            Err(ParseError::Syntax(err)) => {
                assert_eq!(err.offset, 3);
                assert_eq!(err.message_key, "syntax_error");
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_contract_arguments() {
        // Echo the arguments back as the atom of a single node.
        let parser = shell(
            r#"cat >/dev/null; printf '{"tree":{"kind":"name","start":0,"end":0,"atom":"%s"}}' "$*""#,
        );
        let tree = parser.parse("x", &JsVersion::new("1.6", true), 7).unwrap();
        assert_eq!(
            tree.node(tree.root()).atom(),
            "--version 1.6 --e4x --offset 7"
        );
    }

    #[test]
    fn test_source_is_written_to_stdin() {
        let parser = shell(
            r#"src=$(cat); printf '{"tree":{"kind":"string","start":0,"end":0,"atom":"%s"}}' "$src""#,
        );
        let tree = parser.parse("hello", &JsVersion::default(), 0).unwrap();
        assert_eq!(tree.node(tree.root()).atom(), "hello");
    }

    #[test]
    fn test_garbage_output_is_backend_error() {
        let parser = shell("cat >/dev/null; echo not json");
        assert!(matches!(
            parser.parse("", &JsVersion::default(), 0),
            Err(ParseError::Backend(_))
        ));
    }

    #[test]
    fn test_missing_program_is_backend_error() {
        let parser = CommandParser::new("/nonexistent/jsl-parser-backend");
        assert!(matches!(
            parser.parse("", &JsVersion::default(), 0),
            Err(ParseError::Backend(_))
        ));
    }
}
