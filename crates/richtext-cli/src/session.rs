//! Line-oriented editing sessions.
//!
//! Each input line is either text to type or a `:command`. Change
//! notifications are written to the output as `change #<rev>: <markup>`.

use std::io::{BufRead, Lines, Write};

use miette::{Diagnostic, IntoDiagnostic, Result, SourceSpan};
use richtext_core::{
    ChangeNotification, EditEvent, FormatCommand, Position, PositionParseError, RichTextEditor,
    Selection, Toolbar,
};
use thiserror::Error;

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Input(EditEvent),
    Format(FormatCommand),
    Select(Selection),
    State,
    Value,
    Load(String),
    Help,
    Quit,
}

#[derive(Error, Debug, Diagnostic)]
pub enum SessionError {
    #[error("unknown command `:{name}`")]
    #[diagnostic(code(richtext::session::unknown_command), help("run :help to list commands"))]
    UnknownCommand { name: String },

    #[error("`:{command}` expects {expected}")]
    #[diagnostic(code(richtext::session::missing_argument))]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid position")]
    #[diagnostic(code(richtext::session::position), help("positions are BLOCK:OFFSET, e.g. 0:3"))]
    BadPosition {
        #[source_code]
        src: String,
        #[label("expected BLOCK:OFFSET")]
        span: SourceSpan,
        #[source]
        source: PositionParseError,
    },
}

pub const HELP: &str = "\
text                type text at the selection (`::text` types a leading colon)
:<format>           bold italic underlined heading-1..3 unordered-list ordered-list
                    blockquote code-block link (prompts for the URL)
:select B:O B:O     set the selection (anchor, focus)
:caret B:O          collapse the selection at a position
:enter              insert a paragraph break
:backspace :delete  delete backward / forward
:backspace-word     delete the previous word
:delete-word        delete the next word
:paste TEXT         paste, `\\n` splits blocks
:state              show the active formats
:value              print the current markup
:load MARKUP        replace the value as the owner would
:help :quit";

/// Tokens of `segment` with their byte offsets in `line`. `segment` must be
/// a subslice of `line`.
fn tokens<'a>(line: &str, segment: &'a str) -> impl Iterator<Item = (usize, &'a str)> {
    let base = line.as_ptr() as usize;
    segment
        .split_whitespace()
        .map(move |token| (token.as_ptr() as usize - base, token))
}

fn position(line: &str, (offset, token): (usize, &str)) -> Result<Position, SessionError> {
    token.parse().map_err(|source| SessionError::BadPosition {
        src: line.to_string(),
        span: (offset, token.len()).into(),
        source,
    })
}

/// Parse one session line.
pub fn parse_line(line: &str) -> Result<SessionCommand, SessionError> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(SessionCommand::Input(EditEvent::InsertText(line.to_string())));
    };
    if rest.starts_with(':') {
        return Ok(SessionCommand::Input(EditEvent::InsertText(rest.to_string())));
    }

    let rest = rest.trim();
    let (name, argument) = rest
        .split_once(char::is_whitespace)
        .map(|(name, argument)| (name, argument.trim()))
        .unwrap_or((rest, &rest[rest.len()..]));
    let mut args = tokens(line, argument);

    let command = match name {
        "select" => match (args.next(), args.next()) {
            (Some(anchor), Some(focus)) => SessionCommand::Select(Selection::new(
                position(line, anchor)?,
                position(line, focus)?,
            )),
            _ => {
                return Err(SessionError::MissingArgument {
                    command: "select",
                    expected: "two positions",
                });
            }
        },
        "caret" => match args.next() {
            Some(at) => SessionCommand::Select(Selection::collapsed(position(line, at)?)),
            None => {
                return Err(SessionError::MissingArgument {
                    command: "caret",
                    expected: "a position",
                });
            }
        },
        "enter" => SessionCommand::Input(EditEvent::InsertParagraph),
        "backspace" => SessionCommand::Input(EditEvent::DeleteContentBackward),
        "delete" => SessionCommand::Input(EditEvent::DeleteContentForward),
        "backspace-word" => SessionCommand::Input(EditEvent::DeleteWordBackward),
        "delete-word" => SessionCommand::Input(EditEvent::DeleteWordForward),
        "paste" => SessionCommand::Input(EditEvent::InsertFromPaste(argument.replace("\\n", "\n"))),
        "state" => SessionCommand::State,
        "value" => SessionCommand::Value,
        "load" => SessionCommand::Load(argument.to_string()),
        "help" => SessionCommand::Help,
        "quit" | "q" => SessionCommand::Quit,
        other => match other.parse::<FormatCommand>() {
            Ok(command) => SessionCommand::Format(command),
            Err(_) => {
                return Err(SessionError::UnknownCommand {
                    name: other.to_string(),
                });
            }
        },
    };
    Ok(command)
}

/// Active formats as a single line, e.g. `active: bold, heading-2`.
pub fn describe_state(editor: &RichTextEditor<Vec<ChangeNotification>>) -> String {
    let active: Vec<_> = editor
        .toolbar()
        .items()
        .filter(|item| item.active)
        .map(|item| item.command.name())
        .collect();
    if active.is_empty() {
        "active: none".to_string()
    } else {
        format!("active: {}", active.join(", "))
    }
}

pub struct Session<R, W> {
    editor: RichTextEditor<Vec<ChangeNotification>>,
    lines: Lines<R>,
    out: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(editor: RichTextEditor<Vec<ChangeNotification>>, input: R, out: W) -> Self {
        Self {
            editor,
            lines: input.lines(),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until end of input or `:quit`.
    pub fn run(&mut self) -> Result<()> {
        if let Some(placeholder) = self.editor.placeholder() {
            writeln!(self.out, "{placeholder}").into_diagnostic()?;
        }
        self.editor.focus();

        while let Some(line) = self.lines.next() {
            let line = line.into_diagnostic()?;
            match parse_line(&line) {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(err) => {
                    tracing::debug!(%line, "skipping bad session line");
                    eprintln!("{:?}", miette::Report::new(err));
                }
            }
            self.flush_changes()?;
        }

        self.editor.blur();
        self.out.flush().into_diagnostic()
    }

    fn execute(&mut self, command: SessionCommand) -> Result<()> {
        let Self { editor, lines, out } = self;
        match command {
            SessionCommand::Input(event) => {
                editor.handle_input(event);
            }
            SessionCommand::Format(command) => {
                let mut prompt = |message: &str| {
                    writeln!(out, "{message}").ok()?;
                    out.flush().ok()?;
                    lines.next()?.ok()
                };
                Toolbar::activate(command, editor, &mut prompt);
            }
            SessionCommand::Select(selection) => editor.set_selection(selection),
            SessionCommand::State => writeln!(out, "{}", describe_state(editor)).into_diagnostic()?,
            SessionCommand::Value => writeln!(out, "{}", editor.value()).into_diagnostic()?,
            SessionCommand::Load(markup) => {
                if !editor.external_value_changed(&markup) {
                    tracing::debug!("load matched the current value");
                }
            }
            SessionCommand::Help => writeln!(out, "{HELP}").into_diagnostic()?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn flush_changes(&mut self) -> Result<()> {
        for change in self.editor.sink_mut().drain(..) {
            writeln!(self.out, "change #{}: {}", change.revision, change.markup).into_diagnostic()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_core::EditorConfig;

    fn run_script(value: Option<&str>, script: &str) -> String {
        let editor = RichTextEditor::new(value, Vec::new(), EditorConfig::default());
        let mut session = Session::new(editor, script.as_bytes(), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_parse_text_and_escapes() {
        assert_eq!(
            parse_line("hello").unwrap(),
            SessionCommand::Input(EditEvent::InsertText("hello".into()))
        );
        assert_eq!(
            parse_line("::colon").unwrap(),
            SessionCommand::Input(EditEvent::InsertText(":colon".into()))
        );
        assert_eq!(
            parse_line(":h2").unwrap(),
            SessionCommand::Format(FormatCommand::Heading2)
        );
        assert_eq!(
            parse_line(":paste a\\nb").unwrap(),
            SessionCommand::Input(EditEvent::InsertFromPaste("a\nb".into()))
        );
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_line(":select 0:1  1:2").unwrap(),
            SessionCommand::Select(Selection::new(Position::new(0, 1), Position::new(1, 2)))
        );
        assert_eq!(
            parse_line(":caret 2:0").unwrap(),
            SessionCommand::Select(Selection::caret(2, 0))
        );
    }

    #[test]
    fn test_parse_command_after_spaced_colon() {
        assert_eq!(
            parse_line(": select 0:1 1:2").unwrap(),
            SessionCommand::Select(Selection::new(Position::new(0, 1), Position::new(1, 2)))
        );
        match parse_line(": caret  0:x") {
            Err(SessionError::BadPosition { span, .. }) => {
                assert_eq!(span, SourceSpan::from((9, 3)));
            }
            other => panic!("expected bad position, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_line(":strike"),
            Err(SessionError::UnknownCommand { name }) if name == "strike"
        ));
        assert!(matches!(
            parse_line(":select 0:1"),
            Err(SessionError::MissingArgument { command: "select", .. })
        ));
        match parse_line(":caret 0:x") {
            Err(SessionError::BadPosition { span, .. }) => {
                assert_eq!(span, SourceSpan::from((7, 3)));
            }
            other => panic!("expected bad position, got {other:?}"),
        }
    }

    #[test]
    fn test_session_emits_changes() {
        let out = run_script(None, ":bold\nhi\n:state\n:value\n");
        insta::assert_snapshot!(out, @r"
        Write your idea description with rich formatting...
        change #1: <p><strong>hi</strong></p>
        active: bold
        <p><strong>hi</strong></p>
        ");
    }

    #[test]
    fn test_session_link_prompt() {
        let out = run_script(
            Some("<p>see docs</p>"),
            ":select 0:4 0:8\n:link\nhttps://docs.rs\n:link\n\n:quit\nignored\n",
        );
        insta::assert_snapshot!(out, @r#"
        Enter URL:
        change #1: <p>see <a href="https://docs.rs">docs</a></p>
        Enter URL:
        "#);
    }

    #[test]
    fn test_session_skips_bad_lines_and_load_is_silent() {
        let out = run_script(
            Some("<p>a</p>"),
            ":nope\n:select 0\n:load <h1>b</h1>\n:value\n",
        );
        assert_eq!(out, "<h1>b</h1>\n");
    }
}
