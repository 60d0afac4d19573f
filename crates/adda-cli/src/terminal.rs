//! Terminal chat: a line-oriented surface for the same turn pipeline the
//! gateway drives.

use adda_agent::{ChatRunner, DisplaySurface, CURSOR};
use adda_core::PersonaConfig;
use adda_session::Session;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints a streaming reply in place by appending only what is new.
///
/// A terminal cannot redraw the cursor glyph cheaply, so it is dropped. When
/// the shown text stops extending what is already printed (a fallback
/// replacing a partial reply) it starts over on a fresh line.
pub struct TerminalSurface<W: Write> {
    out: W,
    printed: String,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn show(&mut self, text: &str) {
        let text = text.strip_suffix(CURSOR).unwrap_or(text);
        let result = match text.strip_prefix(self.printed.as_str()) {
            Some(suffix) => write!(self.out, "{suffix}"),
            None => write!(self.out, "\n{text}"),
        };
        if result.and_then(|_| self.out.flush()).is_ok() {
            self.printed = text.to_string();
        }
    }
}

/// What the REPL does after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Handles one input line: a command, or a chat turn streamed to `out`.
async fn handle_line<W: Write + Send>(
    runner: &ChatRunner,
    session: &mut Session,
    line: &str,
    out: &mut W,
) -> anyhow::Result<Flow> {
    let persona = session.persona().clone();
    match line.trim() {
        "" => return Ok(Flow::Continue),
        "/quit" | "/exit" => return Ok(Flow::Quit),
        "/clear" => {
            session.reset();
            writeln!(out, "{}\n", persona.presentation.clear_label)?;
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    write!(out, "{}: ", persona.name)?;
    let mut surface = TerminalSurface::new(&mut *out);
    runner.run_turn(session, line, &mut surface).await?;
    writeln!(out, "\n")?;
    Ok(Flow::Continue)
}

/// Runs an interactive session on stdin/stdout until EOF or `/quit`.
pub async fn run_repl(runner: ChatRunner, persona: Arc<PersonaConfig>) -> anyhow::Result<()> {
    let mut session = Session::new(persona);
    let persona = session.persona().clone();

    println!("{}", persona.title());
    if !persona.presentation.caption.is_empty() {
        println!("{}", persona.presentation.caption);
    }
    println!("(/clear starts over, /quit leaves)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", persona.presentation.input_placeholder);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let flow = handle_line(&runner, &mut session, &line, &mut std::io::stdout()).await?;
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
