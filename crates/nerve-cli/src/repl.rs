//! Line-oriented session explorer.
//!
//! Commands are whitespace-split. A failing command prints `error: ...`
//! and the loop carries on; only `quit`, `exit` or end of input stop it.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use nerve_core::format_variations;
use rand::Rng;

use crate::format::{item_lines, related_lines, session_header, summary_lines};
use crate::workspace::Workspace;

const DEFAULT_TOP: usize = 5;

const HELP: &str = "\
commands:
  new <prompt...>       analyze a prompt into a new session
  load <id>             switch to a stored session
  list                  list stored sessions
  top [n]               first n unexplored items (default 5)
  explore <index>       mark an item explored
  expand <variable>     mark a variable explored and show related items
  variations [n]        render n variations of the current session
  conjecture            link two taxa of the current session
  settings              show settings
  set <key> <value>     change a setting
  toggle <key>          flip a boolean setting
  help                  this text
  quit | exit           leave";

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'a, R: Rng> {
    workspace: &'a Workspace,
    rng: R,
    current: Option<String>,
}

impl<'a, R: Rng> Repl<'a, R> {
    pub fn new(workspace: &'a Workspace, rng: R) -> Self {
        Self {
            workspace,
            rng,
            current: None,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "nerve: {} dictionaries loaded. Type 'help' for commands.",
            self.workspace.dictionaries().len()
        )?;
        for line in input.lines() {
            let line = line?;
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some((&command, args)) = words.split_first() else {
                continue;
            };
            match self.dispatch(command, args) {
                Ok((Flow::Quit, _)) => break,
                Ok((Flow::Continue, text)) => {
                    if !text.is_empty() {
                        writeln!(out, "{text}")?;
                    }
                }
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    fn session_id(&self) -> Result<&str> {
        match self.current.as_deref() {
            Some(id) => Ok(id),
            None => bail!("no session loaded; use 'new' or 'load'"),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<(Flow, String)> {
        let ws = self.workspace;
        let text = match command {
            "quit" | "exit" => return Ok((Flow::Quit, String::new())),
            "help" => HELP.to_string(),
            "new" => {
                if args.is_empty() {
                    bail!("usage: new <prompt...>");
                }
                let session = ws.new_session(&args.join(" "), None)?;
                let top = ws.top(&session.id, DEFAULT_TOP)?;
                let text = format!("{}\n{}", session_header(&session), item_lines(&top));
                self.current = Some(session.id);
                text
            }
            "load" => {
                let [id] = args else {
                    bail!("usage: load <id>");
                };
                let session = ws.load_session(id)?;
                let text = session_header(&session);
                self.current = Some(session.id);
                text
            }
            "list" => summary_lines(&ws.list_sessions()?),
            "top" => {
                let n = match args.first() {
                    Some(n) => n.parse()?,
                    None => DEFAULT_TOP,
                };
                item_lines(&ws.top(self.session_id()?, n)?)
            }
            "explore" => {
                let [index] = args else {
                    bail!("usage: explore <index>");
                };
                let index: usize = index.parse()?;
                let item = ws.explore(self.session_id()?, index)?;
                format!("explored [{index}] {}", item.taxon.variable)
            }
            "expand" => {
                let [variable] = args else {
                    bail!("usage: expand <variable>");
                };
                related_lines(&ws.expand(self.session_id()?, variable)?)
            }
            "variations" => {
                let steps = match args.first() {
                    Some(n) => Some(n.parse()?),
                    None => None,
                };
                let session = ws.load_session(self.session_id()?)?;
                let variations = ws.variations(&session.result, steps, &mut self.rng)?;
                format_variations(&session.result, &variations)
            }
            "conjecture" => ws.conjecture_for_session(self.session_id()?)?,
            "settings" => ws.settings()?.describe(),
            "set" => {
                let Some((key, value)) = args.split_first().filter(|(_, v)| !v.is_empty()) else {
                    bail!("usage: set <key> <value>");
                };
                ws.set_setting(key, &value.join(" "))?;
                format!("{key} updated")
            }
            "toggle" => {
                let [key] = args else {
                    bail!("usage: toggle <key>");
                };
                format!("{key} = {}", ws.toggle_setting(key)?)
            }
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok((Flow::Continue, text))
    }
}
