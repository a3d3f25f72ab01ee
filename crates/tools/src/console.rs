//! Line-oriented developer console run before the game window opens.
//!
//! Commands: `help`, `run` and `quit` (leave the console and start the
//! game), `exit` (leave the process), `echo <text>`. Anything else goes to
//! the attached [`ScriptHost`], if there is one.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::script::ScriptHost;

const PROMPT: &str = "command > ";
const COMMANDS: [&str; 5] = ["help", "run", "exit", "echo", "quit"];

/// How the console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// `run`: start the game.
    Run,
    /// `quit`: close the console, then start the game.
    Quit,
    /// `exit`: the caller should end the process.
    Exit,
    /// Input closed without a command.
    EndOfInput,
}

impl ConsoleOutcome {
    pub fn continue_to_game(self) -> bool {
        !matches!(self, Self::Exit)
    }
}

#[derive(Debug)]
pub struct Console {
    history: VecDeque<String>,
    history_limit: usize,
    history_path: Option<PathBuf>,
    script: Option<ScriptHost>,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            history: VecDeque::new(),
            history_limit: 4,
            history_path: None,
            script: None,
        }
    }
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist history to `path`, loading whatever is already there.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                for line in text.lines().filter(|l| !l.is_empty()) {
                    self.remember(line.to_string());
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "could not load console history: {e}"),
        }
        self.history_path = Some(path);
        self
    }

    pub fn with_script_host(mut self, host: ScriptHost) -> Self {
        self.script = Some(host);
        self
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Built-in commands starting with the first character of `buffer`.
    pub fn complete(buffer: &str) -> Vec<&'static str> {
        let Some(first) = buffer.chars().next() else {
            return Vec::new();
        };
        COMMANDS
            .iter()
            .copied()
            .filter(|c| c.starts_with(first))
            .collect()
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<ConsoleOutcome> {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                return Ok(ConsoleOutcome::EndOfInput);
            };
            let line = line?;
            let line = line.trim();

            match line {
                "" => continue,
                "help" => {
                    writeln!(out, "Valid commands:")?;
                    writeln!(out, "quit, run, exit, echo, help")?;
                }
                "quit" => {
                    writeln!(out, "Closing console")?;
                    return Ok(ConsoleOutcome::Quit);
                }
                "run" => {
                    writeln!(out, "Starting game")?;
                    return Ok(ConsoleOutcome::Run);
                }
                "exit" => {
                    writeln!(out, "Exiting game")?;
                    return Ok(ConsoleOutcome::Exit);
                }
                _ if line == "echo" || line.starts_with("echo ") => {
                    writeln!(out, "{}", line["echo".len()..].trim_start())?;
                }
                _ => self.evaluate(line, &mut out)?,
            }

            self.remember(line.to_string());
            self.save_history();
        }
    }

    fn evaluate<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        let Some(host) = self.script.as_mut() else {
            return writeln!(out, "Unknown command: {line}");
        };
        match host.eval(line) {
            Ok(value) => {
                for printed in host.take_output() {
                    writeln!(out, "{printed}")?;
                }
                let shown = value.to_string();
                if !shown.is_empty() {
                    writeln!(out, "=> {shown}")?;
                }
            }
            Err(e) => {
                host.take_output();
                writeln!(out, "error: {e}")?;
            }
        }
        Ok(())
    }

    fn remember(&mut self, line: String) {
        self.history.push_back(line);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }

    fn save_history(&self) {
        let Some(path) = &self.history_path else {
            return;
        };
        let mut text = self.history.iter().cloned().collect::<Vec<_>>().join("\n");
        text.push('\n');
        if let Err(e) = std::fs::write(path, text) {
            tracing::warn!(path = %path.display(), "could not save console history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Value;

    fn run(console: &mut Console, script: &str) -> (ConsoleOutcome, String) {
        let mut out = Vec::new();
        let outcome = console.run(script.as_bytes(), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn run_starts_game() {
        let (outcome, out) = run(&mut Console::new(), "help\nrun\nnever\n");
        assert_eq!(outcome, ConsoleOutcome::Run);
        assert!(out.contains("Valid commands:"));
        assert!(out.contains("Starting game"));
        assert!(outcome.continue_to_game());
    }

    #[test]
    fn exit_ends_process() {
        let (outcome, out) = run(&mut Console::new(), "exit\n");
        assert_eq!(outcome, ConsoleOutcome::Exit);
        assert!(out.contains("Exiting game"));
        assert!(!outcome.continue_to_game());
    }

    #[test]
    fn quit_and_end_of_input() {
        assert_eq!(run(&mut Console::new(), "quit\n").0, ConsoleOutcome::Quit);
        assert_eq!(run(&mut Console::new(), "").0, ConsoleOutcome::EndOfInput);
    }

    #[test]
    fn echo_prints_rest_of_line() {
        let (_, out) = run(&mut Console::new(), "echo hello there\n");
        assert!(out.contains("hello there\n"));
    }

    #[test]
    fn history_is_bounded_to_four() {
        let mut console = Console::new();
        run(&mut console, "echo 1\necho 2\necho 3\necho 4\necho 5\n");
        let history: Vec<&str> = console.history().collect();
        assert_eq!(history, vec!["echo 2", "echo 3", "echo 4", "echo 5"]);
    }

    #[test]
    fn history_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        let mut console = Console::new().with_history_file(&path);
        run(&mut console, "echo a\nhelp\nquit\n");

        let reloaded = Console::new().with_history_file(&path);
        let history: Vec<&str> = reloaded.history().collect();
        assert_eq!(history, vec!["echo a", "help"]);
    }

    #[test]
    fn completion_by_first_character() {
        assert_eq!(Console::complete("e"), vec!["exit", "echo"]);
        assert_eq!(Console::complete("h"), vec!["help"]);
        assert!(Console::complete("").is_empty());
        assert!(Console::complete("z").is_empty());
    }

    #[test]
    fn unknown_line_without_script_host() {
        let (_, out) = run(&mut Console::new(), "frobnicate\n");
        assert!(out.contains("Unknown command: frobnicate"));
    }

    #[test]
    fn script_lines_are_evaluated() {
        let mut host = ScriptHost::new();
        host.register_fn("double", |args| match args {
            [Value::Num(n)] => Ok(Value::Num(n * 2.0)),
            _ => Ok(Value::Unit),
        });
        let mut console = Console::new().with_script_host(host);
        let (_, out) = run(&mut console, "double(21)\nputs(\"hi\")\nnope()\n");
        assert!(out.contains("=> 42"));
        assert!(out.contains("hi\n"));
        assert!(out.contains("error: unknown function 'nope'"));
    }
}
