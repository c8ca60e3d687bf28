//! Line-based command console on stdin
//!
//! Each line is one of:
//! - a command in [`Command::parse`] syntax (`open notes.md`, `theme app dark`)
//! - `key <accelerator>` to press a shortcut (`key ctrl+s`)
//! - `type <text>` to type at the cursor (`\n` for a newline)
//! - `menu` to list menu items, `menu <n> [path]` to activate one
//! - `help`

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use crate::keymap::{Command, Keymap, Menu, MenuAction};
use crate::messages::{DocumentMsg, Msg};
use crate::theme::ThemeCatalog;

const HELP: &str = "\
commands: new, close, open <path>, save, save-as <path>,
          export-raw <path>, export-styled <path>,
          theme <viewer|editor|app> <family.variant>, combo <family.variant>,
          toggle <source|html|preview>, insert <emoji|name>, quit
console:  key <accelerator>, type <text>, menu, menu <n> [path], help";

/// What a console line turned into
#[derive(Debug)]
pub enum ConsoleInput {
    /// Send this message to the runtime
    Msg(Msg),
    /// Print this text; nothing is sent
    Output(String),
    /// Blank line
    Empty,
}

pub struct Console {
    keymap: Keymap,
    menus: Vec<Menu>,
}

impl Console {
    pub fn new(catalog: &ThemeCatalog, keymap: Keymap) -> Self {
        let menus = Menu::build(catalog, &keymap);
        Self { keymap, menus }
    }

    fn menu_items(&self) -> Vec<(Vec<String>, &MenuAction)> {
        self.menus.iter().flat_map(Menu::flatten).collect()
    }

    /// Interpret one line of input
    pub fn interpret(&self, line: &str) -> Result<ConsoleInput, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ConsoleInput::Empty);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "help" | "?" => Ok(ConsoleInput::Output(HELP.to_string())),
            "key" => match self.keymap.lookup_str(rest).map_err(|e| e.to_string())? {
                Some(id) => Ok(ConsoleInput::Msg(Msg::Shortcut { window: None, id })),
                None => Err(format!("No command bound to {}", rest)),
            },
            "type" => Ok(ConsoleInput::Msg(Msg::document(DocumentMsg::Type(
                rest.replace("\\n", "\n"),
            )))),
            "menu" if rest.is_empty() => {
                let listing = self
                    .menu_items()
                    .iter()
                    .enumerate()
                    .map(|(i, (path, _))| format!("{:>3}  {}", i + 1, display_path(path)))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ConsoleInput::Output(listing))
            }
            "menu" => self.activate(rest),
            _ => Command::parse(line)
                .map(|command| ConsoleInput::Msg(Msg::command(command)))
                .map_err(|e| e.to_string()),
        }
    }

    fn activate(&self, args: &str) -> Result<ConsoleInput, String> {
        let (index, path) = match args.split_once(char::is_whitespace) {
            Some((index, path)) => (index, Some(PathBuf::from(path.trim()))),
            None => (args, None),
        };
        let index: usize = index
            .parse()
            .map_err(|_| format!("'{}' is not a menu item number", index))?;

        let items = self.menu_items();
        let (labels, action) = index
            .checked_sub(1)
            .and_then(|i| items.get(i))
            .ok_or_else(|| format!("No menu item {}", index))?;

        match Menu::complete(action, path) {
            Some(command) => Ok(ConsoleInput::Msg(Msg::command(command))),
            None => Err(format!("'{}' needs a path", display_path(labels))),
        }
    }

    /// Read stdin on a background thread until EOF
    pub fn spawn(self, tx: Sender<Msg>) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("markmoji-console".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            tracing::warn!("Console read failed: {}", e);
                            break;
                        }
                    };
                    match self.interpret(&line) {
                        Ok(ConsoleInput::Msg(msg)) => {
                            if tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Ok(ConsoleInput::Output(text)) => println!("{}", text),
                        Ok(ConsoleInput::Empty) => {}
                        Err(e) => eprintln!("error: {}", e),
                    }
                }
                tracing::debug!("Console reached end of input");
            })
    }
}

/// Menu labels without their `&` mnemonic markers
fn display_path(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| label.replace('&', ""))
        .collect::<Vec<_>>()
        .join(" > ")
}
