//! Menu construction
//!
//! Items carry the [`Command`] they run, fixed when the menu is built from
//! the catalog. Activating an item never looks anything up by name.

use std::path::PathBuf;

use super::command::{Command, CommandId};
use super::keymap::Keymap;
use crate::markdown::markmoji;
use crate::model::Pane;
use crate::theme::{ThemeCatalog, ThemeSelector, ThemeTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Ready to run
    Run(Command),
    /// Needs a path from the user first (open, save as, exports)
    AskPath(CommandId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        label: String,
        /// Accelerator text, e.g. `Ctrl+S`
        shortcut: Option<String>,
        action: MenuAction,
    },
    Submenu(Menu),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    fn item(&mut self, label: impl Into<String>, action: MenuAction, keymap: &Keymap) {
        let shortcut = match &action {
            MenuAction::Run(command) => keymap.shortcut_for(command.id()),
            MenuAction::AskPath(id) => keymap.shortcut_for(*id),
        };
        self.entries.push(MenuEntry::Item {
            label: label.into(),
            shortcut: shortcut.map(|s| s.to_string()),
            action,
        });
    }

    fn file_action(&mut self, id: CommandId, keymap: &Keymap) {
        let action = match id.with_path(None) {
            Some(command) if !id.needs_path() => MenuAction::Run(command),
            _ => MenuAction::AskPath(id),
        };
        self.item(id.display_name(), action, keymap);
    }

    /// The menu bar: File, View, Insert and Theme
    pub fn build(catalog: &ThemeCatalog, keymap: &Keymap) -> Vec<Menu> {
        let mut file = Menu::new("&File");
        file.file_action(CommandId::NewWindow, keymap);
        file.file_action(CommandId::Open, keymap);
        file.entries.push(MenuEntry::Separator);
        file.file_action(CommandId::Save, keymap);
        file.file_action(CommandId::SaveAs, keymap);
        file.entries.push(MenuEntry::Separator);
        file.file_action(CommandId::ExportRawHtml, keymap);
        file.file_action(CommandId::ExportStyledHtml, keymap);
        file.entries.push(MenuEntry::Separator);
        file.file_action(CommandId::CloseWindow, keymap);
        file.file_action(CommandId::Quit, keymap);

        let mut view = Menu::new("&View");
        for pane in Pane::ALL {
            view.item(
                format!("Toggle {}", pane),
                MenuAction::Run(Command::TogglePane(pane)),
                keymap,
            );
        }

        let mut insert = Menu::new("Insert &Handler");
        for handler in markmoji::handlers() {
            insert.item(
                format!("{} {}", handler.emoji, handler.name),
                MenuAction::Run(Command::InsertHandler(handler.emoji.to_string())),
                keymap,
            );
        }

        vec![file, view, insert, Self::theme_menu(catalog, keymap)]
    }

    /// Theme menu: one submenu per target plus installed combinations
    pub fn theme_menu(catalog: &ThemeCatalog, keymap: &Keymap) -> Menu {
        let mut menu = Menu::new("&Theme");
        for (target, label) in [
            (ThemeTarget::App, "&App"),
            (ThemeTarget::Editor, "&Editor"),
            (ThemeTarget::Viewer, "&Viewer"),
        ] {
            let mut target_menu = Menu::new(label);
            for (family, variants) in catalog.discover(target) {
                let mut family_menu = Menu::new(family.clone());
                for variant in variants {
                    let selector = ThemeSelector::new(family.clone(), variant.clone());
                    family_menu.item(
                        variant,
                        MenuAction::Run(Command::SelectTheme { target, selector }),
                        keymap,
                    );
                }
                target_menu.entries.push(MenuEntry::Submenu(family_menu));
            }
            menu.entries.push(MenuEntry::Submenu(target_menu));
        }

        let mut combinations = Menu::new("&Combination");
        for selector in catalog.combinations() {
            combinations.item(
                selector.label(),
                MenuAction::Run(Command::SelectCombination(selector)),
                keymap,
            );
        }
        menu.entries.push(MenuEntry::Separator);
        menu.entries.push(MenuEntry::Submenu(combinations));
        menu
    }

    /// Depth-first list of every item as (path of labels, action)
    pub fn flatten(&self) -> Vec<(Vec<String>, &MenuAction)> {
        let mut out = Vec::new();
        self.collect(&mut vec![self.label.clone()], &mut out);
        out
    }

    fn collect<'a>(&'a self, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, &'a MenuAction)>) {
        for entry in &self.entries {
            match entry {
                MenuEntry::Item { label, action, .. } => {
                    let mut full = path.clone();
                    full.push(label.clone());
                    out.push((full, action));
                }
                MenuEntry::Submenu(menu) => {
                    path.push(menu.label.clone());
                    menu.collect(path, out);
                    path.pop();
                }
                MenuEntry::Separator => {}
            }
        }
    }

    /// Resolve a menu action once the user supplied any missing path
    pub fn complete(action: &MenuAction, path: Option<PathBuf>) -> Option<Command> {
        match action {
            MenuAction::Run(command) => Some(command.clone()),
            MenuAction::AskPath(id) => id.with_path(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_menu_actions() {
        let catalog = ThemeCatalog::new("/nonexistent");
        let menus = Menu::build(&catalog, &Keymap::with_defaults());
        let file = &menus[0];
        let items = file.flatten();

        let save = items
            .iter()
            .find(|(path, _)| path.last().map(String::as_str) == Some("Save"))
            .unwrap();
        assert_eq!(*save.1, MenuAction::Run(Command::Save));

        let open = items
            .iter()
            .find(|(path, _)| path.last().map(String::as_str) == Some("Open..."))
            .unwrap();
        assert_eq!(*open.1, MenuAction::AskPath(CommandId::Open));
        assert_eq!(
            Menu::complete(open.1, Some(PathBuf::from("a.md"))),
            Some(Command::Open(PathBuf::from("a.md")))
        );
    }

    #[test]
    fn test_shortcut_labels() {
        let catalog = ThemeCatalog::new("/nonexistent");
        let menus = Menu::build(&catalog, &Keymap::with_defaults());
        let has_save_shortcut = menus[0].entries.iter().any(|e| {
            matches!(e, MenuEntry::Item { label, shortcut: Some(s), .. } if label == "Save" && s == "Ctrl+S")
        });
        assert!(has_save_shortcut);
    }

    #[test]
    fn test_insert_menu_lists_handlers() {
        let catalog = ThemeCatalog::new("/nonexistent");
        let menus = Menu::build(&catalog, &Keymap::with_defaults());
        assert_eq!(menus[2].flatten().len(), markmoji::handlers().len());
    }
}
