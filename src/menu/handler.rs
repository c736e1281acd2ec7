use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleChannels,
    EnableAll,
    DisableAll,
    ChangeSource,
    Export,
    Quit,
}

/// Answer to a numbered list prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Back,
    Index(usize),
}

pub fn parse_menu_choice(input: &str) -> Result<MenuAction> {
    match input.trim() {
        "1" => Ok(MenuAction::ToggleChannels),
        "2" => Ok(MenuAction::EnableAll),
        "3" => Ok(MenuAction::DisableAll),
        "4" => Ok(MenuAction::ChangeSource),
        "5" => Ok(MenuAction::Export),
        "q" | "Q" => Ok(MenuAction::Quit),
        other => Err(AppError::InvalidSelection(format!("unknown option '{}'", other))),
    }
}

/// Parses a 1-based position in a list of `len` items into a 0-based index.
pub fn parse_pick(input: &str, len: usize) -> Result<Pick> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(Pick::Back);
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Pick::Index(n - 1)),
        Ok(n) => Err(AppError::InvalidSelection(format!(
            "{} is not between 1 and {}",
            n, len
        ))),
        Err(_) => Err(AppError::InvalidSelection(format!(
            "'{}' is not a number",
            input
        ))),
    }
}
