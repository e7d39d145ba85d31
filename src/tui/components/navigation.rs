//! Navigation Menu Component
//!
//! This component renders the session's menu as tabs. Entries are bound to
//! F1..F9 in order, so the bindings change as roles sign in and out.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

use crate::shell::{MenuAction, MenuItem};
use crate::tui::utils::Palette;
use crate::Route;

/// Highest function key bound to a menu entry
pub const MAX_MENU_KEYS: usize = 9;

/// Render the navigation menu component
pub fn render_navigation(
    f: &mut Frame,
    items: &[MenuItem],
    current: &Route,
    palette: &Palette,
    area: Rect,
) {
    let tabs = create_navigation_tabs(items, current, palette);
    f.render_widget(tabs, area);
}

/// Create the navigation tabs widget
fn create_navigation_tabs(items: &[MenuItem], current: &Route, palette: &Palette) -> Tabs<'static> {
    let titles: Vec<Line> = items
        .iter()
        .take(MAX_MENU_KEYS)
        .enumerate()
        .map(|(index, item)| Line::from(tab_title(index, item)))
        .collect();

    let selected_tab = active_index(items, current).unwrap_or(0);

    Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style(false))
                .title("Menu"),
        )
        .style(palette.base())
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )
        .select(selected_tab)
        .divider("|")
}

/// "F1:Home"
pub fn tab_title(index: usize, item: &MenuItem) -> String {
    format!("F{}:{}", index + 1, item.label)
}

/// Menu entry that leads to the current route, if any
pub fn active_index(items: &[MenuItem], current: &Route) -> Option<usize> {
    items
        .iter()
        .position(|item| matches!(&item.action, MenuAction::Navigate(route) if route == current))
}

/// Menu index bound to a function key
pub fn function_key_to_index(key: u8) -> Option<usize> {
    let key = usize::from(key);
    (1..=MAX_MENU_KEYS).contains(&key).then(|| key - 1)
}

/// Get navigation help text
pub fn get_navigation_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("F1-F9", "Menu"),
        ("Ctrl+T", "Theme"),
        ("Esc", "Back"),
        ("Ctrl+Q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::shell::menu_items;
    use crate::Role;

    #[test]
    fn test_function_key_to_index() {
        assert_eq!(function_key_to_index(1), Some(0));
        assert_eq!(function_key_to_index(9), Some(8));
        assert_eq!(function_key_to_index(0), None);
        assert_eq!(function_key_to_index(10), None);
    }

    #[test]
    fn test_active_index_follows_route() {
        let items = menu_items(&SessionState::default());
        assert_eq!(active_index(&items, &Route::Home), Some(0));

        let sign_in = active_index(&items, &Route::SignIn(Role::Patient)).unwrap();
        assert_eq!(items[sign_in].label, "Patient Sign In");
        assert_eq!(active_index(&items, &Route::Consult("d1".into())), None);
    }

    #[test]
    fn test_tab_title() {
        let items = menu_items(&SessionState::default());
        assert_eq!(tab_title(0, &items[0]), "F1:Home");
    }
}
