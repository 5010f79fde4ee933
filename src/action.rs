#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    SwitchFocus,
    /// Row selection in the process table.
    OpenProcess(u32),
    /// Row selection in the connection table, keyed by formatted address.
    OpenConnection(String),
    ToggleHelp,
    None,
}
