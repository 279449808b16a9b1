use std::collections::HashSet;

/// Maps a measured width to a column count. Injected so callers can swap the
/// standard preset for their own breakpoints.
pub type ColumnsFn = fn(u32) -> usize;

/// The standard responsive preset.
pub fn standard_columns(width: u32) -> usize {
    if width >= 1024 {
        3
    } else if width >= 768 {
        2
    } else {
        1
    }
}

/// Visibility controller for a grid whose items become ready to render at
/// their own pace (staggered hydration). Items self-register; the visible
/// set follows the caller-supplied canonical order, never registration
/// order. Until the first measurement arrives nothing is visible, so the
/// layout cannot flash.
#[derive(Clone)]
pub struct GridState {
    canonical_order: Vec<String>,
    registered: HashSet<String>,
    columns: Option<usize>,
    max_rows: Option<usize>,
    columns_fn: ColumnsFn,
}

impl GridState {
    /// `max_rows: None` disables row limiting entirely.
    pub fn new(canonical_order: Vec<String>, max_rows: Option<usize>, columns_fn: ColumnsFn) -> Self {
        Self {
            canonical_order,
            registered: HashSet::new(),
            columns: None,
            max_rows,
            columns_fn,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.columns.is_some()
    }

    pub fn columns(&self) -> Option<usize> {
        self.columns
    }

    fn cap(&self) -> Option<usize> {
        match (self.columns, self.max_rows) {
            (Some(columns), Some(rows)) => Some(columns * rows),
            _ => None,
        }
    }

    /// Registered ids in canonical declaration order, truncated to the
    /// row-cap when limiting is enabled. Empty before the first measurement.
    pub fn visible(&self) -> Vec<&str> {
        if !self.is_ready() {
            return Vec::new();
        }
        let ordered = self
            .canonical_order
            .iter()
            .filter(|id| self.registered.contains(*id))
            .map(String::as_str);
        match self.cap() {
            Some(cap) => ordered.take(cap).collect(),
            None => ordered.collect(),
        }
    }

    /// Whether registered items exceed the visible cap (drives the
    /// "view all" affordance). Always false with row limiting disabled.
    pub fn has_more(&self) -> bool {
        match self.cap() {
            Some(cap) => {
                let eligible = self
                    .canonical_order
                    .iter()
                    .filter(|id| self.registered.contains(*id))
                    .count();
                eligible > cap
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GridAction {
    /// An item became ready to render. Ids outside the canonical order are
    /// retained for membership but never shown.
    Register(String),
    /// An item unmounted.
    Unregister(String),
    /// Synchronous layout measurement on mount or resize.
    Measured(u32),
}

pub fn reduce_grid(mut state: GridState, action: GridAction) -> GridState {
    match action {
        GridAction::Register(id) => {
            state.registered.insert(id);
        }
        GridAction::Unregister(id) => {
            state.registered.remove(&id);
        }
        GridAction::Measured(width) => {
            state.columns = Some((state.columns_fn)(width));
        }
    }
    state
}
