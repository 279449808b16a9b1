use vitrine_state::{reduce_grid, standard_columns, GridAction, GridState};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn register_all(mut state: GridState, order: &[&str]) -> GridState {
    for id in order {
        state = reduce_grid(state, GridAction::Register(id.to_string()));
    }
    state
}

#[test]
fn standard_preset_maps_widths_to_columns() {
    assert_eq!(standard_columns(1280), 3);
    assert_eq!(standard_columns(1024), 3);
    assert_eq!(standard_columns(800), 2);
    assert_eq!(standard_columns(768), 2);
    assert_eq!(standard_columns(375), 1);
}

#[test]
fn nothing_is_visible_before_the_first_measurement() {
    let state = GridState::new(ids(&["a", "b"]), Some(2), standard_columns);
    let state = register_all(state, &["a", "b"]);
    assert!(!state.is_ready());
    assert!(state.visible().is_empty());
}

#[test]
fn five_items_three_columns_two_rows_all_fit() {
    let state = GridState::new(ids(&["a", "b", "c", "d", "e"]), Some(2), standard_columns);
    let state = register_all(state, &["a", "b", "c", "d", "e"]);
    let state = reduce_grid(state, GridAction::Measured(1280));

    assert_eq!(state.columns(), Some(3));
    assert_eq!(state.visible(), vec!["a", "b", "c", "d", "e"]);
    assert!(!state.has_more());
}

#[test]
fn overflow_shows_the_first_cap_items_in_declared_order() {
    let order = ["a", "b", "c", "d", "e", "f", "g"];
    let state = GridState::new(ids(&order), Some(2), standard_columns);
    // Register out of order; declaration order must still win.
    let state = register_all(state, &["g", "c", "a", "f", "b", "e", "d"]);
    let state = reduce_grid(state, GridAction::Measured(1280));

    assert_eq!(state.visible(), vec!["a", "b", "c", "d", "e", "f"]);
    assert!(state.has_more());
}

#[test]
fn visibility_is_deterministic_across_registration_orders() {
    let order = ["a", "b", "c", "d", "e"];
    let first = register_all(
        GridState::new(ids(&order), Some(1), standard_columns),
        &["e", "a", "c", "b", "d"],
    );
    let second = register_all(
        GridState::new(ids(&order), Some(1), standard_columns),
        &["a", "b", "c", "d", "e"],
    );
    let first = reduce_grid(first, GridAction::Measured(1024));
    let second = reduce_grid(second, GridAction::Measured(1024));

    assert_eq!(first.visible(), second.visible());
    assert_eq!(first.visible(), vec!["a", "b", "c"]);
}

#[test]
fn disabled_row_limiting_shows_everything_and_never_reports_more() {
    let order = ["a", "b", "c", "d", "e"];
    let state = GridState::new(ids(&order), None, standard_columns);
    let state = register_all(state, &order);
    let state = reduce_grid(state, GridAction::Measured(375));

    assert_eq!(state.visible().len(), 5);
    assert!(!state.has_more());
}

#[test]
fn narrow_viewport_caps_at_one_column() {
    let order = ["a", "b", "c", "d"];
    let state = GridState::new(ids(&order), Some(2), standard_columns);
    let state = register_all(state, &order);
    let state = reduce_grid(state, GridAction::Measured(400));

    assert_eq!(state.visible(), vec!["a", "b"]);
    assert!(state.has_more());
}

#[test]
fn unregistering_an_item_removes_it_from_the_visible_set() {
    let order = ["a", "b", "c"];
    let state = GridState::new(ids(&order), Some(2), standard_columns);
    let state = register_all(state, &order);
    let state = reduce_grid(state, GridAction::Measured(1280));
    assert_eq!(state.visible(), vec!["a", "b", "c"]);

    let state = reduce_grid(state, GridAction::Unregister("b".to_string()));
    assert_eq!(state.visible(), vec!["a", "c"]);
}

#[test]
fn remeasuring_on_resize_recomputes_the_cap() {
    let order = ["a", "b", "c", "d", "e", "f", "g"];
    let state = GridState::new(ids(&order), Some(2), standard_columns);
    let state = register_all(state, &order);

    let wide = reduce_grid(state.clone(), GridAction::Measured(1280));
    assert_eq!(wide.visible().len(), 6);

    let narrow = reduce_grid(state, GridAction::Measured(700));
    assert_eq!(narrow.visible().len(), 2);
    assert!(narrow.has_more());
}
