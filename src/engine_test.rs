#![allow(clippy::float_cmp)]

use super::*;
use crate::config::RegionSeed;
use crate::recompute::MarkerState;
use crate::records::RestaurantRecord;

// =============================================================
// Helpers
// =============================================================

fn overlapping_config() -> MapConfig {
    MapConfig {
        region_a: RegionSeed { x: 250.0, y: 250.0, radius: 80.0, color: "blue".into() },
        region_b: RegionSeed { x: 300.0, y: 300.0, radius: 80.0, color: "blue".into() },
        ..MapConfig::default()
    }
}

fn record_at(cfg: &MapConfig, name: &str, x: f64, y: f64, price: Option<&str>) -> RestaurantRecord {
    let proj = Projection::fit_size(cfg.width, cfg.height, cfg.frame, cfg.projection);
    let g = proj.invert(Point::new(x, y));
    RestaurantRecord {
        name: name.into(),
        rating: Some("4.0".into()),
        price: price.map(Into::into),
        address: None,
        longitude: g.lon.to_string(),
        latitude: g.lat.to_string(),
    }
}

/// Five restaurants around the overlap of the two default test regions.
fn scenario_core() -> EngineCore {
    let cfg = overlapping_config();
    let records = vec![
        record_at(&cfg, "both-$$", 275.0, 275.0, Some("$$")),
        record_at(&cfg, "both-$", 280.0, 270.0, Some("$")),
        record_at(&cfg, "a-only", 200.0, 200.0, Some("$$")),
        record_at(&cfg, "far", 700.0, 700.0, Some("$$")),
        record_at(&cfg, "both-untiered", 290.0, 290.0, None),
    ];
    EngineCore::new(cfg, RecordStore::new(records))
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_hide_tooltip(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::HideTooltip))
}

fn count_text(actions: &[Action]) -> Option<&str> {
    actions.iter().find_map(|a| match a {
        Action::SetCountText(text) => Some(text.as_str()),
        _ => None,
    })
}

fn states(core: &EngineCore) -> Vec<MarkerState> {
    core.pass().markers.iter().map(|m| m.state).collect()
}

/// Count computed straight from the predicates, independent of the engine's pass.
fn expected_count(core: &EngineCore) -> usize {
    let a = core.region(RegionId::A);
    let b = core.region(RegionId::B);
    core.records()
        .iter()
        .filter(|r| {
            let p = core.projection().project(r.lon(), r.lat());
            a.contains(p) && b.contains(p) && core.price_filter().matches(r.price_tier())
        })
        .count()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_runs_first_pass() {
    let core = scenario_core();
    assert_eq!(core.pass().markers.len(), 5);
    assert_eq!(core.intersection_count(), 3);
    assert_eq!(core.input(), InputState::Idle);
    assert_eq!(core.hovered(), None);
    assert_eq!(core.cursor(), Cursor::Default);
}

#[test]
fn initial_actions_sync_readouts_and_counter() {
    let core = scenario_core();
    let actions = core.initial_actions();
    assert!(actions.contains(&Action::SetRadiusReadout { id: RegionId::A, radius: 80.0 }));
    assert!(actions.contains(&Action::SetRadiusReadout { id: RegionId::B, radius: 80.0 }));
    assert_eq!(count_text(&actions), Some("Restaurants in intersection: 3"));
    assert!(has_render_needed(&actions));
}

#[test]
fn default_config_regions_do_not_overlap() {
    let cfg = MapConfig::default();
    let records = vec![record_at(&cfg, "x", 200.0, 200.0, None)];
    let core = EngineCore::new(cfg, RecordStore::new(records));
    assert_eq!(core.intersection_count(), 0);
    assert_eq!(states(&core), [MarkerState::Unselected]);
}

// =============================================================
// End-to-end scenario
// =============================================================

#[test]
fn scenario_price_filter_selects_qualifying_records() {
    let mut core = scenario_core();
    let actions = core.set_price_selection(["$$"]);

    assert_eq!(
        states(&core),
        [
            MarkerState::Selected,
            MarkerState::Hidden,
            MarkerState::Unselected,
            MarkerState::Unselected,
            MarkerState::Hidden,
        ]
    );
    let selected = core.pass().markers[0];
    assert_eq!(selected.state.fill(), "#3498db");
    assert_eq!(selected.state.radius(), 5.0);
    assert_eq!(core.intersection_count(), 1);
    assert_eq!(count_text(&actions), Some("Restaurants in intersection: 1"));
    assert!(has_render_needed(&actions));
}

#[test]
fn scenario_without_filter_selects_all_in_overlap() {
    let core = scenario_core();
    assert_eq!(
        states(&core),
        [
            MarkerState::Selected,
            MarkerState::Selected,
            MarkerState::Unselected,
            MarkerState::Unselected,
            MarkerState::Selected,
        ]
    );
}

// =============================================================
// Price filter
// =============================================================

#[test]
fn clear_twice_matches_never_filtering() {
    let untouched = scenario_core();
    let mut core = scenario_core();
    core.set_price_selection(["$"]);
    assert_ne!(core.pass(), untouched.pass());

    let first = core.clear_price_filter();
    let after_first = core.pass().clone();
    let second = core.clear_price_filter();

    assert!(core.price_filter().is_empty());
    assert_eq!(core.pass(), untouched.pass());
    assert_eq!(&after_first, untouched.pass());
    assert_eq!(first, second);
    assert!(first.contains(&Action::ResetPriceSelect));
    assert_eq!(count_text(&second), Some("Restaurants in intersection: 3"));
}

#[test]
fn filter_hiding_hovered_marker_hides_tooltip() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    assert_eq!(core.hovered(), Some(2));

    let actions = core.set_price_selection(["$"]);
    assert!(has_hide_tooltip(&actions));
    assert_eq!(core.hovered(), None);
}

#[test]
fn filter_keeping_hovered_marker_keeps_tooltip() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    let actions = core.set_price_selection(["$$"]);
    assert!(!has_hide_tooltip(&actions));
    assert_eq!(core.hovered(), Some(2));
}

// =============================================================
// Drag
// =============================================================

#[test]
fn pointer_down_on_region_starts_drag() {
    let mut core = scenario_core();
    let actions = core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    assert_eq!(core.input(), InputState::DraggingRegion { id: RegionId::A });
    assert!(actions.contains(&Action::SetCursor(Cursor::Grabbing)));
}

#[test]
fn pointer_down_on_overlap_drags_region_b() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(260.0, 300.0), Button::Primary);
    assert_eq!(core.input().dragging(), Some(RegionId::B));
}

#[test]
fn pointer_down_on_marker_does_not_drag() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(275.0, 275.0), Button::Primary);
    assert_eq!(core.input(), InputState::Idle);
}

#[test]
fn secondary_button_does_not_drag() {
    let mut core = scenario_core();
    let actions = core.on_pointer_down(pt(210.0, 190.0), Button::Secondary);
    assert!(actions.is_empty());
    assert_eq!(core.input(), InputState::Idle);
}

#[test]
fn pointer_down_on_empty_map_does_nothing() {
    let mut core = scenario_core();
    let actions = core.on_pointer_down(pt(800.0, 100.0), Button::Primary);
    assert!(actions.is_empty());
    assert_eq!(core.input(), InputState::Idle);
}

#[test]
fn drag_moves_region_and_recomputes() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    let actions = core.on_pointer_move(pt(700.0, 700.0), pt(0.0, 0.0));

    assert_eq!(core.region(RegionId::A).center(), pt(700.0, 700.0));
    assert_eq!(core.region(RegionId::A).translation(), pt(450.0, 450.0));
    assert_eq!(core.intersection_count(), 0);
    assert_eq!(count_text(&actions), Some("Restaurants in intersection: 0"));
    assert!(has_render_needed(&actions));
}

#[test]
fn drag_far_outside_keeps_region_inside() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    core.on_pointer_move(pt(-5_000.0, 9_000.0), pt(0.0, 0.0));
    let a = core.region(RegionId::A);
    assert_eq!(a.center(), pt(80.0, 844.0 - 80.0));
}

#[test]
fn drag_leaves_other_region_untouched() {
    let mut core = scenario_core();
    let before = core.region(RegionId::B).clone();
    core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    core.on_pointer_move(pt(600.0, 150.0), pt(0.0, 0.0));
    assert_eq!(core.region(RegionId::B), &before);
}

#[test]
fn drag_continues_after_pointer_leaves_map() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    let left = core.on_pointer_leave();
    assert!(left.is_empty());
    core.on_pointer_move(pt(500.0, 500.0), pt(0.0, 0.0));
    assert_eq!(core.region(RegionId::A).center(), pt(500.0, 500.0));
}

#[test]
fn pointer_up_ends_drag() {
    let mut core = scenario_core();
    core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    core.on_pointer_move(pt(220.0, 200.0), pt(0.0, 0.0));
    let actions = core.on_pointer_up(pt(220.0, 200.0));
    assert_eq!(core.input(), InputState::Idle);
    assert!(actions.contains(&Action::SetCursor(Cursor::Grab)));

    core.on_pointer_move(pt(600.0, 600.0), pt(0.0, 0.0));
    assert_eq!(core.region(RegionId::A).center(), pt(220.0, 200.0));
}

#[test]
fn pointer_up_without_drag_is_noop() {
    let mut core = scenario_core();
    assert!(core.on_pointer_up(pt(10.0, 10.0)).is_empty());
}

#[test]
fn drag_start_hides_tooltip() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    assert_eq!(core.hovered(), Some(2));
    let actions = core.on_pointer_down(pt(210.0, 190.0), Button::Primary);
    assert!(has_hide_tooltip(&actions));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn radius_input_updates_readout_and_count() {
    let mut core = scenario_core();
    let actions = core.on_radius_input(RegionId::A, 20.0);
    assert!(actions.contains(&Action::SetRadiusReadout { id: RegionId::A, radius: 20.0 }));
    assert_eq!(core.region(RegionId::A).radius(), 20.0);
    // Only records within 20px of (250, 250) remain in A.
    assert_eq!(core.intersection_count(), 0);
    assert!(has_render_needed(&actions));
}

#[test]
fn radius_input_reports_clamped_value() {
    let mut core = scenario_core();
    let actions = core.on_radius_input(RegionId::B, 5_000.0);
    assert!(actions.contains(&Action::SetRadiusReadout { id: RegionId::B, radius: 300.0 }));
}

#[test]
fn growing_region_b_captures_far_record() {
    let mut core = scenario_core();
    core.on_radius_input(RegionId::A, 300.0);
    core.on_radius_input(RegionId::B, 300.0);
    assert_eq!(core.region(RegionId::A).center(), pt(300.0, 300.0));
    assert_eq!(core.intersection_count(), 4);
    assert_eq!(core.intersection_count(), expected_count(&core));
}

// =============================================================
// Tooltip
// =============================================================

#[test]
fn hover_marker_shows_tooltip_near_cursor() {
    let mut core = scenario_core();
    let actions = core.on_pointer_move(pt(200.5, 200.0), pt(1_200.0, 300.0));
    let shown = actions.iter().find_map(|a| match a {
        Action::ShowTooltip { html, left, top } => Some((html.clone(), *left, *top)),
        _ => None,
    });
    let (html, left, top) = shown.unwrap();
    assert!(html.contains("<strong>a-only</strong>"));
    assert!(html.contains("Rating: 4.0"));
    assert!(html.contains("Price: $$"));
    assert!(html.contains("Address: N/A"));
    assert_eq!((left, top), (1_210.0, 290.0));
    assert!(actions.contains(&Action::SetCursor(Cursor::Pointer)));
}

#[test]
fn hover_same_marker_does_not_reshow() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    let actions = core.on_pointer_move(pt(201.0, 200.0), pt(1.0, 0.0));
    assert!(!has_action(&actions, |a| matches!(a, Action::ShowTooltip { .. })));
}

#[test]
fn hover_exit_hides_tooltip() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    let actions = core.on_pointer_move(pt(800.0, 100.0), pt(0.0, 0.0));
    assert!(has_hide_tooltip(&actions));
    assert!(actions.contains(&Action::SetCursor(Cursor::Default)));
    assert_eq!(core.hovered(), None);
}

#[test]
fn pointer_leave_hides_tooltip() {
    let mut core = scenario_core();
    core.on_pointer_move(pt(200.0, 200.0), pt(0.0, 0.0));
    let actions = core.on_pointer_leave();
    assert!(has_hide_tooltip(&actions));
}

#[test]
fn hidden_marker_is_not_hoverable() {
    let mut core = scenario_core();
    core.set_price_selection(["$$"]);
    // Record 1 ($) sits at (280, 270) and is hidden; region B is underneath.
    let actions = core.on_pointer_move(pt(280.0, 270.0), pt(0.0, 0.0));
    assert!(!has_action(&actions, |a| matches!(a, Action::ShowTooltip { .. })));
    assert_eq!(core.cursor(), Cursor::Grab);
}

#[test]
fn region_hover_sets_grab_cursor_once() {
    let mut core = scenario_core();
    let first = core.on_pointer_move(pt(210.0, 190.0), pt(0.0, 0.0));
    assert!(first.contains(&Action::SetCursor(Cursor::Grab)));
    let second = core.on_pointer_move(pt(211.0, 190.0), pt(0.0, 0.0));
    assert!(second.is_empty());
}

// =============================================================
// Count correctness across interaction sequences
// =============================================================

#[test]
fn count_never_drifts_across_interactions() {
    let cfg = overlapping_config();
    let tiers = [Some("$"), Some("$$"), Some("$$$"), None];
    let mut records = Vec::new();
    for i in 0..15_u32 {
        for j in 0..15_u32 {
            let x = 100.0 + f64::from(i) * 40.0;
            let y = 100.0 + f64::from(j) * 40.0;
            records.push(record_at(&cfg, "grid", x, y, tiers[((i * 7 + j) % 4) as usize]));
        }
    }
    let mut core = EngineCore::new(cfg, RecordStore::new(records));
    assert_eq!(core.intersection_count(), expected_count(&core));

    core.on_pointer_down(pt(200.0, 200.0), Button::Primary);
    for (x, y) in [(220.0, 240.0), (400.0, 380.0), (-50.0, 100.0), (320.0, 300.0)] {
        core.on_pointer_move(pt(x, y), pt(0.0, 0.0));
        assert_eq!(core.intersection_count(), expected_count(&core));
    }
    core.on_pointer_up(pt(320.0, 300.0));

    core.set_price_selection(["$", "$$$"]);
    assert_eq!(core.intersection_count(), expected_count(&core));
    core.on_radius_input(RegionId::B, 150.0);
    assert_eq!(core.intersection_count(), expected_count(&core));
    core.set_price_selection(["$$"]);
    assert_eq!(core.intersection_count(), expected_count(&core));
    core.clear_price_filter();
    assert_eq!(core.intersection_count(), expected_count(&core));
    core.on_radius_input(RegionId::A, 10.0);
    assert_eq!(core.intersection_count(), expected_count(&core));
}

#[test]
fn malformed_record_does_not_break_pass() {
    let cfg = overlapping_config();
    let mut bad = record_at(&cfg, "bad", 275.0, 275.0, Some("$$"));
    bad.latitude = "north".into();
    let good = record_at(&cfg, "good", 275.0, 275.0, Some("$$"));
    let core = EngineCore::new(cfg, RecordStore::new(vec![bad, good]));
    assert_eq!(core.intersection_count(), 1);
    assert_eq!(states(&core), [MarkerState::Unselected, MarkerState::Selected]);
}
