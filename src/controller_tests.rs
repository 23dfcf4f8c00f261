use super::*;

use std::fs;
use std::time::Duration;

use tempfile::{tempdir, TempDir};

use crate::launcher::RecordingLauncher;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

/// Directory with the given files and a started controller over it
fn setup(files: &[&str], config: Config) -> (TempDir, Controller<RecordingLauncher>) {
    let dir = tempdir().unwrap();
    for name in files {
        touch(dir.path(), name);
    }
    let mut controller = Controller::new(
        dir.path(),
        &config,
        Rc::new(TextPainter::empty()),
        RecordingLauncher::new(),
    )
    .unwrap();
    controller.start();
    (dir, controller)
}

fn many_tools(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("tool_{:02}.exe", i)).collect()
}

fn setup_many(count: usize, frame: Size) -> (TempDir, Controller<RecordingLauncher>) {
    let names = many_tools(count);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (dir, mut controller) = setup(&refs, Config::default());
    controller.resize(frame);
    (dir, controller)
}

fn key(s: &str) -> Shortcut {
    Shortcut::parse(s).unwrap()
}

/// Center of the filtered tool at `index`
fn center_of(controller: &Controller<RecordingLauncher>, index: usize) -> Point {
    let b = controller.filtered()[index].bounds;
    Point::new(b.x + b.width / 2, b.y + b.height / 2)
}

fn names(controller: &Controller<RecordingLauncher>) -> Vec<String> {
    let mut names: Vec<String> = controller
        .filtered()
        .iter()
        .map(|t| t.display_name.clone())
        .collect();
    names.sort();
    names
}

// ============================================
// LIFECYCLE
// ============================================

#[test]
fn test_new_controller_is_idle_until_started() {
    let dir = tempdir().unwrap();
    let controller = Controller::new(
        dir.path(),
        &Config::default(),
        Rc::new(TextPainter::empty()),
        RecordingLauncher::new(),
    )
    .unwrap();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.frame_size(), Size::new(900, 700));
    assert!(controller.frame().is_some());
}

#[test]
fn test_start_scans_and_is_ready() {
    let (_dir, controller) = setup(&["a.exe", "b.txt", "c.py"], Config::default());
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.tools().len(), 2);
    assert_eq!(names(&controller), vec!["a", "c"]);
    assert_eq!(controller.status_text(), "Ready • 2 Tools");
}

#[test]
fn test_empty_directory_reports_no_tools() {
    let (_dir, controller) = setup(&["notes.txt"], Config::default());
    assert_eq!(controller.phase(), Phase::Ready);
    assert!(controller.filtered().is_empty());
    assert_eq!(controller.status_text(), "No tools found • 0 Tools");
    assert_eq!(controller.layout().virtual_size, Size::new(0, 0));
}

#[test]
fn test_missing_directory_is_not_fatal() {
    let dir = tempdir().unwrap();
    let mut controller = Controller::new(
        dir.path().join("gone"),
        &Config::default(),
        Rc::new(TextPainter::empty()),
        RecordingLauncher::new(),
    )
    .unwrap();
    controller.start();
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.status_text(), "No tools found • 0 Tools");
}

#[test]
fn test_refresh_picks_up_new_files_and_clears_search() {
    let (dir, mut controller) = setup(&["a.exe"], Config::default());
    controller.set_search("a");
    touch(dir.path(), "b.bat");

    assert!(controller.dispatch(InputEvent::Key(key("f5"))));
    assert_eq!(controller.search(), "");
    assert_eq!(controller.tools().len(), 2);
    assert_eq!(controller.filtered().len(), 2);
    assert_eq!(controller.status_text(), "Tools refreshed • 2 Tools");
}

// ============================================
// SEARCH
// ============================================

#[test]
fn test_search_filters_and_reports() {
    let (_dir, mut controller) = setup(&["a.exe", "b.txt", "c.py"], Config::default());

    controller.dispatch(InputEvent::SearchChanged("a".into()));
    assert!(controller.is_filtered());
    assert_eq!(names(&controller), vec!["a"]);
    assert_eq!(controller.status_text(), "Search results • 1 Tools");

    controller.dispatch(InputEvent::SearchChanged("z".into()));
    assert!(controller.filtered().is_empty());
    assert_eq!(controller.status_text(), "No results • 0 Tools");

    controller.dispatch(InputEvent::SearchChanged(String::new()));
    assert_eq!(controller.filtered().len(), 2);
    assert_eq!(controller.status_text(), "Ready • 2 Tools");
}

#[test]
fn test_filter_keeps_full_list_and_shares_icons() {
    let (_dir, mut controller) = setup(&["alpha.exe", "beta.exe"], Config::default());
    controller.set_search("alp");
    assert_eq!(controller.tools().len(), 2);

    let filtered_icon = controller.filtered()[0].icon.clone().unwrap();
    let original = controller
        .tools()
        .iter()
        .find(|t| t.display_name == "alpha")
        .and_then(|t| t.icon.clone())
        .unwrap();
    assert!(std::sync::Arc::ptr_eq(&filtered_icon, &original));
}

#[test]
fn test_search_resets_scroll() {
    let (_dir, mut controller) = setup_many(30, Size::new(400, 324));
    controller.wheel(-1, false);
    assert!(controller.is_scrolled());

    controller.set_search("tool");
    assert!(!controller.is_scrolled());
}

#[test]
fn test_escape_clears_search() {
    let (_dir, mut controller) = setup(&["a.exe", "c.py"], Config::default());
    controller.set_search("c");
    controller.dispatch(InputEvent::Key(key("esc")));
    assert_eq!(controller.search(), "");
    assert!(controller.is_search_focused());
    assert_eq!(controller.filtered().len(), 2);
    assert_eq!(controller.status_text(), "Search cleared • 2 Tools");
}

// ============================================
// POINTER / LAUNCH
// ============================================

#[test]
fn test_hover_updates_status() {
    let (_dir, mut controller) = setup(&["disk_cleanup.bat"], Config::default());
    let center = center_of(&controller, 0);

    controller.dispatch(InputEvent::PointerMove(center));
    assert_eq!(controller.hovered(), HoverTarget::Tool(0));
    assert_eq!(controller.status_text(), "Click to launch: Disk Cleanup");

    controller.dispatch(InputEvent::PointerMove(Point::new(5, 5)));
    assert_eq!(controller.hovered(), HoverTarget::None);
    assert_eq!(controller.status_text(), "Ready • 1 Tools");

    controller.dispatch(InputEvent::PointerMove(center));
    controller.dispatch(InputEvent::PointerLeave);
    assert_eq!(controller.hovered(), HoverTarget::None);
}

#[test]
fn test_click_launches_tool() {
    let (dir, mut controller) = setup(&["build_all.exe"], Config::default());
    let center = center_of(&controller, 0);

    controller.dispatch(InputEvent::PointerDown(center));
    assert_eq!(controller.status_text(), "Launching...");
    controller.dispatch(InputEvent::PointerUp(center));

    assert_eq!(
        controller.launcher().launched,
        vec![dir.path().join("build_all.exe")]
    );
    assert_eq!(controller.status_text(), "✓ Launched: Build All");
}

#[test]
fn test_release_over_other_tile_does_not_launch() {
    let (_dir, mut controller) = setup(&["a.exe", "b.exe"], Config::default());
    let first = center_of(&controller, 0);
    let second = center_of(&controller, 1);

    controller.dispatch(InputEvent::PointerDown(first));
    controller.dispatch(InputEvent::PointerUp(second));
    assert!(controller.launcher().launched.is_empty());

    controller.dispatch(InputEvent::PointerDown(first));
    controller.dispatch(InputEvent::PointerUp(Point::new(5, 5)));
    assert!(controller.launcher().launched.is_empty());
}

#[test]
fn test_search_change_between_press_and_release_cancels_launch() {
    let (_dir, mut controller) = setup(&["alpha.exe", "beta.exe"], Config::default());
    let alpha = center_of(&controller, 0);

    controller.dispatch(InputEvent::PointerDown(alpha));
    controller.dispatch(InputEvent::SearchChanged("beta".into()));
    assert_eq!(names(&controller), vec!["Beta"]);
    // Beta now sits where Alpha was pressed
    assert_eq!(center_of(&controller, 0), alpha);

    controller.dispatch(InputEvent::PointerUp(alpha));
    assert!(controller.launcher().launched.is_empty());
}

#[test]
fn test_launch_failure_is_reported_in_status() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "broken_tool.bat");
    let launcher = RecordingLauncher::new().failing_on(dir.path().join("broken_tool.bat"));
    let mut controller = Controller::new(
        dir.path(),
        &Config::default(),
        Rc::new(TextPainter::empty()),
        launcher,
    )
    .unwrap();
    controller.start();

    let center = center_of(&controller, 0);
    controller.dispatch(InputEvent::PointerDown(center));
    controller.dispatch(InputEvent::PointerUp(center));

    assert_eq!(controller.status_text(), "✗ Failed to launch: Broken Tool");
    // View state is untouched by a launch
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.filtered().len(), 1);
}

#[test]
fn test_launch_status_resets_after_timeout() {
    let config = Config {
        status_reset_ms: Some(50),
        ..Config::default()
    };
    let (_dir, mut controller) = setup(&["a.exe"], config);
    let center = center_of(&controller, 0);
    controller.dispatch(InputEvent::PointerDown(center));
    controller.dispatch(InputEvent::PointerUp(center));
    assert_eq!(controller.status_text(), "✓ Launched: A");

    controller.dispatch(InputEvent::Tick(Instant::now() + Duration::from_secs(5)));
    assert_eq!(controller.status_text(), "Ready • 1 Tools");
}

#[test]
fn test_enter_quick_launches_first_filtered_tool() {
    let (dir, mut controller) = setup(&["alpha.exe", "beta.py"], Config::default());
    controller.set_search("beta");
    controller.dispatch(InputEvent::Key(key("enter")));

    assert_eq!(controller.launcher().launched, vec![dir.path().join("beta.py")]);
    assert_eq!(controller.status_text(), "Quick launched: Beta");
}

#[test]
fn test_quick_launch_reports_outcome() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "good.exe");
    touch(dir.path(), "bad.exe");
    let launcher = RecordingLauncher::new().failing_on(dir.path().join("bad.exe"));
    let mut controller = Controller::new(
        dir.path(),
        &Config::default(),
        Rc::new(TextPainter::empty()),
        launcher,
    )
    .unwrap();
    controller.start();

    controller.set_search("good");
    assert_eq!(controller.quick_launch(), Some(true));
    controller.set_search("bad");
    assert_eq!(controller.quick_launch(), Some(false));
    controller.set_search("nothing");
    assert_eq!(controller.quick_launch(), None);
}

#[test]
fn test_enter_with_no_results_does_nothing() {
    let (_dir, mut controller) = setup(&["alpha.exe"], Config::default());
    controller.set_search("zzz");
    controller.dispatch(InputEvent::Key(key("enter")));
    assert!(controller.launcher().launched.is_empty());
    assert_eq!(controller.status_text(), "No results • 0 Tools");
}

#[test]
fn test_clear_button_click() {
    let (_dir, mut controller) = setup(&["alpha.exe", "beta.exe"], Config::default());
    let clear = render::clear_button_rect(controller.frame_size().width);
    let point = Point::new(clear.x + 5, clear.y + 5);

    // Hidden while the search is empty
    assert_eq!(controller.target_at(point), HoverTarget::None);

    controller.set_search("alpha");
    controller.dispatch(InputEvent::PointerMove(point));
    assert_eq!(controller.status_text(), "Clear search");
    controller.dispatch(InputEvent::PointerDown(point));
    controller.dispatch(InputEvent::PointerUp(point));

    assert_eq!(controller.search(), "");
    assert_eq!(controller.status_text(), "Search cleared • 2 Tools");
    assert!(controller.launcher().launched.is_empty());
}

// ============================================
// SCROLLING
// ============================================

#[test]
fn test_small_frame_shows_both_scrollbars() {
    let (_dir, controller) = setup_many(20, Size::new(400, 324));
    let bars = controller.layout().scrollbars;
    assert!(bars.horizontal);
    assert!(bars.vertical);
    assert_eq!(bars.viewport, Size::new(383, 283));
}

#[test]
fn test_wheel_scrolls_and_clamps() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));

    controller.dispatch(InputEvent::Wheel { delta: -1, shift: false });
    assert_eq!(controller.scroll(), ScrollOffset::new(0, 60));

    controller.dispatch(InputEvent::Wheel { delta: 1, shift: false });
    controller.dispatch(InputEvent::Wheel { delta: 1, shift: false });
    assert_eq!(controller.scroll(), ScrollOffset::new(0, 0));

    controller.dispatch(InputEvent::Wheel { delta: -1, shift: true });
    assert_eq!(controller.scroll(), ScrollOffset::new(60, 0));

    for _ in 0..100 {
        controller.wheel(-1, false);
    }
    let max = controller.layout().scrollbars.max_scroll;
    assert_eq!(controller.scroll().y, max.y);
}

#[test]
fn test_wheel_scrolls_one_step_per_notch() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));

    controller.wheel(-2, false);
    assert_eq!(controller.scroll(), ScrollOffset::new(0, 120));

    controller.wheel(1, false);
    assert_eq!(controller.scroll(), ScrollOffset::new(0, 60));

    controller.wheel(i32::MIN, false);
    let max = controller.layout().scrollbars.max_scroll;
    assert_eq!(controller.scroll().y, max.y);
    controller.wheel(i32::MAX, false);
    assert_eq!(controller.scroll().y, 0);
}

#[test]
fn test_oversized_config_values_do_not_overflow() {
    let json = r#"{
        "layout": { "tileSize": 1000000000, "gutterY": 2147483647, "margin": 2147483647 },
        "scroll": { "wheel": 2147483647, "keyPage": 2147483647, "keyArrow": 2147483647 }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    let (_dir, mut controller) = setup(&["a.exe", "b.exe", "c.exe"], config);
    let max = controller.layout().scrollbars.max_scroll;
    assert!(controller.layout().scrollbars.vertical);

    controller.key(&key("pagedown"));
    assert_eq!(controller.scroll().y, max.y);
    controller.key(&key("pageup"));
    assert_eq!(controller.scroll().y, 0);

    controller.wheel(-3, false);
    assert_eq!(controller.scroll().y, max.y);
    controller.key(&key("ctrl+right"));
    assert_eq!(controller.scroll().x, max.x);
    controller.dispatch(InputEvent::Resize(Size::new(i32::MIN, -1)));
    assert_eq!(controller.frame_size(), Size::new(0, 0));
    assert!(controller.frame().is_none());
}

#[test]
fn test_wheel_ignored_without_scrollbar() {
    let (_dir, mut controller) = setup(&["a.exe"], Config::default());
    controller.wheel(-1, false);
    controller.wheel(-1, true);
    assert!(!controller.is_scrolled());
}

#[test]
fn test_scrolling_moves_tool_bounds() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));
    let before = controller.filtered()[0].bounds;
    controller.scroll_by(Axis::Vertical, ScrollAction::LineForward);
    let after = controller.filtered()[0].bounds;
    assert_eq!(after.y, before.y - 20);
    assert_eq!(after.x, before.x);
}

#[test]
fn test_scrollbar_actions() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));
    let max = controller.layout().scrollbars.max_scroll;

    controller.scroll_by(Axis::Vertical, ScrollAction::PageForward);
    assert_eq!(controller.scroll().y, 100);
    controller.scroll_by(Axis::Vertical, ScrollAction::End);
    assert_eq!(controller.scroll().y, max.y);
    controller.scroll_by(Axis::Horizontal, ScrollAction::Thumb(250));
    assert_eq!(controller.scroll().x, 250);
    controller.scroll_by(Axis::Horizontal, ScrollAction::Start);
    assert_eq!(controller.scroll().x, 0);
}

#[test]
fn test_keyboard_scrolling() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));
    let max = controller.layout().scrollbars.max_scroll;

    controller.key(&key("pagedown"));
    assert_eq!(controller.scroll().y, 200);
    controller.key(&key("ctrl+up"));
    assert_eq!(controller.scroll().y, 150);
    controller.key(&key("ctrl+right"));
    assert_eq!(controller.scroll().x, 50);
    controller.key(&key("ctrl+end"));
    assert_eq!(controller.scroll(), max);
    controller.key(&key("ctrl+home"));
    assert_eq!(controller.scroll(), ScrollOffset::default());
    controller.key(&key("pageup"));
    assert_eq!(controller.scroll().y, 0);
}

#[test]
fn test_unbound_key_is_ignored() {
    let (_dir, mut controller) = setup(&["a.exe"], Config::default());
    assert_eq!(controller.key(&key("ctrl+q")), None);
    assert_eq!(controller.key(&key("f5")), Some(KeyAction::Refresh));
}

#[test]
fn test_hidden_pointer_targets_outside_viewport() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));
    // Tile 2 starts at x=364 and runs under the vertical scrollbar (x >= 383)
    let b = controller.filtered()[2].bounds;
    assert_eq!(controller.target_at(Point::new(b.x + 2, b.y + 2)), HoverTarget::Tool(2));
    assert_eq!(controller.target_at(Point::new(390, b.y + 2)), HoverTarget::None);
    controller.pointer_move(Point::new(390, b.y + 2));
    assert_eq!(controller.hovered(), HoverTarget::None);
}

// ============================================
// RESIZE / VIEW MODE / RENDER
// ============================================

#[test]
fn test_resize_recreates_frame_and_clamps_scroll() {
    let (_dir, mut controller) = setup_many(20, Size::new(400, 324));
    controller.key(&key("ctrl+end"));
    assert!(controller.is_scrolled());

    controller.dispatch(InputEvent::Resize(Size::new(2000, 1200)));
    assert_eq!(controller.frame().unwrap().size(), Size::new(2000, 1200));
    assert!(!controller.layout().scrollbars.vertical);
    assert!(!controller.is_scrolled());
}

#[test]
fn test_zero_resize_pauses_rendering() {
    let (_dir, mut controller) = setup(&["a.exe"], Config::default());
    controller.resize(Size::new(0, 0));
    assert!(controller.frame().is_none());
    assert!(controller.render().is_none());

    controller.resize(Size::new(300, 200));
    assert!(controller.render().is_some());
}

#[test]
fn test_toggle_view_cycles_modes_and_relayouts() {
    let (_dir, mut controller) = setup(&["a.exe", "b.exe"], Config::default());
    assert_eq!(controller.view_mode(), ViewMode::Grid);

    controller.key(&key("ctrl+t"));
    assert_eq!(controller.view_mode(), ViewMode::List);
    assert_eq!(controller.filtered()[0].bounds.width, 600);
    assert_eq!(controller.filtered()[0].bounds.height, 50);

    controller.key(&key("ctrl+t"));
    assert_eq!(controller.view_mode(), ViewMode::Details);
    controller.dispatch(InputEvent::SetView(ViewMode::Grid));
    assert_eq!(controller.filtered()[0].bounds.width, 150);
}

#[test]
fn test_config_selects_initial_view_and_extensions() {
    let config = Config {
        view_mode: Some(ViewMode::List),
        extensions: Some(vec![".sh".to_string()]),
        ..Config::default()
    };
    let (_dir, controller) = setup(&["deploy.sh", "build.exe"], config);
    assert_eq!(controller.view_mode(), ViewMode::List);
    assert_eq!(names(&controller), vec!["deploy"]);
}

#[test]
fn test_render_clears_redraw_flag_and_snapshot_writes_png() {
    let (dir, mut controller) = setup(&["a.exe"], Config::default());
    assert!(controller.needs_redraw());
    assert!(controller.render().is_some());
    assert!(!controller.needs_redraw());

    let path = dir.path().join("snap.png");
    controller.snapshot(&path).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}
