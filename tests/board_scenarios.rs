use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use bento_folio::{
    AnsiRenderer, BentoBoard, BoardSettings, ContentRecord, FolioRuntime, Logger, MemorySink, Rect,
    RuntimeEvent, SelectionChange, Size, TileId,
};

const VIEW: Size = Size::new(120, 40);

fn board() -> BentoBoard {
    let mut board = BentoBoard::new(ContentRecord::builtin(), BoardSettings::default()).unwrap();
    board.layout(VIEW).unwrap();
    board
}

fn build_runtime(sink: &MemorySink) -> FolioRuntime {
    let logger = Logger::new(sink.clone());
    let board = BentoBoard::new(ContentRecord::builtin(), BoardSettings::default())
        .unwrap()
        .with_logger(logger);
    let mut runtime = FolioRuntime::new(AnsiRenderer::with_default(), VIEW);
    runtime.register_plugin(board);
    runtime
}

fn press_on(tile: TileId) -> RuntimeEvent {
    let rect = board().tile_rect(tile);
    press(rect.x + rect.width / 2, rect.y + rect.height / 2)
}

fn press(column: u16, row: u16) -> RuntimeEvent {
    RuntimeEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn key(code: KeyCode) -> RuntimeEvent {
    RuntimeEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn settle() -> Vec<RuntimeEvent> {
    vec![
        RuntimeEvent::Tick {
            elapsed: Duration::from_millis(500),
        };
        2
    ]
}

fn screen(runtime: &FolioRuntime) -> String {
    let canvas = runtime.canvas();
    (0..canvas.size().height)
        .map(|row| canvas.row_text(row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count(sink: &MemorySink, message: &str) -> usize {
    sink.messages().iter().filter(|m| *m == message).count()
}

#[test]
fn projects_tile_expands_and_escape_collapses() {
    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut events = vec![press_on(TileId::Projects)];
    events.extend(settle());
    runtime.run_scripted(&mut Vec::new(), events).unwrap();

    let text = screen(&runtime);
    assert!(text.contains("Chikitsa Cloud"));
    assert!(text.contains("[ Close ]"));
    assert!(text.contains("[ Live Demo ]"));
    assert_eq!(count(&sink, "tile_opened"), 1);

    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut events = vec![press_on(TileId::Projects)];
    events.extend(settle());
    events.push(key(KeyCode::Esc));
    events.extend(settle());
    runtime.run_scripted(&mut Vec::new(), events).unwrap();

    let text = screen(&runtime);
    assert!(!text.contains("[ Close ]"));
    assert!(text.contains("PROJECTS"));
    assert_eq!(count(&sink, "tile_closed"), 1);
}

#[test]
fn contact_panel_lists_reachable_details() {
    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut events = vec![press_on(TileId::Contact)];
    events.extend(settle());
    runtime.run_scripted(&mut Vec::new(), events).unwrap();

    let text = screen(&runtime);
    for value in ["aasthamalik.work@gmail.com", "+91 7303102064", "aastha-malik"] {
        assert!(text.contains(value), "missing {value}");
    }
}

#[test]
fn rapid_batch_ends_collapsed() {
    let sink = MemorySink::new();
    let mut board = board().with_logger(Logger::new(sink.clone()));
    board.open(TileId::Dsa);
    board.open(TileId::Tech);
    board.close();

    assert_eq!(board.active(), None);
    assert!(!board.panel().is_mounted());
    assert_eq!(sink.messages(), vec!["tile_opened", "tile_switched", "tile_closed"]);
}

#[test]
fn escape_and_backdrop_in_one_batch_close_once() {
    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut events = vec![press_on(TileId::Dsa)];
    events.extend(settle());
    events.push(key(KeyCode::Esc));
    events.push(press(0, 0));
    runtime.run_scripted(&mut Vec::new(), events).unwrap();

    assert_eq!(count(&sink, "tile_opened"), 1);
    assert_eq!(count(&sink, "tile_closed"), 1);
}

#[test]
fn profile_tile_is_inert() {
    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut events = vec![press_on(TileId::Profile), key(KeyCode::Enter)];
    events.extend(settle());
    runtime.run_scripted(&mut Vec::new(), events).unwrap();

    assert_eq!(count(&sink, "tile_opened"), 0);
    assert!(!screen(&runtime).contains("[ Close ]"));
    assert!(screen(&runtime).contains("Aastha Malik"));
}

#[test]
fn at_most_one_tile_is_ever_active() {
    let mut board = board();
    let script = [
        TileId::Projects,
        TileId::Profile,
        TileId::Dsa,
        TileId::Dsa,
        TileId::Resume,
        TileId::Profile,
        TileId::Basic,
    ];
    for (step, tile) in script.into_iter().enumerate() {
        let change = board.open(tile);
        if step % 3 == 2 {
            board.close();
        }
        if tile.is_inert() {
            assert_eq!(change, SelectionChange::Unchanged);
        }
        let active: Vec<_> = TileId::ALL
            .into_iter()
            .filter(|tile| board.controller().is_active(*tile))
            .collect();
        assert!(active.len() <= 1);
        assert_eq!(active.first().copied(), board.active());
        assert_ne!(board.active(), Some(TileId::Profile));
        assert_eq!(board.panel().tile(), board.active());
    }
}

#[test]
fn scripted_run_writes_ansi_frames() {
    let sink = MemorySink::new();
    let mut runtime = build_runtime(&sink);
    let mut out = Vec::new();
    runtime
        .run_scripted(&mut out, vec![key(KeyCode::Tab), key(KeyCode::Char('q'))])
        .unwrap();

    let written = String::from_utf8_lossy(&out);
    assert!(written.contains("\u{1b}[1;1H"));
    assert!(written.contains("open ›"));
    assert_eq!(runtime.canvas().bounds(), Rect::from_size(VIEW));
}
