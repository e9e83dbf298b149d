use {
    super::dashboard::DashboardState,
    crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers},
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{
        sync::Arc,
        time::{Duration, Instant},
    },
    tokio::sync::RwLock,
};

/// Input poll timeout, doubles as the redraw tick
const TICK: Duration = Duration::from_millis(250);
/// Airport markers flash on and off at this period
const BLINK: Duration = Duration::from_secs(1);

/// Run the TUI event loop until the user quits
///
/// Keys: `q`, `Esc` or `Ctrl-C` exit. The caller treats a return from here
/// as a shutdown request.
pub async fn run_ui(state: Arc<RwLock<DashboardState>>) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen keeps stderr logs from scribbling over the dashboard
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &state).await;

    // Restore the terminal even when the loop failed
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &Arc<RwLock<DashboardState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut markers_visible = true;
    let mut last_blink = Instant::now();

    loop {
        {
            let state = state.read().await;
            terminal.draw(|f| {
                let area = f.size();
                super::layout::render_layout(f, area, &state, markers_visible);
            })?;
        }

        if crossterm::event::poll(TICK)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press && is_quit(key.code, key.modifiers) {
                    log::info!("👋 Quit requested from dashboard");
                    return Ok(());
                }
            }
        }

        if last_blink.elapsed() >= BLINK {
            markers_visible = !markers_visible;
            last_blink = Instant::now();
        }
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
