use std::io;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use vestibule::adapters::{DemoGateway, RestGateway};
use vestibule::app::App;
use vestibule::cli::{parse_args, CliCommand};
use vestibule::input;
use vestibule::traits::IdentityGateway;
use vestibule::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artificial latency for the demo gateway, so the checking and
/// submitting states are visible.
const DEMO_LATENCY: Duration = Duration::from_millis(750);

fn main() -> Result<()> {
    match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("vestibule {}", VERSION);
            Ok(())
        }
        CliCommand::RunTui { gateway_url } => {
            color_eyre::install()?;
            init_tracing();
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_tui(gateway_url))
        }
    }
}

/// Route tracing output to a file when RUST_LOG is set. The alternate
/// screen owns stdout while the TUI runs, so nothing may log there.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create("vestibule.log") else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

async fn run_tui(gateway_url: Option<String>) -> Result<()> {
    let gateway: Arc<dyn IdentityGateway> = match gateway_url {
        Some(url) => {
            tracing::info!(%url, "using REST identity gateway");
            Arc::new(RestGateway::new(url))
        }
        None => {
            tracing::info!("using built-in demo gateway");
            Arc::new(DemoGateway::with_demo_accounts().with_latency(DEMO_LATENCY))
        }
    };

    setup_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(gateway);

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Setup panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    // Create async event stream for keyboard input
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx = app
        .message_rx
        .take()
        .ok_or_else(|| eyre!("message receiver already taken"))?;

    // The countdown scheduler: one repeating tick, scoped to this loop.
    // Dropping it on exit stops the timer exactly once; gateway tasks in
    // flight are left to finish and their sends become no-ops.
    let mut countdown = tokio::time::interval(Duration::from_secs(1));

    loop {
        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            // Cooldown tick: decrements every active channel once per second
            _ = countdown.tick() => {
                app.tick();
            }

            // Completions posted back by spawned gateway calls
            msg = message_rx.recv() => {
                if let Some(msg) = msg {
                    app.handle_message(msg);
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        input::handle_key(app, key);
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        app.mark_dirty();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
