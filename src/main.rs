use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::Rng;
use tracing::info;

use snake_game::config::{Settings, ARENA_GRID, CLASSIC_GRID};
use snake_game::input::{command_for_key, Command, DragTracker};
use snake_game::render::Renderer;
use snake_game::{FileStore, Phase, ScoreStore, Session};

fn main() -> Result<()> {
    let settings = Settings::from_env().context("invalid SNAKE_* settings")?;
    init_tracing(&settings)?;
    info!(?settings, "starting snake");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(DisableMouseCapture)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_tracing(settings: &Settings) -> Result<()> {
    // The terminal belongs to the game, so logs only go to a file.
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> Result<()> {
    let mut rng = rand::thread_rng();
    let store = FileStore::new(&settings.score_file);
    let mut session = Session::new(settings.game, store, &mut rng)?;
    let mut renderer = Renderer::new(settings.game.grid_size);
    let mut drag = DragTracker::default();
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let command = match event::read()? {
                Event::Key(key) => command_for_key(key),
                Event::Mouse(mouse) => drag.handle(mouse),
                Event::Resize(_, _) => {
                    renderer.invalidate();
                    None
                }
                _ => None,
            };
            if let Some(command) = command {
                if !apply(command, &mut session, &mut rng)? {
                    return Ok(());
                }
            }
        }

        session.update(Instant::now(), &mut rng);
        renderer.render(stdout, &session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Returns `false` when the player asked to quit.
fn apply<S: ScoreStore>(command: Command, session: &mut Session<S>, rng: &mut impl Rng) -> Result<bool> {
    let now = Instant::now();
    match command {
        Command::Quit => return Ok(false),
        Command::Turn(dir) => {
            // A turn from the start screen also starts the game.
            if session.phase() == Phase::Ready {
                session.start(now);
            }
            session.queue_direction(dir);
        }
        Command::Start => {
            if session.phase() == Phase::GameOver {
                session.restart(rng)?;
            }
            session.start(now);
        }
        Command::Pause => {
            session.toggle_pause(now);
        }
        Command::Restart => session.restart(rng)?,
        Command::Faster => session.speed_up(now)?,
        Command::Slower => session.slow_down(now)?,
        Command::ToggleGrid => {
            let size = if session.engine().grid_size() == CLASSIC_GRID {
                ARENA_GRID
            } else {
                CLASSIC_GRID
            };
            session.set_grid_size(size, rng)?;
        }
        Command::CycleTheme => {
            let theme = session.theme().next();
            session.set_theme(theme);
        }
    }
    Ok(true)
}
