//! Terminal preview of the Wishes section's scroll-driven video carousel.
//!
//! Run the binary to scroll through a simulated page with the mouse wheel or
//! keys.  Run with `--sweep N` to print the phase/layout table for `N` evenly
//! spaced scroll positions instead.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
    sweep,
};
use crate::config::AppConfig;
use crate::core::video::VideoDescriptor;
use crate::ui::{carousel::CarouselView, layout::AppLayout, status::FrameInfo, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven video carousel preview")]
struct Cli {
    /// Config file (defaults to `$XDG_CONFIG_HOME/wishes-reel/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the mobile viewport.
    #[arg(long)]
    mobile: bool,

    /// Print a table of N+1 evenly spaced frames and exit.
    #[arg(long, value_name = "N")]
    sweep: Option<usize>,

    /// Write logs here while the preview owns the terminal.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Use N clips, repeating the configured list as needed.
    #[arg(long, value_name = "N")]
    videos: Option<usize>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

/// Logs go to stderr in sweep mode; the preview draws on stderr, so there
/// they go to `--log-file` or nowhere.
fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    if cli.sweep.is_some() || cli.write_config {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init();
    }
    Ok(())
}

/// `count` clips taken from `videos` in order, wrapping around.  Repeats get
/// a numbered id so every clip stays distinct.
fn resize_clip_list(videos: &[VideoDescriptor], count: usize) -> Vec<VideoDescriptor> {
    if videos.is_empty() {
        return Vec::new();
    }
    (0..count.max(1))
        .map(|i| {
            let mut video = videos[i % videos.len()].clone();
            let round = i / videos.len();
            if round > 0 {
                video.id = format!("{}-{}", video.id, round + 1);
            }
            video
        })
        .collect()
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let mut config = AppConfig::load(cli.config.as_deref());
    if let Some(count) = cli.videos {
        config.videos = resize_clip_list(&config.videos, count);
    }

    // ── one-shot modes ────────────────────────────────────────
    if cli.write_config {
        config.save()?;
        println!("{}", config.path.display());
        return Ok(());
    }

    let mut state = AppState::new(config, cli.mobile);

    if let Some(steps) = cli.sweep {
        let mut out = io::stdout().lock();
        sweep::run(&mut state, steps, &mut out)?;
        state.dispose();
        return Ok(());
    }

    info!(
        clips = state.controller.videos().len(),
        mobile = state.mobile,
        "starting preview"
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let frame_interval = Duration::from_millis(state.config.preview.frame_interval_ms.max(1));
    let mut events = spawn_event_reader(frame_interval);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let scroll_pct = match state.page.max_scroll() {
                max if max > 0.0 => state.page.scroll_y() / max * 100.0,
                _ => 0.0,
            };
            let view_block = Block::default()
                .title(format!(" wishes-reel · scroll {scroll_pct:.0}% "))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                CarouselView::new(&state.page, &state.controller).block(view_block),
                layout.view_area,
            );

            frame.render_widget(
                FrameInfo {
                    frame: state.controller.last_frame(),
                    clips: state.controller.videos().len(),
                    buffered: state.controller.buffered(),
                    tick: state.last_tick,
                    superseded: state.scheduler.superseded(),
                    audio: *state.audio_status.borrow(),
                    visible: state.visible,
                },
                layout.info_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize => handler::handle_resize(&mut state),
                    AppEvent::Tick(dt) => handler::on_tick(&mut state, dt),
                }
            }

            Ok(()) = state.audio_status.changed() => {
                let snapshot = *state.audio_status.borrow_and_update();
                debug!(audio = snapshot.label(), "background audio changed");
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.dispose();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
