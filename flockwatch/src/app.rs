//! App state and main loop: one task owns the dashboard and multiplexes channel
//! events, the uptime tick, pending timers, input and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{interval, sleep_until, MissedTickBehavior};

use crate::clock::{Moment, UPTIME_TICK};
use crate::dashboard::Dashboard;
use crate::types::ChannelEvent;
use crate::ui::feed::{draw_feed, feed_content_area, feed_page_rows};
use crate::ui::util::{scroll_clamp, scroll_handle_key, scroll_handle_mouse};
use crate::ui::{header::draw_header, panels::Panels, radar::draw_radar, threat::draw_threat};

const FRAME_TICK: Duration = Duration::from_millis(100);

pub struct App {
    dashboard: Dashboard<StdRng>,
    panels: Panels,

    // Quit flag
    should_quit: bool,

    pub feed_scroll: usize,
    last_feed_area: Option<Rect>,
}

impl App {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Fixed blip placement, e.g. for a reproducible demo.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            dashboard: Dashboard::new(rng, &Moment::now()),
            panels: Panels::new(),
            should_quit: false,
            feed_scroll: 0,
            last_feed_area: None,
        }
    }

    pub async fn run(&mut self, mut rx: mpsc::Receiver<ChannelEvent>) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, &mut rx).await;

        // Teardown
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        rx: &mut mpsc::Receiver<ChannelEvent>,
    ) -> anyhow::Result<()> {
        let mut uptime = interval(UPTIME_TICK);
        uptime.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut frame = interval(FRAME_TICK);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut channel_open = true;

        self.dashboard.prime(&Moment::now(), &mut self.panels);

        loop {
            let deadline = self.dashboard.next_deadline();
            tokio::select! {
                // due timers before new events
                biased;
                _ = wait_until(deadline) => {
                    self.dashboard.fire_due(Instant::now(), &mut self.panels);
                }
                ev = rx.recv(), if channel_open => match ev {
                    Some(ev) => self.dashboard.apply(ev, &Moment::now(), &mut self.panels),
                    None => {
                        channel_open = false;
                        self.dashboard.link_lost(&mut self.panels);
                    }
                },
                _ = uptime.tick() => self.dashboard.tick_uptime(&Moment::now(), &mut self.panels),
                _ = frame.tick() => {
                    self.handle_input()?;
                    terminal.draw(|f| self.draw(f))?;
                }
            }
            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        // Input (non-blocking)
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(k) => {
                    let ctrl_c = k.code == KeyCode::Char('c')
                        && k.modifiers.contains(KeyModifiers::CONTROL);
                    // raw mode swallows SIGINT, so Ctrl-C arrives as a key
                    if ctrl_c
                        || matches!(
                            k.code,
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                        )
                    {
                        self.should_quit = true;
                    }
                    if let Some(area) = self.last_feed_area {
                        let page = feed_page_rows(area);
                        scroll_handle_key(&mut self.feed_scroll, k, page);
                        scroll_clamp(&mut self.feed_scroll, self.panels.feed.len(), page);
                    }
                }
                Event::Mouse(m) => {
                    if let Some(area) = self.last_feed_area {
                        scroll_handle_mouse(&mut self.feed_scroll, m, feed_content_area(area));
                        scroll_clamp(
                            &mut self.feed_scroll,
                            self.panels.feed.len(),
                            feed_page_rows(area),
                        );
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, body
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(10)])
            .split(area);

        draw_header(f, rows[0], &self.panels);

        // Body: feed (left), radar over threat gauge (right)
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(body[1]);

        // Cache for input handlers
        self.last_feed_area = Some(body[0]);
        draw_feed(f, body[0], &self.panels, self.feed_scroll);
        draw_radar(f, right[0], &self.panels);
        draw_threat(f, right[1], &self.panels);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending().await,
    }
}
