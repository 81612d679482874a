//! Event loop for the terminal client.
//!
//! # Design
//! `App` owns the cache, the viewport trigger and the scroll window, and is
//! driven purely by `Event`s. Handling an event may yield `Job`s (network
//! work). `run` drives a current-thread tokio runtime: each job runs on the
//! blocking pool and its completion comes back through the same unbounded
//! channel the stdin task writes to. All state changes happen inside the
//! loop task, one event at a time.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use todo_core::{
    ApiError, Gateway, Page, PageFetch, PaginatedCache, Resolution, Todo, TodoClient, Transport, ViewportTrigger,
};

use crate::command::{Command, HELP};
use crate::config::Config;
use crate::transport::UreqTransport;
use crate::view::{self, Viewport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { title: String, user_id: u64 },
    Toggle(Todo),
    Remove(u64),
}

impl Mutation {
    pub fn execute<T: Transport>(&self, gateway: &Gateway<T>) -> Result<(), ApiError> {
        match self {
            Mutation::Create { title, user_id } => gateway.create(title, *user_id).map(drop),
            Mutation::Toggle(todo) => gateway.toggle(todo).map(drop),
            Mutation::Remove(id) => gateway.remove(*id),
        }
    }

    fn done_message(&self) -> String {
        match self {
            Mutation::Create { title, .. } => format!("Created \"{title}\""),
            Mutation::Toggle(todo) if todo.completed => format!("Reopened #{}", todo.id),
            Mutation::Toggle(todo) => format!("Completed #{}", todo.id),
            Mutation::Remove(id) => format!("Deleted #{id}"),
        }
    }
}

/// Network work requested by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Page(PageFetch),
    Mutation(Mutation),
}

impl Job {
    pub fn execute<T: Transport>(self, gateway: &Gateway<T>) -> Event {
        match self {
            Job::Page(fetch) => Event::PageLoaded(fetch, gateway.list_page(fetch.page_param())),
            Job::Mutation(mutation) => {
                let result = mutation.execute(gateway);
                Event::MutationDone(mutation, result)
            }
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Input(String),
    InputClosed,
    PageLoaded(PageFetch, Result<Page, ApiError>),
    MutationDone(Mutation, Result<(), ApiError>),
}

#[derive(Debug)]
pub struct App {
    cache: PaginatedCache,
    trigger: ViewportTrigger,
    viewport: Viewport,
    user_id: u64,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(user_id: u64, rows: usize) -> Self {
        Self {
            cache: PaginatedCache::default(),
            trigger: ViewportTrigger::default(),
            viewport: Viewport::new(rows),
            user_id,
            notice: None,
            should_quit: false,
        }
    }

    pub fn cache(&self) -> &PaginatedCache {
        &self.cache
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// First render: load page one.
    pub fn mount(&mut self) -> Vec<Job> {
        self.cache.initial_load().map(Job::Page).into_iter().collect()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Job> {
        let mut jobs = Vec::new();
        match event {
            Event::Input(line) => match line.parse::<Command>() {
                Ok(command) => jobs.extend(self.handle_command(command)),
                Err(err) => self.notice = Some(err.to_string()),
            },
            Event::InputClosed => self.quit(),
            Event::PageLoaded(fetch, result) => {
                if self.cache.resolve(fetch, result) == Resolution::Applied {
                    self.trigger.page_loaded();
                }
            }
            Event::MutationDone(mutation, Ok(())) => {
                self.notice = Some(mutation.done_message());
                jobs.push(Job::Page(self.cache.invalidate()));
            }
            Event::MutationDone(mutation, Err(err)) => {
                tracing::warn!(?mutation, error = %err, "mutation failed");
                self.notice = Some(err.to_string());
            }
        }

        if !self.should_quit {
            if let Some(len) = view::content_len(&self.cache) {
                self.viewport.clamp(len);
            }
            jobs.extend(self.observe_sentinel());
        }
        jobs
    }

    fn handle_command(&mut self, command: Command) -> Option<Job> {
        self.notice = None;
        match command {
            Command::Add(title) => Some(Job::Mutation(Mutation::Create {
                title,
                user_id: self.user_id,
            })),
            Command::Toggle(id) => self.loaded(id).map(|todo| Job::Mutation(Mutation::Toggle(todo))),
            Command::Remove(id) => self.loaded(id).map(|todo| Job::Mutation(Mutation::Remove(todo.id))),
            Command::Down(rows) => {
                if let Some(len) = view::content_len(&self.cache) {
                    self.viewport.scroll_down(rows, len);
                }
                None
            }
            Command::Up(rows) => {
                self.viewport.scroll_up(rows);
                None
            }
            Command::More => self.cache.fetch_next_page().map(Job::Page),
            Command::Refresh => Some(Job::Page(self.cache.invalidate())),
            Command::Help => {
                self.notice = Some(HELP.to_string());
                None
            }
            Command::Quit => {
                self.quit();
                None
            }
        }
    }

    fn loaded(&mut self, id: u64) -> Option<Todo> {
        let todo = self.cache.find(id).cloned();
        if todo.is_none() {
            self.notice = Some(format!("No loaded todo #{id}"));
        }
        todo
    }

    /// Sample the sentinel and ask the cache for the next page if it just
    /// came into view. The cache ignores the request while a fetch is pending.
    fn observe_sentinel(&mut self) -> Option<Job> {
        let fraction = view::sentinel_fraction(&self.cache, &self.viewport);
        if self.trigger.observe(fraction, self.cache.has_next_page()) {
            return self.cache.fetch_next_page().map(Job::Page);
        }
        None
    }

    fn quit(&mut self) {
        self.trigger.disconnect();
        self.should_quit = true;
    }

    pub fn render(&self) -> String {
        view::render(&self.cache, &self.viewport, self.user_id, self.notice.as_deref())
    }
}

/// Run the interactive client until `quit` or end of input.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(event_loop(config));
    // The stdin task may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn event_loop(config: &Config) -> anyhow::Result<()> {
    let gateway = Arc::new(Gateway::new(TodoClient::new(&config.base_url), UreqTransport::new()));
    tracing::info!(base_url = gateway.client().base_url(), "starting");

    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(read_input(tx.clone()));

    let mut app = App::new(config.user_id, usize::from(config.rows));
    let mut stdout = io::stdout().lock();
    dispatch(app.mount(), &gateway, &tx);
    draw(&app, &mut stdout)?;

    while let Some(event) = rx.recv().await {
        let jobs = app.handle(event);
        if app.should_quit() {
            break;
        }
        dispatch(jobs, &gateway, &tx);
        draw(&app, &mut stdout)?;
    }
    tracing::info!("stopped");
    Ok(())
}

/// Run each job on the blocking pool. Results arriving after the loop has
/// exited are dropped with the channel.
fn dispatch<T>(jobs: Vec<Job>, gateway: &Arc<Gateway<T>>, tx: &UnboundedSender<Event>)
where
    T: Transport + Send + Sync + 'static,
{
    for job in jobs {
        let gateway = Arc::clone(gateway);
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let event = job.execute(&*gateway);
            let _ = tx.send(event);
        });
    }
}

async fn read_input(tx: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Event::Input(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "stdin read failed");
                break;
            }
        }
    }
    let _ = tx.send(Event::InputClosed);
}

fn draw(app: &App, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", app.render())?;
    write!(out, "> ")?;
    out.flush()
}
