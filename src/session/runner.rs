//! Session runner: the single task that owns a quiz session
//!
//! Commands from [`SessionHandle`]s, countdown ticks and fetch completions all
//! arrive on queues drained by one task, so the session is only ever touched
//! from one place. Events go out on a broadcast channel and the latest
//! snapshot on a watch channel.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use super::{
    events::{AnswerOutcome, Effect, FetchResult, SessionEvent, Transition},
    machine::QuizSession,
};
use crate::{
    error::SessionError, services::QuizDataSource, state::SessionSnapshot,
    tasks::CountdownClock,
};

const COMMAND_QUEUE: usize = 64;
const EVENT_BUFFER: usize = 100;

/// Timing of every round played in a session
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub duration_seconds: u64,
    pub tick_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_seconds: 300,
            tick_interval: Duration::from_secs(1),
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Player commands, each carrying the channel its result goes back on
enum Command {
    Load(Reply<SessionSnapshot>),
    ToggleTimer(Reply<SessionSnapshot>),
    SubmitAnswer(String, Reply<(AnswerOutcome, SessionSnapshot)>),
    Reset(Reply<SessionSnapshot>),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::ToggleTimer(_) => "toggle-timer",
            Self::SubmitAnswer(..) => "submit-answer",
            Self::Reset(_) => "reset",
        }
    }
}

fn respond<T>(reply: Reply<T>, result: Result<T, SessionError>) {
    if reply.send(result).is_err() {
        debug!("Command caller went away before the reply");
    }
}

/// Notifications from the clock and fetch tasks
#[derive(Debug)]
enum Notice {
    Tick { epoch: u64, remaining: u64 },
    Finished { epoch: u64 },
    Fetched { epoch: u64, result: FetchResult },
}

/// Cloneable entry point to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SessionEvent>,
    snapshot: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Spawn a session runner on the current tokio runtime
    pub fn spawn(source: Arc<dyn QuizDataSource>, settings: SessionSettings) -> Self {
        let session = QuizSession::new(settings.duration_seconds);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE);
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let runner = SessionRunner {
            session,
            clock: CountdownClock::new(),
            source,
            tick_interval: settings.tick_interval,
            fetch: None,
            notices: notices_tx,
            events: events_tx.clone(),
            snapshot: snapshot_tx,
        };
        tokio::spawn(runner.run(commands_rx, notices_rx));

        Self {
            commands: commands_tx,
            events: events_tx,
            snapshot: snapshot_rx,
        }
    }

    async fn request<T, F>(&self, command: F) -> Result<T, SessionError>
    where
        F: FnOnce(Reply<T>) -> Command,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Fetch a question and get ready to play
    pub async fn load(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(Command::Load).await
    }

    /// Start the countdown, or stop it and forfeit progress
    pub async fn toggle_timer(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(Command::ToggleTimer).await
    }

    pub async fn submit_answer(
        &self,
        input: impl Into<String>,
    ) -> Result<(AnswerOutcome, SessionSnapshot), SessionError> {
        let input = input.into();
        self.request(|reply| Command::SubmitAnswer(input, reply)).await
    }

    /// Abandon the round and load a fresh question
    pub async fn reset(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(Command::Reset).await
    }

    /// Receive every presentation event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch snapshot updates
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }
}

struct SessionRunner {
    session: QuizSession,
    clock: CountdownClock,
    source: Arc<dyn QuizDataSource>,
    tick_interval: Duration,
    fetch: Option<JoinHandle<()>>,
    notices: mpsc::UnboundedSender<Notice>,
    events: broadcast::Sender<SessionEvent>,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl SessionRunner {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut notices: mpsc::UnboundedReceiver<Notice>,
    ) {
        info!("Starting quiz session runner");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(notice) = notices.recv() => self.handle_notice(notice),
            }
        }

        self.clock.stop();
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        info!("Quiz session runner stopped");
    }

    fn handle_command(&mut self, command: Command) {
        debug!("Session command: {}", command.name());

        match command {
            Command::Load(reply) => {
                let result = self.session.load().map(|t| self.commit(t));
                respond(reply, result);
            }
            Command::ToggleTimer(reply) => {
                let result = self.session.toggle_timer().map(|t| self.commit(t));
                respond(reply, result);
            }
            Command::SubmitAnswer(input, reply) => {
                let (outcome, transition) = self.session.submit_answer(&input);
                respond(reply, Ok((outcome, self.commit(transition))));
            }
            Command::Reset(reply) => {
                let result = self.session.reset().map(|t| self.commit(t));
                respond(reply, result);
            }
        }
    }

    /// Carry out a transition and return the resulting snapshot
    fn commit(&mut self, transition: Transition) -> SessionSnapshot {
        self.apply(transition);
        self.session.snapshot()
    }

    fn handle_notice(&mut self, notice: Notice) {
        let transition = match notice {
            Notice::Tick { epoch, remaining } => self.session.tick(epoch, remaining),
            Notice::Finished { epoch } => self.session.finish(epoch),
            Notice::Fetched { epoch, result } => self.session.fetch_completed(epoch, result),
        };
        self.apply(transition);
    }

    fn apply(&mut self, transition: Transition) {
        if transition.is_empty() {
            return;
        }

        for effect in transition.effects {
            match effect {
                Effect::StartClock {
                    epoch,
                    duration_seconds,
                } => self.start_clock(epoch, duration_seconds),
                Effect::StopClock => self.clock.stop(),
                Effect::Fetch { epoch } => self.start_fetch(epoch),
            }
        }

        for event in transition.events {
            if self.events.send(event).is_err() {
                debug!("No presentation subscribers for session event");
            }
        }
        self.snapshot.send_replace(self.session.snapshot());
    }

    fn start_clock(&mut self, epoch: u64, duration_seconds: u64) {
        let tick_tx = self.notices.clone();
        let finish_tx = self.notices.clone();

        self.clock.start(
            duration_seconds,
            self.tick_interval,
            move |remaining| {
                if tick_tx.send(Notice::Tick { epoch, remaining }).is_err() {
                    debug!("Session runner gone, dropping tick");
                }
            },
            move || {
                if finish_tx.send(Notice::Finished { epoch }).is_err() {
                    debug!("Session runner gone, dropping expiry");
                }
            },
        );
    }

    fn start_fetch(&mut self, epoch: u64) {
        if let Some(previous) = self.fetch.take() {
            previous.abort();
        }

        let source = Arc::clone(&self.source);
        let notices = self.notices.clone();
        self.fetch = Some(tokio::spawn(async move {
            let result = source.fetch().await;
            if let Err(e) = &result {
                error!("Quiz fetch failed: {}", e);
            }
            if notices.send(Notice::Fetched { epoch, result }).is_err() {
                debug!("Session runner gone, dropping fetch result");
            }
        }));
    }
}
