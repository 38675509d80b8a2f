//! Background task that owns a running exam session.
//!
//! The task is the only writer: answer selections, submit requests and
//! countdown ticks are all applied in one `select!` loop, so a tick can never
//! interleave with a half-applied command. Readers watch [`SessionSnapshot`]s.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use exam_core::model::QuestionId;
use exam_core::overview::SessionOverview;
use exam_core::session::{Dispatch, ExamSession, SessionEvent};

use super::view::{QuestionView, SessionOutcome, SessionSnapshot};
use crate::Clock;
use crate::error::ExamServiceError;

/// Interval between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;

enum Command {
    Dispatch {
        event: SessionEvent,
        reply: oneshot::Sender<Dispatch>,
    },
    Question {
        index: usize,
        reply: oneshot::Sender<Option<QuestionView>>,
    },
    Overview {
        reply: oneshot::Sender<Option<SessionOverview>>,
    },
    Outcome {
        reply: oneshot::Sender<Option<SessionOutcome>>,
    },
    Shutdown,
}

/// Cloneable handle to a session runner.
///
/// The runner stops when [`SessionHandle::shutdown`] is called or the last
/// handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

/// Move `session` onto a new tokio task and return a handle to it.
///
/// The countdown ticks every [`TICK_PERIOD`] while the session's timer is
/// active and stops for good once the session is submitted.
#[must_use]
pub fn spawn_runner(session: ExamSession, clock: Clock) -> SessionHandle {
    let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
    let (publisher, snapshots) = watch::channel(SessionSnapshot::of(&session));
    tokio::spawn(run(session, clock, inbox, publisher));
    SessionHandle {
        commands,
        snapshots,
    }
}

impl SessionHandle {
    /// Apply any session event.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn dispatch(&self, event: SessionEvent) -> Result<Dispatch, ExamServiceError> {
        self.request(|reply| Command::Dispatch { event, reply }).await
    }

    /// Toggle `option` on a question.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn select(
        &self,
        question_id: QuestionId,
        option: impl Into<String>,
    ) -> Result<Dispatch, ExamServiceError> {
        self.dispatch(SessionEvent::Select {
            question_id,
            option: option.into(),
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn request_submit(&self) -> Result<Dispatch, ExamServiceError> {
        self.dispatch(SessionEvent::RequestSubmit).await
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn cancel_submit(&self) -> Result<Dispatch, ExamServiceError> {
        self.dispatch(SessionEvent::CancelSubmit).await
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn approve_submit(&self) -> Result<Dispatch, ExamServiceError> {
        self.dispatch(SessionEvent::ApproveSubmit).await
    }

    /// Question at 1-based `index` with the current selection.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn question(&self, index: usize) -> Result<Option<QuestionView>, ExamServiceError> {
        self.request(|reply| Command::Question { index, reply }).await
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn overview(&self) -> Result<Option<SessionOverview>, ExamServiceError> {
        self.request(|reply| Command::Overview { reply }).await
    }

    /// Results and review; `None` until submitted.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::RunnerClosed` if the runner has stopped.
    pub async fn outcome(&self) -> Result<Option<SessionOutcome>, ExamServiceError> {
        self.request(|reply| Command::Outcome { reply }).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every snapshot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the runner and wait for it to exit. Cancels the countdown.
    pub async fn shutdown(&self) {
        // A closed channel means the runner is already gone.
        let _ = self.commands.send(Command::Shutdown).await;
        self.commands.closed().await;
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ExamServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| ExamServiceError::RunnerClosed)?;
        response.await.map_err(|_| ExamServiceError::RunnerClosed)
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

fn new_ticker() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn run(
    mut session: ExamSession,
    clock: Clock,
    mut inbox: mpsc::Receiver<Command>,
    publisher: watch::Sender<SessionSnapshot>,
) {
    let mut ticker = session.timer_active().then(new_ticker);
    tracing::info!(
        status = %session.status(),
        questions = session.questions().len(),
        "session runner started"
    );

    loop {
        tokio::select! {
            command = inbox.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Dispatch { event, reply } => {
                        let outcome = session.dispatch(event, clock.now());
                        let _ = reply.send(outcome);
                    }
                    Command::Question { index, reply } => {
                        let _ = reply.send(QuestionView::of(&session, index));
                    }
                    Command::Overview { reply } => {
                        let _ = reply.send(session.overview());
                    }
                    Command::Outcome { reply } => {
                        let _ = reply.send(SessionOutcome::of(&session));
                    }
                    Command::Shutdown => break,
                }
            }
            () = next_tick(&mut ticker) => {
                session.dispatch(SessionEvent::Tick, clock.now());
            }
        }

        if ticker.is_some() && !session.timer_active() {
            tracing::debug!(status = %session.status(), "countdown stopped");
            ticker = None;
        }
        publisher.send_if_modified(|current| {
            let next = SessionSnapshot::of(&session);
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    tracing::info!(status = %session.status(), "session runner stopped");
}
