// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Async host for a [`SessionStateMachine`].
//!
//! One tokio task owns the machine, the duration timer and the position
//! subscription. Callers send commands over a channel and watch
//! [`TrackerStatus`] snapshots, so every mutation is serialized on that task.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

use crate::models::{validate_title, ActivityType, GeoPoint, NewActivity};
use crate::services::ActivityStore;
use crate::time_utils::utc_from_millis;
use crate::tracking::clock::Clock;
use crate::tracking::error::TrackingError;
use crate::tracking::sampler::{GeoSampler, PositionEvent, PositionSource, SamplingError, Subscription};
use crate::tracking::session::{Session, SessionState, SessionStateMachine, Transition};
use crate::tracking::validator::ensure_savable;

const COMMAND_BUFFER: usize = 32;

/// Duration timer cadence. Ticks accrue whole seconds and restart from the
/// tick time, so any other period loses or misreports time.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Tracker settings.
#[derive(Debug, Clone, Default)]
pub struct TrackerOptions {
    /// Activity type of the first session.
    pub activity_type: ActivityType,
}

/// Live view published after every command, sample and tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerStatus {
    pub session: Session,
    /// Most recent position source failure; cleared by the next good fix.
    pub sampling_error: Option<SamplingError>,
    /// Fixes dropped for out-of-range coordinates.
    pub rejected_samples: u32,
}

/// What the user supplies when saving a stopped session.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub user_id: u64,
    pub title: String,
    /// Overrides the session's activity type.
    pub activity_type: Option<ActivityType>,
}

enum Control {
    Start(Option<GeoPoint>),
    Pause,
    Stop,
    Reset,
    SetActivityType(ActivityType),
}

enum Command {
    Control {
        control: Control,
        reply: oneshot::Sender<Transition>,
    },
    Save {
        request: SaveRequest,
        reply: oneshot::Sender<Result<u64, TrackingError>>,
    },
}

/// Handle to a running tracker task. Dropping it stops the task and
/// releases its timer and position subscription.
pub struct ActivityTracker {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<TrackerStatus>,
    task: JoinHandle<()>,
}

impl ActivityTracker {
    /// Spawn the tracker task on the current tokio runtime.
    pub fn spawn(
        source: Arc<dyn PositionSource>,
        store: Arc<dyn ActivityStore>,
        clock: Arc<dyn Clock>,
        options: TrackerOptions,
    ) -> Self {
        let machine = SessionStateMachine::new(options.activity_type);
        let (status_tx, status) = watch::channel(TrackerStatus {
            session: machine.snapshot(),
            ..TrackerStatus::default()
        });
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let worker = TrackerTask {
            machine,
            sampler: GeoSampler,
            source,
            store,
            clock,
            ticker: None,
            feed: None,
            sampling_error: None,
            rejected_samples: 0,
            status_tx,
        };
        let task = tokio::spawn(worker.run(command_rx));

        Self {
            commands,
            status,
            task,
        }
    }

    /// Start a session, resume a paused one, or ingest `point` while tracking.
    pub async fn start(&self, point: Option<GeoPoint>) -> Result<Transition, TrackingError> {
        self.control(Control::Start(point)).await
    }

    pub async fn pause(&self) -> Result<Transition, TrackingError> {
        self.control(Control::Pause).await
    }

    pub async fn stop(&self) -> Result<Transition, TrackingError> {
        self.control(Control::Stop).await
    }

    pub async fn reset(&self) -> Result<Transition, TrackingError> {
        self.control(Control::Reset).await
    }

    pub async fn set_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Transition, TrackingError> {
        self.control(Control::SetActivityType(activity_type)).await
    }

    /// Save the stopped session. On success the session is reset.
    pub async fn save(&self, request: SaveRequest) -> Result<u64, TrackingError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Save { request, reply })
            .await
            .map_err(|_| TrackingError::TrackerClosed)?;
        rx.await.map_err(|_| TrackingError::TrackerClosed)?
    }

    /// Latest published status.
    pub fn status(&self) -> TrackerStatus {
        self.status.borrow().clone()
    }

    /// Receiver for live display binding.
    pub fn watch(&self) -> watch::Receiver<TrackerStatus> {
        self.status.clone()
    }

    async fn control(&self, control: Control) -> Result<Transition, TrackingError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Control { control, reply })
            .await
            .map_err(|_| TrackingError::TrackerClosed)?;
        rx.await.map_err(|_| TrackingError::TrackerClosed)
    }
}

impl Drop for ActivityTracker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Position subscription together with its event channel.
struct Feed {
    _subscription: Subscription,
    events: mpsc::UnboundedReceiver<PositionEvent>,
}

struct TrackerTask {
    machine: SessionStateMachine,
    sampler: GeoSampler,
    source: Arc<dyn PositionSource>,
    store: Arc<dyn ActivityStore>,
    clock: Arc<dyn Clock>,
    ticker: Option<Interval>,
    feed: Option<Feed>,
    sampling_error: Option<SamplingError>,
    rejected_samples: u32,
    status_tx: watch::Sender<TrackerStatus>,
}

impl TrackerTask {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                event = next_event(&mut self.feed) => match event {
                    Some(event) => self.handle_position(event),
                    None => {
                        tracing::debug!("Position source ended");
                        self.feed = None;
                    }
                },
                _ = next_tick(&mut self.ticker) => self.handle_tick(),
            }
        }
        tracing::debug!("Tracker handle dropped, shutting down");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Control { control, reply } => {
                let transition = self.apply(control);
                let _ = reply.send(transition);
            }
            Command::Save { request, reply } => {
                let result = self.save(request).await;
                let _ = reply.send(result);
            }
        }
        self.publish();
    }

    fn apply(&mut self, control: Control) -> Transition {
        let now_ms = self.clock.now_ms();
        let transition = match control {
            Control::Start(point) => self.machine.start(now_ms, point),
            Control::Pause => self.machine.pause(),
            Control::Stop => self.machine.stop(),
            Control::Reset => self.machine.reset(),
            Control::SetActivityType(activity_type) => {
                self.machine.set_activity_type(activity_type)
            }
        };

        if transition.arms_timer() {
            self.arm();
        } else if transition.cancels_timer() {
            self.disarm();
        }
        if transition == Transition::Reset {
            self.rejected_samples = 0;
        }

        match transition {
            Transition::Ignored => {}
            Transition::Started | Transition::Stopped => {
                let session = self.machine.session();
                tracing::info!(
                    state = ?session.state(),
                    activity_type = session.activity_type().as_str(),
                    distance_km = session.distance_km(),
                    duration_sec = session.duration_sec(),
                    points = session.route().len(),
                    "Session transition"
                );
            }
            other => tracing::debug!(transition = ?other, "Session transition"),
        }
        transition
    }

    /// Arm the duration timer and subscribe to positions for a new run.
    fn arm(&mut self) {
        let start = tokio::time::Instant::now() + TICK_INTERVAL;
        let mut ticker = tokio::time::interval_at(start, TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);

        let (sink, events) = mpsc::unbounded_channel();
        let subscription = self.source.subscribe(sink);
        self.feed = Some(Feed {
            _subscription: subscription,
            events,
        });
        self.sampling_error = None;
        self.rejected_samples = 0;
    }

    /// Cancel the duration timer and the position subscription.
    fn disarm(&mut self) {
        self.ticker = None;
        self.feed = None;
        self.sampling_error = None;
    }

    fn handle_position(&mut self, event: PositionEvent) {
        match event {
            PositionEvent::Fix(fix) => {
                if self.machine.state() != SessionState::Tracking {
                    tracing::trace!("Discarding fix while not tracking");
                    return;
                }
                match self.sampler.normalize(&fix) {
                    Ok(point) => {
                        self.sampling_error = None;
                        self.machine.start(self.clock.now_ms(), Some(point));
                    }
                    Err(e) => {
                        self.rejected_samples += 1;
                        tracing::warn!(error = %e, "Rejected position fix");
                    }
                }
            }
            PositionEvent::Error(e) => {
                tracing::warn!(code = e.code.code(), error = %e.message, "Position source error");
                self.sampling_error = Some(e);
            }
        }
        self.publish();
    }

    fn handle_tick(&mut self) {
        if let Transition::Ticked { added_sec } = self.machine.tick(self.clock.now_ms()) {
            tracing::trace!(added_sec, "Duration tick");
        }
        self.publish();
    }

    async fn save(&mut self, request: SaveRequest) -> Result<u64, TrackingError> {
        let session = self.machine.session();
        if session.state() != SessionState::Stopped {
            return Err(TrackingError::NotStopped(session.state()));
        }
        ensure_savable(session)?;
        validate_title(&request.title).map_err(TrackingError::InvalidTitle)?;

        let date = utc_from_millis(self.clock.now_ms());
        let activity_type = request
            .activity_type
            .unwrap_or_else(|| session.activity_type());
        let payload = NewActivity::from_session(
            session,
            request.user_id,
            &request.title,
            activity_type,
            date,
        );

        let id = self.store.save(payload).await?;
        tracing::info!(
            user_id = request.user_id,
            activity_id = id,
            distance_km = session.distance_km(),
            duration_sec = session.duration_sec(),
            "Activity saved"
        );

        self.machine.reset();
        Ok(id)
    }

    fn publish(&self) {
        self.status_tx.send_replace(TrackerStatus {
            session: self.machine.snapshot(),
            sampling_error: self.sampling_error.clone(),
            rejected_samples: self.rejected_samples,
        });
    }
}

async fn next_event(feed: &mut Option<Feed>) -> Option<PositionEvent> {
    match feed {
        Some(feed) => feed.events.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
