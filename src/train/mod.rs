use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use log::{debug, trace, warn};

use crate::{
    algo::{QLearning, ValueTable},
    config::TrainerConfig,
    env::Environment,
    exploration::EpsilonGreedy,
    gym::{GridWorld, Pos},
    Result,
};

mod observer;

pub use observer::{ChannelObserver, Event, LogObserver, Observer, ObserverResult};

/// Where a [`Trainer`] is in its run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No training in progress
    #[default]
    Idle,
    /// About to reset the environment for a new episode
    EpisodeStart,
    /// Taking steps until the goal is reached
    Stepping,
    /// About to record the finished episode
    EpisodeEnd,
    /// Every episode has been run
    Done,
    /// The run was stopped through a [`StopHandle`]
    Stopped,
}

impl Phase {
    /// True for the terminal phases
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Done | Phase::Stopped)
    }
}

/// Requests a running [`Trainer`] to stop, from any thread
///
/// The request is honoured between steps: the step in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Runs Q-learning episodes on a [`GridWorld`]
///
/// The trainer is a state machine over [`Phase`] and can be driven in two ways:
/// - cooperatively, by an external scheduler calling [`tick`](Self::tick) once per
///   transition and redrawing in between
/// - blocking, with [`run`](Self::run) ticking to completion on the current thread
///
/// Progress is reported to the attached [`Observer`]s.
pub struct Trainer {
    config: TrainerConfig,
    env: GridWorld,
    table: ValueTable,
    policy: EpsilonGreedy,
    learner: QLearning,
    observers: Vec<Box<dyn Observer + Send>>,
    stop: StopHandle,
    phase: Phase,
    state: Pos,
    episode: u32,
    step_count: u32,
    history: Vec<u32>,
}

impl Trainer {
    /// **Errors** if the configuration is invalid
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;

        let env = GridWorld::new(config.rows, config.cols)?;
        let policy = match config.seed {
            Some(seed) => EpsilonGreedy::with_seed(config.epsilon, seed)?,
            None => EpsilonGreedy::new(config.epsilon)?,
        };
        let learner = QLearning::new(config.alpha, config.gamma)?;

        Ok(Self {
            config,
            env,
            table: ValueTable::new(env),
            policy,
            learner,
            observers: Vec::new(),
            stop: StopHandle::default(),
            phase: Phase::Idle,
            state: env.reset(),
            episode: 0,
            step_count: 0,
            history: Vec::new(),
        })
    }

    /// Attach an observer
    pub fn with_observer(mut self, observer: impl Observer + Send + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// A handle that stops this trainer's current run
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn env(&self) -> &GridWorld {
        &self.env
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Mutable access to the learned values, e.g. to seed them before a run
    pub fn table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The agent's current position
    pub fn state(&self) -> Pos {
        self.state
    }

    /// Index of the current episode, equal to the number of completed episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Steps taken in the current episode
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Step counts of the completed episodes, in order
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Forget everything learned and return to [`Phase::Idle`]
    pub fn restart(&mut self) {
        debug!("restarting training");
        self.table.clear();
        self.history.clear();
        self.episode = 0;
        self.step_count = 0;
        self.state = self.env.reset();
        self.phase = Phase::Idle;
        self.stop.reset();
    }

    /// Advance the state machine by one transition
    ///
    /// A pending stop request ends the run before anything else happens. Ticking a
    /// finished trainer is a no-op.
    ///
    /// **Returns** the phase after the transition
    pub fn tick(&mut self) -> Result<Phase> {
        if self.phase.is_finished() {
            return Ok(self.phase);
        }
        if self.stop.is_stopped() {
            warn!(
                "training stopped after {} of {} episodes",
                self.history.len(),
                self.config.max_episodes
            );
            self.finish(Phase::Stopped);
            return Ok(self.phase);
        }

        match self.phase {
            Phase::Idle => {
                debug!(
                    "training {} episodes on a {}x{} grid",
                    self.config.max_episodes,
                    self.env.rows(),
                    self.env.cols()
                );
                self.phase = Phase::EpisodeStart;
            }
            Phase::EpisodeStart => {
                self.state = self.env.reset();
                self.step_count = 0;
                let (episode, start) = (self.episode, self.state);
                notify(&mut self.observers, |o| o.on_episode_start(episode, start));
                self.phase = Phase::Stepping;
            }
            Phase::Stepping => self.step()?,
            Phase::EpisodeEnd => {
                let (episode, steps) = (self.episode, self.step_count);
                self.history.push(steps);
                notify(&mut self.observers, |o| o.on_episode_end(episode, steps));

                self.episode += 1;
                if self.episode >= self.config.max_episodes {
                    self.finish(Phase::Done);
                } else {
                    self.phase = Phase::EpisodeStart;
                }
            }
            Phase::Done | Phase::Stopped => unreachable!("finished phases return early"),
        }

        Ok(self.phase)
    }

    /// Tick until the run is finished, sleeping between steps as configured by
    /// [`TrainerConfig::pacing`]
    ///
    /// **Returns** the step counts of the completed episodes
    pub fn run(&mut self) -> Result<&[u32]> {
        let pacing = self.config.pacing;
        loop {
            let before = self.phase;
            if self.tick()?.is_finished() {
                break;
            }
            match before {
                Phase::Stepping => pause(pacing.step_delay),
                Phase::EpisodeEnd => pause(pacing.episode_pause),
                _ => {}
            }
        }
        Ok(&self.history)
    }

    fn step(&mut self) -> Result<()> {
        let action = self.policy.select(self.state, &mut self.table)?;
        let transition = self.env.step(self.state, action)?;
        let value = self.learner.update(&mut self.table, &transition)?;

        trace!(
            "{:?} --{}--> {:?}, Q = {:.4}",
            transition.state,
            action,
            transition.next_state,
            value
        );

        self.state = transition.next_state;
        self.step_count += 1;

        let (state, reward, step) = (self.state, transition.reward, self.step_count);
        notify(&mut self.observers, |o| o.on_step(state, action, reward, step));

        let truncated = !transition.done
            && self
                .config
                .max_steps_per_episode
                .is_some_and(|max| self.step_count >= max);
        if truncated {
            warn!(
                "episode {} truncated after {} steps without reaching the goal",
                self.episode + 1,
                self.step_count
            );
        }
        if transition.done || truncated {
            self.phase = Phase::EpisodeEnd;
        }

        Ok(())
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        let history = &self.history;
        notify(&mut self.observers, |o| o.on_training_complete(history));
    }
}

fn notify(
    observers: &mut [Box<dyn Observer + Send>],
    mut f: impl FnMut(&mut dyn Observer) -> ObserverResult,
) {
    for observer in observers.iter_mut() {
        if let Err(e) = f(observer.as_mut()) {
            warn!("observer failed: {e}");
        }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
