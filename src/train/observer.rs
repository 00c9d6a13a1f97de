use std::{
    error::Error,
    sync::mpsc::{self, Receiver, Sender},
};

use log::{debug, info, trace};

use crate::gym::{Action, Pos};

/// Outcome of an observer callback
///
/// Failures are logged by the trainer and otherwise ignored; they never affect learning.
pub type ObserverResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Receives progress of a training run, typically to render or plot it
///
/// Every callback has a no-op default so observers implement only what they consume.
/// Callbacks run after the learning step they describe has been applied.
pub trait Observer {
    fn on_episode_start(&mut self, _episode: u32, _start: Pos) -> ObserverResult {
        Ok(())
    }

    /// `state` is the agent's position after taking `action`
    fn on_step(&mut self, _state: Pos, _action: Action, _reward: f64, _step: u32) -> ObserverResult {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: u32, _steps: u32) -> ObserverResult {
        Ok(())
    }

    /// `history` holds the step count of every completed episode, in order
    fn on_training_complete(&mut self, _history: &[u32]) -> ObserverResult {
        Ok(())
    }
}

/// A training event as sent by the [`ChannelObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    EpisodeStart {
        episode: u32,
        start: Pos,
    },
    Step {
        state: Pos,
        action: Action,
        reward: f64,
        step: u32,
    },
    EpisodeEnd {
        episode: u32,
        steps: u32,
    },
    TrainingComplete {
        history: Vec<u32>,
    },
}

/// Forwards every event over an mpsc channel, e.g. to a render thread
///
/// A dropped receiver shows up as an observer failure on every subsequent event.
pub struct ChannelObserver {
    tx: Sender<Event>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx }
    }

    /// Create an observer together with the receiving end of its channel
    pub fn channel() -> (Self, Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: Event) -> ObserverResult {
        self.tx.send(event)?;
        Ok(())
    }
}

impl Observer for ChannelObserver {
    fn on_episode_start(&mut self, episode: u32, start: Pos) -> ObserverResult {
        self.send(Event::EpisodeStart { episode, start })
    }

    fn on_step(&mut self, state: Pos, action: Action, reward: f64, step: u32) -> ObserverResult {
        self.send(Event::Step {
            state,
            action,
            reward,
            step,
        })
    }

    fn on_episode_end(&mut self, episode: u32, steps: u32) -> ObserverResult {
        self.send(Event::EpisodeEnd { episode, steps })
    }

    fn on_training_complete(&mut self, history: &[u32]) -> ObserverResult {
        self.send(Event::TrainingComplete {
            history: history.to_vec(),
        })
    }
}

/// Reports training progress through the [`log`] facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_episode_start(&mut self, episode: u32, start: Pos) -> ObserverResult {
        debug!("episode {} starting at {:?}", episode + 1, start);
        Ok(())
    }

    fn on_step(&mut self, state: Pos, action: Action, reward: f64, step: u32) -> ObserverResult {
        trace!("step {step}: {action} -> {state:?} (reward {reward})");
        Ok(())
    }

    fn on_episode_end(&mut self, episode: u32, steps: u32) -> ObserverResult {
        info!("episode {} finished in {} steps", episode + 1, steps);
        Ok(())
    }

    fn on_training_complete(&mut self, history: &[u32]) -> ObserverResult {
        let best = history.iter().min().copied().unwrap_or_default();
        info!(
            "training complete after {} episodes, best episode took {} steps",
            history.len(),
            best
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_observer_forwards_events() {
        let (mut observer, rx) = ChannelObserver::channel();
        observer.on_episode_start(0, (0, 0)).unwrap();
        observer.on_step((0, 1), Action::Right, 0.0, 1).unwrap();
        observer.on_episode_end(0, 1).unwrap();
        observer.on_training_complete(&[1]).unwrap();

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            [
                Event::EpisodeStart { episode: 0, start: (0, 0) },
                Event::Step { state: (0, 1), action: Action::Right, reward: 0.0, step: 1 },
                Event::EpisodeEnd { episode: 0, steps: 1 },
                Event::TrainingComplete { history: vec![1] },
            ]
        );
    }

    #[test]
    fn disconnected_channel_is_an_observer_failure() {
        let (mut observer, rx) = ChannelObserver::channel();
        drop(rx);
        assert!(observer.on_episode_end(0, 3).is_err());
    }
}
