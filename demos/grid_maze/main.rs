use std::{error::Error, fs, path::Path, thread};

use gridq::{
    train::{ChannelObserver, Event, LogObserver},
    Pacing, Trainer, TrainerConfig,
};

const NUM_EPISODES: u32 = 50;
const SPEED: u8 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = Path::new("demos/grid_maze");
    fs::create_dir_all(path.join("out"))?;

    let config = TrainerConfig {
        max_episodes: NUM_EPISODES,
        pacing: Pacing::from_speed(SPEED),
        ..Default::default()
    };
    let (observer, rx) = ChannelObserver::channel();
    let mut trainer = Trainer::new(config)?
        .with_observer(LogObserver)
        .with_observer(observer);
    let optimal = trainer.env().shortest_path_len();

    let handle = thread::spawn(move || -> gridq::Result<Vec<u32>> {
        let history = trainer.run()?.to_vec();
        Ok(history)
    });

    let mut wtr = csv::Writer::from_path(path.join("out/history.csv"))?;
    wtr.write_record(["episode", "steps"])?;

    for event in rx {
        match event {
            Event::EpisodeEnd { episode, steps } => {
                wtr.write_record([(episode + 1).to_string(), steps.to_string()])?;
            }
            Event::TrainingComplete { history } => {
                println!("steps per episode: {history:?}");
                println!("optimal: {optimal}");
            }
            _ => {}
        }
    }

    wtr.flush()?;

    handle.join().expect("training thread panicked")?;
    Ok(())
}
