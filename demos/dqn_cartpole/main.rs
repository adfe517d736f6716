use std::path::Path;

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    optim::AdamWConfig,
    prelude::*,
};
use dqn::{
    algo::{DQNAgent, DQNAgentConfig},
    approx::BurnApproximator,
    env::Environment,
    gym::CartPole,
};
use gym_rs::utils::renderer::RenderMode;
use model::{Model, ModelConfig};

mod model;

type DQNBackend = Autodiff<NdArray>;

const EVAL_EPISODES: usize = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let device = NdArrayDevice::default();
    let mut env = CartPole::new(RenderMode::None);

    let config = DQNAgentConfig::new(4, env.num_actions())
        .with_memory_capacity(2000)
        .with_batch_size(32)
        .with_target_sync_period(5)
        .with_solved_threshold(195.0);
    config.save("dqn_cartpole_config.json")?;

    let model_config = ModelConfig::new(config.state_dim, config.num_actions);
    let optimizer = || AdamWConfig::new().init::<DQNBackend, Model<DQNBackend>>();
    let online = BurnApproximator::<DQNBackend, _, _>::new(
        model_config.init::<DQNBackend>(&device),
        optimizer(),
        config.lr,
        config.state_dim,
        device.clone(),
    );
    let target = BurnApproximator::<DQNBackend, _, _>::new(
        model_config.init::<DQNBackend>(&device),
        optimizer(),
        config.lr,
        config.state_dim,
        device,
    );
    let mut agent = DQNAgent::new(online, target, config)?;

    let report = agent.train(&mut env)?;
    println!(
        "trained for {} episodes ({})",
        report.episodes,
        if report.solved { "solved" } else { "not solved" }
    );

    let rewards = agent.evaluate(&mut env, EVAL_EPISODES)?;
    println!("evaluation rewards: {:?}", rewards);

    agent.save(Path::new("dqn_cartpole_model"))?;
    env.close();

    Ok(())
}
