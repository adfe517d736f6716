use burn::{
    prelude::*,
    tensor::{activation::relu, backend::AutodiffBackend},
};
use dqn::approx::QNetwork;
use nn::{Linear, LinearConfig};

#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
}

#[derive(Config, Debug)]
pub struct ModelConfig {
    state_dim: usize,
    num_actions: usize,
    #[config(default = 64)]
    hidden: usize,
}

impl ModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        Model {
            fc1: LinearConfig::new(self.state_dim, self.hidden).init(device),
            fc2: LinearConfig::new(self.hidden, self.hidden).init(device),
            fc3: LinearConfig::new(self.hidden, self.num_actions).init(device),
        }
    }
}

impl<B: AutodiffBackend> QNetwork<B> for Model<B> {
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(input));
        let x = relu(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}
