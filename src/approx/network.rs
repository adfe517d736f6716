use std::path::Path;

use burn::{
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    record::{BinFileRecorder, FullPrecisionSettings},
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use nn::loss::{MseLoss, Reduction};

use super::Approximator;
use crate::{Error, Result};

/// A burn module used as the Q network of a [`BurnApproximator`]
///
/// ### Generics
/// - `B`: A burn autodiff backend
pub trait QNetwork<B: AutodiffBackend>: AutodiffModule<B> {
    /// Forward pass from a `[batch, state_dim]` input to `[batch, num_actions]` action values
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2>;
}

/// An [`Approximator`] backed by a burn [`QNetwork`], trained on the mean squared error between
/// its predictions and the supplied targets
///
/// ### Generics
/// - `B`: A burn autodiff backend
/// - `M`: The [`QNetwork`]
/// - `O`: An [`Optimizer`] for `M`
pub struct BurnApproximator<B, M, O>
where
    B: AutodiffBackend,
{
    model: M,
    optimizer: O,
    loss: MseLoss<B>,
    lr: f64,
    state_dim: usize,
    device: B::Device,
}

impl<B, M, O> BurnApproximator<B, M, O>
where
    B: AutodiffBackend,
    M: QNetwork<B>,
    O: Optimizer<M, B>,
{
    /// Wrap a model and its optimizer
    ///
    /// ### Arguments
    /// - `model` The [`QNetwork`] to train
    /// - `optimizer` The [`Optimizer`] applied on every [`fit`](Approximator::fit)
    /// - `lr` The learning rate passed to the optimizer
    /// - `state_dim` The length of every state fed to the model
    /// - `device` The device `model` lives on
    pub fn new(model: M, optimizer: O, lr: f64, state_dim: usize, device: B::Device) -> Self {
        Self {
            model,
            optimizer,
            loss: MseLoss::new(),
            lr,
            state_dim,
            device,
        }
    }

    /// The wrapped model
    pub fn model(&self) -> &M {
        &self.model
    }
}

/// Stack equally sized rows into a `[rows, width]` tensor
fn to_tensor<B: Backend, R: AsRef<[f32]>>(
    rows: &[R],
    width: usize,
    what: &'static str,
    device: &B::Device,
) -> Result<Tensor<B, 2>> {
    let mut values = Vec::with_capacity(rows.len() * width);
    for row in rows {
        let row = row.as_ref();
        if row.len() != width {
            return Err(Error::DimensionMismatch {
                what,
                expected: width,
                actual: row.len(),
            });
        }
        values.extend_from_slice(row);
    }

    let data = Data::new(values, Shape::new([rows.len(), width]));
    Ok(Tensor::from_data(data.convert::<B::FloatElem>(), device))
}

impl<B, M, O> Approximator for BurnApproximator<B, M, O>
where
    B: AutodiffBackend,
    M: QNetwork<B>,
    O: Optimizer<M, B>,
{
    type Params = M;

    fn predict<S: AsRef<[f32]>>(&self, states: &[S]) -> Result<Vec<Vec<f32>>> {
        let input = to_tensor::<B, _>(states, self.state_dim, "state", &self.device)?;
        let output = self.model.forward(input).into_data().convert::<f32>();

        let [_, num_actions] = output.shape.dims;
        if num_actions == 0 {
            return Err(Error::Approximator("model produced no action values".into()));
        }

        Ok(output
            .value
            .chunks(num_actions)
            .map(<[f32]>::to_vec)
            .collect())
    }

    fn fit<S: AsRef<[f32]>>(&mut self, states: &[S], targets: &[Vec<f32>]) -> Result<f32> {
        if targets.len() != states.len() {
            return Err(Error::DimensionMismatch {
                what: "target batch",
                expected: states.len(),
                actual: targets.len(),
            });
        }

        let input = to_tensor::<B, _>(states, self.state_dim, "state", &self.device)?;
        let output = self.model.forward(input);
        let [_, num_actions] = output.dims();
        let targets = to_tensor::<B, _>(targets, num_actions, "target", &self.device)?;

        let loss = self.loss.forward(output, targets, Reduction::Mean);
        let value = loss.clone().into_scalar().elem::<f32>();

        // Perform backpropagation on the model
        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optimizer.step(self.lr, self.model.clone(), grads);

        Ok(value)
    }

    fn parameters(&self) -> Self::Params {
        self.model.clone()
    }

    fn set_parameters(&mut self, params: Self::Params) {
        self.model = params;
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.model
            .clone()
            .save_file(
                path.to_path_buf(),
                &BinFileRecorder::<FullPrecisionSettings>::new(),
            )
            .map_err(|err| Error::Record(format!("{err:?}")))
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.model = self
            .model
            .clone()
            .load_file(
                path.to_path_buf(),
                &BinFileRecorder::<FullPrecisionSettings>::new(),
                &self.device,
            )
            .map_err(|err| Error::Record(format!("{err:?}")))?;
        Ok(())
    }
}
