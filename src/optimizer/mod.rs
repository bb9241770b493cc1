use ndarray::{Array, Array1, Array2, Dimension, Zip};
use serde::{Serialize, Deserialize};

/// A parameter update rule.
///
/// `layer` identifies the parameter set so stateful optimizers can keep
/// separate moments per layer. [`Optimizer::step`] is called once after every
/// layer of a training batch has been updated.
pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
    fn step(&mut self) {}
}

/// Optimizer selection as it appears in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OptimizerKind {
    Sgd,
    Adam {
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        /// Per-step learning rate decay: `lr / (1 + decay * steps)`.
        #[serde(default)]
        decay: f32,
    },
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::Adam { beta1: 0.9, beta2: 0.999, epsilon: 1e-8, decay: 0.0 }
    }
}

impl OptimizerKind {
    pub fn build(&self) -> OptimizerWrapper {
        match *self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam { beta1, beta2, epsilon, decay } => {
                OptimizerWrapper::Adam(Adam::new(beta1, beta2, epsilon).with_decay(decay))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with per-layer first and second moments.
///
/// Moment buffers are created on the first update of each layer, so the
/// optimizer can be built before the network it trains.
#[derive(Debug, Clone)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    pub decay: f32,
    m_weights: Vec<Option<Array2<f32>>>,
    v_weights: Vec<Option<Array2<f32>>>,
    m_biases: Vec<Option<Array1<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
    /// Time step used for bias correction, starting at 1.
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            decay: 0.0,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 1,
        }
    }

    pub fn default_params() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    /// Learning rate after decay for the current step.
    pub fn decayed_rate(&self, learning_rate: f32) -> f32 {
        learning_rate / (1.0 + self.decay * (self.t - 1) as f32)
    }

    fn apply<D: Dimension>(
        &self,
        m: &mut Array<f32, D>,
        v: &mut Array<f32, D>,
        params: &mut Array<f32, D>,
        gradients: &Array<f32, D>,
        learning_rate: f32,
    ) {
        let (beta1, beta2) = (self.beta1, self.beta2);
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let m_correction = 1.0 - beta1.powi(self.t);
        let v_correction = 1.0 - beta2.powi(self.t);
        let epsilon = self.epsilon;
        let learning_rate = self.decayed_rate(learning_rate);

        Zip::from(params).and(&*m).and(&*v).for_each(|p, &m, &v| {
            let m_hat = m / m_correction;
            let v_hat = v / v_correction;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        });
    }
}

fn moment<D: Dimension>(slots: &mut Vec<Option<Array<f32, D>>>, layer: usize, dim: D) -> Array<f32, D> {
    if slots.len() <= layer {
        slots.resize(layer + 1, None);
    }
    match slots[layer].take() {
        Some(m) if m.raw_dim() == dim => m,
        _ => Array::zeros(dim),
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let mut m = moment(&mut self.m_weights, layer, weights.raw_dim());
        let mut v = moment(&mut self.v_weights, layer, weights.raw_dim());
        self.apply(&mut m, &mut v, weights, gradients, learning_rate);
        self.m_weights[layer] = Some(m);
        self.v_weights[layer] = Some(v);
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let mut m = moment(&mut self.m_biases, layer, biases.raw_dim());
        let mut v = moment(&mut self.v_biases, layer, biases.raw_dim());
        self.apply(&mut m, &mut v, biases, gradients, learning_rate);
        self.m_biases[layer] = Some(m);
        self.v_biases[layer] = Some(v);
    }

    fn step(&mut self) {
        self.t = self.t.saturating_add(1);
    }
}
