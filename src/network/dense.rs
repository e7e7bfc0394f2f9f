//! Dense feed-forward network inference

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }
}

/// Fully connected layer computing `activation(W x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Row-major weights, one row per output unit
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>, activation: Activation) -> Result<Self> {
        let layer = Self {
            weights,
            bias,
            activation,
        };
        layer.validate()?;
        Ok(layer)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(Error::invalid_config("dense layer has no output units"));
        }
        let input_width = self.weights[0].len();
        if input_width == 0 {
            return Err(Error::invalid_config("dense layer has no inputs"));
        }
        if self.weights.iter().any(|row| row.len() != input_width) {
            return Err(Error::invalid_config("dense layer weight rows differ in width"));
        }
        if self.bias.len() != self.weights.len() {
            return Err(Error::invalid_config(format!(
                "dense layer has {} bias terms for {} outputs",
                self.bias.len(),
                self.weights.len()
            )));
        }
        Ok(())
    }

    pub fn input_width(&self) -> usize {
        self.weights[0].len()
    }

    pub fn output_width(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Stack of dense layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DenseLayer>", into = "Vec<DenseLayer>")]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Build a network, checking that consecutive layer widths agree.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::invalid_config("network has no layers"));
        }
        for layer in &layers {
            layer.validate()?;
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_width() != pair[1].input_width() {
                return Err(Error::invalid_config(format!(
                    "layer {i} outputs {} values but layer {} expects {}",
                    pair[0].output_width(),
                    i + 1,
                    pair[1].input_width()
                )));
            }
        }
        Ok(Self { layers })
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].input_width()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].output_width()
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_width() {
            return Err(Error::Network {
                message: format!(
                    "expected {} inputs, got {}",
                    self.input_width(),
                    input.len()
                ),
            });
        }
        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        Ok(activations)
    }
}

impl TryFrom<Vec<DenseLayer>> for DenseNetwork {
    type Error = Error;

    fn try_from(layers: Vec<DenseLayer>) -> Result<Self> {
        Self::new(layers)
    }
}

impl From<DenseNetwork> for Vec<DenseLayer> {
    fn from(network: DenseNetwork) -> Self {
        network.layers
    }
}
