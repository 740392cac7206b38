// ============================================================
// Layer 5 - End-to-End Memory Network (MemN2N)
// ============================================================
// Sukhbaatar et al. (2015), language-model variant.
//
// Parameters:
//   input_memory     A    (nwords + 1) x edim   memory keys
//   output_memory    C    (nwords + 1) x edim   memory values
//   temporal_input   T_A  mem_size x edim
//   temporal_output  T_B  mem_size x edim
//   hidden_to_hidden H    edim x edim           no bias
//   output           W    edim x nwords         no bias
//
// The extra embedding row belongs to the padding id. Padded
// slots are masked out of the attention, so that row never
// reaches the output.
//
// One hop:
//   p    = softmax(hid · Ainᵀ)            over memory slots
//   read = p · Bin
//   D    = H(hid) + read
//   hid  = [ D[:lindim] , relu(D[lindim:]) ]
//
// Reference: Burn Book §3 (Building Blocks)

use anyhow::{ensure, Result};
use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig, Initializer,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, softmax},
};

/// Attention score given to padded slots before the softmax
const MASKED_SCORE: f32 = -1.0e9;

#[derive(Config, Debug)]
pub struct MemN2NConfig {
    /// Real vocabulary size; also the padding id
    pub nwords: usize,
    /// Internal state dimension
    #[config(default = 150)]
    pub edim: usize,
    /// Units of the state that skip the nonlinearity
    #[config(default = 75)]
    pub lindim: usize,
    #[config(default = 6)]
    pub nhop: usize,
    #[config(default = 100)]
    pub mem_size: usize,
    /// Std of the normal weight initialisation
    #[config(default = 0.05)]
    pub init_std: f64,
}

impl MemN2NConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.nwords > 0, "vocabulary is empty");
        ensure!(self.edim > 0, "edim must be positive");
        ensure!(
            self.lindim <= self.edim,
            "lindim ({}) cannot exceed edim ({})",
            self.lindim,
            self.edim
        );
        ensure!(self.nhop > 0, "nhop must be positive");
        ensure!(self.mem_size > 0, "mem_size must be positive");
        ensure!(self.init_std > 0.0, "init_std must be positive");
        Ok(())
    }

    pub fn pad_id(&self) -> usize {
        self.nwords
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> MemN2N<B> {
        let initializer = Initializer::Normal { mean: 0.0, std: self.init_std };

        let embedding = |rows: usize| {
            EmbeddingConfig::new(rows, self.edim)
                .with_initializer(initializer.clone())
                .init(device)
        };
        let linear = |d_in: usize, d_out: usize| {
            LinearConfig::new(d_in, d_out)
                .with_bias(false)
                .with_initializer(initializer.clone())
                .init(device)
        };

        MemN2N {
            input_memory:     embedding(self.nwords + 1),
            output_memory:    embedding(self.nwords + 1),
            temporal_input:   embedding(self.mem_size),
            temporal_output:  embedding(self.mem_size),
            hidden_to_hidden: linear(self.edim, self.edim),
            output:           linear(self.edim, self.nwords),
            edim:             self.edim,
            lindim:           self.lindim,
            nhop:             self.nhop,
            pad_id:           self.pad_id(),
        }
    }
}

#[derive(Module, Debug)]
pub struct MemN2N<B: Backend> {
    pub input_memory:     Embedding<B>,
    pub output_memory:    Embedding<B>,
    pub temporal_input:   Embedding<B>,
    pub temporal_output:  Embedding<B>,
    pub hidden_to_hidden: Linear<B>,
    pub output:           Linear<B>,
    pub edim:             usize,
    pub lindim:           usize,
    pub nhop:             usize,
    pub pad_id:           usize,
}

impl<B: Backend> MemN2N<B> {
    /// context, time: [batch, mem_size], hidden: [batch, edim] → logits [batch, nwords]
    pub fn forward(
        &self,
        context: Tensor<B, 2, Int>,
        time:    Tensor<B, 2, Int>,
        hidden:  Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let [batch_size, mem_size] = context.dims();
        let padding = context.clone().equal_elem(self.pad_id as i64);

        let keys   = self.input_memory.forward(context.clone()) + self.temporal_input.forward(time.clone());
        let values = self.output_memory.forward(context) + self.temporal_output.forward(time);
        // [batch, edim, mem_size] for the score product
        let keys_t = keys.swap_dims(1, 2);

        let mut hid = hidden;
        for _ in 0..self.nhop {
            let scores = hid
                .clone()
                .unsqueeze_dim::<3>(1)
                .matmul(keys_t.clone())
                .reshape([batch_size, mem_size]);

            // Padded slots get exactly zero weight, even when the whole window is padding
            let attention = softmax(scores.mask_fill(padding.clone(), MASKED_SCORE), 1)
                .mask_fill(padding.clone(), 0.0);

            let read = attention
                .unsqueeze_dim::<3>(1)
                .matmul(values.clone())
                .reshape([batch_size, self.edim]);

            hid = self.split_activation(self.hidden_to_hidden.forward(hid) + read);
        }

        self.output.forward(hid)
    }

    /// Mean softmax cross-entropy of the batch
    pub fn forward_loss(
        &self,
        context: Tensor<B, 2, Int>,
        time:    Tensor<B, 2, Int>,
        hidden:  Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> Tensor<B, 1> {
        let logits = self.forward(context, time, hidden);
        CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, targets)
    }

    /// First `lindim` units stay linear, the rest go through ReLU.
    fn split_activation(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        if self.lindim == self.edim {
            return state;
        }
        if self.lindim == 0 {
            return relu(state);
        }
        let [batch_size, _] = state.dims();
        let linear = state.clone().slice([0..batch_size, 0..self.lindim]);
        let gated  = relu(state.slice([0..batch_size, self.lindim..self.edim]));
        Tensor::cat(vec![linear, gated], 1)
    }
}
