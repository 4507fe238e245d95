// ============================================================
// Layer 5 — Recurrent Digit Classifier (Burn)
// ============================================================
// An image is read as a sequence of pixel rows. A single
// recurrent layer (GRU or LSTM) runs over the rows from a zero
// state, and its last hidden state is projected to 10 logits.
//
//   images [batch, seq_len, input_size]
//       │
//       ▼
//   RecurrentLayer (GRU | LSTM), unrolled over seq_len
//       │  last hidden state [batch, hidden]
//       ▼
//   Dropout (training only)
//       │
//       ▼
//   Linear(hidden → num_classes)  → logits [batch, num_classes]
//
// Both cells use fused gate projections: one Linear maps the
// input to every gate at once, another maps the previous hidden
// state, and the result is sliced into per-gate blocks.
//
// Reference: Hochreiter & Schmidhuber (1997) LSTM
//            Cho et al. (2014) GRU
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{sigmoid, softmax},
};

use crate::domain::cell::CellKind;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
#[derive(Config, Debug)]
pub struct RnnClassifierConfig {
    pub cell:        CellKind,
    /// Features per time step (pixels per row)
    pub input_size:  usize,
    /// Recurrent units
    pub hidden_size: usize,
    #[config(default = 10)]
    pub num_classes: usize,
    /// Drop probability applied to the last recurrent output
    #[config(default = 0.0)]
    pub dropout:     f64,
    /// Added to the forget gate pre-activation (LSTM only)
    #[config(default = 1.0)]
    pub forget_bias: f64,
}

impl RnnClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RnnClassifier<B> {
        let recurrent = match self.cell {
            CellKind::Gru  => RecurrentLayer::Gru(self.init_gru(device)),
            CellKind::Lstm => RecurrentLayer::Lstm(self.init_lstm(device)),
        };
        let dropout = DropoutConfig::new(self.dropout).init();
        let output  = LinearConfig::new(self.hidden_size, self.num_classes).init(device);
        RnnClassifier { recurrent, dropout, output }
    }

    fn init_lstm<B: Backend>(&self, device: &B::Device) -> LstmLayer<B> {
        let width = CellKind::Lstm.num_gates() * self.hidden_size;
        LstmLayer {
            input_gates:  LinearConfig::new(self.input_size, width).init(device),
            hidden_gates: LinearConfig::new(self.hidden_size, width)
                .with_bias(false)
                .init(device),
            d_hidden:     self.hidden_size,
            forget_bias:  self.forget_bias,
        }
    }

    fn init_gru<B: Backend>(&self, device: &B::Device) -> GruLayer<B> {
        let width = CellKind::Gru.num_gates() * self.hidden_size;
        GruLayer {
            input_gates:  LinearConfig::new(self.input_size, width).init(device),
            hidden_gates: LinearConfig::new(self.hidden_size, width).init(device),
            d_hidden:     self.hidden_size,
        }
    }
}

// ─── LSTM ─────────────────────────────────────────────────────────────────────
/// Hidden and cell state carried between LSTM steps, both [batch, hidden].
#[derive(Debug, Clone)]
pub struct LstmState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell:   Tensor<B, 2>,
}

/// Gate blocks are laid out `[input, candidate, forget, output]`.
#[derive(Module, Debug)]
pub struct LstmLayer<B: Backend> {
    pub input_gates:  Linear<B>,
    pub hidden_gates: Linear<B>,
    pub d_hidden:     usize,
    pub forget_bias:  f64,
}

impl<B: Backend> LstmLayer<B> {
    /// One time step: x_t [batch, input] → new state
    pub fn step(&self, x_t: Tensor<B, 2>, state: LstmState<B>) -> LstmState<B> {
        let [batch, _] = x_t.dims();
        let h = self.d_hidden;

        let gates = self.input_gates.forward(x_t)
            + self.hidden_gates.forward(state.hidden);

        let input     = sigmoid(gates.clone().slice([0..batch, 0..h]));
        let candidate = gates.clone().slice([0..batch, h..2 * h]).tanh();
        let forget    = sigmoid(gates.clone().slice([0..batch, 2 * h..3 * h]).add_scalar(self.forget_bias));
        let output    = sigmoid(gates.slice([0..batch, 3 * h..4 * h]));

        let cell   = forget * state.cell + input * candidate;
        let hidden = output * cell.clone().tanh();
        LstmState { hidden, cell }
    }

    /// Unroll over the whole sequence and return the last hidden state.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, seq_len, d_input] = x.dims();
        let device = x.device();
        let mut state = LstmState {
            hidden: Tensor::zeros([batch, self.d_hidden], &device),
            cell:   Tensor::zeros([batch, self.d_hidden], &device),
        };
        for t in 0..seq_len {
            let x_t = x.clone()
                .slice([0..batch, t..t + 1, 0..d_input])
                .reshape([batch, d_input]);
            state = self.step(x_t, state);
        }
        state.hidden
    }
}

// ─── GRU ──────────────────────────────────────────────────────────────────────
/// Gate blocks are laid out `[update, reset, candidate]`.
/// The reset gate is applied after the hidden projection:
/// `n = tanh(Wx·x + r ⊙ (Wh·h + bh))`.
#[derive(Module, Debug)]
pub struct GruLayer<B: Backend> {
    pub input_gates:  Linear<B>,
    pub hidden_gates: Linear<B>,
    pub d_hidden:     usize,
}

impl<B: Backend> GruLayer<B> {
    /// One time step: x_t [batch, input], hidden [batch, hidden] → new hidden
    pub fn step(&self, x_t: Tensor<B, 2>, hidden: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, _] = x_t.dims();
        let h = self.d_hidden;

        let xg = self.input_gates.forward(x_t);
        let hg = self.hidden_gates.forward(hidden.clone());

        let update = sigmoid(
            xg.clone().slice([0..batch, 0..h]) + hg.clone().slice([0..batch, 0..h]),
        );
        let reset = sigmoid(
            xg.clone().slice([0..batch, h..2 * h]) + hg.clone().slice([0..batch, h..2 * h]),
        );
        let candidate = (xg.slice([0..batch, 2 * h..3 * h])
            + reset * hg.slice([0..batch, 2 * h..3 * h]))
            .tanh();

        // z ⊙ h + (1 − z) ⊙ n  ==  n + z ⊙ (h − n)
        candidate.clone() + update * (hidden - candidate)
    }

    /// Unroll over the whole sequence and return the last hidden state.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, seq_len, d_input] = x.dims();
        let mut hidden = Tensor::zeros([batch, self.d_hidden], &x.device());
        for t in 0..seq_len {
            let x_t = x.clone()
                .slice([0..batch, t..t + 1, 0..d_input])
                .reshape([batch, d_input]);
            hidden = self.step(x_t, hidden);
        }
        hidden
    }
}

// ─── Classifier ───────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub enum RecurrentLayer<B: Backend> {
    Gru(GruLayer<B>),
    Lstm(LstmLayer<B>),
}

impl<B: Backend> RecurrentLayer<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        match self {
            RecurrentLayer::Gru(gru)   => gru.forward(x),
            RecurrentLayer::Lstm(lstm) => lstm.forward(x),
        }
    }
}

#[derive(Module, Debug)]
pub struct RnnClassifier<B: Backend> {
    pub recurrent: RecurrentLayer<B>,
    pub dropout:   Dropout,
    pub output:    Linear<B>,
}

impl<B: Backend> RnnClassifier<B> {
    /// images: [batch, seq_len, input_size] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        let last = self.recurrent.forward(images);
        self.output.forward(self.dropout.forward(last))
    }

    /// Logits plus mean cross-entropy against the integer targets.
    pub fn forward_classification(
        &self,
        images:  Tensor<B, 3>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Class probabilities: [batch, num_classes], rows sum to 1
    pub fn probabilities(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }
}
