// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and
// `predict`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, enums, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::domain::{cell::CellKind, traits::Split};
use crate::ml::backend::BackendKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a GRU or LSTM classifier on MNIST
    Train(TrainArgs),

    /// Report test-set accuracy of the latest checkpoint
    Evaluate(EvaluateArgs),

    /// Classify one MNIST image with the latest checkpoint
    Predict(PredictArgs),
}

// ─── Flag values ──────────────────────────────────────────────────────────────
// The domain enums stay free of clap; these mirror them for parsing.

/// `--cell gru|lstm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CellArg {
    Gru,
    Lstm,
}

impl From<CellArg> for CellKind {
    fn from(c: CellArg) -> Self {
        match c {
            CellArg::Gru  => CellKind::Gru,
            CellArg::Lstm => CellKind::Lstm,
        }
    }
}

/// `--split train|test`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Train,
    Test,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Self {
        match s {
            SplitArg::Train => Split::Train,
            SplitArg::Test  => Split::Test,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding the four MNIST IDX files (raw or .gz)
    #[arg(long, default_value = "MNIST_data")]
    pub data_dir: String,

    /// Directory to save checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Recurrent cell type
    #[arg(long, value_enum, default_value_t = CellArg::Lstm)]
    pub cell: CellArg,

    #[arg(long, value_enum, default_value_t = BackendKind::Wgpu)]
    pub backend: BackendKind,

    /// Number of recurrent units
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    /// Time steps per image; seq_len × input_size must be 784
    #[arg(long, default_value_t = 28)]
    pub seq_len: usize,

    /// Pixels fed to the cell at each time step
    #[arg(long, default_value_t = 28)]
    pub input_size: usize,

    /// Drop probability on the last recurrent output (0.5 = keep_prob 0.5)
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Training budget in examples; stops once step × batch_size reaches it
    #[arg(long, default_value_t = 100_000)]
    pub training_iters: usize,

    /// Report minibatch loss/accuracy every N steps
    #[arg(long, default_value_t = 10)]
    pub display_step: usize,

    /// Training images held out for validation
    #[arg(long, default_value_t = 5_000)]
    pub validation_size: usize,

    /// Rotate every image 90° counter-clockwise before training and testing
    #[arg(long)]
    pub rotate: bool,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Data loader worker threads
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    /// Size of the test prefix scored as "Testing Accuracy"
    #[arg(long, default_value_t = 1_024)]
    pub test_len: usize,

    /// Images per evaluation batch
    #[arg(long, default_value_t = 500)]
    pub eval_chunk: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:        a.data_dir,
            checkpoint_dir:  a.checkpoint_dir,
            cell:            a.cell.into(),
            backend:         a.backend,
            hidden_size:     a.hidden_size,
            seq_len:         a.seq_len,
            input_size:      a.input_size,
            dropout:         a.dropout,
            batch_size:      a.batch_size,
            lr:              a.lr,
            training_iters:  a.training_iters,
            display_step:    a.display_step,
            validation_size: a.validation_size,
            rotate:          a.rotate,
            seed:            a.seed,
            num_workers:     a.num_workers,
            test_len:        a.test_len,
            eval_chunk:      a.eval_chunk,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// MNIST directory; defaults to the one used for training
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long, value_enum, default_value_t = BackendKind::Wgpu)]
    pub backend: BackendKind,
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Position of the image within the split
    #[arg(long)]
    pub index: usize,

    #[arg(long, value_enum, default_value_t = SplitArg::Test)]
    pub split: SplitArg,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// MNIST directory; defaults to the one used for training
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long, value_enum, default_value_t = BackendKind::Wgpu)]
    pub backend: BackendKind,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["mnist-rnn", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.data_dir, def.data_dir);
        assert_eq!(cfg.cell, def.cell);
        assert_eq!(cfg.backend, def.backend);
        assert_eq!(cfg.hidden_size, def.hidden_size);
        assert_eq!(cfg.dropout, def.dropout);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.training_iters, def.training_iters);
        assert_eq!(cfg.validation_size, def.validation_size);
        assert_eq!(cfg.test_len, def.test_len);
        assert_eq!(cfg.eval_chunk, def.eval_chunk);
        assert!(!cfg.rotate);
    }

    #[test]
    fn test_train_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "mnist-rnn", "train", "--cell", "gru", "--backend", "ndarray",
            "--dropout", "0", "--rotate", "--hidden-size", "64",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.cell, CellKind::Gru);
        assert_eq!(cfg.backend, BackendKind::Ndarray);
        assert_eq!(cfg.dropout, 0.0);
        assert_eq!(cfg.hidden_size, 64);
        assert!(cfg.rotate);
    }

    #[test]
    fn test_predict_requires_index() {
        assert!(Cli::try_parse_from(["mnist-rnn", "predict"]).is_err());
        let cli = Cli::try_parse_from(["mnist-rnn", "predict", "--index", "3", "--split", "train"]).unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.index, 3);
        assert_eq!(Split::from(args.split), Split::Train);
        assert!(args.data_dir.is_none());
    }

    #[test]
    fn test_flag_values_map_onto_domain_enums() {
        assert_eq!(CellKind::from(CellArg::Gru), CellKind::Gru);
        assert_eq!(CellKind::from(CellArg::Lstm), CellKind::Lstm);
        assert_eq!(Split::from(SplitArg::Train), Split::Train);
        assert_eq!(Split::from(SplitArg::Test), Split::Test);

        let cli = Cli::try_parse_from(["mnist-rnn", "predict", "--index", "0"]).unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.split, SplitArg::Test);
    }
}
