//! Train sentiment classifiers on averaged word vectors and pick the best regularization.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sentiment_datasets::{StanfordSentiment, WordVectors, N_CLASSES};
use sentiment_sweep::metrics::confusion_counts;
use sentiment_sweep::report::{
    plot_confusion_matrix, plot_reg_vs_accuracy, recap_table, write_predictions, CLASS_NAMES,
};
use sentiment_sweep::{featurize, Splits, SweepParams};

#[derive(Parser, Debug)]
#[command(name = "sentiment-sweep", version, about)]
struct Cli {
    #[command(flatten)]
    source: VectorSource,

    /// Directory of the Stanford Sentiment Treebank release
    #[arg(long, default_value = "utils/datasets/stanfordSentimentTreebank")]
    treebank: PathBuf,

    /// Pretrained GloVe vectors, plain text or gzipped
    #[arg(long, default_value = "utils/datasets/glove.6B.50d.txt")]
    glove: PathBuf,

    /// Dimension of the pretrained vectors
    #[arg(long, default_value_t = 50)]
    glove_dim: usize,

    /// Directory holding `saved_params_<iter>.csv` checkpoints
    #[arg(long, default_value = ".")]
    checkpoints: PathBuf,

    /// Directory receiving plots and predictions
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Exponent of the weakest regularization
    #[arg(long, default_value_t = -4.0, allow_negative_numbers = true)]
    min_exponent: f64,

    /// Exponent of the strongest regularization
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    max_exponent: f64,

    /// Number of regularization strengths
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Solver iterations per model
    #[arg(long, default_value_t = 100)]
    max_iterations: u64,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct VectorSource {
    /// Use pretrained GloVe vectors.
    #[arg(long)]
    pretrained: bool,

    /// Use your vectors from the latest training checkpoint.
    #[arg(long)]
    yourvectors: bool,
}

impl Cli {
    fn sweep_params(&self) -> SweepParams {
        SweepParams::new()
            .min_exponent(self.min_exponent)
            .max_exponent(self.max_exponent)
            .steps(self.steps)
            .max_iterations(self.max_iterations)
    }

    fn load_vectors(&self, treebank: &StanfordSentiment) -> Result<WordVectors> {
        let tokens = treebank.tokens();

        if self.source.yourvectors {
            WordVectors::from_checkpoint_dir(tokens, &self.checkpoints).with_context(|| {
                format!("failed to load checkpoint from {}", self.checkpoints.display())
            })
        } else {
            WordVectors::from_glove(tokens, &self.glove, self.glove_dim)
                .with_context(|| format!("failed to load {}", self.glove.display()))
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let treebank = StanfordSentiment::load(&cli.treebank)
        .with_context(|| format!("failed to load treebank from {}", cli.treebank.display()))?;
    let vectors = cli.load_vectors(&treebank)?;
    info!(
        words = vectors.vocabulary().len(),
        dim = vectors.dim(),
        "word vectors ready"
    );

    let trainset = treebank.train_sentences();
    let devset = treebank.dev_sentences();
    let testset = treebank.test_sentences();

    let splits = Splits::new(
        featurize(&vectors, &trainset).context("train features")?,
        featurize(&vectors, &devset).context("dev features")?,
        featurize(&vectors, &testset).context("test features")?,
    )?;

    let results = cli.sweep_params().sweep(&splits)?;

    println!();
    println!("===Recap===");
    println!("{}", recap_table(results.results()));
    println!();

    let best = results
        .best()
        .context("the regularization sweep produced no model")?;
    println!("Best regularization value: {:.2E}", best.reg);
    println!("Test accuracy (%): {:.6}", best.test);

    // error analysis on the dev split
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;

    let dev_prediction = best.predict(splits.dev().records());
    let predictions_path = cli.output_dir.join("q4_dev_pred.txt");
    write_predictions(&predictions_path, &devset, &dev_prediction)
        .with_context(|| format!("failed to write {}", predictions_path.display()))?;
    info!(path = %predictions_path.display(), "dev predictions written");

    let accuracy_plot = cli.output_dir.join("q4_reg_acc.png");
    match plot_reg_vs_accuracy(&accuracy_plot, results.results()) {
        Ok(()) => info!(path = %accuracy_plot.display(), "accuracy plot written"),
        Err(err) => warn!(%err, "skipping accuracy plot"),
    }

    let counts = confusion_counts(splits.dev().targets(), &dev_prediction, N_CLASSES)?;
    let confusion_plot = cli.output_dir.join("q4_dev_conf.png");
    match plot_confusion_matrix(&confusion_plot, &counts, &CLASS_NAMES) {
        Ok(()) => info!(path = %confusion_plot.display(), "confusion matrix written"),
        Err(err) => warn!(%err, "skipping confusion matrix plot"),
    }

    Ok(())
}
