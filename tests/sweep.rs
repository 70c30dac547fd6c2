use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use sentiment_sweep::metrics::confusion_counts;
use sentiment_sweep::prelude::*;
use sentiment_sweep::report::{recap_table, write_predictions};

// (sentence, sentiment value, split label)
const SENTENCES: &[(&str, f64, u8)] = &[
    ("great superb", 0.95, 1),
    ("wonderful great", 0.9, 1),
    ("superb wonderful great", 0.92, 1),
    ("superb superb", 0.85, 1),
    ("awful dreadful", 0.05, 1),
    ("boring awful", 0.1, 1),
    ("dreadful boring awful", 0.12, 1),
    ("awful awful", 0.15, 1),
    ("plot film", 0.5, 1),
    ("film scene", 0.55, 1),
    ("scene plot film", 0.45, 1),
    ("plot plot", 0.52, 1),
    ("great wonderful", 0.88, 3),
    ("boring dreadful", 0.08, 3),
    ("scene film", 0.5, 3),
    ("wonderful superb", 0.9, 2),
    ("dreadful awful", 0.02, 2),
    ("film plot scene", 0.58, 2),
];

const GLOVE: &str = "great 4.0 0.5\n\
                     superb 3.5 -0.5\n\
                     wonderful 4.5 0.0\n\
                     awful -4.0 0.5\n\
                     dreadful -3.5 -0.5\n\
                     boring -4.5 0.0\n\
                     plot 0.5 4.0\n\
                     film -0.5 3.5\n\
                     scene 0.0 4.5\n\
                     unrelated 9.0 9.0\n";

fn write_treebank(dir: &Path) {
    let mut sentences = String::from("sentence_index\tsentence\n");
    let mut dictionary = String::new();
    let mut labels = String::from("phrase ids|sentiment values\n");
    let mut split = String::from("sentence_index,splitset_label\n");

    for (i, (text, value, label)) in SENTENCES.iter().enumerate() {
        sentences.push_str(&format!("{}\t{}\n", i + 1, text));
        dictionary.push_str(&format!("{}|{}\n", text, i));
        labels.push_str(&format!("{}|{}\n", i, value));
        split.push_str(&format!("{},{}\n", i + 1, label));
    }

    fs::write(dir.join("datasetSentences.txt"), sentences).unwrap();
    fs::write(dir.join("dictionary.txt"), dictionary).unwrap();
    fs::write(dir.join("sentiment_labels.txt"), labels).unwrap();
    fs::write(dir.join("datasetSplit.txt"), split).unwrap();
    fs::write(dir.join("glove.txt"), GLOVE).unwrap();
}

#[test]
fn sweep_selects_model_by_dev_accuracy() {
    let dir = tempfile::tempdir().unwrap();
    write_treebank(dir.path());

    let treebank = StanfordSentiment::load(dir.path()).unwrap();
    let vectors =
        WordVectors::from_glove(treebank.tokens(), dir.path().join("glove.txt"), 2).unwrap();

    let trainset = treebank.train_sentences();
    let devset = treebank.dev_sentences();
    let testset = treebank.test_sentences();
    assert_eq!((trainset.len(), devset.len(), testset.len()), (12, 3, 3));

    let splits = Splits::new(
        featurize(&vectors, &trainset).unwrap(),
        featurize(&vectors, &devset).unwrap(),
        featurize(&vectors, &testset).unwrap(),
    )
    .unwrap();

    let results = SweepParams::new()
        .min_exponent(-1.)
        .max_exponent(1.)
        .steps(3)
        .sweep(&splits)
        .unwrap();

    assert_eq!(results.len(), 3);
    let values = results.regularization_values();
    assert!(values.windows(2).all(|w| w[0] < w[1]));

    let best = results.best().unwrap();
    assert_abs_diff_eq!(best.dev, 100.);
    assert!(results.results().iter().all(|result| result.dev <= best.dev));
    assert_abs_diff_eq!(results.results()[0].train, 100.);

    let table = recap_table(results.results());
    assert_eq!(table.lines().count(), 4);
    assert!(table.lines().nth(1).unwrap().starts_with("1.00E-1\t"));

    let prediction = best.predict(splits.dev().records());
    let counts = confusion_counts(splits.dev().targets(), &prediction, 5).unwrap();
    assert_eq!(counts[(0, 0)], 1);
    assert_eq!(counts[(2, 2)], 1);
    assert_eq!(counts[(4, 4)], 1);

    let path = dir.path().join("dev_pred.txt");
    write_predictions(&path, &devset, &prediction).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "True\tPredicted\tText\n4\t4\tgreat wonderful\n0\t0\tboring dreadful\n2\t2\tscene film\n"
    );
}

#[test]
fn averaged_features_match_vector_means() {
    let dir = tempfile::tempdir().unwrap();
    write_treebank(dir.path());

    let treebank = StanfordSentiment::load(dir.path()).unwrap();
    let vectors =
        WordVectors::from_glove(treebank.tokens(), dir.path().join("glove.txt"), 2).unwrap();

    // "unrelated" is not part of any sentence, UNK keeps a zero vector
    assert!(vectors.get("unrelated").is_none());
    assert_abs_diff_eq!(
        vectors.get(Vocabulary::UNKNOWN).unwrap(),
        ndarray::array![0., 0.]
    );

    let features = sentence_features(&vectors, &["superb", "wonderful", "great"]).unwrap();
    assert_abs_diff_eq!(features, ndarray::array![4., 0.], epsilon = 1e-12);
}
