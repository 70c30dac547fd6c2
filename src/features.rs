//! Sentence features
//!
//! A sentence is represented by the element-wise mean of the vectors of its tokens, which
//! maps sentences of any length to a feature vector of the word vector dimension.
use linfa::DatasetBase;
use ndarray::{Array1, Array2};
use sentiment_datasets::{LabeledSentence, WordVectors};

use crate::error::{Error, Result};

/// Averaged sentence features with one sentiment class per sentence
pub type SentimentDataset = DatasetBase<Array2<f64>, Array1<usize>>;

/// Average the word vectors of all tokens of `sentence`
///
/// Tokens outside of the vocabulary fall back to the `UNK` vector if the vocabulary has one.
pub fn sentence_features<S: AsRef<str>>(
    vectors: &WordVectors,
    sentence: &[S],
) -> Result<Array1<f64>> {
    if sentence.is_empty() {
        return Err(Error::EmptySentence);
    }

    let vocabulary = vectors.vocabulary();
    let mut features = Array1::zeros(vectors.dim());
    for word in sentence {
        let word = word.as_ref();
        let index = vocabulary
            .get_or_unknown(word)
            .ok_or_else(|| Error::UnknownToken(word.to_string()))?;

        features += &vectors.row(index);
    }
    features /= sentence.len() as f64;

    Ok(features)
}

/// Stack the features of labelled sentences into a dataset
///
/// Records have shape `(sentences.len(), vectors.dim())`, targets are the sentiment classes.
pub fn featurize(vectors: &WordVectors, sentences: &[LabeledSentence]) -> Result<SentimentDataset> {
    let mut records = Array2::zeros((sentences.len(), vectors.dim()));
    for (mut row, sentence) in records.rows_mut().into_iter().zip(sentences) {
        row.assign(&sentence_features(vectors, &sentence.words)?);
    }

    let targets = sentences
        .iter()
        .map(|sentence| sentence.label)
        .collect::<Array1<_>>();

    Ok(DatasetBase::new(records, targets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sentiment_datasets::Vocabulary;

    fn word_vectors(with_unknown: bool) -> WordVectors {
        let mut vocabulary = Vocabulary::new();
        vocabulary.insert("good");
        vocabulary.insert("bad");
        vocabulary.insert("movie");
        let mut vectors = array![[1., 2.], [-3., 0.], [0.5, 0.5]];

        if with_unknown {
            vocabulary.insert(Vocabulary::UNKNOWN);
            vectors = array![[1., 2.], [-3., 0.], [0.5, 0.5], [10., 10.]];
        }

        WordVectors::new(vocabulary, vectors).unwrap()
    }

    #[test]
    fn averages_word_vectors() {
        let vectors = word_vectors(false);
        let features = sentence_features(&vectors, &["good", "movie"]).unwrap();

        assert_eq!(features.len(), vectors.dim());
        assert_abs_diff_eq!(features, array![0.75, 1.25]);
    }

    #[test]
    fn repeated_tokens_count_each_time() {
        let vectors = word_vectors(false);
        let features = sentence_features(&vectors, &["bad", "bad", "good"]).unwrap();

        assert_abs_diff_eq!(features, array![-5. / 3., 2. / 3.], epsilon = 1e-12);
    }

    #[test]
    fn single_token_is_its_vector() {
        let vectors = word_vectors(false);
        let features = sentence_features(&vectors, &["bad"]).unwrap();

        assert_abs_diff_eq!(features, array![-3., 0.]);
    }

    #[test]
    fn empty_sentence_is_rejected() {
        let vectors = word_vectors(false);
        let sentence: Vec<String> = Vec::new();

        assert!(matches!(
            sentence_features(&vectors, &sentence),
            Err(Error::EmptySentence)
        ));
    }

    #[test]
    fn unknown_tokens() {
        let vectors = word_vectors(false);
        match sentence_features(&vectors, &["good", "superb"]) {
            Err(Error::UnknownToken(token)) => assert_eq!(token, "superb"),
            other => panic!("expected unknown token, got {:?}", other),
        }

        let vectors = word_vectors(true);
        let features = sentence_features(&vectors, &["good", "superb"]).unwrap();
        assert_abs_diff_eq!(features, array![5.5, 6.]);
    }

    #[test]
    fn featurize_stacks_rows() {
        let vectors = word_vectors(false);
        let sentences = vec![
            LabeledSentence {
                words: vec!["good".into(), "movie".into()],
                label: 4,
            },
            LabeledSentence {
                words: vec!["bad".into()],
                label: 0,
            },
        ];

        let dataset = featurize(&vectors, &sentences).unwrap();

        assert_abs_diff_eq!(*dataset.records(), array![[0.75, 1.25], [-3., 0.]]);
        assert_eq!(*dataset.targets(), array![4, 0]);
    }
}
