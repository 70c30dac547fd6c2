//! Word vector tables
//!
//! A [`WordVectors`] table pairs a [`Vocabulary`] with a dense matrix holding one row per
//! token. Tables are either read from a pretrained GloVe text file or from the most recent
//! checkpoint written while training custom embeddings.
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::{concatenate, s, Array2, ArrayView1, Axis};
use ndarray_csv::Array2Reader;
use tracing::debug;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

const CHECKPOINT_PREFIX: &str = "saved_params_";

/// Mapping between tokens and row indices
///
/// Indices are assigned in insertion order. Every insertion of an already known token only
/// increments its frequency.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    indices: HashMap<String, usize>,
    words: Vec<String>,
    frequencies: Vec<usize>,
}

impl Vocabulary {
    /// Sentinel token for words outside of the vocabulary
    pub const UNKNOWN: &'static str = "UNK";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary over all words of `sentences` and append the `UNK` token
    pub fn from_sentences<S: AsRef<[String]>>(sentences: &[S]) -> Self {
        let mut vocabulary = Vocabulary::new();
        for word in sentences.iter().flat_map(|sentence| sentence.as_ref()) {
            vocabulary.insert(word);
        }
        vocabulary.insert(Self::UNKNOWN);

        vocabulary
    }

    /// Add an occurrence of `word` and return its index
    pub fn insert(&mut self, word: &str) -> usize {
        if let Some(&index) = self.indices.get(word) {
            self.frequencies[index] += 1;
            return index;
        }

        let index = self.words.len();
        self.indices.insert(word.to_string(), index);
        self.words.push(word.to_string());
        self.frequencies.push(1);

        index
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.indices.get(word).copied()
    }

    /// Index of `word`, falling back to the index of `UNK`
    pub fn get_or_unknown(&self, word: &str) -> Option<usize> {
        self.get(word).or_else(|| self.get(Self::UNKNOWN))
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Number of recorded occurrences of `word`
    pub fn frequency(&self, word: &str) -> usize {
        self.get(word).map_or(0, |index| self.frequencies[index])
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over all tokens in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Dense word vectors, one row per vocabulary entry
#[derive(Debug, Clone, PartialEq)]
pub struct WordVectors {
    vocabulary: Vocabulary,
    vectors: Array2<f64>,
}

impl WordVectors {
    /// Pair a vocabulary with a vector table, the number of rows has to match
    pub fn new(vocabulary: Vocabulary, vectors: Array2<f64>) -> Result<Self> {
        if vectors.nrows() != vocabulary.len() {
            return Err(Error::RowMismatch {
                expected: vocabulary.len(),
                found: vectors.nrows(),
            });
        }

        Ok(WordVectors {
            vocabulary,
            vectors,
        })
    }

    /// Read pretrained GloVe vectors of dimension `dim`
    ///
    /// Files ending in `.gz` are decompressed on the fly. Tokens of the vocabulary without an
    /// entry in the file keep a zero vector.
    pub fn from_glove<P: AsRef<Path>>(vocabulary: Vocabulary, path: P, dim: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if is_gzipped(path) {
            Self::read_glove(vocabulary, GzDecoder::new(file), dim, &name)
        } else {
            Self::read_glove(vocabulary, file, dim, &name)
        }
    }

    /// Read GloVe formatted lines `word v_1 ... v_dim` from `reader`
    pub fn from_glove_reader<R: Read>(
        vocabulary: Vocabulary,
        reader: R,
        dim: usize,
    ) -> Result<Self> {
        Self::read_glove(vocabulary, reader, dim, "glove")
    }

    fn read_glove<R: Read>(
        vocabulary: Vocabulary,
        reader: R,
        dim: usize,
        file: &str,
    ) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let mut vectors = Array2::zeros((vocabulary.len(), dim));
        let mut found = 0;

        for record in reader.byte_records() {
            let record = record?;
            let word = match record.get(0) {
                Some(word) if !word.is_empty() => String::from_utf8_lossy(word),
                _ => continue,
            };
            let index = match vocabulary.get(&word) {
                Some(index) => index,
                None => continue,
            };

            let values = record
                .iter()
                .skip(1)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    std::str::from_utf8(value)
                        .ok()
                        .and_then(|value| value.trim().parse::<f64>().ok())
                })
                .collect::<Option<Vec<_>>>();

            let line = record.position().map_or(0, |pos| pos.line());
            let values = values.ok_or_else(|| Error::Malformed {
                file: file.to_string(),
                line,
                reason: format!("non numeric component for `{}`", word),
            })?;

            if values.len() != dim {
                return Err(Error::Dimension {
                    word: word.into_owned(),
                    expected: dim,
                    found: values.len(),
                });
            }

            vectors
                .row_mut(index)
                .iter_mut()
                .zip(values)
                .for_each(|(a, b)| *a = b);
            found += 1;
        }

        debug!(
            found,
            vocabulary = vocabulary.len(),
            dim,
            "read pretrained word vectors"
        );

        WordVectors::new(vocabulary, vectors)
    }

    /// Build the table from a `(2 * n_words, dim)` matrix of stacked input and output vectors
    ///
    /// The vector of every word is the concatenation of its input and output vector, which
    /// gives a table of shape `(n_words, 2 * dim)`.
    pub fn from_split_embeddings(vocabulary: Vocabulary, params: Array2<f64>) -> Result<Self> {
        let n_words = vocabulary.len();
        if params.nrows() != 2 * n_words {
            return Err(Error::RowMismatch {
                expected: 2 * n_words,
                found: params.nrows(),
            });
        }

        let vectors = concatenate(
            Axis(1),
            &[
                params.slice(s![..n_words, ..]),
                params.slice(s![n_words.., ..]),
            ],
        )
        .map_err(|_| Error::RowMismatch {
            expected: 2 * n_words,
            found: params.nrows(),
        })?;

        WordVectors::new(vocabulary, vectors)
    }

    /// Load the checkpoint with the highest iteration from directory `dir`
    pub fn from_checkpoint_dir<P: AsRef<Path>>(vocabulary: Vocabulary, dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let (iteration, path) =
            latest_checkpoint(dir)?.ok_or_else(|| Error::NoCheckpoint(dir.to_path_buf()))?;

        debug!(iteration, path = %path.display(), "loading word vector checkpoint");

        let file = File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let params = if is_gzipped(&path) {
            array_from_gz_csv(file, false, b',')?
        } else {
            array_from_csv(file, false, b',')?
        };

        Self::from_split_embeddings(vocabulary, params)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    /// Dimension of a single word vector
    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.vectors.row(index)
    }

    pub fn get(&self, word: &str) -> Option<ArrayView1<'_, f64>> {
        self.vocabulary.get(word).map(|index| self.vectors.row(index))
    }
}

/// Find the checkpoint `saved_params_<iter>.csv[.gz]` with the largest iteration in `dir`
pub fn latest_checkpoint<P: AsRef<Path>>(dir: P) -> Result<Option<(usize, PathBuf)>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut latest: Option<(usize, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let iteration = match checkpoint_iteration(&name.to_string_lossy()) {
            Some(iteration) => iteration,
            None => continue,
        };

        if latest.as_ref().map_or(true, |(best, _)| iteration > *best) {
            latest = Some((iteration, entry.path()));
        }
    }

    Ok(latest)
}

fn checkpoint_iteration(name: &str) -> Option<usize> {
    let stem = name
        .strip_suffix(".csv.gz")
        .or_else(|| name.strip_suffix(".csv"))?;

    stem.strip_prefix(CHECKPOINT_PREFIX)?.parse().ok()
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Convert Gzipped CSV bytes into 2D array
pub fn array_from_gz_csv<R: Read>(gz: R, has_headers: bool, separator: u8) -> Result<Array2<f64>> {
    array_from_csv(GzDecoder::new(gz), has_headers, separator)
}

/// Convert CSV bytes into 2D array
pub fn array_from_csv<R: Read>(csv: R, has_headers: bool, separator: u8) -> Result<Array2<f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(separator)
        .from_reader(csv);

    Ok(reader.deserialize_array2_dynamic()?)
}
