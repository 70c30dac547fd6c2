//! Reader for the Stanford Sentiment Treebank
//!
//! The release directory contains four text files: the sentences, the train/test/dev
//! assignment of every sentence, a dictionary from phrases to phrase ids and the
//! sentiment value of every phrase id. Sentences are labelled with the sentiment of the
//! phrase that spells out the complete sentence, bucketed into five classes.
use std::borrow::Cow;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vectors::Vocabulary;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

const SENTENCES_FILE: &str = "datasetSentences.txt";
const SPLIT_FILE: &str = "datasetSplit.txt";
const DICTIONARY_FILE: &str = "dictionary.txt";
const SENTIMENT_FILE: &str = "sentiment_labels.txt";

/// Number of sentiment classes produced by [`categorify`]
pub const N_CLASSES: usize = 5;

/// Partition of the treebank a sentence belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
    Dev,
}

impl Split {
    fn from_label(label: &str) -> Option<Split> {
        match label {
            "1" => Some(Split::Train),
            "2" => Some(Split::Test),
            "3" => Some(Split::Dev),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Split::Train => 0,
            Split::Test => 1,
            Split::Dev => 2,
        }
    }
}

/// A tokenized sentence together with its sentiment class
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSentence {
    pub words: Vec<String>,
    pub label: usize,
}

/// Bucket a sentiment value in `[0, 1]` into one of five classes
///
/// `0` is very negative, `2` neutral and `4` very positive.
pub fn categorify(value: f64) -> usize {
    if value <= 0.2 {
        0
    } else if value <= 0.4 {
        1
    } else if value <= 0.6 {
        2
    } else if value <= 0.8 {
        3
    } else {
        4
    }
}

/// The Stanford Sentiment Treebank
///
/// ```ignore
/// let treebank = StanfordSentiment::load("utils/datasets/stanfordSentimentTreebank")?;
/// let tokens = treebank.tokens();
/// let train = treebank.train_sentences();
/// ```
#[derive(Debug, Clone)]
pub struct StanfordSentiment {
    sentences: Vec<Vec<String>>,
    sentiments: Vec<f64>,
    splits: [Vec<usize>; 3],
}

impl StanfordSentiment {
    /// Read all release files from directory `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let sentences = read_sentences(&dir.join(SENTENCES_FILE))?;
        let dictionary = read_dictionary(&dir.join(DICTIONARY_FILE))?;
        let values = read_sentiment_values(&dir.join(SENTIMENT_FILE))?;

        let sentiments = sentences
            .iter()
            .map(|words| sentence_sentiment(words, &dictionary, &values))
            .collect::<Result<Vec<_>>>()?;

        let splits = read_split(&dir.join(SPLIT_FILE), sentences.len())?;

        debug!(
            sentences = sentences.len(),
            phrases = dictionary.len(),
            train = splits[0].len(),
            test = splits[1].len(),
            dev = splits[2].len(),
            "loaded sentiment treebank"
        );

        Ok(StanfordSentiment {
            sentences,
            sentiments,
            splits,
        })
    }

    /// All tokenized sentences in file order
    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    /// Raw sentiment value in `[0, 1]` of the sentence at `index`
    pub fn sentiment(&self, index: usize) -> Option<f64> {
        self.sentiments.get(index).copied()
    }

    /// Vocabulary over every sentence of the treebank, terminated by the `UNK` token
    pub fn tokens(&self) -> Vocabulary {
        Vocabulary::from_sentences(&self.sentences)
    }

    /// Labelled sentences of a split, in the order of the split file
    pub fn split_sentences(&self, split: Split) -> Vec<LabeledSentence> {
        self.splits[split.index()]
            .iter()
            .map(|&i| LabeledSentence {
                words: self.sentences[i].clone(),
                label: categorify(self.sentiments[i]),
            })
            .collect()
    }

    pub fn train_sentences(&self) -> Vec<LabeledSentence> {
        self.split_sentences(Split::Train)
    }

    pub fn dev_sentences(&self) -> Vec<LabeledSentence> {
        self.split_sentences(Split::Dev)
    }

    pub fn test_sentences(&self) -> Vec<LabeledSentence> {
        self.split_sentences(Split::Test)
    }
}

fn open(path: &Path, delimiter: u8, has_headers: bool) -> Result<Reader<File>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .quoting(false)
        .flexible(true)
        .from_reader(file))
}

fn malformed(path: &Path, record: &ByteRecord, reason: impl Into<String>) -> Error {
    Error::Malformed {
        file: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        line: record.position().map_or(0, |pos| pos.line()),
        reason: reason.into(),
    }
}

fn field(record: &ByteRecord, i: usize) -> Option<Cow<'_, str>> {
    record.get(i).map(String::from_utf8_lossy)
}

fn is_blank(record: &ByteRecord) -> bool {
    record.iter().all(|field| field.iter().all(u8::is_ascii_whitespace))
}

fn parse_field<T: std::str::FromStr>(record: &ByteRecord, i: usize) -> Option<T> {
    field(record, i).and_then(|value| value.trim().parse().ok())
}

/// Undo double encoded UTF-8
///
/// Some sentences store UTF-8 bytes re-encoded as if they were Latin-1 characters. If
/// every character fits into a byte and the resulting bytes form valid UTF-8 the decoded
/// string is returned, otherwise the word is left untouched.
fn repair_encoding(word: &str) -> String {
    if word.is_ascii() {
        return word.to_string();
    }

    let bytes = word
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>();

    bytes
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| word.to_string())
}

fn read_sentences(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = open(path, b'\t', true)?;
    let mut sentences = Vec::new();

    for record in reader.byte_records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        if record.len() < 2 {
            return Err(malformed(path, &record, "expected `index<TAB>sentence`"));
        }

        let words = record
            .iter()
            .skip(1)
            .map(String::from_utf8_lossy)
            .flat_map(|text| {
                text.split_whitespace()
                    .map(|word| repair_encoding(word).to_ascii_lowercase())
                    .collect::<Vec<_>>()
            })
            .collect();

        sentences.push(words);
    }

    Ok(sentences)
}

fn read_dictionary(path: &Path) -> Result<HashMap<String, usize>> {
    let mut reader = open(path, b'|', false)?;
    let mut dictionary = HashMap::new();

    for record in reader.byte_records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let phrase = field(&record, 0).map(|phrase| phrase.to_ascii_lowercase());
        let id = parse_field::<usize>(&record, 1);

        match (phrase, id) {
            (Some(phrase), Some(id)) => {
                dictionary.insert(phrase, id);
            }
            _ => return Err(malformed(path, &record, "expected `phrase|id`")),
        }
    }

    Ok(dictionary)
}

fn read_sentiment_values(path: &Path) -> Result<HashMap<usize, f64>> {
    let mut reader = open(path, b'|', true)?;
    let mut values = HashMap::new();

    for record in reader.byte_records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }

        match (parse_field::<usize>(&record, 0), parse_field::<f64>(&record, 1)) {
            (Some(id), Some(value)) => {
                values.insert(id, value);
            }
            _ => return Err(malformed(path, &record, "expected `id|sentiment`")),
        }
    }

    Ok(values)
}

fn read_split(path: &Path, num_sentences: usize) -> Result<[Vec<usize>; 3]> {
    let mut reader = open(path, b',', true)?;
    let mut splits = [Vec::new(), Vec::new(), Vec::new()];

    for record in reader.byte_records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }

        let index = parse_field::<usize>(&record, 0)
            .filter(|index| (1..=num_sentences).contains(index))
            .ok_or_else(|| malformed(path, &record, "sentence index out of range"))?;
        let split = field(&record, 1)
            .and_then(|label| Split::from_label(label.trim()))
            .ok_or_else(|| malformed(path, &record, "split label must be 1, 2 or 3"))?;

        splits[split.index()].push(index - 1);
    }

    Ok(splits)
}

fn sentence_sentiment(
    words: &[String],
    dictionary: &HashMap<String, usize>,
    values: &HashMap<usize, f64>,
) -> Result<f64> {
    let phrase = words
        .join(" ")
        .replace("-lrb-", "(")
        .replace("-rrb-", ")");

    let id = dictionary
        .get(&phrase)
        .copied()
        .ok_or(Error::MissingPhrase(phrase))?;

    values.get(&id).copied().ok_or(Error::MissingSentiment(id))
}
