use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use ndarray_rand::{rand_distr::Uniform, RandomExt};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use sentiment_datasets::{LabeledSentence, Vocabulary, WordVectors};
use sentiment_sweep::featurize;

const N_WORDS: usize = 5_000;

fn word_vectors(rng: &mut SmallRng, dim: usize) -> WordVectors {
    let mut vocabulary = Vocabulary::new();
    for i in 0..N_WORDS {
        vocabulary.insert(&format!("w{}", i));
    }
    vocabulary.insert(Vocabulary::UNKNOWN);

    let vectors = Array2::random_using((vocabulary.len(), dim), Uniform::new(-1., 1.), rng);
    WordVectors::new(vocabulary, vectors).unwrap()
}

fn sentences(rng: &mut SmallRng, n: usize) -> Vec<LabeledSentence> {
    (0..n)
        .map(|_| {
            let len = rng.gen_range(3..40);
            LabeledSentence {
                words: (0..len)
                    .map(|_| format!("w{}", rng.gen_range(0..N_WORDS)))
                    .collect(),
                label: rng.gen_range(0..5),
            }
        })
        .collect()
}

fn bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut group = c.benchmark_group("Sentence features");
    group.sample_size(20);

    for &dim in &[50, 300] {
        let vectors = word_vectors(&mut rng, dim);
        for &n in &[1_000, 10_000] {
            let input = sentences(&mut rng, n);
            group.bench_with_input(
                BenchmarkId::new("featurize", format!("{}x{}", n, dim)),
                &input,
                |b, input| b.iter(|| featurize(&vectors, input).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
