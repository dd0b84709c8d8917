use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stripes::{
    Alphabet, Arrangement, Exhaustive, Generate, LoadEvaluator, LoadVector, LocalParityPlacer,
    Sampling,
};

const DISKS: usize = 15;
const GROUPS: u16 = 3;
const GROUP_LEN: u16 = 4;

pub fn evaluate_benchmark(c: &mut Criterion) {
    let alphabet = Alphabet::new(GROUPS, GROUP_LEN);
    let evaluator = LoadEvaluator::new(DISKS, alphabet.stripe_len());
    let arrangement = Exhaustive::new(alphabet, DISKS)
        .nth(1000)
        .expect("enumeration too short");
    let mut loads = LoadVector::zeros(DISKS);
    c.bench_function("evaluate 15x3x4", |b| {
        b.iter(|| evaluator.evaluate(black_box(&arrangement), &mut loads))
    });

    let mut placer = LocalParityPlacer::new(GROUPS);
    let base = evaluator.loads(&arrangement);
    c.bench_function("place local parity 15x3x4", |b| {
        b.iter(|| placer.place(black_box(&arrangement), black_box(&base)))
    });
}

pub fn generate_benchmark(c: &mut Criterion) {
    let alphabet = Alphabet::new(GROUPS, GROUP_LEN);
    let mut arrangement = Arrangement::padding(DISKS);
    let mut exhaustive = Exhaustive::new(alphabet, DISKS);
    c.bench_function("exhaustive step 15x3x4", |b| {
        b.iter(|| exhaustive.next_into(&mut arrangement))
    });
    let mut sampling = Sampling::new(alphabet, DISKS, 17);
    c.bench_function("sampling step 15x3x4", |b| {
        b.iter(|| sampling.next_into(&mut arrangement))
    });
}

criterion_group!(benches, evaluate_benchmark, generate_benchmark);
criterion_main!(benches);
