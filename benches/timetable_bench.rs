//! Criterion benchmarks for u-timetable.
//!
//! Uses synthetic instances of increasing size: every teacher can teach a
//! band of courses and every place is open to every course.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_timetable::bbo::BboConfig;
use u_timetable::cost::{CostConfig, CostEvaluator};
use u_timetable::domain::{Course, DomainInput, DomainSnapshot, Gender, Place, Teacher, TimeSlot};
use u_timetable::driver::{solve, SolverConfig, StrategyKind};
use u_timetable::gwo::GwoConfig;
use u_timetable::init::Initializer;
use u_timetable::random::create_rng;
use u_timetable::repair::{RepairConfig, Repairer};
use u_timetable::sampler::Sampler;

// ===========================================================================
// Synthetic instance
// ===========================================================================

fn instance(courses: usize) -> DomainSnapshot {
    let teachers = (courses / 3).max(2);
    let places = (courses / 4).max(2);
    let code = |i: usize| format!("C{i}");

    let input = DomainInput {
        places: (0..places)
            .map(|p| Place::new(format!("P{p}"), 20 + (p as u32 % 4) * 10))
            .collect(),
        teachers: (0..teachers)
            .map(|t| {
                let gender = if t % 2 == 0 { Gender::A } else { Gender::B };
                Teacher::new(format!("T{t}"), gender)
                    .with_courses((0..courses).filter(|c| c % teachers == t || (c + 1) % teachers == t).map(code))
                    .with_units(2, 12)
            })
            .collect(),
        courses: (0..courses)
            .map(|c| Course::new(code(c), 2 + (c as u32 % 2)).with_students(20 + (c as u32 % 3) * 10))
            .collect(),
        time_slots: (0..5)
            .map(|s| TimeSlot::hm(s + 1, (8 + 2 * s, 0), (10 + 2 * s, 0)))
            .collect(),
        days: ["Sat", "Sun", "Mon", "Tue", "Wed"].into_iter().map(String::from).collect(),
        constraints: vec![],
    };
    DomainSnapshot::new(input).expect("valid synthetic instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for n in [30usize, 120, 400] {
        let snap = instance(n);
        let sampler = Sampler::new(&snap, 5);
        let init = Initializer::new(sampler, Repairer::new(sampler, RepairConfig::default()));
        let candidate = init.candidate(&mut create_rng(42));
        let evaluator = CostEvaluator::new(&snap, CostConfig::default(), 5);

        group.bench_with_input(BenchmarkId::from_parameter(n), &candidate, |b, cand| {
            b.iter(|| black_box(evaluator.evaluate(black_box(cand))))
        });
    }
    group.finish();
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair");
    group.sample_size(20);

    for n in [30usize, 120] {
        let snap = instance(n);
        let sampler = Sampler::new(&snap, 5);
        let repairer = Repairer::new(sampler, RepairConfig::default());
        let init = Initializer::new(sampler, repairer);

        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            let mut rng = create_rng(7);
            b.iter(|| {
                let mut cand = init.candidate(&mut rng);
                black_box(repairer.repair(&mut cand, &mut rng))
            })
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);

    let kinds = [
        StrategyKind::Bbo(BboConfig::default()),
        StrategyKind::Gwo(GwoConfig::default()),
    ];
    for (n, pop, gen) in [(30usize, 30usize, 20usize), (120, 40, 10)] {
        let snap = instance(n);
        let config = SolverConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_elite_count(2)
            .with_seed(42);
        for kind in kinds {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_p{}_g{}", kind.name(), pop, gen), n),
                &config,
                |b, cfg| b.iter(|| black_box(solve(&snap, cfg, kind).map(|r| r.best_cost))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_repair, bench_solve);
criterion_main!(benches);
