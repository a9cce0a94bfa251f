use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use survival_records::{
    io::read_clinical_records, BuilderConfig, ClinicalRecord, ColumnMap, CohortSummary,
    SurvivalRecordBuilder, UnknownStatusPolicy,
};
use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn generate_synthetic_records(n_subjects: usize) -> Vec<ClinicalRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    let origin = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let labels = ["Death", "Alive", "alive", "", "Lost"];

    (0..n_subjects)
        .map(|i| {
            let index = origin + Duration::days(rng.gen_range(0..3000));
            // a few rows end before they start
            let last_alive = index + Duration::days(rng.gen_range(-20..2500));

            let mut record = ClinicalRecord::new(format!("S{:05}", i))
                .with_index_date(index.format("%m/%d/%Y").to_string())
                .with_last_known_alive(last_alive.format("%m/%d/%Y").to_string())
                .with_status(labels[rng.gen_range(0..labels.len())]);
            if rng.gen_bool(0.7) {
                record = record.with_offset(rng.gen_range(0..90));
            }
            if rng.gen_bool(0.02) {
                record.index_date = Some("??".into());
            }
            record
        })
        .collect()
}

fn to_csv(records: &[ClinicalRecord]) -> String {
    let mut out = String::from(
        "Patient ID,CT Date,Date of Last Known Alive,Days between CT and surgery,Survival Status\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            r.subject_id,
            r.index_date.as_deref().unwrap_or(""),
            r.last_known_alive_date.as_deref().unwrap_or(""),
            r.days_between_index_and_intervention.as_deref().unwrap_or(""),
            r.status_label.as_deref().unwrap_or(""),
        ));
    }
    out
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &policy in [UnknownStatusPolicy::Censor, UnknownStatusPolicy::Exclude].iter() {
        for &n_subjects in [100, 1000, 10_000].iter() {
            let records = generate_synthetic_records(n_subjects);
            let builder = SurvivalRecordBuilder::new(BuilderConfig::new(policy)).unwrap();

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{:?}_{}", policy, n_subjects)),
                &records,
                |b, records| {
                    b.iter(|| builder.build(black_box(records)).unwrap());
                },
            );
        }
    }
    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_csv");

    for &n_subjects in [1000, 10_000].iter() {
        let csv = to_csv(&generate_synthetic_records(n_subjects));
        let columns = ColumnMap::default();

        group.bench_with_input(BenchmarkId::from_parameter(n_subjects), &csv, |b, csv| {
            b.iter(|| read_clinical_records(black_box(csv.as_bytes()), &columns, b',').unwrap());
        });
    }
    group.finish();
}

fn benchmark_summary(c: &mut Criterion) {
    let records = generate_synthetic_records(10_000);
    let builder = SurvivalRecordBuilder::new(BuilderConfig::new(UnknownStatusPolicy::Censor)).unwrap();
    let table = builder.build(&records).unwrap().table;

    c.bench_function("cohort_summary_10000", |b| {
        b.iter(|| CohortSummary::compute(black_box(&table)).unwrap());
    });
    c.bench_function("valid_only_10000", |b| {
        b.iter(|| black_box(&table).valid_only());
    });
}

criterion_group!(benches, benchmark_build, benchmark_read, benchmark_summary);
criterion_main!(benches);
