use criterion::{Criterion, black_box, criterion_group, criterion_main};

use vocab_quiz::engine::chapter_order::order_chapters;
use vocab_quiz::engine::grader::score_range;
use vocab_quiz::session::builder::{BuildOptions, build_quiz};
use vocab_quiz::session::result::ReportScope;
use vocab_quiz::source::{DrillRecord, VocabRecord};

fn make_vocabulary(chapters: usize, per_chapter: usize) -> Vec<VocabRecord> {
    (0..chapters)
        .flat_map(|c| {
            (0..per_chapter).map(move |i| VocabRecord {
                term: format!("từ {c}-{i}"),
                translation: format!("단어{i}, 낱말{i}"),
                chapter: (c + 1).to_string(),
            })
        })
        .collect()
}

fn make_pool(count: usize) -> Vec<DrillRecord> {
    (0..count)
        .map(|i| DrillRecord {
            term: format!("Số hán {i}"),
            translation: format!("{i}"),
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let vocab = make_vocabulary(40, 50);
    let pool = make_pool(1000);
    let chapters = order_chapters(vocab.iter().map(|r| r.chapter.as_str()));
    let opts = BuildOptions {
        seed: Some(7),
        ..BuildOptions::default()
    };

    c.bench_function("build_quiz (2000 rows, 40 chapters)", |b| {
        b.iter(|| build_quiz(black_box(&vocab), &chapters, black_box(&pool), &opts))
    });
}

fn bench_grade(c: &mut Criterion) {
    let vocab = make_vocabulary(40, 50);
    let pool = make_pool(1000);
    let chapters = order_chapters(vocab.iter().map(|r| r.chapter.as_str()));
    let opts = BuildOptions {
        seed: Some(7),
        ..BuildOptions::default()
    };
    let Ok(mut session) = build_quiz(&vocab, &chapters, &pool, &opts) else {
        return;
    };
    for i in (0..session.items.len()).step_by(3) {
        let answer = session.items[i].translation.clone();
        let _ = session.ledger.set(i, &answer);
    }

    c.bench_function("score_range (whole quiz)", |b| {
        b.iter(|| {
            score_range(
                black_box(&session.ledger),
                black_box(&session.items),
                0..session.items.len(),
                ReportScope::Quiz,
            )
        })
    });
}

criterion_group!(benches, bench_build, bench_grade);
criterion_main!(benches);
