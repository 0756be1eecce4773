use std::collections::BTreeSet;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::engine::chapter_order::{DRILL_CHAPTER, order_chapters};
use crate::error::BuildError;
use crate::session::ledger::AnswerLedger;
use crate::session::quiz::{ChapterSpan, PageSpan, QuizSession, VocabItem};
use crate::source::{DrillRecord, VocabRecord};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_DRILL_COUNT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub drill_count: usize,
    pub page_size: usize,
    /// Fixes the numeric drill subset. A fresh seed is drawn when absent and
    /// kept on the built session.
    pub seed: Option<u64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            drill_count: DEFAULT_DRILL_COUNT,
            page_size: DEFAULT_PAGE_SIZE,
            seed: None,
        }
    }
}

/// Draw `count` rows without replacement, in draw order, from a seeded rng.
pub fn sample_drill(pool: &[DrillRecord], count: usize, seed: u64) -> Vec<DrillRecord> {
    let mut rng = SmallRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, pool.len(), count.min(pool.len()))
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}

struct Layout {
    items: Vec<VocabItem>,
    pages: Vec<PageSpan>,
    chapters: Vec<ChapterSpan>,
}

impl Layout {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            pages: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// Chunk one chapter into pages of `page_size`. Empty chapters add nothing.
    fn push_chapter<'a, I>(&mut self, label: &str, rows: I, page_size: usize)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let start = self.items.len();
        let first_page = self.pages.len() + 1;
        for (term, translation) in rows {
            let global_index = self.items.len();
            if (global_index - start) % page_size == 0 {
                self.pages.push(PageSpan {
                    start: global_index,
                    end: global_index,
                });
            }
            self.items.push(VocabItem {
                term: term.to_string(),
                translation: translation.to_string(),
                chapter: label.to_string(),
                global_index,
            });
            if let Some(page) = self.pages.last_mut() {
                page.end = global_index + 1;
            }
        }
        let end = self.items.len();
        if end > start {
            self.chapters.push(ChapterSpan {
                label: label.to_string(),
                start,
                end,
                first_page,
                last_page: self.pages.len(),
            });
        }
    }
}

/// Build a quiz from the selected chapters plus a numeric drill.
///
/// Rows are filtered to the selection, ordered by chapter (source order inside
/// a chapter) and chunked per chapter, so no page mixes two chapters. The
/// drill rows form a trailing chapter labelled [`DRILL_CHAPTER`].
pub fn build_quiz<I>(
    vocabulary: &[VocabRecord],
    selected: I,
    drill_pool: &[DrillRecord],
    opts: &BuildOptions,
) -> Result<QuizSession, BuildError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let selected: BTreeSet<String> = selected
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    if selected.is_empty() {
        return Err(BuildError::EmptySelection);
    }
    if opts.page_size == 0 {
        return Err(BuildError::ZeroPageSize);
    }

    let filtered: Vec<&VocabRecord> = vocabulary
        .iter()
        .filter(|r| selected.contains(&r.chapter))
        .collect();
    if filtered.is_empty() {
        return Err(BuildError::EmptySource);
    }
    if drill_pool.len() < opts.drill_count {
        return Err(BuildError::InsufficientDrillSource {
            available: drill_pool.len(),
            required: opts.drill_count,
        });
    }

    let seed = opts.seed.unwrap_or_else(rand::random::<u64>);
    let drill = sample_drill(drill_pool, opts.drill_count, seed);

    let mut layout = Layout::new();
    for label in order_chapters(filtered.iter().map(|r| r.chapter.as_str())) {
        let rows = filtered
            .iter()
            .filter(|r| r.chapter == label)
            .map(|r| (r.term.as_str(), r.translation.as_str()));
        layout.push_chapter(&label, rows, opts.page_size);
    }
    layout.push_chapter(
        DRILL_CHAPTER,
        drill
            .iter()
            .map(|r| (r.term.as_str(), r.translation.as_str())),
        opts.page_size,
    );

    let Layout {
        items,
        pages,
        chapters,
    } = layout;
    let chapter_boundaries: Vec<usize> = chapters.iter().map(|c| c.last_page).collect();
    let total_pages = pages.len();

    log::info!(
        "built quiz: {} items, {} chapters, {} pages, seed {seed}",
        items.len(),
        chapters.len(),
        total_pages
    );

    Ok(QuizSession {
        ledger: AnswerLedger::new(items.len()),
        items,
        pages,
        chapters,
        chapter_boundaries,
        total_pages,
        current_page: 1,
        page_size: opts.page_size,
        sampling_seed: Some(seed),
        started_at: Utc::now(),
        submitted: false,
    })
}
