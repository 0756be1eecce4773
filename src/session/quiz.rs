use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IntegrityError, NavigationError};
use crate::session::ledger::AnswerLedger;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    pub term: String,
    /// Accepted answers, comma separated.
    pub translation: String,
    pub chapter: String,
    pub global_index: usize,
}

/// A run of consecutive items sharing one chapter, with the pages it fills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub first_page: usize,
    pub last_page: usize,
}

impl ChapterSpan {
    pub fn items(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    pub start: usize,
    pub end: usize,
}

impl PageSpan {
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of a successful page move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMove {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
    /// Index into `chapters` of the chapter whose last page was just completed.
    /// Only set when moving forward off a chapter boundary.
    pub completed_chapter: Option<usize>,
}

/// A built quiz: flattened items, page layout, chapter boundaries, answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub items: Vec<VocabItem>,
    pub pages: Vec<PageSpan>,
    pub chapters: Vec<ChapterSpan>,
    /// Last page of each chapter, 1-indexed, strictly increasing.
    pub chapter_boundaries: Vec<usize>,
    pub total_pages: usize,
    /// 1-indexed while active.
    pub current_page: usize,
    pub ledger: AnswerLedger,
    pub page_size: usize,
    pub sampling_seed: Option<u64>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted: bool,
}

impl QuizSession {
    pub fn is_active(&self) -> bool {
        self.current_page >= 1 && self.current_page <= self.total_pages
    }

    pub fn page_span(&self, page: usize) -> Result<PageSpan, NavigationError> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .copied()
            .ok_or(NavigationError::NoSuchPage {
                requested: page,
                total: self.total_pages,
            })
    }

    pub fn current_range(&self) -> Range<usize> {
        self.page_span(self.current_page)
            .map(PageSpan::range)
            .unwrap_or(0..0)
    }

    pub fn current_items(&self) -> &[VocabItem] {
        self.items.get(self.current_range()).unwrap_or(&[])
    }

    pub fn current_answers(&self) -> &[String] {
        self.ledger.slice(self.current_range())
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Chapter whose last page is `page`, if any.
    pub fn chapter_ending_on(&self, page: usize) -> Option<usize> {
        self.chapters.iter().position(|c| c.last_page == page)
    }

    pub fn chapter_of_page(&self, page: usize) -> Option<&ChapterSpan> {
        self.chapters
            .iter()
            .find(|c| c.first_page <= page && page <= c.last_page)
    }

    pub fn chapter_of_item(&self, index: usize) -> Option<&ChapterSpan> {
        self.chapters
            .iter()
            .find(|c| c.start <= index && index < c.end)
    }

    pub fn page_of_item(&self, index: usize) -> Option<usize> {
        self.pages
            .iter()
            .position(|p| p.start <= index && index < p.end)
            .map(|i| i + 1)
    }

    pub fn go_to(&mut self, page: usize) -> Result<PageMove, NavigationError> {
        self.page_span(page)?;
        let from = self.current_page;
        let direction = if page >= from {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let completed_chapter = if page == from + 1 {
            self.chapter_ending_on(from)
        } else {
            None
        };
        self.current_page = page;
        Ok(PageMove {
            from,
            to: page,
            direction,
            completed_chapter,
        })
    }

    /// Leaves the session untouched and reports `NoSuchPage` on the last page.
    pub fn go_next(&mut self) -> Result<PageMove, NavigationError> {
        self.go_to(self.current_page + 1)
    }

    /// Leaves the session untouched and reports `NoSuchPage` on page 1.
    pub fn go_previous(&mut self) -> Result<PageMove, NavigationError> {
        self.go_to(self.current_page.saturating_sub(1))
    }

    /// Check the page and chapter layout against the items and ledger.
    /// A session read back from storage must pass before it is used.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        let total = self.total_pages;
        if self.pages.len() != total || total == 0 {
            return Err(IntegrityError::PageCount {
                pages: self.pages.len(),
                total,
            });
        }
        if self.ledger.len() != self.items.len() {
            return Err(IntegrityError::LedgerLength {
                ledger: self.ledger.len(),
                items: self.items.len(),
            });
        }

        let mut covered = 0;
        for (i, page) in self.pages.iter().enumerate() {
            if page.start != covered || page.is_empty() {
                return Err(IntegrityError::PageGap { page: i + 1 });
            }
            covered = page.end;
        }
        if covered != self.items.len() {
            return Err(IntegrityError::PageCoverage {
                covered,
                items: self.items.len(),
            });
        }

        let mut next_start = 0;
        for chapter in &self.chapters {
            let first = chapter.first_page.checked_sub(1).and_then(|i| self.pages.get(i));
            let last = chapter.last_page.checked_sub(1).and_then(|i| self.pages.get(i));
            let aligned = match (first, last) {
                (Some(first), Some(last)) => {
                    chapter.start == next_start
                        && first.start == chapter.start
                        && last.end == chapter.end
                        && chapter.first_page <= chapter.last_page
                }
                _ => false,
            };
            if !aligned {
                return Err(IntegrityError::ChapterMisaligned {
                    label: chapter.label.clone(),
                });
            }
            next_start = chapter.end;
        }

        let from_chapters: Vec<usize> = self.chapters.iter().map(|c| c.last_page).collect();
        let increasing = self.chapter_boundaries.windows(2).all(|w| w[0] < w[1]);
        if !increasing
            || self.chapter_boundaries != from_chapters
            || self.chapter_boundaries.last() != Some(&total)
        {
            return Err(IntegrityError::Boundaries {
                boundaries: self.chapter_boundaries.clone(),
                total,
            });
        }

        if !self.is_active() {
            return Err(IntegrityError::CurrentPage {
                page: self.current_page,
                total,
            });
        }
        Ok(())
    }
}
