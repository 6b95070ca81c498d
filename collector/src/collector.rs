//! Pagination loop: walks search pages and yields normalized postings.

use std::collections::{HashSet, VecDeque};

use common::Posting;
use tracing::{debug, info};

use crate::api::VacancyItem;
use crate::client::PageSource;
use crate::error::Result;
use crate::normalize::posting_from_item;
use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Stop after this many pages even if more results exist.
    pub max_pages: Option<u32>,
    /// Request each vacancy's full record for key skills and description.
    pub fetch_details: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            fetch_details: true,
        }
    }
}

pub struct Collector<S> {
    source: S,
    options: CollectOptions,
}

impl<S: PageSource> Collector<S> {
    pub fn new(source: S, options: CollectOptions) -> Self {
        Self { source, options }
    }

    /// Lazily walk the result pages for `query`.
    ///
    /// The iterator ends after the first error it yields.
    pub fn postings<'a>(&'a self, query: &'a Query) -> Postings<'a, S> {
        Postings {
            collector: self,
            query,
            next_page: 0,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            exhausted: false,
        }
    }

    /// Collect every posting for `query`; the first error aborts the run.
    pub fn collect(&self, query: &Query) -> Result<ResultSet> {
        let mut set = ResultSet::default();
        for posting in self.postings(query) {
            set.push(posting?);
        }
        info!(keyword = query.keyword(), postings = set.len(), "collection finished");
        Ok(set)
    }
}

/// Iterator returned by [`Collector::postings`].
pub struct Postings<'a, S> {
    collector: &'a Collector<S>,
    query: &'a Query,
    next_page: u32,
    buffer: VecDeque<VacancyItem>,
    seen: HashSet<String>,
    exhausted: bool,
}

impl<S: PageSource> Postings<'_, S> {
    /// Fetch the next page into the buffer and decide whether it is the last one.
    fn load_page(&mut self) -> Result<()> {
        let page_no = self.next_page;
        let page = self
            .collector
            .source
            .fetch_page(self.query, page_no)?;
        self.next_page += 1;

        let count = page.items.len();
        info!(
            page = page.page,
            pages = page.pages,
            per_page = page.per_page,
            items = count,
            found = page.found,
            "page fetched"
        );

        let short_page = count < self.query.per_page() as usize;
        let last_reported = page.pages > 0 && self.next_page >= page.pages;
        let capped = self
            .collector
            .options
            .max_pages
            .is_some_and(|cap| self.next_page >= cap);
        if short_page || last_reported || capped {
            debug!(short_page, last_reported, capped, "end of results");
            self.exhausted = true;
        }

        self.buffer.extend(page.items);
        Ok(())
    }

    fn build(&self, item: VacancyItem) -> Result<Posting> {
        let detail = if self.collector.options.fetch_details {
            Some(self.collector.source.fetch_vacancy(&item.id)?)
        } else {
            None
        };
        Ok(posting_from_item(item, detail))
    }
}

impl<S: PageSource> Iterator for Postings<'_, S> {
    type Item = Result<Posting>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                // The same vacancy can reappear when results shift between pages
                if !self.seen.insert(item.id.clone()) {
                    debug!(id = %item.id, "skipping duplicate vacancy");
                    continue;
                }
                let built = self.build(item);
                if built.is_err() {
                    self.buffer.clear();
                    self.exhausted = true;
                }
                return Some(built);
            }

            if self.exhausted {
                return None;
            }

            if let Err(e) = self.load_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}

/// Postings accumulated over one run, in fetch order, unique by id.
#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    postings: Vec<Posting>,
    ids: HashSet<String>,
}

impl ResultSet {
    /// Append a posting. Returns `false` (and drops it) if its id is already present.
    pub fn push(&mut self, posting: Posting) -> bool {
        if !self.ids.insert(posting.id.clone()) {
            return false;
        }
        self.postings.push(posting);
        true
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn into_inner(self) -> Vec<Posting> {
        self.postings
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
