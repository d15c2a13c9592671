use std::collections::{HashSet, VecDeque};

/// Queue a URL is waiting in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Entries listed in the sitemap, drained first
    Sitemap,
    /// Start URL and links discovered on crawled pages
    Discovery,
}

/// What a worker should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Fetch(String),
    /// Nothing pending, but in-flight fetches may still add links
    Wait,
    Done,
}

/// URLs known to the run and what has happened to them.
///
/// Every URL enters at most once, so a URL is also fetched at most once.
#[derive(Debug, Default)]
pub struct Frontier {
    sitemap: VecDeque<String>,
    discovery: VecDeque<String>,
    enqueued: HashSet<String>,
    in_flight: usize,
    dispatched: usize,
    max_pages: Option<usize>,
}

impl Frontier {
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            max_pages,
            ..Self::default()
        }
    }

    /// Add a URL to a lane; returns false when it was enqueued before
    pub fn push(&mut self, url: String, lane: Lane) -> bool {
        if !self.enqueued.insert(url.clone()) {
            ::log::trace!("Skipping already queued URL: {}", url);
            return false;
        }
        match lane {
            Lane::Sitemap => self.sitemap.push_back(url),
            Lane::Discovery => self.discovery.push_back(url),
        }
        true
    }

    /// Pop the next URL to fetch, sitemap lane first
    pub fn next(&mut self) -> Next {
        if self.is_capped() {
            let dropped = self.sitemap.len() + self.discovery.len();
            if dropped > 0 {
                ::log::info!("Page limit reached, discarding {} pending URLs", dropped);
                self.sitemap.clear();
                self.discovery.clear();
            }
            return Next::Done;
        }

        match self.sitemap.pop_front().or_else(|| self.discovery.pop_front()) {
            Some(url) => {
                self.in_flight += 1;
                self.dispatched += 1;
                Next::Fetch(url)
            }
            None if self.in_flight > 0 => Next::Wait,
            None => Next::Done,
        }
    }

    /// Mark one dispatched fetch as finished (successfully or not)
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn is_capped(&self) -> bool {
        self.max_pages.is_some_and(|max| self.dispatched >= max)
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }
}
