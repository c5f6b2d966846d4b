//! Crawl engine - recursive fetch/extract/treat orchestration
//!
//! The engine fans out one concurrent task per discovered link and bounds
//! recursion by a depth parameter. Each branch joins its own children, so
//! the top-level entry point is a barrier over the entire transitive task
//! tree. Two pieces of state are shared across branches: the fetch counter
//! and the treatment gate; everything else is immutable or branch-local.

use crate::config::Config;
use crate::crawler::counter::FetchCounter;
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::page::Page;
use crate::policy::{Disposition, Policy};
use crate::treatment::Treatment;
use crate::KudzuError;
use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// The crawl engine: seeds, treatments, policies, and shared crawl state
pub struct Crawler {
    seeds: Vec<String>,
    treatments: Vec<Box<dyn Treatment>>,
    client: Client,
    counter: FetchCounter,

    max_depth: i64,
    max_follow_through: i64,

    default_policy: Policy,
    // Per-phase policy lists. Configurable surface carried by the engine;
    // the crawl algorithm itself consults only the default policy.
    start_policies: Vec<Policy>,
    node_policies: Vec<Policy>,
    leaf_policies: Vec<Policy>,

    /// Every treatment invocation, from any branch, runs while holding this
    /// lock. Treatments never overlap.
    treatment_gate: tokio::sync::Mutex<()>,

    /// Present only when deduplication is enabled; first claim wins.
    visited: Option<Mutex<HashSet<String>>>,
}

impl Crawler {
    /// Creates an engine from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seeds` - Addresses the crawl starts from
    /// * `treatments` - Callbacks applied, in order, to every fetched page
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready-to-run engine
    /// * `Err(KudzuError)` - Policy compilation or HTTP client setup failed
    pub fn new(
        config: &Config,
        seeds: Vec<String>,
        treatments: Vec<Box<dyn Treatment>>,
    ) -> Result<Self, KudzuError> {
        let default_policy = config.policy.build()?;
        let client = build_http_client(&config.crawler)?;

        let visited = config
            .crawler
            .deduplicate
            .then(|| Mutex::new(HashSet::new()));

        Ok(Self {
            seeds,
            treatments,
            client,
            counter: FetchCounter::new(),
            max_depth: config.crawler.max_depth,
            max_follow_through: config.crawler.max_follow_through,
            default_policy,
            start_policies: Vec::new(),
            node_policies: Vec::new(),
            leaf_policies: Vec::new(),
            treatment_gate: tokio::sync::Mutex::new(()),
            visited,
        })
    }

    /// Replaces the policy list applied to seed pages
    pub fn with_start_policies(mut self, policies: Vec<Policy>) -> Self {
        self.start_policies = policies;
        self
    }

    /// Replaces the policy list applied to interior pages
    pub fn with_node_policies(mut self, policies: Vec<Policy>) -> Self {
        self.node_policies = policies;
        self
    }

    /// Replaces the policy list applied to pages at the depth bound
    pub fn with_leaf_policies(mut self, policies: Vec<Policy>) -> Self {
        self.leaf_policies = policies;
        self
    }

    /// The number of fetches initiated so far
    pub fn fetch_count(&self) -> u64 {
        self.counter.read()
    }

    /// Crawls every seed concurrently and waits for the entire transitive
    /// task tree to finish
    ///
    /// Completion is the only signal: branches that fail to fetch are
    /// abandoned silently and do not surface here.
    pub async fn start_crawl(self: &Arc<Self>) {
        let mut branches = Vec::with_capacity(self.seeds.len());

        for seed in self.seeds.clone() {
            if !self.claim(&seed) {
                tracing::debug!(address = %seed, "seed already visited, skipping");
                continue;
            }
            branches.push(tokio::spawn(Arc::clone(self).crawl(seed, self.max_depth)));
        }

        join_branches(branches).await;

        tracing::info!(fetches = self.fetch_count(), "crawl complete");
    }

    /// Crawls one address: fetch, fan out over discovered links, treat
    ///
    /// A fetch failure abandons the branch with no side effect beyond the
    /// counter increment already performed. Treatments run after the
    /// recursive fan-out has been spawned, whether or not it has completed.
    fn crawl(self: Arc<Self>, address: String, remaining_depth: i64) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let count = self.counter.increment();
            tracing::debug!(%address, count, "crawling");

            let content = match fetch_url(&self.client, &address).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!(%address, error = %e, "fetch failed, abandoning branch");
                    return;
                }
            };

            let page = Page::new(address, content);

            let branches = if remaining_depth != 0 {
                self.fan_out(&page, remaining_depth)
            } else {
                Vec::new()
            };

            self.treat(&page).await;

            join_branches(branches).await;
        })
    }

    /// Extracts candidate links from a page and spawns one branch per
    /// candidate the policy lets through
    fn fan_out(self: &Arc<Self>, page: &Page, remaining_depth: i64) -> Vec<JoinHandle<()>> {
        let candidates = extract_links(
            page.content(),
            &self.default_policy,
            self.max_follow_through,
        );

        if self.default_policy.disposition() == Disposition::Skip {
            if !candidates.is_empty() {
                tracing::trace!(
                    address = %page.address(),
                    candidates = candidates.len(),
                    "policy disposition is skip, not following"
                );
            }
            return Vec::new();
        }

        // Negative depth crawls without a bound and is passed down as-is.
        let next_depth = if remaining_depth > 0 {
            remaining_depth - 1
        } else {
            remaining_depth
        };

        let mut branches = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !self.claim(&candidate) {
                tracing::trace!(address = %candidate, "already visited, not following");
                continue;
            }
            branches.push(tokio::spawn(Arc::clone(self).crawl(candidate, next_depth)));
        }

        branches
    }

    /// Applies every registered treatment to a page, in order, each under
    /// the process-wide treatment gate
    async fn treat(&self, page: &Page) {
        for treatment in &self.treatments {
            let _gate = self.treatment_gate.lock().await;
            if let Err(e) = treatment.apply(page) {
                tracing::error!(address = %page.address(), error = %e, "treatment failed");
            }
        }
    }

    /// Claims an address for crawling
    ///
    /// Always true when deduplication is off; with deduplication on, true
    /// exactly once per address.
    fn claim(&self, address: &str) -> bool {
        match &self.visited {
            Some(visited) => visited.lock().unwrap().insert(address.to_string()),
            None => true,
        }
    }
}

/// Awaits a set of spawned branches, surfacing panics as error events
async fn join_branches(branches: Vec<JoinHandle<()>>) {
    for branch in branches {
        if let Err(e) = branch.await {
            tracing::error!(error = %e, "crawl branch aborted");
        }
    }
}
