// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! View state of the incrementally loaded material list.
//!
//! The list is reset on entry and on every search change, then grows one page
//! at a time as the user scrolls near the bottom. At most one scroll-triggered
//! request is in flight. A reset bumps the generation counter, so a response
//! belonging to an earlier generation is dropped instead of leaking into the
//! new list.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::material::UnterlageInfo;

/// Distance from the bottom of the document, in pixels, at which the next
/// page is requested.
pub const SCROLL_THRESHOLD: f64 = 200.0;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Scroll metrics reported by the browser.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScrollPosition {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollPosition {
    pub fn near_bottom(&self) -> bool {
        self.scroll_y + self.viewport_height >= self.document_height - SCROLL_THRESHOLD
    }
}

/// One page fetch, issued by `reset` or `on_scroll`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub page_size: usize,
    pub search: Option<String>,
    pub clear_existing: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PageOutcome {
    /// Items were added to the list.
    Loaded(usize),
    /// The backend returned an empty page.
    Exhausted,
    Failed,
    /// The request belonged to an earlier generation and was dropped.
    Stale,
}

#[derive(Debug)]
pub struct MaterialList {
    page: u32,
    page_size: usize,
    loading: bool,
    items: Vec<UnterlageInfo>,
    no_more_data: bool,
    search_term: Option<String>,
    total: Option<u64>,
    error: Option<ApiError>,
    generation: u64,
}

impl MaterialList {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            loading: false,
            items: Vec::new(),
            no_more_data: false,
            search_term: None,
            total: None,
            error: None,
            generation: 0,
        }
    }

    /// Starts over with page 1 of `search`. Blank search terms mean no search.
    pub fn reset(&mut self, search: Option<&str>) -> PageRequest {
        self.search_term = search
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        self.page = 1;
        self.items.clear();
        self.no_more_data = false;
        self.error = None;
        self.total = None;
        self.generation += 1;
        self.loading = true;
        self.request(true)
    }

    /// Requests the next page if the user scrolled near the bottom and no
    /// other request is running.
    pub fn on_scroll(&mut self, position: ScrollPosition) -> Option<PageRequest> {
        if !position.near_bottom() || self.loading || self.no_more_data {
            return None;
        }
        self.page += 1;
        self.loading = true;
        Some(self.request(false))
    }

    fn request(&self, clear_existing: bool) -> PageRequest {
        PageRequest {
            generation: self.generation,
            page: self.page,
            page_size: self.page_size,
            search: self.search_term.clone(),
            clear_existing,
        }
    }

    /// Applies the result of `request`.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<UnterlageInfo>, ApiError>,
    ) -> PageOutcome {
        if request.generation != self.generation {
            log::debug!(
                "Dropping page {} of generation {} (current {}).",
                request.page,
                request.generation,
                self.generation
            );
            return PageOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) if page.is_empty() => {
                self.no_more_data = true;
                self.roll_back();
                PageOutcome::Exhausted
            }
            Ok(page) => {
                let n = page.len();
                if request.clear_existing {
                    self.items = page;
                } else {
                    self.items.extend(page);
                }
                self.error = None;
                PageOutcome::Loaded(n)
            }
            Err(err) => {
                // The page is rolled back so that the next scroll asks for the
                // same page again.
                self.roll_back();
                self.error = Some(err);
                PageOutcome::Failed
            }
        }
    }

    fn roll_back(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn set_total(&mut self, generation: u64, count: u64) {
        if generation == self.generation {
            self.total = Some(count);
        }
    }

    pub fn items(&self) -> &[UnterlageInfo] {
        &self.items
    }

    pub fn loaded_count(&self) -> usize {
        self.items.len()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn no_more_data(&self) -> bool {
        self.no_more_data
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Distinct package names, in the order they were first loaded.
    pub fn packages(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.paket_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Loaded items, restricted to one package when given.
    pub fn filtered(&self, package: Option<&str>) -> Vec<&UnterlageInfo> {
        match package.filter(|p| !p.is_empty()) {
            Some(package) => self
                .items
                .iter()
                .filter(|item| item.paket_name == package)
                .collect(),
            None => self.items.iter().collect(),
        }
    }
}

impl Default for MaterialList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Where pages of materials come from.
pub trait MaterialSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<UnterlageInfo>, ApiError>;

    async fn fetch_count(&self, search: Option<&str>) -> Result<u64, ApiError>;
}

impl MaterialSource for ApiClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<UnterlageInfo>, ApiError> {
        match &request.search {
            Some(q) => self.search_page(q, request.page, request.page_size).await,
            None => self.materials_page(request.page, request.page_size).await,
        }
    }

    async fn fetch_count(&self, search: Option<&str>) -> Result<u64, ApiError> {
        self.materials_count(search).await
    }
}

fn lock(list: &Mutex<MaterialList>) -> Fallible<MutexGuard<'_, MaterialList>> {
    list.lock()
        .map_err(|_| ErrorReport::new("material list lock poisoned."))
}

/// Runs one page request against the shared list. The lock is released
/// while the request is in flight.
pub async fn load<S: MaterialSource>(
    list: &Mutex<MaterialList>,
    source: &S,
    request: PageRequest,
) -> Fallible<PageOutcome> {
    log::debug!(
        "Loading materials page {} (search: {:?}).",
        request.page,
        request.search
    );
    let result = source.fetch_page(&request).await;
    let mut guard = lock(list)?;
    Ok(guard.complete(&request, result))
}

/// Fetches the total for the list's current generation.
pub async fn load_total<S: MaterialSource>(list: &Mutex<MaterialList>, source: &S) -> Fallible<()> {
    let (generation, search) = {
        let guard = lock(list)?;
        (guard.generation(), guard.search_term().map(|s| s.to_string()))
    };
    match source.fetch_count(search.as_deref()).await {
        Ok(count) => lock(list)?.set_total(generation, count),
        Err(e) => log::warn!("Could not load the material count: {e}"),
    }
    Ok(())
}

/// Resets the list to `search` and loads the first page and the total.
pub async fn reset_and_load<S: MaterialSource>(
    list: &Mutex<MaterialList>,
    source: &S,
    search: Option<&str>,
) -> Fallible<PageOutcome> {
    let request = lock(list)?.reset(search);
    let outcome = load(list, source, request).await?;
    load_total(list, source).await?;
    Ok(outcome)
}

/// Handles a scroll report: loads the next page if one is due.
pub async fn scroll<S: MaterialSource>(
    list: &Mutex<MaterialList>,
    source: &S,
    position: ScrollPosition,
) -> Fallible<Option<PageOutcome>> {
    let request = lock(list)?.on_scroll(position);
    match request {
        Some(request) => Ok(Some(load(list, source, request).await?)),
        None => Ok(None),
    }
}
