//! Client-side gallery state: which items a view shows, in what order, and
//! what is selected. Nothing here touches the database.

use crate::models::{Folder, MediaItem, MediaType, Tab};
use crate::services::access::{self, FolderAccess, Principal};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;

/// Delay between slides while the lightbox slideshow runs.
pub const SLIDESHOW_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Date,
    /// Title A to Z, ignoring case.
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "grid")]
    Grid,
    #[serde(rename = "grid-lg")]
    GridLarge,
    #[serde(rename = "list")]
    List,
}

#[derive(Debug, Clone, Copy)]
pub struct ItemQuery<'a> {
    pub tab: Tab,
    pub folder_id: Option<i64>,
    pub search: &'a str,
    pub sort: SortOrder,
}

fn matches_query(
    item: &MediaItem,
    query: &ItemQuery<'_>,
    favorites: &HashSet<i64>,
    needle: &str,
) -> bool {
    let Some(media_type) = query.tab.media_type() else {
        return favorites.contains(&item.id);
    };

    if item.media_type != media_type {
        return false;
    }

    if !needle.is_empty() {
        return item.title.to_lowercase().contains(needle);
    }

    item.folder_id == query.folder_id
}

/// Items shown for `query`, sorted. The favorites tab ignores type, folder
/// and search; a search ignores the folder hierarchy.
pub fn filter_items<'a>(
    items: &'a [MediaItem],
    query: &ItemQuery<'_>,
    favorites: &HashSet<i64>,
) -> Vec<&'a MediaItem> {
    let needle = query.search.trim().to_lowercase();
    let mut shown: Vec<&MediaItem> = items
        .iter()
        .filter(|item| matches_query(item, query, favorites, &needle))
        .collect();
    sort_items(&mut shown, query.sort);
    shown
}

pub fn sort_items(items: &mut [&MediaItem], order: SortOrder) {
    match order {
        SortOrder::Name => items.sort_by(|a, b| compare_by_name(a, b)),
        SortOrder::Date => items.sort_by(|a, b| compare_by_date(a, b)),
    }
}

pub fn compare_by_name(a: &MediaItem, b: &MediaItem) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn compare_by_date(a: &MediaItem, b: &MediaItem) -> Ordering {
    let ta = parse_timestamp(&a.created_at);
    let tb = parse_timestamp(&b.created_at);
    tb.cmp(&ta)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.fff]`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

pub fn folder_item_count(items: &[MediaItem], folder_id: i64) -> usize {
    items
        .iter()
        .filter(|item| item.folder_id == Some(folder_id))
        .count()
}

/// Folders of `folders` that `who` may see.
pub fn visible_folders<'a>(who: Principal<'_>, folders: &'a [Folder]) -> Vec<&'a Folder> {
    folders
        .iter()
        .filter(|f| access::is_folder_visible(who, f))
        .collect()
}

/// Drops items living in folders `who` cannot open. Root items always stay.
pub fn accessible_items(
    who: Principal<'_>,
    items: Vec<MediaItem>,
    folders: &[Folder],
    unlocked: &HashSet<i64>,
) -> Vec<MediaItem> {
    let open: HashSet<i64> = folders
        .iter()
        .filter(|f| {
            access::folder_access(who, f, unlocked.contains(&f.id)) == FolderAccess::Granted
        })
        .map(|f| f.id)
        .collect();

    items
        .into_iter()
        .filter(|item| item.folder_id.map_or(true, |id| open.contains(&id)))
        .collect()
}

/// Set of selected item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn select(&mut self, id: i64) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: i64) {
        self.ids.remove(&id);
    }

    pub fn toggle(&mut self, id: i64) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.ids.extend(ids);
    }

    pub fn deselect_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids {
            self.ids.remove(&id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The "select all" button: clears when everything shown is already
    /// selected, otherwise selects exactly what is shown.
    pub fn toggle_all(&mut self, visible: &[&MediaItem]) {
        let all_selected = !visible.is_empty()
            && self.ids.len() == visible.len()
            && visible.iter().all(|i| self.ids.contains(&i.id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|i| i.id).collect();
        }
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Full-screen viewer over the currently shown items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
    index: usize,
    len: usize,
    playing: bool,
}

impl Lightbox {
    pub fn open(index: usize, len: usize) -> Option<Self> {
        (index < len).then_some(Self {
            index,
            len,
            playing: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Called every [`SLIDESHOW_INTERVAL`]; advances only while playing.
    pub fn tick(&mut self) {
        if self.playing {
            self.next();
        }
    }
}

/// Music player queue over the audio items of the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    tracks: Vec<i64>,
    current: Option<usize>,
}

impl Player {
    pub fn play(&mut self, tracks: Vec<i64>, id: i64) -> bool {
        match tracks.iter().position(|t| *t == id) {
            Some(pos) => {
                self.tracks = tracks;
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<i64> {
        self.current.map(|i| self.tracks[i])
    }

    pub fn next(&mut self) -> Option<i64> {
        let len = self.tracks.len();
        self.current = self.current.map(|i| (i + 1) % len);
        self.current()
    }

    pub fn prev(&mut self) -> Option<i64> {
        let len = self.tracks.len();
        self.current = self.current.map(|i| (i + len - 1) % len);
        self.current()
    }

    pub fn stop(&mut self) {
        self.tracks.clear();
        self.current = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Play(i64),
    View(usize),
}

/// Whole gallery screen state for one signed-in user.
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    pub tab: Tab,
    pub current_folder: Option<Folder>,
    pub search: String,
    pub sort: SortOrder,
    pub view_mode: ViewMode,
    pub selection: Selection,
    pub lightbox: Option<Lightbox>,
    pub player: Player,
}

impl GalleryView {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            ..Self::default()
        }
    }

    pub fn query(&self) -> ItemQuery<'_> {
        ItemQuery {
            tab: self.tab,
            folder_id: self.current_folder.as_ref().map(|f| f.id),
            search: &self.search,
            sort: self.sort,
        }
    }

    pub fn shown<'a>(&self, items: &'a [MediaItem], favorites: &HashSet<i64>) -> Vec<&'a MediaItem> {
        filter_items(items, &self.query(), favorites)
    }

    /// Moving to another tab returns to its root and drops the selection.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.current_folder = None;
        self.selection.clear();
        self.lightbox = None;
    }

    /// Enters `folder` when access is granted; otherwise reports why not.
    pub fn open_folder(&mut self, who: Principal<'_>, folder: &Folder, unlocked: bool) -> FolderAccess {
        let verdict = access::folder_access(who, folder, unlocked);
        if verdict == FolderAccess::Granted {
            self.current_folder = Some(folder.clone());
            self.selection.clear();
        }
        verdict
    }

    pub fn leave_folder(&mut self) {
        self.current_folder = None;
        self.selection.clear();
    }

    /// Double-click on the `index`th shown item: audio starts playing,
    /// anything else opens in the lightbox.
    pub fn activate(&mut self, shown: &[&MediaItem], index: usize) -> Option<Activation> {
        let item = shown.get(index)?;
        if item.media_type == MediaType::Audio {
            let tracks = shown
                .iter()
                .filter(|i| i.media_type == MediaType::Audio)
                .map(|i| i.id)
                .collect();
            self.player.play(tracks, item.id);
            Some(Activation::Play(item.id))
        } else {
            self.lightbox = Lightbox::open(index, shown.len());
            Some(Activation::View(index))
        }
    }

    /// Clears state that referred to deleted items.
    pub fn forget_items(&mut self, deleted: &[i64]) {
        self.selection.deselect_all(deleted.iter().copied());
        if let Some(current) = self.player.current() {
            if deleted.contains(&current) {
                self.player.stop();
            }
        }
        self.lightbox = None;
    }
}
