//! Genre graph over song records.
//!
//! Genres and songs are nodes. Each song is linked to every one of its genre
//! tags and each tag back to the song, so a traversal from a genre reaches
//! that genre's songs first, then the other genres those songs carry, then
//! the songs of those genres.
//!
//! Neighbors are kept in insertion order, which makes both traversals
//! deterministic for a given dataset.

use crate::key::{GenreKey, KeyExtractor};
use crate::record::Record;
use crate::sort::SortError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// Genre a similarity search starts from when none is given.
pub const DEFAULT_START_GENRE: &str = "rock";

/// Field holding a song's display name.
pub const DEFAULT_NAME_FIELD: &str = "name";

/// Songs returned by a similarity search when no limit is given.
pub const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// A vertex of the genre graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Genre(String),
    Song(String),
}

impl Node {
    pub fn genre(name: impl Into<String>) -> Self {
        Self::Genre(name.into())
    }

    pub fn song(name: impl Into<String>) -> Self {
        Self::Song(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Genre(name) | Self::Song(name) => name,
        }
    }

    #[inline]
    pub fn is_song(&self) -> bool {
        matches!(self, Self::Song(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visiting order for [`GenreGraph::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    BreadthFirst,
    DepthFirst,
}

impl Traversal {
    /// Parse traversal order from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bfs" | "breadth-first" => Some(Self::BreadthFirst),
            "dfs" | "depth-first" => Some(Self::DepthFirst),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "bfs",
            Self::DepthFirst => "dfs",
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Undirected genre/song adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct GenreGraph {
    adjacency: FxHashMap<Node, Vec<Node>>,
}

impl GenreGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from song records.
    ///
    /// Genre tags come from `genres` and are trimmed; empty tags add no edge.
    /// Records without a `name_field` value are skipped. A non-string name is
    /// rendered as compact JSON.
    pub fn from_records(
        records: &[Record],
        genres: &GenreKey,
        name_field: &str,
    ) -> Result<Self, SortError> {
        let mut graph = Self::new();
        let mut skipped = 0usize;

        for record in records {
            let Some(name) = song_name(record, name_field) else {
                skipped += 1;
                continue;
            };
            let key = genres.extract(record)?;
            graph.add_song(name, key.parts());
        }

        debug!(
            genres = graph.genre_count(),
            songs = graph.song_count(),
            skipped,
            "built genre graph"
        );
        Ok(graph)
    }

    /// Add a song and link it with each of its genre tags.
    pub fn add_song<I, S>(&mut self, name: impl Into<String>, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let song = Node::Song(name.into());
        self.adjacency.entry(song.clone()).or_default();

        for genre in genres {
            let genre = genre.as_ref().trim();
            if genre.is_empty() {
                continue;
            }
            let genre = Node::genre(genre);
            self.link(genre.clone(), song.clone());
            self.link(song.clone(), genre);
        }
    }

    fn link(&mut self, from: Node, to: Node) {
        self.adjacency.entry(from).or_default().push(to);
    }

    /// Neighbors of `node` in insertion order (empty if unknown).
    pub fn neighbors(&self, node: &Node) -> &[Node] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn genre_count(&self) -> usize {
        self.adjacency.keys().filter(|n| !n.is_song()).count()
    }

    pub fn song_count(&self) -> usize {
        self.adjacency.keys().filter(|n| n.is_song()).count()
    }

    /// Every node reachable from `start`, `start` first, each visited once.
    ///
    /// Returns an empty list when `start` is not in the graph.
    pub fn traverse(&self, start: &Node, order: Traversal) -> Vec<&Node> {
        let Some((start, _)) = self.adjacency.get_key_value(start) else {
            return Vec::new();
        };

        match order {
            Traversal::BreadthFirst => self.breadth_first(start),
            Traversal::DepthFirst => self.depth_first(start),
        }
    }

    fn breadth_first<'a>(&'a self, start: &'a Node) -> Vec<&'a Node> {
        let mut visited: FxHashSet<&Node> = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            result.push(node);
            queue.extend(
                self.neighbors(node)
                    .iter()
                    .filter(|next| !visited.contains(next)),
            );
        }

        result
    }

    /// Pre-order depth-first walk. Neighbors are pushed in reverse so the
    /// first neighbor is explored first, matching the recursive order.
    fn depth_first<'a>(&'a self, start: &'a Node) -> Vec<&'a Node> {
        let mut visited: FxHashSet<&Node> = FxHashSet::default();
        let mut result = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            result.push(node);
            stack.extend(
                self.neighbors(node)
                    .iter()
                    .rev()
                    .filter(|next| !visited.contains(next)),
            );
        }

        result
    }

    /// Up to `limit` song names reachable from `genre`, nearest first.
    pub fn similar_songs(&self, genre: &str, order: Traversal, limit: usize) -> Vec<&str> {
        self.traverse(&Node::genre(genre), order)
            .into_iter()
            .filter(|node| node.is_song())
            .map(|node| node.name())
            .take(limit)
            .collect()
    }
}

fn song_name(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song(name: &str, genres: &str) -> Record {
        Record::new().with("name", name).with("genres", genres)
    }

    fn playlist() -> Vec<Record> {
        vec![
            song("Creep", "rock, alternative"),
            song("So What", "jazz"),
            song("Paranoid Android", "alternative, rock"),
            song("Karma Police", "rock"),
            song("Blue in Green", "jazz, modal"),
            song("Teardrop", "trip hop, alternative"),
        ]
    }

    fn graph() -> GenreGraph {
        GenreGraph::from_records(&playlist(), &GenreKey::new(), DEFAULT_NAME_FIELD).unwrap()
    }

    fn names<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_build_counts() {
        let graph = graph();
        assert_eq!(graph.song_count(), 6);
        assert_eq!(graph.genre_count(), 5);
        assert_eq!(
            graph.neighbors(&Node::genre("rock")),
            &[
                Node::song("Creep"),
                Node::song("Paranoid Android"),
                Node::song("Karma Police"),
            ]
        );
        assert_eq!(
            graph.neighbors(&Node::song("Creep")),
            &[Node::genre("rock"), Node::genre("alternative")]
        );
        assert!(graph.neighbors(&Node::genre("polka")).is_empty());
    }

    #[test]
    fn test_breadth_first_order() {
        let graph = graph();
        let order = graph.traverse(&Node::genre("rock"), Traversal::BreadthFirst);
        assert_eq!(
            names(&order),
            vec![
                "rock",
                "Creep",
                "Paranoid Android",
                "Karma Police",
                "alternative",
                "Teardrop",
                "trip hop",
            ]
        );
    }

    #[test]
    fn test_depth_first_order() {
        let graph = graph();
        let order = graph.traverse(&Node::genre("rock"), Traversal::DepthFirst);
        assert_eq!(
            names(&order),
            vec![
                "rock",
                "Creep",
                "alternative",
                "Paranoid Android",
                "Teardrop",
                "trip hop",
                "Karma Police",
            ]
        );
    }

    #[test]
    fn test_traversal_stays_in_component() {
        let graph = graph();
        let order = graph.traverse(&Node::genre("jazz"), Traversal::BreadthFirst);
        assert_eq!(names(&order), vec!["jazz", "So What", "Blue in Green", "modal"]);
    }

    #[test]
    fn test_unknown_start_is_empty() {
        let graph = graph();
        assert!(graph.traverse(&Node::genre("polka"), Traversal::DepthFirst).is_empty());
        // A song is not a genre even when the names match
        assert!(graph.similar_songs("Creep", Traversal::BreadthFirst, 10).is_empty());
    }

    #[test]
    fn test_similar_songs_limit() {
        let graph = graph();
        assert_eq!(
            graph.similar_songs("rock", Traversal::BreadthFirst, 2),
            vec!["Creep", "Paranoid Android"]
        );
        assert_eq!(
            graph.similar_songs("rock", Traversal::DepthFirst, DEFAULT_SIMILAR_LIMIT),
            vec!["Creep", "Paranoid Android", "Teardrop", "Karma Police"]
        );
        assert!(graph.similar_songs("rock", Traversal::BreadthFirst, 0).is_empty());
    }

    #[test]
    fn test_tags_trimmed_and_untagged_songs_isolated() {
        let records = vec![
            song("Hey Jude", " rock , pop"),
            Record::new().with("name", "Silence"),
            Record::new().with("genres", "rock"),
            Record::new().with("name", 7).with("genres", "pop"),
        ];
        let graph = GenreGraph::from_records(&records, &GenreKey::new(), "name").unwrap();

        assert!(graph.contains(&Node::genre("rock")));
        assert!(graph.contains(&Node::song("Silence")));
        assert!(graph.neighbors(&Node::song("Silence")).is_empty());
        assert_eq!(graph.song_count(), 3);
        assert_eq!(
            graph.similar_songs("pop", Traversal::BreadthFirst, 10),
            vec!["Hey Jude", "7"]
        );
    }

    #[test]
    fn test_bad_genre_value_fails() {
        let records = vec![Record::new().with("name", "X").with("genres", json!([1]))];
        let err = GenreGraph::from_records(&records, &GenreKey::new(), "name").unwrap_err();
        assert!(matches!(err, SortError::KeyExtraction { .. }));
    }

    #[test]
    fn test_traversal_from_str() {
        assert_eq!(Traversal::from_str("BFS"), Some(Traversal::BreadthFirst));
        assert_eq!(Traversal::from_str("depth-first"), Some(Traversal::DepthFirst));
        assert_eq!(Traversal::from_str("astar"), None);
    }
}
