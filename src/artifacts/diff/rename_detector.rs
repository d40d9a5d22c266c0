//! Rename detection
//!
//! Turns a deletion and an addition of the same or similar content into a
//! single rename, the way `git diff -M` does:
//!
//! 1. Exact pass: a deleted and an added file with the same blob id and the
//!    same mode type pair up with similarity 100.
//! 2. Inexact pass: remaining pairs are scored by how much content they
//!    share. Content is cut into chunks ending at a newline or after 64 bytes,
//!    the bytes of chunks common to both sides are counted, and
//!    `score = common * 100 / max(old_size, new_size)`. Pairs at or above the
//!    threshold are matched greedily, best score first.
//!
//! Submodules never take part and symlinks only pair exactly. The inexact
//! pass is skipped when the number of candidate pairs exceeds `RENAME_LIMIT²`.

use crate::areas::database::Database;
use crate::artifacts::diff::{DiffFile, TreeChange};
use crate::artifacts::objects::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};

/// Default minimum similarity (percent) for an inexact rename
pub const DEFAULT_RENAME_THRESHOLD: u8 = 50;

/// Same default as git's `diff.renameLimit`
pub const RENAME_LIMIT: usize = 1000;

const MAX_CHUNK_LEN: usize = 64;

pub struct RenameDetector<'r> {
    database: &'r Database,
    threshold: u8,
    contents: HashMap<ObjectId, Bytes>,
}

struct Candidate {
    score: u8,
    source: usize,
    destination: usize,
}

impl<'r> RenameDetector<'r> {
    pub fn new(database: &'r Database, threshold: u8) -> Self {
        RenameDetector {
            database,
            threshold: threshold.min(100),
            contents: HashMap::new(),
        }
    }

    pub fn detect(&mut self, changes: Vec<TreeChange>) -> anyhow::Result<Vec<TreeChange>> {
        let sources = Self::candidates(&changes, |change| match change {
            TreeChange::Deleted(old) => Some(old),
            _ => None,
        });
        let destinations = Self::candidates(&changes, |change| match change {
            TreeChange::Added(new) => Some(new),
            _ => None,
        });

        if sources.is_empty() || destinations.is_empty() {
            return Ok(changes);
        }

        // destination index -> (source index, similarity)
        let mut pairs: HashMap<usize, (usize, u8)> = HashMap::new();
        let mut used_sources = HashSet::new();

        self.match_exact(&changes, &sources, &destinations, &mut pairs, &mut used_sources);

        let remaining_sources = sources
            .iter()
            .copied()
            .filter(|source| !used_sources.contains(source))
            .collect::<Vec<_>>();
        let remaining_destinations = destinations
            .iter()
            .copied()
            .filter(|destination| !pairs.contains_key(destination))
            .collect::<Vec<_>>();

        if remaining_sources.len() * remaining_destinations.len() > RENAME_LIMIT * RENAME_LIMIT {
            tracing::warn!(
                sources = remaining_sources.len(),
                destinations = remaining_destinations.len(),
                "too many files for inexact rename detection, skipping it"
            );
        } else {
            self.match_similar(
                &changes,
                &remaining_sources,
                &remaining_destinations,
                &mut pairs,
                &mut used_sources,
            )?;
        }

        Ok(Self::merge_pairs(changes, pairs, &used_sources))
    }

    fn candidates(
        changes: &[TreeChange],
        side: impl Fn(&TreeChange) -> Option<&DiffFile>,
    ) -> Vec<usize> {
        changes
            .iter()
            .enumerate()
            .filter(|(_, change)| side(change).is_some_and(|file| !file.entry.mode.is_gitlink()))
            .map(|(index, _)| index)
            .collect()
    }

    fn match_exact(
        &self,
        changes: &[TreeChange],
        sources: &[usize],
        destinations: &[usize],
        pairs: &mut HashMap<usize, (usize, u8)>,
        used_sources: &mut HashSet<usize>,
    ) {
        for &destination in destinations {
            let Some(new) = changes[destination].new_file() else {
                continue;
            };

            let source = sources.iter().copied().find(|source| {
                !used_sources.contains(source)
                    && changes[*source].old_file().is_some_and(|old| {
                        old.entry.oid == new.entry.oid
                            && old.entry.mode.mode_type() == new.entry.mode.mode_type()
                    })
            });

            if let Some(source) = source {
                used_sources.insert(source);
                pairs.insert(destination, (source, 100));
            }
        }
    }

    fn match_similar(
        &mut self,
        changes: &[TreeChange],
        sources: &[usize],
        destinations: &[usize],
        pairs: &mut HashMap<usize, (usize, u8)>,
        used_sources: &mut HashSet<usize>,
    ) -> anyhow::Result<()> {
        let mut candidates = Vec::new();

        for &source in sources {
            let Some(old) = changes[source].old_file().filter(|old| is_regular(old)) else {
                continue;
            };
            let old_content = self.content(&old.entry.oid)?;

            for &destination in destinations {
                let Some(new) = changes[destination].new_file().filter(|new| is_regular(new))
                else {
                    continue;
                };
                let new_content = self.content(&new.entry.oid)?;

                // the smaller side bounds the best achievable score
                let (small, large) = if old_content.len() < new_content.len() {
                    (old_content.len(), new_content.len())
                } else {
                    (new_content.len(), old_content.len())
                };
                if large == 0 || small * 100 < large * self.threshold as usize {
                    continue;
                }

                let score = similarity(&old_content, &new_content);
                if score >= self.threshold {
                    candidates.push(Candidate {
                        score,
                        source,
                        destination,
                    });
                }
            }
        }

        // best score first, then path order on both sides
        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| changes[a.source].path().cmp(changes[b.source].path()))
                .then_with(|| changes[a.destination].path().cmp(changes[b.destination].path()))
        });

        for candidate in candidates {
            if used_sources.contains(&candidate.source) || pairs.contains_key(&candidate.destination)
            {
                continue;
            }

            used_sources.insert(candidate.source);
            pairs.insert(candidate.destination, (candidate.source, candidate.score));
        }

        Ok(())
    }

    fn content(&mut self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        if let Some(content) = self.contents.get(oid) {
            return Ok(content.clone());
        }

        let content = Bytes::copy_from_slice(self.database.load_blob(oid)?.content());
        self.contents.insert(oid.clone(), content.clone());

        Ok(content)
    }

    fn merge_pairs(
        changes: Vec<TreeChange>,
        pairs: HashMap<usize, (usize, u8)>,
        used_sources: &HashSet<usize>,
    ) -> Vec<TreeChange> {
        let old_files = changes
            .iter()
            .map(|change| change.old_file().cloned())
            .collect::<Vec<_>>();

        changes
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !used_sources.contains(index))
            .map(|(index, change)| match (pairs.get(&index), change) {
                (Some(&(source, similarity)), TreeChange::Added(new)) => {
                    match old_files[source].clone() {
                        Some(old) => TreeChange::Renamed {
                            old,
                            new,
                            similarity,
                        },
                        None => TreeChange::Added(new),
                    }
                }
                (_, change) => change,
            })
            .collect()
    }
}

// symlink targets are only ever renamed exactly
fn is_regular(file: &DiffFile) -> bool {
    !matches!(file.entry.mode, EntryMode::File(FileMode::Symlink))
}

/// Percentage of shared content between two byte strings
pub fn similarity(old: &[u8], new: &[u8]) -> u8 {
    let max_len = old.len().max(new.len());
    if max_len == 0 {
        return 100;
    }

    let old_chunks = chunk_sizes(old);
    let new_chunks = chunk_sizes(new);

    let common = old_chunks
        .iter()
        .map(|(chunk, old_bytes)| {
            new_chunks
                .get(chunk)
                .map_or(0, |new_bytes| (*old_bytes).min(*new_bytes))
        })
        .sum::<usize>();

    (common * 100 / max_len) as u8
}

/// Total bytes per distinct chunk
fn chunk_sizes(content: &[u8]) -> HashMap<&[u8], usize> {
    let mut sizes = HashMap::new();
    let mut start = 0;

    for (index, byte) in content.iter().enumerate() {
        let len = index + 1 - start;
        if *byte == b'\n' || len == MAX_CHUNK_LEN {
            *sizes.entry(&content[start..=index]).or_insert(0) += len;
            start = index + 1;
        }
    }
    if start < content.len() {
        *sizes.entry(&content[start..]).or_insert(0) += content.len() - start;
    }

    sizes
}
