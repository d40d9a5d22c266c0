use crate::areas::database::Database;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use derive_new::new;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WalkOrder {
    /// Ancestors before descendants, oldest first
    #[default]
    Topological,
    /// Newest committer timestamp first
    Chronological,
}

#[derive(Clone, new)]
pub struct RevList<'r> {
    database: &'r Database,
    head: Option<ObjectId>,
    order: WalkOrder,
    since: Option<DateTime<FixedOffset>>,
}

impl<'r> RevList<'r> {
    /// Fix the commit order up front from commit headers only; full commits
    /// are read one at a time as the iterator advances.
    pub fn into_iter(self) -> anyhow::Result<RevListIntoIter<'r>> {
        let mut cache = HashMap::new();

        let ordered = match &self.head {
            None => Vec::new(),
            Some(head) => match self.order {
                WalkOrder::Topological => self.topological(head, &mut cache)?,
                WalkOrder::Chronological => self.chronological(head, &mut cache)?,
            },
        };

        let selected = ordered
            .into_iter()
            .filter(|oid| match (&self.since, cache.get(oid)) {
                (Some(since), Some(slim)) => slim.timestamp >= *since,
                _ => true,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            commits = selected.len(),
            skipped = cache.len() - selected.len(),
            "history walk order fixed"
        );

        Ok(RevListIntoIter {
            database: self.database,
            commit_oids: selected.into_iter(),
        })
    }

    fn slim_commit<'c>(
        &self,
        oid: &ObjectId,
        cache: &'c mut HashMap<ObjectId, SlimCommit>,
    ) -> anyhow::Result<&'c SlimCommit> {
        if !cache.contains_key(oid) {
            let slim = self.database.load_slim_commit(oid)?;
            cache.insert(oid.clone(), slim);
        }

        cache
            .get(oid)
            .ok_or_else(|| anyhow::anyhow!("Commit {oid} missing from cache"))
    }

    /// Post-order depth-first walk, parents in recorded order
    fn topological(
        &self,
        head: &ObjectId,
        cache: &mut HashMap<ObjectId, SlimCommit>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::from([head.clone()]);
        let mut stack = vec![(head.clone(), 0usize)];

        while let Some((oid, next_parent)) = stack.pop() {
            let parent = self.slim_commit(&oid, cache)?.parents.get(next_parent).cloned();

            match parent {
                Some(parent) => {
                    stack.push((oid, next_parent + 1));
                    if visited.insert(parent.clone()) {
                        stack.push((parent, 0));
                    }
                }
                None => ordered.push(oid),
            }
        }

        Ok(ordered)
    }

    fn chronological(
        &self,
        head: &ObjectId,
        cache: &mut HashMap<ObjectId, SlimCommit>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::from([head.clone()]);
        let mut queue = BinaryHeap::from([self.slim_commit(head, cache)?.clone()]);

        while let Some(commit) = queue.pop() {
            for parent in &commit.parents {
                if visited.insert(parent.clone()) {
                    queue.push(self.slim_commit(parent, cache)?.clone());
                }
            }

            ordered.push(commit.oid);
        }

        Ok(ordered)
    }
}

pub struct RevListIntoIter<'r> {
    database: &'r Database,
    commit_oids: std::vec::IntoIter<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.commit_oids.next()?;

        Some(self.database.load_commit(&oid).map(|commit| (oid, commit)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.commit_oids.size_hint()
    }
}
