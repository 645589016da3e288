//! Bounded breadth-first expansion over the self-referential activity tree.

use crate::database::Repository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Depth bound for category expansion. The store does not enforce
/// acyclicity of the parent relation, so this cap is the real safety
/// mechanism against pathological trees.
pub const ACTIVITY_TREE_DEPTH: u32 = 3;

/// Batched child lookup, one round trip per tree level.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityTreeSource: Send + Sync {
    async fn child_activity_ids(&self, parent_ids: &[i32]) -> Result<Vec<i32>>;
}

#[async_trait]
impl ActivityTreeSource for Repository {
    async fn child_activity_ids(&self, parent_ids: &[i32]) -> Result<Vec<i32>> {
        Repository::child_activity_ids(self, parent_ids).await
    }
}

/// Collect `root_id` and all descendant activity ids up to `max_depth`
/// levels below the root.
///
/// Level-by-level: each iteration queries the children of the whole
/// current frontier in one batch, accumulates them, and makes them the
/// next frontier. An empty frontier terminates early; a nonexistent root
/// yields the singleton `{root_id}`, which callers treat as "no matches".
pub async fn expand<S>(source: &S, root_id: i32, max_depth: u32) -> Result<HashSet<i32>>
where
    S: ActivityTreeSource + ?Sized,
{
    let mut frontier = vec![root_id];
    let mut collected: HashSet<i32> = frontier.iter().copied().collect();
    let mut level = 0;

    while !frontier.is_empty() && level < max_depth {
        let children = source.child_activity_ids(&frontier).await?;
        collected.extend(children.iter().copied());
        frontier = children;
        level += 1;
    }

    Ok(collected)
}
