//! Ordered-list reconciliation for the photo grid.
//!
//! Given the list currently on screen and a freshly submitted one, produce the
//! removes, moves, inserts and rebinds that turn the former into the latter.
//! Items are paired through [`ItemCallback::are_items_the_same`]; the longest
//! common subsequence of pairs stays put, every other pair costs one move.

/// Comparison hooks used to pair old and new items
pub trait ItemCallback<T> {
    /// Do both values occupy the same logical slot?
    fn are_items_the_same(&self, old_item: &T, new_item: &T) -> bool;

    /// Called only for paired items; `false` means the slot must be rebound
    fn are_contents_the_same(&self, old_item: &T, new_item: &T) -> bool;
}

/// One step of an update sequence. Positions refer to the list as it stands
/// after all preceding steps have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    Remove { position: usize },
    Move { from: usize, to: usize },
    /// `new_index` points into the submitted list
    Insert { position: usize, new_index: usize },
    Change { position: usize, new_index: usize },
}

/// Compute the update sequence turning `old` into `new`
pub fn calculate_diff<T, C>(old: &[T], new: &[T], callback: &C) -> Vec<ListUpdate>
where
    C: ItemCallback<T> + ?Sized,
{
    let (old_to_new, in_lcs) = pair_items(old, new, callback);

    let mut new_to_old: Vec<Option<usize>> = vec![None; new.len()];
    for (old_index, paired) in old_to_new.iter().enumerate() {
        if let Some(new_index) = paired {
            new_to_old[*new_index] = Some(old_index);
        }
    }

    let mut updates = Vec::new();

    // Removes run back to front so earlier positions stay valid
    for old_index in (0..old.len()).rev() {
        if old_to_new[old_index].is_none() {
            updates.push(ListUpdate::Remove { position: old_index });
        }
    }

    // Working list of surviving old indices, in on-screen order
    let mut working: Vec<usize> = (0..old.len()).filter(|&i| old_to_new[i].is_some()).collect();

    // Each paired item outside the common subsequence is dropped right behind
    // its predecessor in the new order, or at the front if it has none.
    let mut previous: Option<usize> = None;
    for old_index in new_to_old.iter().flatten().copied() {
        if !in_lcs[old_index] {
            let from = position_of(&working, old_index);
            working.remove(from);
            let to = match previous {
                Some(prev) => position_of(&working, prev) + 1,
                None => 0,
            };
            working.insert(to, old_index);
            if from != to {
                updates.push(ListUpdate::Move { from, to });
            }
        }
        previous = Some(old_index);
    }

    for (new_index, paired) in new_to_old.iter().enumerate() {
        if paired.is_none() {
            updates.push(ListUpdate::Insert {
                position: new_index,
                new_index,
            });
        }
    }

    for (new_index, paired) in new_to_old.iter().enumerate() {
        if let Some(old_index) = paired {
            if !callback.are_contents_the_same(&old[*old_index], &new[new_index]) {
                updates.push(ListUpdate::Change {
                    position: new_index,
                    new_index,
                });
            }
        }
    }

    updates
}

/// Replay an update sequence on `list`, pulling inserted and changed items from `new`
pub fn apply_updates<T: Clone>(list: &mut Vec<T>, new: &[T], updates: &[ListUpdate]) {
    for update in updates {
        match *update {
            ListUpdate::Remove { position } => {
                list.remove(position);
            }
            ListUpdate::Move { from, to } => {
                let item = list.remove(from);
                list.insert(to, item);
            }
            ListUpdate::Insert { position, new_index } => {
                list.insert(position, new[new_index].clone());
            }
            ListUpdate::Change { position, new_index } => {
                list[position] = new[new_index].clone();
            }
        }
    }
}

fn position_of(working: &[usize], old_index: usize) -> usize {
    working
        .iter()
        .position(|&i| i == old_index)
        .unwrap_or(working.len())
}

/// Pair old items with new ones. Returns the pairing for each old index and
/// whether that old item belongs to the longest common subsequence.
///
/// The LCS table costs O(n * m) time and memory, which suits grid-sized
/// lists but not lists with many thousands of entries.
fn pair_items<T, C>(old: &[T], new: &[T], callback: &C) -> (Vec<Option<usize>>, Vec<bool>)
where
    C: ItemCallback<T> + ?Sized,
{
    let (n, m) = (old.len(), new.len());

    // lengths[i][j] = LCS length of old[i..] and new[j..]
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if callback.are_items_the_same(&old[i], &new[j]) {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut old_to_new = vec![None; n];
    let mut new_taken = vec![false; m];
    let mut in_lcs = vec![false; n];

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if callback.are_items_the_same(&old[i], &new[j]) && lengths[i][j] == lengths[i + 1][j + 1] + 1 {
            old_to_new[i] = Some(j);
            new_taken[j] = true;
            in_lcs[i] = true;
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    // Whatever is left over pairs up as moves
    for (old_index, old_item) in old.iter().enumerate() {
        if old_to_new[old_index].is_some() {
            continue;
        }
        let found = (0..m).find(|&j| !new_taken[j] && callback.are_items_the_same(old_item, &new[j]));
        if let Some(new_index) = found {
            old_to_new[old_index] = Some(new_index);
            new_taken[new_index] = true;
        }
    }

    (old_to_new, in_lcs)
}
