//! Estratégia heap: min-heap binário sobre `Vec`, raiz = pior item retido.
//!
//! Implementado à mão porque a ordem depende da política de desempate
//! escolhida em runtime, o que `BinaryHeap` não comporta sem guardar o
//! comparador em cada entrada.

use std::cmp::Ordering;

use super::{rank_order, Entry, KeyOrder};

/// Insere `entry` se couber ou se superar estritamente a raiz.
pub(super) fn offer<T, S: PartialOrd>(
    entries: &mut Vec<Entry<T, S>>,
    capacity: usize,
    entry: Entry<T, S>,
    key_order: Option<KeyOrder<T>>,
) -> bool {
    if entries.len() < capacity {
        entries.push(entry);
        let last = entries.len() - 1;
        sift_up(entries, last, key_order);
        return true;
    }

    match entries.first() {
        Some(root) if rank_order(&entry, root, key_order) == Ordering::Less => {}
        _ => return false,
    }

    entries[0] = entry;
    sift_down(entries, 0, key_order);
    true
}

/// `a` deve ficar mais perto da raiz que `b` (ranking pior).
#[inline]
fn closer_to_root<T, S: PartialOrd>(
    a: &Entry<T, S>,
    b: &Entry<T, S>,
    key_order: Option<KeyOrder<T>>,
) -> bool {
    rank_order(a, b, key_order) == Ordering::Greater
}

fn sift_up<T, S: PartialOrd>(
    entries: &mut [Entry<T, S>],
    mut idx: usize,
    key_order: Option<KeyOrder<T>>,
) {
    while idx > 0 {
        let parent = (idx - 1) / 2;
        if !closer_to_root(&entries[idx], &entries[parent], key_order) {
            break;
        }
        entries.swap(idx, parent);
        idx = parent;
    }
}

fn sift_down<T, S: PartialOrd>(
    entries: &mut [Entry<T, S>],
    mut idx: usize,
    key_order: Option<KeyOrder<T>>,
) {
    let len = entries.len();
    loop {
        let left = 2 * idx + 1;
        let right = left + 1;
        let mut target = idx;

        if left < len && closer_to_root(&entries[left], &entries[target], key_order) {
            target = left;
        }
        if right < len && closer_to_root(&entries[right], &entries[target], key_order) {
            target = right;
        }
        if target == idx {
            break;
        }
        entries.swap(idx, target);
        idx = target;
    }
}
