//! Estratégia linear: vetor desordenado + índice do pior item retido.

use std::cmp::Ordering;

use super::{rank_order, Entry, KeyOrder};

/// Insere `entry` se couber ou se superar estritamente o pior retido.
pub(super) fn offer<T, S: PartialOrd>(
    entries: &mut Vec<Entry<T, S>>,
    worst: &mut Option<usize>,
    capacity: usize,
    entry: Entry<T, S>,
    key_order: Option<KeyOrder<T>>,
) -> bool {
    if entries.len() < capacity {
        let idx = entries.len();
        let becomes_worst = match *worst {
            None => true,
            Some(w) => rank_order(&entry, &entries[w], key_order) == Ordering::Greater,
        };
        entries.push(entry);
        if becomes_worst {
            *worst = Some(idx);
        }
        return true;
    }

    let Some(w) = *worst else {
        return false;
    };

    if rank_order(&entry, &entries[w], key_order) != Ordering::Less {
        return false;
    }

    entries[w] = entry;
    *worst = find_worst(entries, key_order);
    true
}

/// Varredura completa em busca do item de pior ranking.
fn find_worst<T, S: PartialOrd>(
    entries: &[Entry<T, S>],
    key_order: Option<KeyOrder<T>>,
) -> Option<usize> {
    let mut worst: Option<usize> = None;
    for (idx, entry) in entries.iter().enumerate() {
        match worst {
            Some(w) if rank_order(entry, &entries[w], key_order) != Ordering::Greater => {}
            _ => worst = Some(idx),
        }
    }
    worst
}
