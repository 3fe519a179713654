// src/merge.rs
use std::collections::HashSet;

use crate::lead::Keyed;

/// Union of `master` and `session` keyed by identifier: master rows first,
/// then session rows whose key is new. On overlap the master row wins.
/// Duplicates inside either input collapse to their first occurrence too.
pub fn merge<T: Keyed + Clone>(master: &[T], session: &[T]) -> Vec<T> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(master.len() + session.len());
    let mut out = Vec::with_capacity(master.len() + session.len());
    for rec in master.iter().chain(session.iter()) {
        if seen.insert(rec.key()) {
            out.push(rec.clone());
        }
    }
    out
}

/// Session rows whose key the master does not have yet.
pub fn new_in_session<'a, T: Keyed>(master: &[T], session: &'a [T]) -> Vec<&'a T> {
    let known: HashSet<&str> = master.iter().map(Keyed::key).collect();
    session.iter().filter(|r| !known.contains(r.key())).collect()
}
