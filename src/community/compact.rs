//! Dense renumbering of surviving clusters.

/// Marks inverse-map positions whose cluster id did not survive.
/// Such positions are never read.
const UNASSIGNED: u32 = u32::MAX;

/// Renumber the surviving cluster ids of `clusters` onto the dense range
/// [0, k) and fold the mapping into the top-level `labels`. Returns k.
///
/// After the local-move loop the surviving ids are a sparse subset of the
/// vertex ids. Sorted-unique gives them in ascending order; an inverse
/// array maps each back to its dense rank. `labels` is then composed with
/// the rewritten cluster vector: original vertex j belonged to
/// super-vertex `labels[j]`, which now belongs to dense cluster
/// `clusters[labels[j]]`.
pub(crate) fn compact(clusters: &mut [u32], labels: &mut [u32]) -> usize {
    let mut surviving: Vec<u32> = clusters.to_vec();
    surviving.sort_unstable();
    surviving.dedup();
    let k = surviving.len();

    debug_assert!(k > 0, "cluster vector is never empty");
    let top = surviving[k - 1] as usize;
    let mut inverse = vec![UNASSIGNED; top + 1];
    for (dense, &id) in surviving.iter().enumerate() {
        inverse[id as usize] = dense as u32;
    }

    for c in clusters.iter_mut() {
        *c = inverse[*c as usize];
        debug_assert_ne!(*c, UNASSIGNED);
    }
    for label in labels.iter_mut() {
        *label = clusters[*label as usize];
    }

    k
}
