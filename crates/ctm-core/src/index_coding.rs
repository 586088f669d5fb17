//! Triangle index preparation shared by the MG1 and MG2 codecs.

/// Rotates every triangle so its smallest index leads (winding is kept)
/// and sorts the triangles by their first two indices.
pub fn rearrange_triangles(triangles: &mut [[u32; 3]]) {
    for tri in triangles.iter_mut() {
        if tri[1] < tri[0] && tri[1] < tri[2] {
            *tri = [tri[1], tri[2], tri[0]];
        } else if tri[2] < tri[0] && tri[2] < tri[1] {
            *tri = [tri[2], tri[0], tri[1]];
        }
    }
    triangles.sort_by_key(|t| (t[0], t[1]));
}

/// Replaces indices by differences that are small for a sorted list:
/// the first index against the previous first, the second against the
/// previous second when the first repeats (else against the first), the
/// third against the first. Wrapping arithmetic keeps it reversible.
pub fn make_index_deltas(triangles: &[[u32; 3]]) -> Vec<u32> {
    let mut deltas = Vec::with_capacity(triangles.len() * 3);
    let mut prev: Option<[u32; 3]> = None;
    for tri in triangles {
        let (d0, d1) = match prev {
            Some(p) if p[0] == tri[0] => (0, tri[1].wrapping_sub(p[1])),
            Some(p) => (tri[0].wrapping_sub(p[0]), tri[1].wrapping_sub(tri[0])),
            None => (tri[0], tri[1].wrapping_sub(tri[0])),
        };
        deltas.extend_from_slice(&[d0, d1, tri[2].wrapping_sub(tri[0])]);
        prev = Some(*tri);
    }
    deltas
}

/// Inverse of [`make_index_deltas`].
pub fn restore_indices(deltas: &[u32]) -> Vec<[u32; 3]> {
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(deltas.len() / 3);
    for d in deltas.chunks_exact(3) {
        let tri = match triangles.last() {
            Some(p) => {
                let first = d[0].wrapping_add(p[0]);
                let second = if d[0] == 0 {
                    d[1].wrapping_add(p[1])
                } else {
                    d[1].wrapping_add(first)
                };
                [first, second, d[2].wrapping_add(first)]
            }
            None => [d[0], d[1].wrapping_add(d[0]), d[2].wrapping_add(d[0])],
        };
        triangles.push(tri);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rotation_keeps_winding() {
        let mut tris = vec![[5, 2, 9], [7, 8, 1], [0, 3, 4]];
        rearrange_triangles(&mut tris);
        assert_eq!(tris, vec![[0, 3, 4], [1, 7, 8], [2, 9, 5]]);
    }

    #[test]
    fn test_sorted_fan_gives_small_deltas() {
        let mut tris = vec![[0, 3, 4], [0, 1, 2], [0, 2, 3], [1, 5, 2]];
        rearrange_triangles(&mut tris);
        let deltas = make_index_deltas(&tris);
        assert_eq!(deltas, vec![0, 1, 2, 0, 1, 3, 0, 1, 4, 1, 4, 1]);
        assert_eq!(restore_indices(&deltas), tris);
    }

    proptest! {
        #[test]
        fn prop_deltas_are_reversible(
            tris in prop::collection::vec(prop::array::uniform3(0u32..1000), 1..200)
        ) {
            let mut tris = tris;
            rearrange_triangles(&mut tris);
            let deltas = make_index_deltas(&tris);
            prop_assert_eq!(restore_indices(&deltas), tris);
        }
    }
}
