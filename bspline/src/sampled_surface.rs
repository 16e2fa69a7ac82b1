use nalgebra_glm::DVec3;

/// A surface evaluated on a regular `nu x nv` parameter lattice.
///
/// Stored row-major with `u` as the slow index, so `(ku, kv)` is the sample
/// at `(ku / (nu - 1), kv / (nv - 1))`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledSurface {
    nu: usize,
    nv: usize,
    positions: Vec<DVec3>,
    normals: Vec<DVec3>,
}

impl SampledSurface {
    pub(crate) fn new(nu: usize, nv: usize, positions: Vec<DVec3>, normals: Vec<DVec3>) -> Self {
        debug_assert_eq!(positions.len(), nu * nv);
        debug_assert_eq!(normals.len(), nu * nv);
        Self {
            nu,
            nv,
            positions,
            normals,
        }
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    pub fn position(&self, ku: usize, kv: usize) -> &DVec3 {
        &self.positions[ku * self.nv + kv]
    }

    pub fn normal(&self, ku: usize, kv: usize) -> &DVec3 {
        &self.normals[ku * self.nv + kv]
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Lattice cells as the flat indices of their corners, in the order
    /// `(ku, kv)`, `(ku, kv + 1)`, `(ku + 1, kv + 1)`, `(ku + 1, kv)`.
    pub fn quads(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        let nv = self.nv;
        (0..self.nu - 1).flat_map(move |ku| {
            (0..nv - 1).map(move |kv| {
                let a = ku * nv + kv;
                [a, a + 1, a + nv + 1, a + nv]
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_cover_the_lattice() {
        let positions = vec![DVec3::zeros(); 12];
        let s = SampledSurface::new(3, 4, positions.clone(), positions);
        let quads: Vec<_> = s.quads().collect();
        assert_eq!(quads.len(), 6);
        assert_eq!(quads[0], [0, 1, 5, 4]);
        assert_eq!(quads[5], [6, 7, 11, 10]);
    }
}
