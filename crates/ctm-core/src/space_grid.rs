use crate::status::{bad_format, StatusResult};

/// Cap per axis so that cell indices always fit a u32.
const MAX_DIVISIONS: u32 = 1024;

/// Marks "no previous cell" in the delta passes.
pub const NO_CELL: u32 = 0x7fff_ffff;

/// Uniform subdivision of the vertex bounding box used to sort vertices
/// for spatial locality. Cell `(i, j, k)` has index `i + dx * (j + dy * k)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceGrid {
    min: [f32; 3],
    max: [f32; 3],
    divisions: [u32; 3],
    size: [f32; 3],
}

impl SpaceGrid {
    /// Picks roughly `cbrt(100 * V)` cells in total, split across the axes
    /// in proportion to the bounding box extents.
    pub fn for_vertices(vertices: &[[f32; 3]]) -> Self {
        let mut min = vertices.first().copied().unwrap_or_default();
        let mut max = min;
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }

        let extent = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        let sum: f32 = extent.iter().sum();
        let divisions = if sum > 1e-30 {
            let wanted = (100.0 * vertices.len() as f64).cbrt();
            let mut div = [1u32; 3];
            for i in 0..3 {
                let d = (wanted * (extent[i] / sum) as f64).ceil();
                div[i] = (d as u32).clamp(1, MAX_DIVISIONS);
            }
            div
        } else {
            [4, 4, 4]
        };
        log::trace!("space grid {:?} over {:?}..{:?}", divisions, min, max);
        Self::with_divisions(min, max, divisions)
    }

    /// Rebuilds a grid read from a stream, rejecting inconsistent values.
    pub fn from_parts(min: [f32; 3], max: [f32; 3], divisions: [u32; 3]) -> StatusResult<Self> {
        for i in 0..3 {
            if !(min[i].is_finite() && max[i].is_finite()) || max[i] < min[i] {
                return Err(bad_format(format!("bad grid bounds {:?}..{:?}", min, max)));
            }
        }
        let cells = divisions.iter().map(|&d| d as u64).product::<u64>();
        if divisions.contains(&0) || cells > u32::MAX as u64 {
            return Err(bad_format(format!("bad grid divisions {:?}", divisions)));
        }
        Ok(Self::with_divisions(min, max, divisions))
    }

    fn with_divisions(min: [f32; 3], max: [f32; 3], divisions: [u32; 3]) -> Self {
        let mut size = [0.0; 3];
        for i in 0..3 {
            size[i] = (max[i] - min[i]) / divisions[i] as f32;
        }
        Self {
            min,
            max,
            divisions,
            size,
        }
    }

    pub fn min(&self) -> [f32; 3] {
        self.min
    }

    pub fn max(&self) -> [f32; 3] {
        self.max
    }

    pub fn divisions(&self) -> [u32; 3] {
        self.divisions
    }

    pub fn num_cells(&self) -> u32 {
        self.divisions[0] * self.divisions[1] * self.divisions[2]
    }

    pub fn cell_of(&self, point: &[f32; 3]) -> u32 {
        let mut idx = [0u32; 3];
        for i in 0..3 {
            if self.size[i] > 0.0 {
                let cell = ((point[i] - self.min[i]) / self.size[i]).floor();
                // Negative and NaN saturate to 0.
                idx[i] = (cell as u32).min(self.divisions[i] - 1);
            }
        }
        idx[0] + self.divisions[0] * (idx[1] + self.divisions[1] * idx[2])
    }

    /// Minimum corner of cell `index`.
    pub fn cell_origin(&self, index: u32) -> [f32; 3] {
        let zdiv = self.divisions[0] * self.divisions[1];
        let ydiv = self.divisions[0];
        let z = index / zdiv;
        let rest = index - z * zdiv;
        let y = rest / ydiv;
        let x = rest - y * ydiv;
        [
            x as f32 * self.size[0] + self.min[0],
            y as f32 * self.size[1] + self.min[1],
            z as f32 * self.size[2] + self.min[2],
        ]
    }
}
