//! Normal coding relative to the smooth surface normal.
//!
//! Each normal is stored as three integers: its quantized magnitude (negated
//! when it points away from the smooth normal), and the quantized spherical
//! angles `phi`/`theta` in a local frame whose Z axis is the smooth normal.
//! The `theta` resolution shrinks as `phi` approaches zero so that nearly
//! smooth normals cost almost nothing.

use std::f64::consts::PI;

use crate::quantization_utils::Quantizer;
use crate::status::StatusResult;

/// Per-vertex normalized sum of the unit normals of the adjacent faces.
/// The result depends on triangle order and rotation, so encoder and
/// decoder must feed identical inputs.
pub fn smooth_normals(vertices: &[[f32; 3]], triangles: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![[0.0f32; 3]; vertices.len()];
    for tri in triangles {
        let (Some(p0), Some(p1), Some(p2)) = (
            vertices.get(tri[0] as usize),
            vertices.get(tri[1] as usize),
            vertices.get(tri[2] as usize),
        ) else {
            continue;
        };
        let e1 = sub(p1, p0);
        let e2 = sub(p2, p0);
        let mut n = cross(&e1, &e2);
        let len = length(&n);
        if len > 1e-10 {
            for c in &mut n {
                *c /= len;
            }
        }
        for &i in tri {
            let sum = &mut sums[i as usize];
            for j in 0..3 {
                sum[j] += n[j];
            }
        }
    }
    for sum in &mut sums {
        let len = length(sum);
        if len > 1e-10 {
            for c in sum.iter_mut() {
                *c /= len;
            }
        } else {
            // Isolated or fully degenerate vertex: any fixed axis works as
            // long as both sides agree.
            *sum = [0.0, 0.0, 1.0];
        }
    }
    sums
}

/// Rows are the X, Y and Z axes of a frame with `z` as its Z axis.
/// X varies continuously with `z`.
fn coordinate_system(z: &[f32; 3]) -> [[f64; 3]; 3] {
    let z = [z[0] as f64, z[1] as f64, z[2] as f64];
    let mut x = [-z[1], z[0] - z[2], z[1]];
    let len = (2.0 * x[0] * x[0] + x[1] * x[1]).sqrt();
    if len > 1e-20 {
        for c in &mut x {
            *c /= len;
        }
    } else {
        x = [0.0, 1.0, 0.0];
    }
    let y = [
        z[1] * x[2] - z[2] * x[1],
        z[2] * x[0] - z[0] * x[2],
        z[0] * x[1] - z[1] * x[0],
    ];
    [x, y, z]
}

/// Encodes `normals` against `smooth` (same order, same length).
pub fn encode_normals(
    normals: &[[f32; 3]],
    smooth: &[[f32; 3]],
    precision: f32,
) -> StatusResult<Vec<i32>> {
    let quantizer = Quantizer::with_step(precision)?;
    let scale = quantizer.inverse_step() as f64;
    let mut out = Vec::with_capacity(normals.len() * 3);
    for (n, s) in normals.iter().zip(smooth) {
        let mut magn = length(n) as f64;
        if magn < 1e-10 {
            magn = 1.0;
        }
        let dot = n[0] * s[0] + n[1] * s[1] + n[2] * s[2];
        if dot < 0.0 {
            magn = -magn;
        }
        let int_magn = quantizer.quantize_float(magn as f32)?;

        let unit = [n[0] as f64 / magn, n[1] as f64 / magn, n[2] as f64 / magn];
        let basis = coordinate_system(s);
        let local: Vec<f64> = basis
            .iter()
            .map(|axis| axis[0] * unit[0] + axis[1] * unit[1] + axis[2] * unit[2])
            .collect();
        let phi = if local[2] >= 1.0 {
            0.0
        } else {
            local[2].max(-1.0).acos()
        };
        let theta = local[1].atan2(local[0]);

        let int_phi = (phi * (scale / (0.5 * PI)) + 0.5).floor() as i32;
        let theta_scale = if int_phi == 0 {
            0.0
        } else if int_phi <= 4 {
            2.0 / PI
        } else {
            int_phi as f64 / (2.0 * PI)
        };
        let int_theta = ((theta + PI) * theta_scale + 0.5).floor() as i32;
        out.extend_from_slice(&[int_magn, int_phi, int_theta]);
    }
    Ok(out)
}

/// Inverse of [`encode_normals`].
pub fn decode_normals(encoded: &[i32], smooth: &[[f32; 3]], precision: f32) -> Vec<[f32; 3]> {
    let precision = precision as f64;
    encoded
        .chunks_exact(3)
        .zip(smooth)
        .map(|(e, s)| {
            let magn = e[0] as f64 * precision;
            let int_phi = e[1];
            let phi = int_phi as f64 * (0.5 * PI) * precision;
            let theta_scale = if int_phi == 0 {
                0.0
            } else if int_phi <= 4 {
                PI / 2.0
            } else {
                (2.0 * PI) / int_phi as f64
            };
            let theta = e[2] as f64 * theta_scale - PI;

            let local = [phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()];
            let basis = coordinate_system(s);
            let mut n = [0.0f32; 3];
            for (j, c) in n.iter_mut().enumerate() {
                let v = basis[0][j] * local[0] + basis[1][j] * local[1] + basis[2][j] * local[2];
                *c = (v * magn) as f32;
            }
            n
        })
        .collect()
}

fn sub(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(v: &[f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
