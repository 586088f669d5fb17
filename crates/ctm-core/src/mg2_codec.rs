//! Lossy method.
//!
//! Vertices are bucketed into a [`SpaceGrid`] and sorted by (cell, x), which
//! changes the vertex order of the mesh. Every stream is quantized with its
//! own step and stored as small integer deltas:
//!
//! ```text
//! "MG2H" f32 vertex_step, f32 normal_step, f32 min[3], f32 max[3], u32 divisions[3]
//! "VERT" packed signed  (V x 3)  offsets from the cell origin, x delta coded per cell
//! "GIDX" packed         (V)      cell index deltas
//! "INDX" packed         (T x 3)  index deltas in sorted vertex order
//! "NORM" packed signed  (V x 3)  magnitude, phi, theta against the smooth normal
//! "TEXC" f32 step, packed signed (V x 2)   per UV map
//! "ATTR" f32 step, packed signed (V x N)   per attribute map
//! ```

use crate::compression_config::CompressionMethod;
use crate::encoder_options::check_step;
use crate::index_coding::{make_index_deltas, rearrange_triangles, restore_indices};
use crate::mesh::Mesh;
use crate::mesh_codec::{
    attrib_map_from_info, flatten, group, uv_map_from_info, DecodedMesh, EncodeParams, MeshCodec,
};
use crate::mesh_decoder::FileHeader;
use crate::normal_prediction::{decode_normals, encode_normals, smooth_normals};
use crate::packed_stream::{read_packed_ints, write_packed_ints};
use crate::quantization_utils::{Dequantizer, Quantizer};
use crate::space_grid::{SpaceGrid, NO_CELL};
use crate::status::{bad_format, CtmError, Status, StatusResult};
use crate::stream::{StreamReader, StreamWriter};
use crate::version::{
    TAG_ATTRIBS, TAG_GRID_INDICES, TAG_INDICES, TAG_MG2_HEADER, TAG_NORMALS, TAG_TEX_COORDS,
    TAG_VERTICES,
};

pub struct Mg2Codec;

impl MeshCodec for Mg2Codec {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Mg2
    }

    fn encode(&self, mesh: &Mesh, params: &EncodeParams, out: &mut StreamWriter) -> Status {
        let level = params.compression_level;
        let vertex_quantizer = Quantizer::with_step(params.vertex_precision)?;
        check_step("normal", params.normal_precision)?;

        let grid = SpaceGrid::for_vertices(mesh.vertices());
        out.write_tag(TAG_MG2_HEADER)?;
        out.write_f32(params.vertex_precision)?;
        out.write_f32(params.normal_precision)?;
        out.write_f32_slice(&grid.min())?;
        out.write_f32_slice(&grid.max())?;
        out.write_u32_slice(&grid.divisions())?;

        let (order, cells) = sort_vertices(mesh.vertices(), &grid);

        let int_vertices = make_vertex_deltas(mesh.vertices(), &order, &cells, &grid, &vertex_quantizer)?;
        out.write_tag(TAG_VERTICES)?;
        write_packed_ints(out, &int_vertices, 3, true, level)?;

        let mut grid_deltas = Vec::with_capacity(cells.len());
        let mut prev = 0u32;
        for &cell in &cells {
            grid_deltas.push(cell.wrapping_sub(prev) as i32);
            prev = cell;
        }
        out.write_tag(TAG_GRID_INDICES)?;
        write_packed_ints(out, &grid_deltas, 1, false, level)?;

        let mut new_index = vec![0u32; order.len()];
        for (sorted, &original) in order.iter().enumerate() {
            new_index[original as usize] = sorted as u32;
        }
        let mut triangles: Vec<[u32; 3]> = mesh
            .triangles()
            .iter()
            .map(|t| t.map(|i| new_index[i as usize]))
            .collect();
        rearrange_triangles(&mut triangles);
        let index_deltas: Vec<i32> = make_index_deltas(&triangles)
            .into_iter()
            .map(|d| d as i32)
            .collect();
        out.write_tag(TAG_INDICES)?;
        write_packed_ints(out, &index_deltas, 3, false, level)?;

        if let Some(normals) = mesh.normals() {
            // Predict from exactly what the decoder will see.
            let restored = restore_vertices(&int_vertices, &cells, &grid, params.vertex_precision);
            let smooth = smooth_normals(&restored, &triangles);
            let sorted: Vec<[f32; 3]> = order.iter().map(|&o| normals[o as usize]).collect();
            let encoded = encode_normals(&sorted, &smooth, params.normal_precision)?;
            out.write_tag(TAG_NORMALS)?;
            write_packed_ints(out, &encoded, 3, true, level)?;
        }

        for map in mesh.uv_maps() {
            let values = flatten(map.coords());
            out.write_tag(TAG_TEX_COORDS)?;
            write_map_deltas(out, &values, 2, map.precision(), &order, &cells, level)?;
        }
        for map in mesh.attrib_maps() {
            out.write_tag(TAG_ATTRIBS)?;
            write_map_deltas(
                out,
                map.values(),
                map.components(),
                map.precision(),
                &order,
                &cells,
                level,
            )?;
        }
        Ok(())
    }

    fn decode(&self, header: &FileHeader, input: &mut StreamReader) -> StatusResult<DecodedMesh> {
        let v = header.vertex_count;

        input.expect_tag(TAG_MG2_HEADER)?;
        let vertex_precision = read_step(input, "vertex")?;
        let normal_precision = read_step(input, "normal")?;
        let mut min = [0.0f32; 3];
        let mut max = [0.0f32; 3];
        let mut divisions = [0u32; 3];
        for m in &mut min {
            *m = input.read_f32()?;
        }
        for m in &mut max {
            *m = input.read_f32()?;
        }
        for d in &mut divisions {
            *d = input.read_u32()?;
        }
        let grid = SpaceGrid::from_parts(min, max, divisions)?;

        input.expect_tag(TAG_VERTICES)?;
        let int_vertices = read_packed_ints(input, v, 3, true)?;

        input.expect_tag(TAG_GRID_INDICES)?;
        let grid_deltas = read_packed_ints(input, v, 1, false)?;
        let mut cells = Vec::with_capacity(v);
        let mut prev = 0u32;
        for d in grid_deltas {
            let cell = prev.wrapping_add(d as u32);
            if cell >= grid.num_cells() {
                return Err(bad_format(format!(
                    "grid cell {} outside a {:?} grid",
                    cell,
                    grid.divisions()
                )));
            }
            cells.push(cell);
            prev = cell;
        }
        let vertices = restore_vertices(&int_vertices, &cells, &grid, vertex_precision);

        input.expect_tag(TAG_INDICES)?;
        let deltas: Vec<u32> = read_packed_ints(input, header.triangle_count, 3, false)?
            .into_iter()
            .map(|d| d as u32)
            .collect();
        let triangles = restore_indices(&deltas);
        if let Some(bad) = triangles.iter().flatten().find(|&&i| i as usize >= v) {
            return Err(CtmError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, v
            )));
        }

        let normals = if header.has_normals {
            input.expect_tag(TAG_NORMALS)?;
            let encoded = read_packed_ints(input, v, 3, true)?;
            let smooth = smooth_normals(&vertices, &triangles);
            Some(decode_normals(&encoded, &smooth, normal_precision))
        } else {
            None
        };

        let mut mesh = Mesh::new(vertices, triangles, normals);
        for info in &header.uv_maps {
            input.expect_tag(TAG_TEX_COORDS)?;
            let (coords, step) = read_map_deltas(input, v, 2, &cells)?;
            let mut map = uv_map_from_info(info, group(&coords));
            map.set_precision(step);
            mesh.add_uv_map(map);
        }
        for info in &header.attrib_maps {
            input.expect_tag(TAG_ATTRIBS)?;
            let (values, step) = read_map_deltas(input, v, info.components, &cells)?;
            let mut map = attrib_map_from_info(info, values)?;
            map.set_precision(step);
            mesh.add_attrib_map(map);
        }

        Ok(DecodedMesh {
            mesh,
            vertex_precision: Some(vertex_precision),
            normal_precision: Some(normal_precision),
        })
    }
}

/// Returns the original vertex index for every sorted position, and the
/// grid cell of every sorted position.
fn sort_vertices(vertices: &[[f32; 3]], grid: &SpaceGrid) -> (Vec<u32>, Vec<u32>) {
    let cells: Vec<u32> = vertices.iter().map(|v| grid.cell_of(v)).collect();
    let mut order: Vec<u32> = (0..vertices.len() as u32).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (a as usize, b as usize);
        cells[a]
            .cmp(&cells[b])
            .then_with(|| vertices[a][0].total_cmp(&vertices[b][0]))
    });
    let sorted_cells = order.iter().map(|&o| cells[o as usize]).collect();
    (order, sorted_cells)
}

fn make_vertex_deltas(
    vertices: &[[f32; 3]],
    order: &[u32],
    cells: &[u32],
    grid: &SpaceGrid,
    quantizer: &Quantizer,
) -> StatusResult<Vec<i32>> {
    let mut out = Vec::with_capacity(order.len() * 3);
    let mut prev_cell = NO_CELL;
    let mut prev_dx = 0i32;
    for (&original, &cell) in order.iter().zip(cells) {
        let origin = grid.cell_origin(cell);
        let p = vertices[original as usize];
        let dx = quantizer.quantize_float(p[0] - origin[0])?;
        let x = if cell == prev_cell {
            dx.wrapping_sub(prev_dx)
        } else {
            dx
        };
        out.push(x);
        out.push(quantizer.quantize_float(p[1] - origin[1])?);
        out.push(quantizer.quantize_float(p[2] - origin[2])?);
        prev_cell = cell;
        prev_dx = dx;
    }
    Ok(out)
}

/// Shared by both directions so that normal prediction runs on identical
/// positions.
fn restore_vertices(int_vertices: &[i32], cells: &[u32], grid: &SpaceGrid, step: f32) -> Vec<[f32; 3]> {
    let dequantizer = Dequantizer::with_step(step);
    let mut out = Vec::with_capacity(cells.len());
    let mut prev_cell = NO_CELL;
    let mut prev_dx = 0i32;
    for (iv, &cell) in int_vertices.chunks_exact(3).zip(cells) {
        let origin = grid.cell_origin(cell);
        let dx = if cell == prev_cell {
            iv[0].wrapping_add(prev_dx)
        } else {
            iv[0]
        };
        out.push([
            dequantizer.dequantize_float(dx) + origin[0],
            dequantizer.dequantize_float(iv[1]) + origin[1],
            dequantizer.dequantize_float(iv[2]) + origin[2],
        ]);
        prev_cell = cell;
        prev_dx = dx;
    }
    out
}

/// Writes `f32 step` + the quantized per-vertex values in sorted order,
/// each delta coded against the previous vertex when both share a cell.
fn write_map_deltas(
    out: &mut StreamWriter,
    values: &[f32],
    components: usize,
    step: f32,
    order: &[u32],
    cells: &[u32],
    level: u32,
) -> Status {
    let quantizer = Quantizer::with_step(step)?;
    let mut deltas = Vec::with_capacity(values.len());
    let mut prev: Vec<i32> = vec![0; components];
    let mut prev_cell = NO_CELL;
    for (&original, &cell) in order.iter().zip(cells) {
        let start = original as usize * components;
        for (j, &value) in values[start..start + components].iter().enumerate() {
            let q = quantizer.quantize_float(value)?;
            deltas.push(if cell == prev_cell { q.wrapping_sub(prev[j]) } else { q });
            prev[j] = q;
        }
        prev_cell = cell;
    }
    out.write_f32(step)?;
    write_packed_ints(out, &deltas, components, true, level)
}

fn read_map_deltas(
    input: &mut StreamReader,
    count: usize,
    components: usize,
    cells: &[u32],
) -> StatusResult<(Vec<f32>, f32)> {
    let step = read_step(input, "map")?;
    let dequantizer = Dequantizer::with_step(step);
    let deltas = read_packed_ints(input, count, components, true)?;
    let mut values = Vec::with_capacity(deltas.len());
    let mut prev: Vec<i32> = vec![0; components];
    let mut prev_cell = NO_CELL;
    for (row, &cell) in deltas.chunks_exact(components).zip(cells) {
        for (j, &d) in row.iter().enumerate() {
            let q = if cell == prev_cell { d.wrapping_add(prev[j]) } else { d };
            values.push(dequantizer.dequantize_float(q));
            prev[j] = q;
        }
        prev_cell = cell;
    }
    Ok((values, step))
}

fn read_step(input: &mut StreamReader, what: &str) -> StatusResult<f32> {
    let step = input.read_f32()?;
    if !(step > 0.0 && step.is_finite()) {
        return Err(bad_format(format!("{} step {} must be > 0", what, step)));
    }
    Ok(step)
}
