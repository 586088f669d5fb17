//! Human-readable summary of a loaded file.

use std::fmt;

use ctm_core::{
    AttribMapId, CompressionMethod, Context, MapProperty, Property, StatusResult, UvMapId,
};

struct UvMapSummary {
    name: Option<String>,
    file_name: Option<String>,
    step: Option<f32>,
}

struct AttribMapSummary {
    name: Option<String>,
    components: u32,
    step: Option<f32>,
}

/// Everything `ctminfo` prints, gathered through the query interface.
/// Steps are only present for MG2 files.
struct Summary {
    method: CompressionMethod,
    comment: Option<String>,
    vertices: u32,
    triangles: u32,
    has_normals: bool,
    vertex_step: Option<f32>,
    normal_step: Option<f32>,
    uv_maps: Vec<UvMapSummary>,
    attrib_maps: Vec<AttribMapSummary>,
}

impl Summary {
    fn query(ctx: &mut Context) -> StatusResult<Self> {
        let method = CompressionMethod::try_from(ctx.get_integer(Property::CompressionMethod)?)?;
        let mg2 = method == CompressionMethod::Mg2;
        let has_normals = ctx.get_integer(Property::HasNormals)? != 0;
        let vertex_step = if mg2 {
            Some(ctx.get_float(Property::VertexPrecision)?)
        } else {
            None
        };
        let normal_step = if mg2 && has_normals {
            Some(ctx.get_float(Property::NormalPrecision)?)
        } else {
            None
        };

        let uv_maps = (0..ctx.get_integer(Property::UvMapCount)?)
            .map(UvMapId)
            .map(|id| {
                Ok(UvMapSummary {
                    name: ctx.get_string(Property::UvMap(id, MapProperty::Name))?,
                    file_name: ctx.get_string(Property::UvMap(id, MapProperty::FileName))?,
                    step: if mg2 {
                        Some(ctx.get_float(Property::UvMap(id, MapProperty::Precision))?)
                    } else {
                        None
                    },
                })
            })
            .collect::<StatusResult<Vec<_>>>()?;
        let attrib_maps = (0..ctx.get_integer(Property::AttribMapCount)?)
            .map(AttribMapId)
            .map(|id| {
                Ok(AttribMapSummary {
                    name: ctx.get_string(Property::AttribMap(id, MapProperty::Name))?,
                    components: ctx.get_integer(Property::AttribMap(id, MapProperty::Components))?,
                    step: if mg2 {
                        Some(ctx.get_float(Property::AttribMap(id, MapProperty::Precision))?)
                    } else {
                        None
                    },
                })
            })
            .collect::<StatusResult<Vec<_>>>()?;

        Ok(Self {
            method,
            comment: ctx.get_string(Property::FileComment)?,
            vertices: ctx.get_integer(Property::VertexCount)?,
            triangles: ctx.get_integer(Property::TriangleCount)?,
            has_normals,
            vertex_step,
            normal_step,
            uv_maps,
            attrib_maps,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Method:       {}", self.method)?;
        if let Some(comment) = &self.comment {
            writeln!(f, "  Comment:      {}", comment)?;
        }
        writeln!(f, "  Vertices:     {}", self.vertices)?;
        writeln!(f, "  Triangles:    {}", self.triangles)?;
        writeln!(f, "  Normals:      {}", if self.has_normals { "yes" } else { "no" })?;
        if let Some(step) = self.vertex_step {
            writeln!(f, "  Vertex step:  {}", step)?;
        }
        if let Some(step) = self.normal_step {
            writeln!(f, "  Normal step:  {}", step)?;
        }
        for (i, map) in self.uv_maps.iter().enumerate() {
            writeln!(
                f,
                "  UV map {}:     {} (file {})",
                i,
                map.name.as_deref().unwrap_or("(unnamed)"),
                map.file_name.as_deref().unwrap_or("none")
            )?;
            if let Some(step) = map.step {
                writeln!(f, "    step:       {}", step)?;
            }
        }
        for (i, map) in self.attrib_maps.iter().enumerate() {
            writeln!(
                f,
                "  Attribute {}:  {} ({} components)",
                i,
                map.name.as_deref().unwrap_or("(unnamed)"),
                map.components
            )?;
            if let Some(step) = map.step {
                writeln!(f, "    step:       {}", step)?;
            }
        }
        Ok(())
    }
}

/// Describes the mesh loaded into `ctx` using the query interface.
pub fn describe(ctx: &mut Context) -> StatusResult<String> {
    Ok(Summary::query(ctx)?.to_string())
}
