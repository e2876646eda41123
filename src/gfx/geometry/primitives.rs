//! Generators for the fixed set of primitive shapes.
//!
//! All generators return interleaved [`MeshData`] with unit normals and
//! per-primitive UVs, wound counter-clockwise when seen from outside.

use std::f32::consts::{PI, TAU};

use crate::error::{Error, Result};

use super::{MeshData, Vertex};

/// Generates an axis-aligned box centered at the origin.
///
/// `length`, `width` and `height` are the full extents along x, y and z.
/// Faces do not share vertices so each face carries a flat normal: 24
/// vertices, 36 indices.
pub fn generate_box(length: f32, width: f32, height: f32) -> Result<MeshData> {
    if length <= 0.0 || width <= 0.0 || height <= 0.0 {
        return Err(Error::invalid(format!(
            "box dimensions must be positive, got {length}x{width}x{height}"
        )));
    }

    let (hx, hy, hz) = (length * 0.5, width * 0.5, height * 0.5);

    let p0 = [-hx, -hy, hz];
    let p1 = [hx, -hy, hz];
    let p2 = [hx, -hy, -hz];
    let p3 = [-hx, -hy, -hz];
    let p4 = [-hx, hy, hz];
    let p5 = [hx, hy, hz];
    let p6 = [hx, hy, -hz];
    let p7 = [-hx, hy, -hz];

    let down = [0.0, -1.0, 0.0];
    let up = [0.0, 1.0, 0.0];
    let front = [0.0, 0.0, 1.0];
    let back = [0.0, 0.0, -1.0];
    let left = [-1.0, 0.0, 0.0];
    let right = [1.0, 0.0, 0.0];

    // Four corners per face, same UV orientation on every face.
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([p0, p1, p2, p3], down),
        ([p7, p4, p0, p3], left),
        ([p4, p5, p1, p0], front),
        ([p6, p7, p3, p2], back),
        ([p5, p6, p2, p1], right),
        ([p7, p6, p5, p4], up),
    ];
    let face_uvs: [[f32; 2]; 4] = [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (face, (corners, normal)) in faces.iter().enumerate() {
        for (corner, uv) in corners.iter().zip(face_uvs) {
            vertices.push(Vertex {
                position: *corner,
                normal: *normal,
                uv,
            });
        }
        let base = (face * 4) as u32;
        indices.extend_from_slice(&[base + 3, base + 1, base, base + 3, base + 2, base + 1]);
    }

    Ok(MeshData { vertices, indices })
}

/// Generates a flat plane in the XZ plane with a constant +Y normal.
///
/// `length` and `width` are the full extents along x and z; the UVs are
/// oriented so a texture reads right-side-up under the plane's winding.
pub fn generate_plane(length: f32, width: f32) -> Result<MeshData> {
    if length <= 0.0 || width <= 0.0 {
        return Err(Error::invalid(format!(
            "plane dimensions must be positive, got {length}x{width}"
        )));
    }

    let (hx, hz) = (length * 0.5, width * 0.5);
    let up = [0.0, 1.0, 0.0];

    let vertices = vec![
        Vertex {
            position: [-hx, 0.0, -hz],
            normal: up,
            uv: [0.0, 1.0],
        },
        Vertex {
            position: [hx, 0.0, -hz],
            normal: up,
            uv: [1.0, 1.0],
        },
        Vertex {
            position: [hx, 0.0, hz],
            normal: up,
            uv: [1.0, 0.0],
        },
        Vertex {
            position: [-hx, 0.0, hz],
            normal: up,
            uv: [0.0, 0.0],
        },
    ];
    let indices = vec![0, 2, 1, 0, 3, 2];

    Ok(MeshData { vertices, indices })
}

/// Generates a UV sphere centered at the origin.
///
/// `longitudes` (L) and `latitudes` (M) control the tessellation. The poles
/// are singleton vertices; every latitude ring stores L+1 vertices, with the
/// last one repeating the first ring position to close the UV seam. Vertex
/// count is `(L+1)*M + 2`, index count exactly `6*L*M`.
///
/// Fewer than 3 segments on either axis would produce zero-area triangles
/// and is rejected.
pub fn generate_sphere(radius: f32, longitudes: u32, latitudes: u32) -> Result<MeshData> {
    if radius <= 0.0 {
        return Err(Error::invalid(format!(
            "sphere radius must be positive, got {radius}"
        )));
    }
    if longitudes < 3 || latitudes < 3 {
        return Err(Error::invalid(format!(
            "sphere needs at least 3 segments per axis, got {longitudes}x{latitudes}"
        )));
    }

    let lng = longitudes as usize;
    let lat_count = latitudes as usize;
    let vertex_count = (lng + 1) * lat_count + 2;

    let mut vertices = Vec::with_capacity(vertex_count);
    vertices.push(Vertex {
        position: [0.0, radius, 0.0],
        normal: [0.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    });
    for lat in 0..lat_count {
        let polar = PI * (lat + 1) as f32 / (lat_count + 1) as f32;
        let (sin_polar, cos_polar) = polar.sin_cos();
        let v = 1.0 - (lat + 1) as f32 / (lat_count + 1) as f32;

        for lon in 0..=lng {
            // The seam vertex repeats longitude 0's angle but keeps u = 1.
            let wrapped = if lon == lng { 0 } else { lon };
            let azimuth = TAU * wrapped as f32 / lng as f32;
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

            // Unit direction doubles as the normal.
            let dir = [sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth];
            vertices.push(Vertex {
                position: [dir[0] * radius, dir[1] * radius, dir[2] * radius],
                normal: dir,
                uv: [lon as f32 / lng as f32, v],
            });
        }
    }
    vertices.push(Vertex {
        position: [0.0, -radius, 0.0],
        normal: [0.0, -1.0, 0.0],
        uv: [0.0, 0.0],
    });

    let lng = lng as u32;
    let ring = lng + 1;
    let total = vertex_count as u32;
    let mut indices = Vec::with_capacity(6 * lng as usize * lat_count);

    // Top fan around vertex 0.
    for lon in 0..lng {
        indices.extend_from_slice(&[lon + 2, lon + 1, 0]);
    }
    // Two triangles per quad on each latitude band.
    for lat in 0..latitudes - 1 {
        for lon in 0..lng {
            let current = lon + lat * ring + 1;
            let next = current + ring;
            indices.extend_from_slice(&[current, current + 1, next + 1]);
            indices.extend_from_slice(&[current, next + 1, next]);
        }
    }
    // Bottom fan around the last vertex.
    for lon in 0..lng {
        indices.extend_from_slice(&[total - 1, total - lon - 3, total - lon - 2]);
    }

    Ok(MeshData { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(mesh: &MeshData) {
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal {:?} not unit", vertex.normal);
        }
    }

    fn assert_indices_in_range(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        for &index in &mesh.indices {
            assert!((index as usize) < mesh.vertex_count());
        }
    }

    // A triangle is outward-CCW when its face cross product points the same
    // way as its (averaged) vertex normals.
    fn assert_ccw_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [
                mesh.vertices[tri[0] as usize],
                mesh.vertices[tri[1] as usize],
                mesh.vertices[tri[2] as usize],
            ];
            let ab = [
                b.position[0] - a.position[0],
                b.position[1] - a.position[1],
                b.position[2] - a.position[2],
            ];
            let ac = [
                c.position[0] - a.position[0],
                c.position[1] - a.position[1],
                c.position[2] - a.position[2],
            ];
            let cross = [
                ab[1] * ac[2] - ab[2] * ac[1],
                ab[2] * ac[0] - ab[0] * ac[2],
                ab[0] * ac[1] - ab[1] * ac[0],
            ];
            let dot = (0..3)
                .map(|i| cross[i] * (a.normal[i] + b.normal[i] + c.normal[i]))
                .sum::<f32>();
            assert!(dot > 0.0, "triangle {tri:?} is not wound CCW outward");
        }
    }

    #[test]
    fn box_counts() {
        let mesh = generate_box(1.0, 1.0, 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);
        assert_ccw_outward(&mesh);
    }

    #[test]
    fn unit_box_spans_half_extents() {
        let mesh = generate_box(1.0, 1.0, 1.0).unwrap();
        for axis in 0..3 {
            let min = mesh
                .vertices
                .iter()
                .map(|v| v.position[axis])
                .fold(f32::INFINITY, f32::min);
            let max = mesh
                .vertices
                .iter()
                .map(|v| v.position[axis])
                .fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(min, -0.5);
            assert_eq!(max, 0.5);
        }
    }

    #[test]
    fn box_rejects_bad_dimensions() {
        assert!(matches!(
            generate_box(0.0, 1.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_box(1.0, -2.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn plane_matches_extents() {
        let mesh = generate_plane(20.0, 15.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.position[0].abs(), 10.0);
            assert_eq!(vertex.position[1], 0.0);
            assert_eq!(vertex.position[2].abs(), 7.5);
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        assert_indices_in_range(&mesh);
        assert_ccw_outward(&mesh);
    }

    #[test]
    fn plane_rejects_bad_dimensions() {
        assert!(matches!(
            generate_plane(-1.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_plane(5.0, 0.0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn sphere_counts_follow_segments() {
        for (l, m) in [(3u32, 3u32), (8, 5), (20, 20), (30, 30)] {
            let mesh = generate_sphere(1.0, l, m).unwrap();
            assert_eq!(
                mesh.vertex_count(),
                ((l + 1) * m + 2) as usize,
                "vertex count for {l}x{m}"
            );
            assert_eq!(
                mesh.indices.len(),
                (6 * l * m) as usize,
                "index count for {l}x{m}"
            );
            assert_indices_in_range(&mesh);
            assert_unit_normals(&mesh);
            assert_ccw_outward(&mesh);
        }
    }

    #[test]
    fn sphere_positions_sit_on_radius() {
        let radius = 2.5;
        let mesh = generate_sphere(radius, 12, 7).unwrap();
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - radius).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_seam_closes_positions_not_uvs() {
        let lng = 8usize;
        let mesh = generate_sphere(1.0, lng as u32, 4).unwrap();
        // First latitude ring starts at vertex 1.
        let first = mesh.vertices[1];
        let seam = mesh.vertices[1 + lng];
        assert_eq!(first.position, seam.position);
        assert_eq!(first.uv[0], 0.0);
        assert_eq!(seam.uv[0], 1.0);
    }

    #[test]
    fn sphere_rejects_degenerate_segments() {
        assert!(matches!(
            generate_sphere(1.0, 2, 10),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_sphere(1.0, 10, 2),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_sphere(0.0, 10, 10),
            Err(Error::InvalidParameter(_))
        ));
    }
}
