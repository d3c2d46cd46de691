/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    /// Average of the three vertex normals
    pub fn smooth_normal(&self) -> Vector3<f32> {
        let sum = self.vertices[0].normal + self.vertices[1].normal + self.vertices[2].normal;
        let length = sum.norm();
        if length < 1e-6 {
            self.calculate_normal()
        } else {
            sum / length
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = vertices.next()?.position;
        let (min, max) = vertices.fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        });
        Some((min, max))
    }

    /// Emit two triangles per grid quad. `grid` is row-major with
    /// `columns + 1` vertices per row.
    fn stitch_grid(
        &mut self,
        grid: &[Vertex],
        rows: usize,
        columns: usize,
        skip: impl Fn(usize, usize) -> bool,
    ) {
        let stride = columns + 1;
        for row in 0..rows {
            for column in 0..columns {
                let a = grid[row * stride + column + 1];
                let b = grid[row * stride + column];
                let c = grid[(row + 1) * stride + column];
                let d = grid[(row + 1) * stride + column + 1];
                if !skip(row, 0) {
                    self.add_triangle(Triangle::new(a, b, d));
                }
                if !skip(row, 1) {
                    self.add_triangle(Triangle::new(b, c, d));
                }
            }
        }
    }

    /// Cylinder centered on the origin along the Y axis, with both caps
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3) as usize;
        let half = height / 2.0;
        // A flat cylinder has vertical side walls rather than 0/0 normals
        let slope = if height > f32::EPSILON {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };
        let mut mesh = Self::with_capacity(segments * 4);

        // Side wall: row 0 is the top ring, row 1 the bottom ring
        let mut grid = Vec::with_capacity((segments + 1) * 2);
        for (radius, y) in [(radius_top, half), (radius_bottom, -half)] {
            for i in 0..=segments {
                let theta = i as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                let normal = Vector3::new(sin, slope, cos).normalize();
                grid.push(Vertex::new(
                    radius * sin,
                    y,
                    radius * cos,
                    normal.x,
                    normal.y,
                    normal.z,
                ));
            }
        }
        mesh.stitch_grid(&grid, 1, segments, |_, _| false);

        // Caps
        for (radius, y, sign) in [(radius_top, half, 1.0), (radius_bottom, -half, -1.0)] {
            if radius <= 0.0 {
                continue;
            }
            let center = Vertex::new(0.0, y, 0.0, 0.0, sign, 0.0);
            for i in 0..segments {
                let t0 = i as f32 / segments as f32 * TAU;
                let t1 = (i + 1) as f32 / segments as f32 * TAU;
                let v0 = Vertex::new(radius * t0.sin(), y, radius * t0.cos(), 0.0, sign, 0.0);
                let v1 = Vertex::new(radius * t1.sin(), y, radius * t1.cos(), 0.0, sign, 0.0);
                if sign > 0.0 {
                    mesh.add_triangle(Triangle::new(v0, v1, center));
                } else {
                    mesh.add_triangle(Triangle::new(v1, v0, center));
                }
            }
        }

        mesh
    }

    /// UV sphere centered on the origin
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let columns = width_segments.max(3) as usize;
        let rows = height_segments.max(2) as usize;
        let mut grid = Vec::with_capacity((rows + 1) * (columns + 1));

        for iy in 0..=rows {
            let v = iy as f32 / rows as f32;
            for ix in 0..=columns {
                let u = ix as f32 / columns as f32;
                let normal = Vector3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                let position = normal * radius;
                grid.push(Vertex::new(
                    position.x, position.y, position.z, normal.x, normal.y, normal.z,
                ));
            }
        }

        let mut mesh = Self::with_capacity(columns * (rows * 2 - 2));
        // The first row collapses to the north pole, the last to the south pole
        mesh.stitch_grid(&grid, rows, columns, |row, half| {
            (row == 0 && half == 0) || (row == rows - 1 && half == 1)
        });
        mesh
    }

    /// Torus lying in the XY plane around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(3) as usize;
        let tubular = tubular_segments.max(3) as usize;
        let mut grid = Vec::with_capacity((radial + 1) * (tubular + 1));

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let ring = radius + tube * v.cos();
                let position = Point3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
                let center = Point3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - center).normalize();
                grid.push(Vertex {
                    position,
                    normal,
                });
            }
        }

        let mut mesh = Self::with_capacity(radial * tubular * 2);
        mesh.stitch_grid(&grid, radial, tubular, |_, _| false);
        mesh
    }

    /// Create a simple cube mesh
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, in-plane axis u, in-plane axis v) per face
        let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];

        for (normal, u, v) in faces {
            let corner = |su: f32, sv: f32| {
                let p = (normal + u * su + v * sv) * half;
                Vertex::new(p.x, p.y, p.z, normal.x, normal.y, normal.z)
            };
            let (c0, c1, c2, c3) = (corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0));
            mesh.add_triangle(Triangle::new(c0, c1, c2));
            mesh.add_triangle(Triangle::new(c0, c2, c3));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
