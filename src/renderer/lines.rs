// Line-list geometry for the floor grid, bounds and light gizmos

use super::line_vertex::LineVertex;

fn segment(out: &mut Vec<LineVertex>, a: [f32; 3], b: [f32; 3], color: [f32; 3]) {
    out.push(LineVertex::new(a, color));
    out.push(LineVertex::new(b, color));
}

/// Square grid on the XZ plane, `half_extent` units from the origin each way.
/// Every `major_every`-th line uses `major_color`.
pub fn floor_grid(
    half_extent: f32,
    step: f32,
    major_every: i32,
    minor_color: [f32; 3],
    major_color: [f32; 3],
) -> Vec<LineVertex> {
    let mut line_vertices = Vec::new();
    if step <= 0.0 || half_extent <= 0.0 {
        return line_vertices;
    }

    let count = (half_extent / step).floor() as i32;
    for i in -count..=count {
        let pos = i as f32 * step;
        let color = if major_every > 0 && i % major_every == 0 {
            major_color
        } else {
            minor_color
        };
        segment(
            &mut line_vertices,
            [pos, 0.0, -half_extent],
            [pos, 0.0, half_extent],
            color,
        );
        segment(
            &mut line_vertices,
            [-half_extent, 0.0, pos],
            [half_extent, 0.0, pos],
            color,
        );
    }
    line_vertices
}

/// Circle on the XZ plane, as `segments` line segments.
pub fn floor_circle(radius: f32, segments: u32, color: [f32; 3]) -> Vec<LineVertex> {
    let mut line_vertices = Vec::with_capacity(segments as usize * 2);
    let point = |i: u32| {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        [radius * angle.cos(), 0.0, radius * angle.sin()]
    };
    for i in 0..segments {
        segment(&mut line_vertices, point(i), point(i + 1), color);
    }
    line_vertices
}

/// Wireframe box: 12 edges.
pub fn bounding_box(min: [f32; 3], max: [f32; 3], color: [f32; 3]) -> Vec<LineVertex> {
    let vertices = [
        // Bottom face (Y = min)
        [min[0], min[1], min[2]],
        [max[0], min[1], min[2]],
        [max[0], min[1], max[2]],
        [min[0], min[1], max[2]],
        // Top face (Y = max)
        [min[0], max[1], min[2]],
        [max[0], max[1], min[2]],
        [max[0], max[1], max[2]],
        [min[0], max[1], max[2]],
    ];

    let mut bbox_vertices = Vec::with_capacity(24);
    for i in 0..4 {
        let next = (i + 1) % 4;
        segment(&mut bbox_vertices, vertices[i], vertices[next], color);
        segment(&mut bbox_vertices, vertices[i + 4], vertices[next + 4], color);
        segment(&mut bbox_vertices, vertices[i], vertices[i + 4], color);
    }
    bbox_vertices
}

/// Ray from the origin toward a directional light.
pub fn light_ray(position: [f32; 3], color: [f32; 3]) -> Vec<LineVertex> {
    let mut line_vertices = Vec::with_capacity(2);
    segment(&mut line_vertices, [0.0, 0.0, 0.0], position, color);
    line_vertices
}
