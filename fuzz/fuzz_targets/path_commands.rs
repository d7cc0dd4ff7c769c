#![no_main]

use glam::Vec2;
use libfuzzer_sys::fuzz_target;
use unshape_path::{MAX_VERTICES, Path, RenderContext};

fn point(bytes: &[u8]) -> Vec2 {
    Vec2::new(bytes[0] as f32 * 4.0, bytes[1] as f32 * 4.0)
}

fuzz_target!(|data: &[u8]| {
    // Building, filling and stroking should never panic on any command stream
    let mut ctx = RenderContext::new();
    let state = ctx.state();
    let mut path = Path::new();

    for cmd in data.chunks_exact(7) {
        let (a, b, c) = (point(&cmd[1..3]), point(&cmd[3..5]), point(&cmd[5..7]));
        match cmd[0] % 7 {
            0 => path.move_to(a),
            1 => path.line_to(a),
            2 => path.quadratic_curve_to(a, b, &state),
            3 => path.bezier_curve_to(a, b, c, &state),
            4 => path.arc_to(a, b, cmd[5] as f32 - 128.0),
            5 => path.close(),
            _ => ctx.clear_path(&mut path),
        }
    }

    if let Ok(draws) = ctx.fill(&mut path) {
        assert!(draws.iter().all(|d| d.vertex_count() <= MAX_VERTICES));
    }
    let _ = ctx.stroke(&path, data.first().is_some_and(|b| b % 2 == 0));
});
