use std::io::{self, Write};

use ls_model::{Axis, TransformStep};

const CENTER: [f32; 3] = [0.5, 0.5, 0.5];

/// Append-only writer for the nested, scope-bracketed scene directives.
/// Tracks bracket depth so the export can assert balance when it finishes.
pub struct SceneStream<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> SceneStream<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn line(&mut self, directive: &str) -> io::Result<()> {
        writeln!(self.out, "{directive}")
    }

    pub fn attribute_begin(&mut self) -> io::Result<()> {
        self.depth += 1;
        self.line("AttributeBegin")
    }

    pub fn attribute_end(&mut self) -> io::Result<()> {
        debug_assert!(self.depth > 0, "unbalanced attribute scope");
        self.depth = self.depth.saturating_sub(1);
        self.line("AttributeEnd")
    }

    pub fn translate(&mut self, v: [f32; 3]) -> io::Result<()> {
        writeln!(self.out, "Translate {:.6} {:.6} {:.6}", v[0], v[1], v[2])
    }

    pub fn rotate(&mut self, degrees: f32, axis: Axis) -> io::Result<()> {
        let unit = axis.unit();
        writeln!(
            self.out,
            "Rotate {:.6} {} {} {}",
            degrees, unit[0] as i32, unit[1] as i32, unit[2] as i32
        )
    }

    pub fn scale(&mut self, v: [f32; 3]) -> io::Result<()> {
        writeln!(self.out, "Scale {:.6} {:.6} {:.6}", v[0], v[1], v[2])
    }

    /// Rotation of the block-local frame about the unit-cube center.
    pub fn rotate_about_center(&mut self, axis: Axis, degrees: f32) -> io::Result<()> {
        self.translate(CENTER)?;
        self.rotate(degrees, axis)?;
        self.translate([-CENTER[0], -CENTER[1], -CENTER[2]])
    }

    /// Single-axis scale about the unit-cube center.
    pub fn scale_about_center(&mut self, axis: Axis, factor: f32) -> io::Result<()> {
        self.translate(CENTER)?;
        let unit = axis.unit();
        let across = axis.across();
        self.scale([
            across[0] + unit[0] * factor,
            across[1] + unit[1] * factor,
            across[2] + unit[2] * factor,
        ])?;
        self.translate([-CENTER[0], -CENTER[1], -CENTER[2]])
    }

    pub fn transform_step(&mut self, step: TransformStep) -> io::Result<()> {
        match step {
            TransformStep::Rotate { axis, degrees } => self.rotate_about_center(axis, degrees),
            TransformStep::Scale { axis, factor } => self.scale_about_center(axis, factor),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
