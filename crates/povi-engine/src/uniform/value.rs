use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use glam::{Mat3, Mat4};

use crate::device::GraphicsContext;
use crate::shader::ShaderProgram;

/// Typed uniform payload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Color([f32; 3]),
    Vec4([f32; 4]),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// Shape of a [`UniformValue`], used to reject type-changing assignments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Float,
    Int,
    Color,
    Vec4,
    Mat3,
    Mat4,
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Color(_) => UniformKind::Color,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat3(_) => UniformKind::Mat3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }
}

/// A named shader parameter.
///
/// Float uniforms may carry an inclusive range; values written through
/// [`set_float`](Self::set_float) are clamped into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    name: String,
    value: UniformValue,
    range: Option<RangeInclusive<f32>>,
}

pub type SharedUniform = Rc<RefCell<Uniform>>;

/// Wraps a uniform for shared ownership.
pub fn shared(uniform: Uniform) -> SharedUniform {
    Rc::new(RefCell::new(uniform))
}

impl Uniform {
    pub fn new(name: impl Into<String>, value: UniformValue) -> Self {
        Self {
            name: name.into(),
            value,
            range: None,
        }
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, UniformValue::Float(value))
    }

    /// Float uniform limited to `min..=max`. The initial value is clamped too.
    ///
    /// Reversed bounds are swapped. A NaN bound leaves the uniform unranged.
    pub fn float_ranged(name: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        let name = name.into();
        let range = if min.is_nan() || max.is_nan() {
            log::warn!("uniform `{name}`: ignoring range {min}..={max}");
            None
        } else {
            Some(min.min(max)..=min.max(max))
        };
        let value = match &range {
            Some(r) => value.clamp(*r.start(), *r.end()),
            None => value,
        };
        Self {
            name,
            value: UniformValue::Float(value),
            range,
        }
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, UniformValue::Int(value))
    }

    pub fn color(name: impl Into<String>, rgb: [f32; 3]) -> Self {
        Self::new(name, UniformValue::Color(rgb))
    }

    pub fn vec4(name: impl Into<String>, v: [f32; 4]) -> Self {
        Self::new(name, UniformValue::Vec4(v))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> UniformValue {
        self.value
    }

    #[inline]
    pub fn kind(&self) -> UniformKind {
        self.value.kind()
    }

    pub fn range(&self) -> Option<&RangeInclusive<f32>> {
        self.range.as_ref()
    }

    /// Float payload, if this is a float uniform.
    pub fn as_float(&self) -> Option<f32> {
        match self.value {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Replaces the value. Returns false (and keeps the old value) when the
    /// kind differs. Ranged floats are clamped.
    pub fn set_value(&mut self, value: UniformValue) -> bool {
        if value.kind() != self.kind() {
            log::debug!(
                "uniform `{}`: ignoring {:?} value for {:?} uniform",
                self.name,
                value.kind(),
                self.kind()
            );
            return false;
        }
        self.value = match (value, &self.range) {
            (UniformValue::Float(v), Some(r)) => UniformValue::Float(v.clamp(*r.start(), *r.end())),
            (v, _) => v,
        };
        true
    }

    pub fn set_float(&mut self, value: f32) -> bool {
        self.set_value(UniformValue::Float(value))
    }

    /// Uploads the current value into `shader`, which must be the active program.
    pub fn bind(&self, ctx: &mut dyn GraphicsContext, shader: &mut ShaderProgram) {
        shader.bind(ctx, &self.name, self.value);
    }
}
