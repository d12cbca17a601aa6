use crate::device::{BufferId, GraphicsContext};
use crate::error::{GlooError, Result};

/// Size in bytes of one attribute component (`f32`).
pub const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();

/// A GPU buffer holding `length` vertices of `stride` floats each.
///
/// The GPU object is created on first use. `reserve_data` allocates storage
/// without contents so variable-length geometry can be streamed in with
/// `set_subdata`; `has_data` tells which of the two states the buffer is in.
#[derive(Debug, Default)]
pub struct AttributeBuffer {
    buffer: Option<BufferId>,
    stride: usize,
    length: usize,
    has_data: bool,
}

impl AttributeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the GPU object if needed. Idempotent.
    pub fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<BufferId> {
        if let Some(buffer) = self.buffer {
            return Ok(buffer);
        }
        let buffer = ctx.create_buffer()?;
        self.buffer = Some(buffer);
        Ok(buffer)
    }

    #[inline]
    pub fn is_initialised(&self) -> bool {
        self.buffer.is_some()
    }

    #[inline]
    pub fn id(&self) -> Option<BufferId> {
        self.buffer
    }

    /// Number of vertices.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Floats per vertex.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        ELEMENT_SIZE
    }

    pub fn byte_size(&self) -> usize {
        self.length * self.stride * ELEMENT_SIZE
    }

    /// False between `reserve_data` and the first `set_subdata`.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Replaces the whole buffer with `length` vertices of `stride` floats.
    pub fn set_data(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        data: &[f32],
        length: usize,
        stride: usize,
    ) -> Result<()> {
        if length.checked_mul(stride) != Some(data.len()) {
            return Err(GlooError::AttributeDataMismatch {
                expected: length.saturating_mul(stride),
                actual: data.len(),
                length,
                stride,
            });
        }
        let buffer = self.init(ctx)?;
        let bytes: &[u8] = bytemuck::cast_slice(data);
        ctx.allocate_buffer(buffer, bytes.len(), Some(bytes));

        self.length = length;
        self.stride = stride;
        self.has_data = true;
        Ok(())
    }

    /// Allocates room for `length` vertices without uploading contents.
    pub fn reserve_data(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        length: usize,
        stride: usize,
    ) -> Result<()> {
        let Some(size) = length
            .checked_mul(stride)
            .and_then(|n| n.checked_mul(ELEMENT_SIZE))
        else {
            return Err(GlooError::BufferRangeExceeded {
                buffer: self.buffer,
                offset: 0,
                count: length,
                reserved: self.length,
            });
        };
        let buffer = self.init(ctx)?;
        ctx.allocate_buffer(buffer, size, None);

        self.length = length;
        self.stride = stride;
        self.has_data = false;
        Ok(())
    }

    /// Writes `count` vertices starting at vertex `offset`.
    ///
    /// The range must lie inside the reserved length; `length` and `stride`
    /// are not changed.
    pub fn set_subdata(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        data: &[f32],
        offset: usize,
        count: usize,
    ) -> Result<()> {
        if offset.checked_add(count).is_none_or(|end| end > self.length) {
            return Err(GlooError::BufferRangeExceeded {
                buffer: self.buffer,
                offset,
                count,
                reserved: self.length,
            });
        }
        let expected = count * self.stride;
        if data.len() != expected {
            return Err(GlooError::AttributeDataMismatch {
                expected,
                actual: data.len(),
                length: count,
                stride: self.stride,
            });
        }
        let buffer = self.init(ctx)?;
        ctx.write_buffer(
            buffer,
            offset * self.stride * ELEMENT_SIZE,
            bytemuck::cast_slice(data),
        );
        self.has_data = true;
        Ok(())
    }

    /// Drops contents and length; the GPU object is kept.
    pub fn clear(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(buffer) = self.buffer {
            ctx.allocate_buffer(buffer, 0, None);
        }
        self.length = 0;
        self.has_data = false;
    }

    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(buffer) = self.buffer.take() {
            ctx.delete_buffer(buffer);
        }
        self.length = 0;
        self.stride = 0;
        self.has_data = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingContext;

    fn floats(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    // ── set_data ──

    #[test]
    fn set_data_records_shape() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        buf.set_data(&mut ctx, &floats(12), 4, 3).unwrap();

        assert_eq!(buf.length(), 4);
        assert_eq!(buf.stride(), 3);
        assert_eq!(buf.byte_size(), 48);
        assert!(buf.has_data());
        let stored = ctx.buffer_contents(buf.id().unwrap()).unwrap();
        assert_eq!(stored.len(), 48);
    }

    #[test]
    fn set_data_rejects_wrong_size() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        let err = buf.set_data(&mut ctx, &floats(10), 4, 3).unwrap_err();
        assert!(matches!(err, GlooError::AttributeDataMismatch { expected: 12, actual: 10, .. }));
        assert!(!buf.is_initialised());
    }

    #[test]
    fn init_is_lazy_and_idempotent() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        assert!(!buf.is_initialised());
        let a = buf.init(&mut ctx).unwrap();
        let b = buf.init(&mut ctx).unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.live_buffers(), 1);
    }

    // ── reserve + subdata ──

    #[test]
    fn tiled_subdata_matches_set_data() {
        let data = floats(10 * 3);

        let mut ctx = RecordingContext::new();
        let mut whole = AttributeBuffer::new();
        whole.set_data(&mut ctx, &data, 10, 3).unwrap();

        let mut tiled = AttributeBuffer::new();
        tiled.reserve_data(&mut ctx, 10, 3).unwrap();
        assert!(!tiled.has_data());
        tiled.set_subdata(&mut ctx, &data[..4 * 3], 0, 4).unwrap();
        tiled.set_subdata(&mut ctx, &data[4 * 3..9 * 3], 4, 5).unwrap();
        tiled.set_subdata(&mut ctx, &data[9 * 3..], 9, 1).unwrap();

        assert!(tiled.has_data());
        assert_eq!(tiled.length(), 10);
        assert_eq!(
            ctx.buffer_contents(tiled.id().unwrap()),
            ctx.buffer_contents(whole.id().unwrap())
        );
    }

    #[test]
    fn subdata_out_of_range_is_rejected() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        buf.reserve_data(&mut ctx, 4, 3).unwrap();

        let err = buf.set_subdata(&mut ctx, &floats(6), 3, 2).unwrap_err();
        assert!(matches!(
            err,
            GlooError::BufferRangeExceeded { offset: 3, count: 2, reserved: 4, .. }
        ));
        assert_eq!(buf.length(), 4);
    }

    #[test]
    fn subdata_offset_overflow_is_rejected() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        buf.reserve_data(&mut ctx, 4, 3).unwrap();
        ctx.take_calls();

        let err = buf.set_subdata(&mut ctx, &floats(3), usize::MAX, 1).unwrap_err();
        assert!(matches!(
            err,
            GlooError::BufferRangeExceeded { offset: usize::MAX, count: 1, reserved: 4, .. }
        ));
        assert!(ctx.calls().is_empty());
        assert!(!buf.has_data());
    }

    #[test]
    fn oversized_shapes_are_rejected() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();

        let err = buf.set_data(&mut ctx, &floats(3), usize::MAX, 2).unwrap_err();
        assert!(matches!(
            err,
            GlooError::AttributeDataMismatch { expected: usize::MAX, actual: 3, .. }
        ));
        let err = buf.reserve_data(&mut ctx, usize::MAX / 2, 3).unwrap_err();
        assert!(matches!(err, GlooError::BufferRangeExceeded { offset: 0, .. }));
        assert!(!buf.is_initialised());
    }

    #[test]
    fn subdata_does_not_change_length() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        buf.reserve_data(&mut ctx, 8, 2).unwrap();
        buf.set_subdata(&mut ctx, &floats(4), 6, 2).unwrap();
        assert_eq!(buf.length(), 8);
    }

    #[test]
    fn release_deletes_gpu_object() {
        let mut ctx = RecordingContext::new();
        let mut buf = AttributeBuffer::new();
        buf.set_data(&mut ctx, &floats(3), 1, 3).unwrap();
        buf.release(&mut ctx);
        assert_eq!(ctx.live_buffers(), 0);
        assert_eq!(buf.length(), 0);
    }
}
