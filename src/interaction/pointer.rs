use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Last known pointer position in normalized device coordinates.
///
/// `x` grows to the right and `y` grows upward; the viewport spans
/// [-1, 1] on both axes. Starts at the center before any movement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Maps a cursor position in window pixels to device coordinates.
    ///
    /// Positions outside the window map outside [-1, 1]. Returns `None`
    /// for an empty viewport.
    pub fn from_window_position(x: f64, y: f64, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            x: ((x / width as f64) * 2.0 - 1.0) as f32,
            y: (-(y / height as f64) * 2.0 + 1.0) as f32,
        })
    }

    /// Records a cursor move; the newest position always wins.
    pub fn update(&mut self, position: PhysicalPosition<f64>, size: PhysicalSize<u32>) {
        if let Some(next) = Self::from_window_position(position.x, position.y, size.width, size.height)
        {
            *self = next;
        }
    }

    pub fn ndc(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_center_maps_to_origin() {
        let pointer = PointerState::from_window_position(600.0, 400.0, 1200, 800).unwrap();
        assert_eq!(pointer, PointerState::new(0.0, 0.0));
    }

    #[test]
    fn test_corners_map_to_unit_square() {
        let top_left = PointerState::from_window_position(0.0, 0.0, 1200, 800).unwrap();
        assert_eq!(top_left.ndc(), (-1.0, 1.0));

        let bottom_right = PointerState::from_window_position(1200.0, 800.0, 1200, 800).unwrap();
        assert_eq!(bottom_right.ndc(), (1.0, -1.0));
    }

    #[test]
    fn test_zero_sized_window_is_ignored() {
        assert!(PointerState::from_window_position(10.0, 10.0, 0, 800).is_none());

        let mut pointer = PointerState::new(0.25, 0.5);
        pointer.update(PhysicalPosition::new(10.0, 10.0), PhysicalSize::new(800, 0));
        assert_eq!(pointer, PointerState::new(0.25, 0.5));
    }

    #[test]
    fn test_latest_move_wins() {
        let size = PhysicalSize::new(100, 100);
        let mut pointer = PointerState::default();
        pointer.update(PhysicalPosition::new(0.0, 0.0), size);
        pointer.update(PhysicalPosition::new(75.0, 25.0), size);
        assert_eq!(pointer.ndc(), (0.5, 0.5));
    }
}
