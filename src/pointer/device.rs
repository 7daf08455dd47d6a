// Pointer devices: enigo for real input, a logging no-op for dry runs
use crate::error::{AutomationError, AutomationResult};
use crate::template_matching::Point;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

/// Raw pointer capability: absolute moves and left clicks.
pub trait PointerDevice {
    /// Current pointer position, if the platform can report it.
    fn position(&mut self) -> AutomationResult<Point>;
    fn move_to(&mut self, point: Point) -> AutomationResult<()>;
    fn click(&mut self) -> AutomationResult<()>;
}

impl<T: PointerDevice + ?Sized> PointerDevice for Box<T> {
    fn position(&mut self) -> AutomationResult<Point> {
        (**self).position()
    }

    fn move_to(&mut self, point: Point) -> AutomationResult<()> {
        (**self).move_to(point)
    }

    fn click(&mut self) -> AutomationResult<()> {
        (**self).click()
    }
}

/// System mouse through enigo.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> AutomationResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| AutomationError::actuation("connect", e))?;
        Ok(Self { enigo })
    }
}

impl PointerDevice for EnigoPointer {
    fn position(&mut self) -> AutomationResult<Point> {
        let (x, y) = self
            .enigo
            .location()
            .map_err(|e| AutomationError::actuation("query", e))?;
        Ok(Point::new(x.max(0) as u32, y.max(0) as u32))
    }

    fn move_to(&mut self, point: Point) -> AutomationResult<()> {
        let x = i32::try_from(point.x).map_err(|e| AutomationError::actuation("move", e))?;
        let y = i32::try_from(point.y).map_err(|e| AutomationError::actuation("move", e))?;
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| AutomationError::actuation("move", e))
    }

    fn click(&mut self) -> AutomationResult<()> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| AutomationError::actuation("click", e))
    }
}

/// Logs what would have happened instead of touching the mouse.
#[derive(Debug, Default)]
pub struct DryRunPointer {
    position: Option<Point>,
}

impl PointerDevice for DryRunPointer {
    fn position(&mut self) -> AutomationResult<Point> {
        self.position
            .ok_or_else(|| AutomationError::actuation("query", "dry run has no pointer yet"))
    }

    fn move_to(&mut self, point: Point) -> AutomationResult<()> {
        if self.position != Some(point) {
            log::trace!("🖱️ [dry-run] move to ({},{})", point.x, point.y);
        }
        self.position = Some(point);
        Ok(())
    }

    fn click(&mut self) -> AutomationResult<()> {
        if let Some(p) = self.position {
            log::debug!("🖱️ [dry-run] click at ({},{})", p.x, p.y);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_tracks_position() {
        let mut pointer = DryRunPointer::default();
        assert!(pointer.position().is_err());
        pointer.move_to(Point::new(3, 4)).unwrap();
        assert_eq!(pointer.position().unwrap(), Point::new(3, 4));
        assert!(pointer.click().is_ok());
    }
}
