//! Circular pager over the work gallery.
//!
//! Logical position is `active`; `direction` only tells the renderer which
//! side the incoming panel enters from. Neighbor previews are read-only and
//! clicking one is the same as [`Carousel::jump_to`] its index.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CarouselError {
    #[error("carousel needs at least one item")]
    Empty,
    #[error("index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// Side of the viewport a panel enters from or exits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    None,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::None => "none",
        }
    }
}

/// Animation parameters derived from the last direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub enter_from: Side,
    pub exit_to: Side,
}

impl Transition {
    /// A forward move enters from the right and leaves to the left.
    pub fn from_direction(direction: i8) -> Self {
        match direction.signum() {
            1 => Transition {
                enter_from: Side::Right,
                exit_to: Side::Left,
            },
            -1 => Transition {
                enter_from: Side::Left,
                exit_to: Side::Right,
            },
            _ => Transition {
                enter_from: Side::None,
                exit_to: Side::None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    active: usize,
    direction: i8,
}

impl Carousel {
    pub fn new(len: usize) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        Ok(Self {
            len,
            active: 0,
            direction: 0,
        })
    }

    /// A carousel resting on `active`, with no direction yet.
    pub fn with_active(len: usize, active: usize) -> Result<Self, CarouselError> {
        let mut carousel = Self::new(len)?;
        if active >= len {
            return Err(CarouselError::OutOfRange { index: active, len });
        }
        carousel.active = active;
        Ok(carousel)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// `-1`, `0` (no move yet) or `+1`.
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Step by `dir`. Positive steps forward, negative steps back, zero is ignored.
    pub fn paginate(&mut self, dir: i32) {
        let step = dir.signum();
        if step == 0 {
            return;
        }
        self.direction = step as i8;
        self.active = if step > 0 {
            (self.active + 1) % self.len
        } else {
            (self.active + self.len - 1) % self.len
        };
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.len,
            });
        }
        if index > self.active {
            self.direction = 1;
        } else if index < self.active {
            self.direction = -1;
        }
        self.active = index;
        Ok(())
    }

    pub fn prev_index(&self) -> usize {
        (self.active + self.len - 1) % self.len
    }

    pub fn next_index(&self) -> usize {
        (self.active + 1) % self.len
    }

    pub fn transition(&self) -> Transition {
        Transition::from_direction(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_active_has_no_direction() {
        let c = Carousel::with_active(4, 3).unwrap();
        assert_eq!((c.active(), c.direction()), (3, 0));
        assert_eq!(c.next_index(), 0);
        assert!(Carousel::with_active(4, 4).is_err());
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(Carousel::new(0), Err(CarouselError::Empty));
    }

    #[test]
    fn starts_at_zero_without_direction() {
        let c = Carousel::new(6).unwrap();
        assert_eq!(c.active(), 0);
        assert_eq!(c.direction(), 0);
        assert_eq!(c.transition().enter_from, Side::None);
    }

    #[test]
    fn paginate_forward_wraps() {
        let mut c = Carousel::new(3).unwrap();
        c.paginate(1);
        c.paginate(1);
        c.paginate(1);
        assert_eq!(c.active(), 0);
        assert_eq!(c.direction(), 1);
    }

    #[test]
    fn paginate_backward_wraps() {
        let mut c = Carousel::new(6).unwrap();
        c.paginate(-1);
        assert_eq!(c.active(), 5);
        assert_eq!(c.direction(), -1);
    }

    #[test]
    fn stays_in_range_for_any_sequence() {
        for len in 1..8 {
            let mut c = Carousel::new(len).unwrap();
            for step in [1, 1, -1, 1, -1, -1, -1, 1, -1, 1, 1, 1, -1].iter().cycle().take(50) {
                c.paginate(*step);
                assert!(c.active() < len);
                assert!(c.prev_index() < len);
                assert!(c.next_index() < len);
            }
        }
    }

    #[test]
    fn forward_then_back_round_trips() {
        for len in 2..8 {
            for start in 0..len {
                let mut c = Carousel::new(len).unwrap();
                c.jump_to(start).unwrap();
                c.paginate(1);
                c.paginate(-1);
                assert_eq!(c.active(), start, "len={len} start={start}");
            }
        }
    }

    #[test]
    fn jump_sets_direction_from_sign() {
        let mut c = Carousel::new(6).unwrap();
        c.jump_to(4).unwrap();
        assert_eq!((c.active(), c.direction()), (4, 1));
        c.jump_to(1).unwrap();
        assert_eq!((c.active(), c.direction()), (1, -1));
    }

    #[test]
    fn jump_to_same_index_keeps_direction() {
        let mut c = Carousel::new(6).unwrap();
        c.jump_to(3).unwrap();
        c.jump_to(3).unwrap();
        assert_eq!(c.direction(), 1);

        let fresh = &mut Carousel::new(6).unwrap();
        fresh.jump_to(0).unwrap();
        assert_eq!(fresh.direction(), 0);
    }

    #[test]
    fn jump_out_of_range_is_error() {
        let mut c = Carousel::new(3).unwrap();
        assert_eq!(
            c.jump_to(3),
            Err(CarouselError::OutOfRange { index: 3, len: 3 })
        );
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn neighbors() {
        let mut c = Carousel::new(6).unwrap();
        assert_eq!((c.prev_index(), c.next_index()), (5, 1));
        c.jump_to(5).unwrap();
        assert_eq!((c.prev_index(), c.next_index()), (4, 0));
    }

    #[test]
    fn clicking_neighbor_equals_jump() {
        let mut clicked = Carousel::new(6).unwrap();
        let next = clicked.next_index();
        clicked.jump_to(next).unwrap();

        let mut paged = Carousel::new(6).unwrap();
        paged.paginate(1);
        assert_eq!(clicked, paged);
    }

    #[test]
    fn single_item_is_stable() {
        let mut c = Carousel::new(1).unwrap();
        assert_eq!((c.prev_index(), c.next_index()), (0, 0));
        c.paginate(1);
        c.paginate(-1);
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn zero_step_is_ignored() {
        let mut c = Carousel::new(4).unwrap();
        c.paginate(1);
        c.paginate(0);
        assert_eq!((c.active(), c.direction()), (1, 1));
    }

    #[test]
    fn large_steps_move_by_one() {
        let mut c = Carousel::new(4).unwrap();
        c.paginate(7);
        assert_eq!(c.active(), 1);
    }

    #[test]
    fn transition_sides_follow_direction() {
        let mut c = Carousel::new(4).unwrap();
        c.paginate(1);
        assert_eq!(
            c.transition(),
            Transition {
                enter_from: Side::Right,
                exit_to: Side::Left
            }
        );
        c.paginate(-1);
        assert_eq!(
            c.transition(),
            Transition {
                enter_from: Side::Left,
                exit_to: Side::Right
            }
        );
    }
}
