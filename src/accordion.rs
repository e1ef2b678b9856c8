//! Single-open accordion for the FAQ list.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("entry {index} out of range for {len} entries")]
pub struct AccordionError {
    pub index: usize,
    pub len: usize,
}

/// At most one entry is open. The first entry starts open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            open: (len > 0).then_some(0),
        }
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Close `index` if it is open, otherwise open it (closing any other).
    pub fn toggle(&mut self, index: usize) -> Result<(), AccordionError> {
        if index >= self.len {
            return Err(AccordionError {
                index,
                len: self.len,
            });
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_starts_open() {
        let a = Accordion::new(7);
        assert_eq!(a.open_index(), Some(0));
        assert!(a.is_open(0));
    }

    #[test]
    fn empty_has_nothing_open() {
        let a = Accordion::new(0);
        assert_eq!(a.open_index(), None);
        assert!(a.is_empty());
    }

    #[test]
    fn double_toggle_restores() {
        for start in [None, Some(0), Some(3)] {
            for i in 0..5 {
                let mut a = Accordion::new(5);
                a.open = start;
                a.toggle(i).unwrap();
                a.toggle(i).unwrap();
                assert_eq!(a.open_index(), start, "start={start:?} i={i}");
            }
        }
    }

    #[test]
    fn opening_another_closes_previous() {
        let mut a = Accordion::new(5);
        a.toggle(2).unwrap();
        a.toggle(4).unwrap();
        assert_eq!(a.open_index(), Some(4));
        assert!(!a.is_open(2));
        assert_eq!((0..5).filter(|&i| a.is_open(i)).count(), 1);
    }

    #[test]
    fn toggling_open_entry_closes_all() {
        let mut a = Accordion::new(3);
        a.toggle(0).unwrap();
        assert_eq!(a.open_index(), None);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut a = Accordion::new(3);
        assert_eq!(a.toggle(3), Err(AccordionError { index: 3, len: 3 }));
        assert_eq!(a.open_index(), Some(0));
    }
}
