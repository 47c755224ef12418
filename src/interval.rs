use serde::Serialize;
use std::cmp::Ordering;

/// A closed time range `[start, end]` in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Overlapping or touching intervals compare equal, which is what lets a
    /// binary search land on the range a new interval has to merge into.
    fn merge_cmp(&self, other: &Interval) -> Ordering {
        if self.end < other.start {
            Ordering::Less
        } else if self.start > other.end {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Sorted set of disjoint intervals. Consecutive members never touch: for
/// neighbours `a, b` it always holds that `a.end < b.start`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn first(&self) -> Option<&Interval> {
        self.intervals.first()
    }

    pub fn last(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    /// Inserts `[start, end]`, merging every member it overlaps or touches.
    /// Returns the member that now covers the range, or `None` when
    /// `end < start`.
    pub fn add_interval(&mut self, start: f64, end: f64) -> Option<Interval> {
        if end < start {
            return None;
        }
        let new = Interval::new(start, end);

        if self
            .intervals
            .last()
            .map_or(true, |last| last.merge_cmp(&new) == Ordering::Less)
        {
            self.intervals.push(new);
            return Some(new);
        }

        let first = self
            .intervals
            .partition_point(|i| i.merge_cmp(&new) == Ordering::Less);
        let last = self
            .intervals
            .partition_point(|i| i.merge_cmp(&new) != Ordering::Greater);

        let merged = self.intervals[first..last]
            .iter()
            .fold(new, |acc, i| {
                Interval::new(acc.start.min(i.start), acc.end.max(i.end))
            });
        self.intervals.splice(first..last, std::iter::once(merged));
        Some(merged)
    }

    /// Removes `[start, end]` from the set. Members straddling either edge are
    /// trimmed, and a member strictly containing the range is split in two.
    /// An empty range removes nothing.
    pub fn remove_interval(&mut self, start: f64, end: f64) {
        if end <= start {
            return;
        }
        let mut remaining = Vec::with_capacity(self.intervals.len() + 1);
        for interval in self.intervals.drain(..) {
            if interval.end < start || interval.start > end {
                remaining.push(interval);
                continue;
            }
            if interval.start < start {
                remaining.push(Interval::new(interval.start, start));
            }
            if interval.end > end {
                remaining.push(Interval::new(end, interval.end));
            }
        }
        self.intervals = remaining;
    }

    /// Members overlapping `[start, end]`, clipped to it, in order.
    pub fn intersect(&self, start: f64, end: f64) -> IntervalSet {
        if end < start {
            return IntervalSet::new();
        }
        let first = self.intervals.partition_point(|i| i.end <= start);
        let intervals = self.intervals[first..]
            .iter()
            .take_while(|i| i.start < end)
            .map(|i| Interval::new(i.start.max(start), i.end.min(end)))
            .collect();
        IntervalSet { intervals }
    }

    pub fn get_interval_containing(&self, value: f64) -> Option<Interval> {
        let point = Interval::new(value, value);
        self.intervals
            .binary_search_by(|i| {
                if i.end < point.start {
                    Ordering::Less
                } else if i.start > point.end {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|index| self.intervals[index])
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
