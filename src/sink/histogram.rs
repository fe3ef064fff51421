//! Named histograms and profiles, filled through `StatsSink`

use std::collections::{BTreeMap, BTreeSet};

use ndhistogram::{ndhistogram, axis::Uniform, Histogram, HistND};
use tracing::warn;

use super::StatsSink;
use super::book::{Binning, Booking, Shape};

type H1 = HistND<(Uniform<f64>,), f64>;
type H2 = HistND<(Uniform<f64>, Uniform<f64>), f64>;

fn h1(x: Binning) -> H1 { ndhistogram!(Uniform::new(x.bins, x.min, x.max); f64) }

fn h2(x: Binning, y: Binning) -> H2 {
    ndhistogram!(Uniform::new(x.bins, x.min, x.max),
                 Uniform::new(y.bins, y.min, y.max);
                 f64)
}

/// Mean and spread of `y` in bins of `x`.
///
/// Kept as per-bin sums rather than means, so that profiles filled
/// separately can be added together.
#[derive(Clone)]
pub struct Profile {
    sum    : H1,
    sum2   : H1,
    entries: H1,
}

impl Profile {
    pub fn new(x: Binning) -> Self { Self { sum: h1(x), sum2: h1(x), entries: h1(x) } }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.sum    .fill_with(&x, y);
        self.sum2   .fill_with(&x, y * y);
        self.entries.fill(&x);
    }

    pub fn entries(&self, x: f64) -> f64 { *self.entries.value(&x).unwrap_or(&0.0) }

    /// Mean of the `y`s filled in the bin containing `x`; `None` if there were none
    pub fn mean(&self, x: f64) -> Option<f64> {
        let n = self.entries(x);
        if n == 0.0 { return None }
        Some(self.sum.value(&x)? / n)
    }

    /// Standard deviation of the `y`s filled in the bin containing `x`
    pub fn spread(&self, x: f64) -> Option<f64> {
        let mean = self.mean(x)?;
        let mean2 = self.sum2.value(&x)? / self.entries(x);
        Some((mean2 - mean * mean).max(0.0).sqrt())
    }

    /// Per-bin sums, sums of squares, entries and means, including under- and overflow
    pub fn columns(&self) -> [Vec<f64>; 4] {
        let sum    : Vec<f64> = self.sum    .values().copied().collect();
        let sum2   : Vec<f64> = self.sum2   .values().copied().collect();
        let entries: Vec<f64> = self.entries.values().copied().collect();
        let mean = sum.iter().zip(&entries)
            .map(|(s, &n)| if n > 0.0 { s / n } else { 0.0 })
            .collect();
        [sum, sum2, entries, mean]
    }
}

impl std::ops::AddAssign<&Profile> for Profile {
    fn add_assign(&mut self, rhs: &Profile) {
        self.sum     += &rhs.sum;
        self.sum2    += &rhs.sum2;
        self.entries += &rhs.entries;
    }
}

#[derive(Clone)]
pub enum Accumulator {
    H1(Binning, H1),
    H2(Binning, Binning, H2),
    Profile(Binning, Profile),
}

impl Accumulator {
    fn new(shape: Shape) -> Self {
        match shape {
            Shape::H1(x)      => Self::H1(x, h1(x)),
            Shape::H2(x, y)   => Self::H2(x, y, h2(x, y)),
            Shape::Profile(x) => Self::Profile(x, Profile::new(x)),
        }
    }

    pub fn shape(&self) -> Shape {
        match *self {
            Self::H1(x, _)      => Shape::H1(x),
            Self::H2(x, y, _)   => Shape::H2(x, y),
            Self::Profile(x, _) => Shape::Profile(x),
        }
    }

    /// Bin contents including under- and overflow, first axis varying fastest
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::H1(_, h)      => h.values().copied().collect(),
            Self::H2(_, _, h)   => h.values().copied().collect(),
            Self::Profile(_, p) => { let [.., mean] = p.columns(); mean }
        }
    }
}

/// Named histograms and profiles for one detector region, booked up front.
///
/// Fills addressed to names that were not booked (or to a booked name with a
/// different kind of accumulator) are dropped; each such name is reported
/// once.
#[derive(Clone)]
pub struct HistogramBook {
    accumulators: BTreeMap<String, Accumulator>,
    unbooked: BTreeSet<String>,
}

impl HistogramBook {
    pub fn new(booking: &Booking) -> Self {
        let accumulators = booking.entries.iter()
            .map(|(name, shape)| (name.clone(), Accumulator::new(*shape)))
            .collect();
        Self { accumulators, unbooked: BTreeSet::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Accumulator> { self.accumulators.get(name) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Accumulator)> {
        self.accumulators.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn len(&self) -> usize { self.accumulators.len() }

    pub fn is_empty(&self) -> bool { self.accumulators.is_empty() }

    /// Content of the bin of 1-D histogram `name` containing `x`
    pub fn value_1d(&self, name: &str, x: f64) -> Option<f64> {
        match self.get(name)? {
            Accumulator::H1(_, h) => h.value(&x).copied(),
            _ => None,
        }
    }

    /// Content of the bin of 2-D histogram `name` containing `(x, y)`
    pub fn value_2d(&self, name: &str, x: f64, y: f64) -> Option<f64> {
        match self.get(name)? {
            Accumulator::H2(_, _, h) => h.value(&(x, y)).copied(),
            _ => None,
        }
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        match self.get(name)? {
            Accumulator::Profile(_, p) => Some(p),
            _ => None,
        }
    }

    /// Total number of observations in `name`, under- and overflow included
    pub fn total(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(Accumulator::Profile(_, p)) => { let [_, _, entries, _] = p.columns(); entries.iter().sum() }
            Some(acc) => acc.values().iter().sum(),
            None => 0.0,
        }
    }

    /// Names which received fills without having been booked
    pub fn unbooked(&self) -> impl Iterator<Item = &str> { self.unbooked.iter().map(String::as_str) }

    fn reject(&mut self, name: &str) {
        if self.unbooked.insert(name.to_owned()) {
            warn!(metric = name, "fill of unbooked metric ignored");
        }
    }
}

impl StatsSink for HistogramBook {
    fn fill_1d(&mut self, name: &str, x: f64) {
        match self.accumulators.get_mut(name) {
            Some(Accumulator::H1(_, h)) => { h.fill(&x); }
            _ => self.reject(name),
        }
    }

    fn fill_2d(&mut self, name: &str, x: f64, y: f64) {
        match self.accumulators.get_mut(name) {
            Some(Accumulator::H2(_, _, h)) => { h.fill(&(x, y)); }
            _ => self.reject(name),
        }
    }

    fn fill_profile(&mut self, name: &str, x: f64, y: f64) {
        match self.accumulators.get_mut(name) {
            Some(Accumulator::Profile(_, p)) => p.fill(x, y),
            _ => self.reject(name),
        }
    }
}

/// Accumulators present in only one of the books are taken over as they are.
///
/// # Panics
///
/// If a name is booked in both books with different kinds of accumulator.
/// Books made from the same `Booking` never differ in this way.
impl std::ops::AddAssign<&HistogramBook> for HistogramBook {
    fn add_assign(&mut self, rhs: &HistogramBook) {
        for (name, theirs) in &rhs.accumulators {
            match (self.accumulators.get_mut(name), theirs) {
                (Some(Accumulator::H1(_, a))     , Accumulator::H1(_, b))      => *a += b,
                (Some(Accumulator::H2(_, _, a))  , Accumulator::H2(_, _, b))   => *a += b,
                (Some(Accumulator::Profile(_, a)), Accumulator::Profile(_, b)) => *a += b,
                (None, _) => { self.accumulators.insert(name.clone(), theirs.clone()); }
                (Some(_), _) => panic!("Cannot add histograms of different kinds: {name}"),
            }
        }
        self.unbooked.extend(rhs.unbooked.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn book() -> HistogramBook {
        let booking = Booking {
            entries: vec![
                ("e".into(), Shape::H1(Binning::new(10, 0.0, 10.0))),
                ("xy".into(), Shape::H2(Binning::new(4, 0.0, 4.0), Binning::new(2, -1.0, 1.0))),
                ("p".into(), Shape::Profile(Binning::new(5, 0.0, 5.0))),
            ],
        };
        HistogramBook::new(&booking)
    }

    #[rstest]
    fn fills_land_in_bins(mut book: HistogramBook) {
        book.fill_1d("e", 2.5);
        book.fill_1d("e", 2.7);
        book.fill_1d("e", 42.0);
        book.fill_2d("xy", 1.5, -0.5);
        assert_eq!(book.value_1d("e", 2.0), Some(2.0));
        assert_eq!(book.value_1d("e", 5.0), Some(0.0));
        assert_eq!(book.total("e"), 3.0);
        assert_eq!(book.value_2d("xy", 1.1, -0.1), Some(1.0));
        assert_eq!(book.value_2d("xy", 1.1,  0.1), Some(0.0));
    }

    #[rstest]
    fn profile_mean_and_spread(mut book: HistogramBook) {
        for y in [1.0, 2.0, 3.0] { book.fill_profile("p", 0.5, y); }
        let p = book.profile("p").unwrap();
        assert_float_eq!(p.mean(0.5).unwrap(), 2.0, ulps <= 1);
        assert_float_eq!(p.spread(0.5).unwrap(), (2.0_f64 / 3.0).sqrt(), abs <= 1e-12);
        assert_eq!(p.mean(3.5), None);
        assert_eq!(book.total("p"), 3.0);
    }

    #[rstest]
    fn unbooked_and_mismatched_fills_are_ignored(mut book: HistogramBook) {
        book.fill_1d("nope", 1.0);
        book.fill_2d("e", 1.0, 1.0);
        book.fill_1d("nope", 2.0);
        assert_eq!(book.unbooked().collect::<Vec<_>>(), vec!["e", "nope"]);
        assert_eq!(book.total("e"), 0.0);
    }

    #[rstest]
    fn books_add_up(mut book: HistogramBook) {
        let mut other = book.clone();
        book .fill_1d("e", 1.5);
        other.fill_1d("e", 1.5);
        book .fill_profile("p", 1.5, 4.0);
        other.fill_profile("p", 1.5, 8.0);
        book += &other;
        assert_eq!(book.value_1d("e", 1.5), Some(2.0));
        assert_float_eq!(book.profile("p").unwrap().mean(1.5).unwrap(), 6.0, ulps <= 1);
        assert_eq!(book.len(), 3);
    }

    #[rstest]
    #[should_panic(expected = "different kinds")]
    fn adding_mismatched_kinds_panics(mut book: HistogramBook) {
        let other = HistogramBook::new(&Booking { entries: vec![("e".into(), Shape::Profile(Binning::new(10, 0.0, 10.0)))] });
        book += &other;
    }

    #[test]
    fn empty_booking_makes_empty_book() {
        let book = HistogramBook::new(&Booking::default());
        assert!(book.is_empty());
        assert_eq!(book.len(), 0);
    }
}
