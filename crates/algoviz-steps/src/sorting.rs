//! Sorting step generators.
//!
//! Every generator works on a private copy of its input and records each
//! comparison, swap, overwrite and pivot selection with a snapshot of the
//! working array taken after the operation. Traces end with a single `done`
//! covering the whole range.
//!
//! Vacuous swaps (an element swapped with itself) are never recorded.
//! Quick sort records a `compare` marker for base-case calls and merge sort
//! records a `pivot` for every split, so line markers follow the recursion
//! even when no element moves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::op::{Operation, SortKind, SortStep};

/// The five sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl SortAlgorithm {
    pub const ALL: [Self; 5] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Quick,
        Self::Merge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Quick => "Quick Sort",
            Self::Merge => "Merge Sort",
        }
    }

    /// Pseudocode shown beside the bars; operation `line`s index into it.
    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::Bubble => BUBBLE_LISTING,
            Self::Selection => SELECTION_LISTING,
            Self::Insertion => INSERTION_LISTING,
            Self::Quick => QUICK_LISTING,
            Self::Merge => MERGE_LISTING,
        }
    }
}

const BUBBLE_LISTING: &[&str] = &[
    "for i in 0..n:",
    "  for j in 0..n - i - 1:",
    "    if a[j] > a[j + 1]:",
    "      swap(a[j], a[j + 1])",
    "done",
];

const SELECTION_LISTING: &[&str] = &[
    "for i in 0..n - 1:",
    "  min = i",
    "  for j in i + 1..n:",
    "    if a[j] < a[min]:",
    "      min = j",
    "  if min != i: swap(a[i], a[min])",
    "done",
];

const INSERTION_LISTING: &[&str] = &[
    "for i in 1..n:",
    "  key = a[i]; j = i",
    "  while j > 0 and a[j - 1] > key:",
    "    a[j] = a[j - 1]; j -= 1",
    "  a[j] = key",
    "done",
];

const QUICK_LISTING: &[&str] = &[
    "quicksort(lo, hi):",
    "  if hi - lo <= 1: return",
    "  pivot = a[hi - 1]; i = lo",
    "  for j in lo..hi - 1:",
    "    if a[j] < pivot:",
    "      swap(a[i], a[j]); i += 1",
    "  swap(a[i], a[hi - 1])",
    "  quicksort(lo, i); quicksort(i + 1, hi)",
    "done",
];

const MERGE_LISTING: &[&str] = &[
    "mergesort(lo, hi):",
    "  if hi - lo <= 1: return",
    "  mid = (lo + hi) / 2",
    "  mergesort(lo, mid); mergesort(mid, hi)",
    "  merge(lo, mid, hi):",
    "    a[k] = min(left[i], right[j])",
    "    copy the remaining run",
    "done",
];

/// Generate the trace for `algorithm` over `values`.
pub fn generate(algorithm: SortAlgorithm, values: &[i64]) -> Vec<Operation> {
    match algorithm {
        SortAlgorithm::Bubble => bubble(values),
        SortAlgorithm::Selection => selection(values),
        SortAlgorithm::Insertion => insertion(values),
        SortAlgorithm::Quick => quick(values),
        SortAlgorithm::Merge => merge(values),
    }
}

/// Records operations against a working copy of the input.
struct Tracer {
    array: Vec<i64>,
    ops: Vec<Operation>,
}

impl Tracer {
    fn new(values: &[i64]) -> Self {
        Self {
            array: values.to_vec(),
            ops: Vec::new(),
        }
    }

    fn emit(&mut self, kind: SortKind, line: usize, mut indices: Vec<usize>, note: String) {
        indices.sort_unstable();
        indices.dedup();
        self.ops.push(Operation::Sort(SortStep {
            line,
            note,
            array: self.array.clone(),
            indices,
            kind,
        }));
    }

    fn compare(&mut self, line: usize, i: usize, j: usize) {
        let note = format!("compare a[{i}]={} with a[{j}]={}", self.array[i], self.array[j]);
        self.emit(SortKind::Compare, line, vec![i, j], note);
    }

    fn swap(&mut self, line: usize, i: usize, j: usize) {
        self.array.swap(i, j);
        let note = format!("swap positions {i} and {j}");
        self.emit(SortKind::Swap, line, vec![i, j], note);
    }

    /// Write the value at `from` into `to`. The values in between slide one
    /// slot towards `from`, so the array stays a permutation of the input.
    fn overwrite(&mut self, line: usize, from: usize, to: usize) {
        let value = self.array[from];
        if from >= to {
            self.array[to..=from].rotate_right(1);
        } else {
            self.array[from..=to].rotate_left(1);
        }
        let touched = (from.min(to)..=from.max(to)).collect();
        self.emit(SortKind::Overwrite, line, touched, format!("write {value} to a[{to}]"));
    }

    fn finish(mut self, line: usize) -> Vec<Operation> {
        let all = (0..self.array.len()).collect();
        self.emit(SortKind::Done, line, all, "array sorted".to_string());
        self.ops
    }
}

/// Bubble sort: adjacent compare-and-swap passes.
pub fn bubble(values: &[i64]) -> Vec<Operation> {
    let mut t = Tracer::new(values);
    let n = t.array.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            t.compare(2, j, j + 1);
            if t.array[j] > t.array[j + 1] {
                t.swap(3, j, j + 1);
            }
        }
    }
    t.finish(4)
}

/// Selection sort: move the minimum of the unsorted tail into place.
pub fn selection(values: &[i64]) -> Vec<Operation> {
    let mut t = Tracer::new(values);
    let n = t.array.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            t.compare(3, min, j);
            if t.array[j] < t.array[min] {
                min = j;
                let note = format!("new minimum {} at {j}", t.array[j]);
                t.emit(SortKind::Pivot, 4, vec![j], note);
            }
        }
        if min != i {
            t.swap(5, i, min);
        }
    }
    t.finish(6)
}

/// Insertion sort: shift larger predecessors right, then drop the key in.
pub fn insertion(values: &[i64]) -> Vec<Operation> {
    let mut t = Tracer::new(values);
    let n = t.array.len();
    for i in 1..n {
        let key = t.array[i];
        t.emit(SortKind::Pivot, 1, vec![i], format!("pick key {key} at {i}"));
        let mut j = i;
        while j > 0 {
            let note = format!("compare a[{}]={} with key {key}", j - 1, t.array[j - 1]);
            t.emit(SortKind::Compare, 2, vec![j - 1, j], note);
            if t.array[j - 1] <= key {
                break;
            }
            // the key rides along in the gap
            t.overwrite(3, j - 1, j);
            j -= 1;
        }
        t.overwrite(4, j, j);
    }
    t.finish(5)
}

/// Quick sort with Lomuto partitioning; the pivot is the last element.
pub fn quick(values: &[i64]) -> Vec<Operation> {
    let mut t = Tracer::new(values);
    let n = t.array.len();
    if n > 0 {
        quick_range(&mut t, 0, n);
    }
    t.finish(8)
}

fn quick_range(t: &mut Tracer, lo: usize, hi: usize) {
    if hi - lo <= 1 {
        let note = format!("range [{lo}, {hi}) needs no work");
        t.emit(SortKind::Compare, 1, (lo..hi).collect(), note);
        return;
    }

    let p = hi - 1;
    let pivot = t.array[p];
    t.emit(SortKind::Pivot, 2, vec![p], format!("pivot {pivot} at {p}"));

    let mut i = lo;
    for j in lo..p {
        t.compare(4, j, p);
        if t.array[j] < pivot {
            if i != j {
                t.swap(5, i, j);
            }
            i += 1;
        }
    }
    if i != p {
        t.swap(6, i, p);
    }

    quick_range(t, lo, i);
    quick_range(t, i + 1, hi);
}

/// Top-down merge sort.
pub fn merge(values: &[i64]) -> Vec<Operation> {
    let mut t = Tracer::new(values);
    let n = t.array.len();
    merge_range(&mut t, 0, n);
    t.finish(7)
}

fn merge_range(t: &mut Tracer, lo: usize, hi: usize) {
    if hi - lo <= 1 {
        return;
    }
    let mid = (lo + hi) / 2;
    let note = format!("split [{lo}, {hi}) at {mid}");
    t.emit(SortKind::Pivot, 2, (lo..hi).collect(), note);

    merge_range(t, lo, mid);
    merge_range(t, mid, hi);

    let note = format!("merge [{lo}, {mid}) with [{mid}, {hi})");
    t.emit(SortKind::Compare, 4, (lo..hi).collect(), note);

    // a[lo..k] is merged, the rest of the left run starts at k and the rest
    // of the right run starts at `r`.
    let (mut k, mut r) = (lo, mid);
    while k < r && r < hi {
        let note = format!("compare {} with {}", t.array[k], t.array[r]);
        t.emit(SortKind::Compare, 5, vec![k, r], note);
        if t.array[k] <= t.array[r] {
            t.overwrite(5, k, k);
        } else {
            t.overwrite(5, r, k);
            r += 1;
        }
        k += 1;
    }
    while k < hi {
        t.overwrite(6, k, k);
        k += 1;
    }
}

/// `len` values drawn uniformly from `min..=max`, reproducible from `seed`.
pub fn random_values(len: usize, min: i64, max: i64, seed: u64) -> Vec<i64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(lo..=hi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_array(trace: &[Operation]) -> Vec<i64> {
        trace.last().and_then(Operation::as_sort).unwrap().array.clone()
    }

    fn kinds(trace: &[Operation]) -> Vec<SortKind> {
        trace.iter().map(|op| op.as_sort().unwrap().kind).collect()
    }

    #[test]
    fn bubble_five_three_one() {
        let trace = bubble(&[5, 3, 1]);
        assert_eq!(last_array(&trace), vec![1, 3, 5]);
        assert_eq!(
            kinds(&trace),
            vec![
                SortKind::Compare,
                SortKind::Swap,
                SortKind::Compare,
                SortKind::Swap,
                SortKind::Compare,
                SortKind::Swap,
                SortKind::Done,
            ]
        );
    }

    #[test]
    fn empty_input_emits_only_done() {
        for algorithm in SortAlgorithm::ALL {
            let trace = generate(algorithm, &[]);
            assert_eq!(kinds(&trace), vec![SortKind::Done], "{}", algorithm.name());
        }
    }

    #[test]
    fn sorted_input_compares_without_swapping() {
        for algorithm in [SortAlgorithm::Bubble, SortAlgorithm::Selection, SortAlgorithm::Quick] {
            let trace = generate(algorithm, &[1, 2, 3, 4]);
            let k = kinds(&trace);
            assert!(k.contains(&SortKind::Compare), "{}", algorithm.name());
            assert!(!k.contains(&SortKind::Swap), "{}", algorithm.name());
        }
    }

    #[test]
    fn swaps_never_touch_a_single_position() {
        for algorithm in SortAlgorithm::ALL {
            let trace = generate(algorithm, &[3, 3, 1, 2, 2, 5, 0]);
            for op in &trace {
                let step = op.as_sort().unwrap();
                if step.kind == SortKind::Swap {
                    assert_eq!(step.indices.len(), 2, "{}", algorithm.name());
                }
            }
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let values = vec![4, 1, 3];
        let _ = generate(SortAlgorithm::Merge, &values);
        assert_eq!(values, vec![4, 1, 3]);
    }

    #[test]
    fn quick_records_base_case_markers() {
        // [2, 1]: pivot 1, compare, swap, then base cases [0,0) and [1,2)
        let trace = quick(&[2, 1]);
        assert_eq!(
            kinds(&trace),
            vec![
                SortKind::Pivot,
                SortKind::Compare,
                SortKind::Swap,
                SortKind::Compare,
                SortKind::Compare,
                SortKind::Done,
            ]
        );
        let markers: Vec<_> = trace.iter().filter(|op| op.line() == 1).collect();
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn insertion_places_key_after_shifts() {
        let trace = insertion(&[2, 1]);
        assert_eq!(
            kinds(&trace),
            vec![
                SortKind::Pivot,
                SortKind::Compare,
                SortKind::Overwrite,
                SortKind::Overwrite,
                SortKind::Done,
            ]
        );
        assert_eq!(last_array(&trace), vec![1, 2]);
    }

    #[test]
    fn merge_splits_then_interleaves() {
        let trace = merge(&[3, 1]);
        assert_eq!(
            kinds(&trace),
            vec![
                SortKind::Pivot,
                SortKind::Compare,
                SortKind::Compare,
                SortKind::Overwrite,
                SortKind::Overwrite,
                SortKind::Done,
            ]
        );
        assert_eq!(last_array(&trace), vec![1, 3]);
    }

    #[test]
    fn overwrites_keep_a_permutation() {
        for values in [vec![0, -1], vec![5, 2, 9, 2, 7, 1, 3]] {
            let mut expected = values.clone();
            expected.sort();
            for algorithm in [SortAlgorithm::Insertion, SortAlgorithm::Merge] {
                for op in generate(algorithm, &values) {
                    let mut snapshot = op.as_sort().unwrap().array.clone();
                    snapshot.sort();
                    assert_eq!(snapshot, expected, "{}", algorithm.name());
                }
            }
        }
    }

    #[test]
    fn insertion_shift_moves_key_into_gap() {
        let trace = insertion(&[0, -1]);
        let shift = trace[2].as_sort().unwrap();
        assert_eq!(shift.kind, SortKind::Overwrite);
        assert_eq!(shift.array, vec![-1, 0]);
        assert_eq!(shift.indices, vec![0, 1]);
    }

    #[test]
    fn selection_marks_new_minimum() {
        let trace = selection(&[3, 1, 2]);
        let pivots = trace
            .iter()
            .filter_map(Operation::as_sort)
            .filter(|s| s.kind == SortKind::Pivot)
            .count();
        assert_eq!(pivots, 2);
        assert_eq!(last_array(&trace), vec![1, 2, 3]);
    }

    #[test]
    fn lines_stay_inside_listing() {
        for algorithm in SortAlgorithm::ALL {
            let trace = generate(algorithm, &[9, 4, 7, 1, 8, 2]);
            for op in &trace {
                assert!(op.line() < algorithm.listing().len(), "{}", algorithm.name());
            }
        }
    }

    #[test]
    fn random_values_are_reproducible() {
        let a = random_values(20, 5, 100, 42);
        assert_eq!(a, random_values(20, 5, 100, 42));
        assert!(a.iter().all(|v| (5..=100).contains(v)));
        assert_eq!(random_values(3, 10, 1, 0).len(), 3);
    }
}
