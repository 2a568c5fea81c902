//! Integration tests for fields, lazy transforms and mutation through
//! views.

use approx::assert_relative_eq;

use ndslice::{
    cycle, from_slice, from_slice_mut, iota, linspace, magic, nd_linspace, repeat, zip2,
    zip2_same_strides, IotaField, UnaryFn,
};

#[test]
fn linspace_is_evenly_spaced() {
    let s = linspace(11, -1.0f64, 1.0);
    let v = s.to_vec();
    assert_eq!(v.len(), 11);
    assert_relative_eq!(v[0], -1.0);
    assert_relative_eq!(v[5], 0.0);
    assert_relative_eq!(v[10], 1.0);
    for w in v.windows(2) {
        assert_relative_eq!(w[1] - w[0], 0.2, epsilon = 1e-12);
    }
}

#[test]
fn nd_linspace_is_a_grid_of_axis_values() {
    let s = nd_linspace([3, 3], [(0.0f64, 1.0), (10.0, 12.0)]);
    let corner = s.get([2, 2]);
    assert_relative_eq!(corner[0], 1.0);
    assert_relative_eq!(corner[1], 12.0);
    let center = s.get([1, 1]);
    assert_relative_eq!(center[0], 0.5);
    assert_relative_eq!(center[1], 11.0);
}

#[test]
fn magic_squares_have_the_magic_sum() {
    for n in [3usize, 4, 5, 6, 8, 9, 10] {
        let s = magic(n);
        let target = n * (n * n + 1) / 2;
        for i in 0..n {
            let row: usize = (0..n).map(|j| s.get([i, j])).sum();
            assert_eq!(row, target, "row {i} of magic({n})");
        }
    }
}

#[test]
fn repeat_and_cycle_fields() {
    assert_eq!(repeat(3u32, [2, 2]).to_vec(), vec![3; 4]);
    let c = cycle(IotaField::new(0i32, 1), 4, 10);
    assert_eq!(c.to_vec(), vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
}

#[test]
fn map_zip_compose_over_borrowed_memory() {
    let data: Vec<i64> = (0..6).collect();
    let doubled = from_slice(&data, [2, 3]).unwrap().map(|x| x * 2);
    let halves = iota::<i64, 2>([2, 3]);
    let z = zip2(doubled, halves).unwrap();
    for i in 0..2 {
        for j in 0..3 {
            let (two_x, x) = z.get([i, j]);
            assert_eq!(two_x, 2 * x);
        }
    }
}

#[test]
fn writes_through_mutable_views_land_in_storage() {
    let mut data = vec![0i32; 12];
    {
        let view = from_slice_mut(&mut data, [3, 4]).unwrap();
        let mut transposed = view.transposed([1, 0]);
        for j in 0..4 {
            transposed.set([j, 1], (10 + j) as i32);
        }
    }
    assert_eq!(data[4..8], [10, 11, 12, 13]);
}

#[test]
fn retro_writes_reverse_positions() {
    let mut data = vec![0u8; 4];
    {
        let mut view = from_slice_mut(&mut data, [4]).unwrap().retro();
        view.set([0], 1);
        view.set([3], 9);
    }
    assert_eq!(data, vec![9, 0, 0, 1]);
}

#[derive(Clone)]
struct Offset(i64);

impl UnaryFn<i64> for Offset {
    type Output = i64;

    fn eval(&self, input: i64) -> i64 {
        input + self.0
    }
}

#[test]
fn vmap_carries_callable_state() {
    let shifted = iota::<i64, 1>([5]).vmap(Offset(100));
    assert_eq!(shifted.to_vec(), vec![100, 101, 102, 103, 104]);
}

#[test]
fn sliding_reductions_shrink_the_axis() {
    let s = iota::<i64, 1>([6]);
    let max3 = s.slide::<3, _, _>(|w: [i64; 3]| w.into_iter().max().unwrap_or(0));
    assert_eq!(max3.to_vec(), vec![2, 3, 4, 5]);
    assert_eq!(s.diff(1).to_vec(), vec![1; 5]);
}

#[test]
fn cached_view_writes_shadow_the_source() {
    let source = iota::<i64, 1>([4]).map(|x| x * 7);
    let mut cache = [0i64; 4];
    let mut flags = [false; 4];
    let mut view = source.cached(&mut cache, &mut flags).unwrap();
    view.set([0], -1);
    assert_eq!(view.get([0]), -1);
    assert_eq!(view.get([3]), 21);
    assert_eq!(view.to_vec(), vec![-1, 7, 14, 21]);
}

#[test]
fn same_strides_zip_writes_both_components() {
    let mut left = vec![0i32; 6];
    let mut right = vec![0i32; 6];
    {
        let a = from_slice_mut(&mut left, [2, 3]).unwrap();
        let b = from_slice_mut(&mut right, [2, 3]).unwrap();
        let mut z = zip2_same_strides(a, b).unwrap();
        z.set([1, 2], (5, -5));
    }
    assert_eq!(left[5], 5);
    assert_eq!(right[5], -5);
}

#[test]
fn bitwise_views_count_set_bits() {
    let words: Vec<u64> = vec![u64::MAX, 0, 1];
    let bits = from_slice(&words, [3]).unwrap().bitwise();
    assert_eq!(bits.lengths(), &[192]);
    assert_eq!(bits.iter().filter(|&b| b).count(), 65);
}

#[test]
fn neighbour_reduction_on_a_grid() {
    let s = iota::<i64, 2>([4, 4]).with_neighbours_sum(|a, b| a + b);
    assert_eq!(s.lengths(), &[2, 2]);
    // Interior cell 5: neighbours 1, 9, 4, 6.
    assert_eq!(s.get([0, 0]), (5, 20));
    // Interior cell 10: neighbours 6, 14, 9, 11.
    assert_eq!(s.get([1, 1]), (10, 40));
}
