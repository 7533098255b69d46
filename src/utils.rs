use std::ops::{Add, Div, Mul, Range, Sub};

/// Flat index of `(row, col)` in a `height` x `width` plane, wrapping both axes.
pub fn get_wrapping_index(row: isize, col: isize, height: usize, width: usize) -> usize {
    let (height, width) = (height as isize, width as isize);
    (row.rem_euclid(height) * width + col.rem_euclid(width)) as usize
}

/// Wraps a single coordinate onto `0..len`.
pub fn wrap(i: isize, len: usize) -> usize {
    i.rem_euclid(len as isize) as usize
}

pub fn map_t_of_range_a_to_range_b<T>(t: T, range_a: Range<T>, range_b: Range<T>) -> T
where
    T: Copy + Sub<Output = T> + Div<Output = T> + Add<Output = T> + Mul<Output = T>,
{
    let slope = (range_b.end - range_b.start) / (range_a.end - range_a.start);
    range_b.start + slope * (t - range_a.start)
}
