#[allow(non_camel_case_types)] pub type Index1_u = usize;
#[allow(non_camel_case_types)] pub type Index3_u = [usize; 3];
#[allow(non_camel_case_types)] pub type BoxDim_u = [usize; 3];

// --------------------------------------------------------------------------------
//                  Conversion between 1d and 3d voxel indices
//
// The 1d layout is part of the on-disk volume format and must not change:
// x is the fastest axis, then z, then y.

use std::ops::{Add, Div, Mul, Rem};

pub fn voxel3_to_1<T>([x, y, z]: [T; 3], [nx, _ny, nz]: [T; 3]) -> T
where
    T: Mul<Output = T> + Add<Output = T> + Copy
{
    (y * nx + z) * nz + x
}

#[allow(clippy::many_single_char_names)]
pub fn voxel1_to_3<T>(i: T, [nx, _ny, nz]: [T; 3]) -> [T; 3]
where
    T: Mul<Output = T> +
    Div<Output = T> +
    Rem<Output = T> +
    Copy
{
    let y = i / (nx * nz);
    let r = i % (nx * nz);
    let z = r / nz;
    let x = r % nz;
    [x, y, z]
}


#[cfg(test)]
mod test_index_conversion {
    use super::*;
    use rstest::rstest;

    // -------------------- Some hand-picked examples ------------------------------
    #[rstest(/**/    size   , index3 , index1,
             // 1-d examples
             case([ 1, 1, 1], [0,0,0],   0),
             case([ 9, 9, 9], [3,0,0],   3),
             case([ 8, 8, 8], [0,4,0], 256),
             case([ 7, 7, 7], [0,0,5],  35),
             // Counting in binary: x fastest, then z, then y
             case([ 2, 2, 2], [0,0,0],   0),
             case([ 2, 2, 2], [1,0,0],   1),
             case([ 2, 2, 2], [0,0,1],   2),
             case([ 2, 2, 2], [1,0,1],   3),
             case([ 2, 2, 2], [0,1,0],   4),
             case([ 2, 2, 2], [1,1,0],   5),
             case([ 2, 2, 2], [0,1,1],   6),
             case([ 2, 2, 2], [1,1,1],   7),
             // Relation to decimal: y is the slowest digit
             case([10,10,10], [1,3,2], 321),
             case([10,10,10], [7,6,9], 697),
    )]
    fn hand_picked(size: Index3_u, index3: Index3_u, index1: usize) {
        assert_eq!(voxel3_to_1(index3, size), index1);
        assert_eq!(voxel1_to_3(index1, size), index3);
    }

    // -------------------- Exhaustive roundtrip testing ------------------------------
    use proptest::prelude::*;

    // A strategy that picks 3-d grid dimensions (cubic in x/z, as the on-disk
    // layout requires) and a 1-d index guaranteed to lie within those bounds.
    fn size_and_in_range_index() -> impl Strategy<Value = (Index3_u, usize)> {
        (1..200_usize, 1..200_usize)
            .prop_flat_map(|(nxz, ny)| (Just([nxz, ny, nxz]), 0..(nxz * ny * nxz)))
    }

    proptest! {
        #[test]
        fn index_roundtrip((size, index) in size_and_in_range_index()) {
            let there = voxel1_to_3(index, size);
            let back  = voxel3_to_1(there, size);
            assert_eq!(back, index)
        }

    }
}
