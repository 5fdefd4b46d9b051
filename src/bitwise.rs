pub trait Bitwise {
    type Output;
    fn count(&self) -> Self::Output;
    fn parity(&self) -> Self::Output;
}

macro_rules! impl_bitwise {
    ($($t:ty),*) => {$(
        impl Bitwise for $t {
            type Output = $t;
            #[inline]
            fn count(&self) -> $t {
                self.count_ones() as $t
            }

            #[inline]
            fn parity(&self) -> $t {
                (self.count_ones() & 1) as $t
            }
        }
    )*};
}

impl_bitwise!(u8, u16, u32, u64, usize);

impl<I> Bitwise for [I]
where
    I: Bitwise,
    <I as Bitwise>::Output: Into<usize>,
{
    type Output = usize;
    fn count(&self) -> usize {
        self.iter()
            .fold(0, |val, el| val + <<I as Bitwise>::Output as Into<usize>>::into(el.count()))
    }
    fn parity(&self) -> usize {
        self.iter()
            .fold(0, |val, el| val ^ <<I as Bitwise>::Output as Into<usize>>::into(el.parity()))
    }
}

/// Hamming parity positions are the 1-based positions with a single bit set.
#[inline]
pub fn is_parity_position(position: usize) -> bool {
    position.count() == 1
}

#[test]
fn test_count() {
    assert_eq!(1u32.count(), 1);
    assert_eq!(2u32.count(), 1);
    assert_eq!(3u32.count(), 2);
    assert_eq!([2u8, 2, 5].count(), 4);
    assert_eq!([2u8, 2, 8].count(), 3);
}

#[test]
fn test_parity() {
    assert_eq!(1u64.parity(), 1);
    assert_eq!(2u64.parity(), 1);
    assert_eq!(3u64.parity(), 0);
    assert_eq!([2u8, 2, 5].parity(), 0);
    assert_eq!([2u8, 2, 8].parity(), 1);
}

#[test]
fn test_count_parity() {
    for x in (0..100).map(|x| x * (u64::MAX / 100)) {
        assert_eq!(x.parity(), x.count() % 2);
    }
}

#[test]
fn parity_positions() {
    let positions: Vec<usize> = (1..=15).filter(|&p| is_parity_position(p)).collect();
    assert_eq!(positions, vec![1, 2, 4, 8]);
    assert!(!is_parity_position(0));
}
