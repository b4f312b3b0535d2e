use std::convert::TryInto;

#[derive(Clone, Debug)]
/// A readable stream of big-endian binary data.
pub struct Reader<'a> {
    /// The underlying data of the reader.
    data: &'a [u8],
    /// The current offset in bytes. Is not guaranteed to be in range.
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a new readable stream of binary data.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a new readable stream of binary data at a specific position.
    #[inline]
    pub fn new_at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// The remaining data from the current offset.
    #[inline]
    pub fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Try to read `T` from the data.
    #[inline]
    pub fn read<T: Readable<'a>>(&mut self) -> Option<T> {
        T::read(self)
    }

    /// Read a certain number of bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let v = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(v)
    }

    /// Reads the next `count` values as a lazily decoded array.
    #[inline]
    pub fn read_array16<T: Readable<'a>>(
        &mut self,
        count: u16,
    ) -> Option<LazyArray16<'a, T>> {
        let len = usize::from(count) * T::SIZE;
        self.read_bytes(len).map(LazyArray16::new)
    }

    /// Reads the next `count` values into a vector.
    pub fn read_vector<T: Readable<'a>>(&mut self, count: usize) -> Option<Vec<T>> {
        // Don't trust `count` for the allocation, a malformed font can claim anything.
        let available = self.data.len().saturating_sub(self.offset) / T::SIZE.max(1);
        let mut res = Vec::with_capacity(count.min(available));

        for _ in 0..count {
            res.push(self.read::<T>()?);
        }

        Some(res)
    }

    /// Jump to a specific location.
    #[inline]
    pub fn jump(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Skip the next `n` bytes from the stream.
    ///
    /// Fails if that would move the cursor past the end of the data.
    #[inline]
    pub fn skip_bytes(&mut self, n: usize) -> Option<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Advances by `Readable::SIZE`.
    #[inline]
    pub fn skip<T: Readable<'a>>(&mut self) -> Option<()> {
        self.skip_bytes(T::SIZE)
    }
}

/// Trait for an object that can be read from a byte stream with a fixed size.
pub trait Readable<'a>: Sized {
    const SIZE: usize;

    fn read(r: &mut Reader<'a>) -> Option<Self>;

    /// Read `Self` at an absolute position in `data`.
    #[inline]
    fn read_at(data: &'a [u8], offset: usize) -> Option<Self> {
        Self::read(&mut Reader::new_at(data, offset))
    }
}

impl<const N: usize> Readable<'_> for [u8; N] {
    const SIZE: usize = u8::SIZE * N;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read_bytes(N)?.try_into().ok()
    }
}

impl Readable<'_> for u8 {
    const SIZE: usize = 1;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 1]>().map(Self::from_be_bytes)
    }
}

impl Readable<'_> for u16 {
    const SIZE: usize = 2;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 2]>().map(Self::from_be_bytes)
    }
}

impl Readable<'_> for i16 {
    const SIZE: usize = 2;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 2]>().map(Self::from_be_bytes)
    }
}

impl Readable<'_> for u32 {
    const SIZE: usize = 4;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 4]>().map(Self::from_be_bytes)
    }
}

/// A 32-bit signed fixed-point number (16.16).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixed(pub f32);

impl Readable<'_> for Fixed {
    const SIZE: usize = 4;

    #[inline]
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        // Integer part is signed, the fraction is not.
        let int = r.read::<i16>()?;
        let frac = r.read::<u16>()?;
        Some(Fixed(f32::from(int) + f32::from(frac) / 65536.0))
    }
}

/// A slice-like container that converts internal binary data only on access.
///
/// Array values are stored in a continuous data chunk.
#[derive(Clone, Copy)]
pub struct LazyArray16<'a, T> {
    data: &'a [u8],
    data_type: core::marker::PhantomData<T>,
}

impl<'a, T: Readable<'a>> LazyArray16<'a, T> {
    /// Creates a new `LazyArray`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        LazyArray16 { data, data_type: core::marker::PhantomData }
    }

    /// Returns a value at `index`.
    #[inline]
    pub fn get(&self, index: u16) -> Option<T> {
        if index < self.len() {
            let start = usize::from(index) * T::SIZE;
            let end = start + T::SIZE;
            self.data
                .get(start..end)
                .map(Reader::new)
                .and_then(|mut r| T::read(&mut r))
        } else {
            None
        }
    }

    /// Returns array's length.
    #[inline]
    pub fn len(&self) -> u16 {
        (self.data.len() / T::SIZE) as u16
    }

    /// Whether the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a, T: Readable<'a> + core::fmt::Debug + Copy> core::fmt::Debug
    for LazyArray16<'a, T>
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

impl<'a, T: Readable<'a>> IntoIterator for LazyArray16<'a, T> {
    type Item = T;
    type IntoIter = LazyArrayIter16<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        LazyArrayIter16 { data: self, index: 0 }
    }
}

/// An iterator over `LazyArray16`.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct LazyArrayIter16<'a, T> {
    data: LazyArray16<'a, T>,
    index: u16,
}

impl<'a, T: Readable<'a>> Iterator for LazyArrayIter16<'a, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.data.get(self.index)?;
        self.index += 1;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let data = [0x12, 0x34, 0xFF, 0xFE, 0x00, 0x01, 0x00, 0x00];
        let mut r = Reader::new(&data);
        assert_eq!(r.read::<u16>(), Some(0x1234));
        assert_eq!(r.read::<i16>(), Some(-2));
        assert_eq!(r.read::<u32>(), Some(0x00010000));
        assert_eq!(r.tail(), Some(&[][..]));
        assert_eq!(r.read::<u16>(), None);
    }

    #[test]
    fn out_of_range_reads_fail_without_moving() {
        let data = [1, 2, 3];
        let mut r = Reader::new(&data);
        assert_eq!(r.read::<u32>(), None);
        assert_eq!(r.offset(), 0);
        assert_eq!(r.skip_bytes(4), None);
        assert_eq!(r.read::<u16>(), Some(0x0102));
    }

    #[test]
    fn jump_and_read_at() {
        let data = [0, 0, 0xAB, 0xCD];
        let mut r = Reader::new(&data);
        r.jump(2);
        assert_eq!(r.offset(), 2);
        assert_eq!(r.tail(), Some(&data[2..]));
        assert_eq!(u16::read_at(&data, 2), Some(0xABCD));
        assert_eq!(u16::read_at(&data, 3), None);
    }

    #[test]
    fn fixed_point() {
        let data = [0xFF, 0xF4, 0x80, 0x00];
        assert_eq!(Fixed::read_at(&data, 0), Some(Fixed(-11.5)));
        let data = [0x00, 0x02, 0x40, 0x00];
        assert_eq!(Fixed::read_at(&data, 0), Some(Fixed(2.25)));
    }

    #[test]
    fn lazy_array() {
        let data = [0, 1, 0, 2, 0, 3];
        let arr = LazyArray16::<u16>::new(&data);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(2), Some(3));
        assert_eq!(arr.get(3), None);
        assert_eq!(arr.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
