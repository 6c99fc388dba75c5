//!
//! Contains the vint codec and the fixed width helpers used to read and write element data.
//!

use ebml_marshal_specification::ElementId;

use super::decoder_util::EBMLSize;
use super::errors::tool::ToolError;

///
/// The 8 byte size marker written for elements whose size is not known in advance.
///
pub const UNKNOWN_SIZE: [u8; 8] = [0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];

///
/// Trait to enable easy serialization to a vint.
///
/// This is only available for types that can be cast as `u64`.  The all-ones data pattern of every length is reserved for "unknown size", so the largest value representable with `n` bytes is `2^(7n) - 2`.
///
/// ```
/// use ebml_marshal::tools::Vint;
///
/// assert_eq!(vec![0x80], 0u64.as_vint().unwrap());
/// assert_eq!(vec![0xfe], 126u64.as_vint().unwrap());
/// assert_eq!(vec![0x40, 0x7f], 127u64.as_vint().unwrap());
/// ```
///
pub trait Vint: Into<u64> + Copy {
    ///
    /// Returns a representation of the current value as a vint array.
    ///
    /// # Errors
    ///
    /// This can return an error if the value is too large to be representable as a vint.
    ///
    fn as_vint(&self) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        check_size_u64(val, 8)?;
        let mut length = 1;
        while length < 8 {
            if val < max_for_length(length) {
                break;
            }
            length += 1;
        }

        Ok(as_vint_no_check_u64(val, length))
    }

    ///
    /// Returns a representation of the current value as a vint array with a specified length.
    ///
    /// # Errors
    ///
    /// This can return an error if the length is not between 1 and 8 or if the value does not fit in that many bytes.
    ///
    fn as_vint_with_length(&self, length: usize) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        if length == 0 || length > 8 {
            return Err(ToolError::InvalidVintLength(length));
        }
        check_size_u64(val, length)?;
        Ok(as_vint_no_check_u64(val, length))
    }
}

impl Vint for u64 { }
impl Vint for u32 { }
impl Vint for u16 { }
impl Vint for u8 { }

#[inline]
fn max_for_length(length: usize) -> u64 {
    (1 << (length * 7)) - 1
}

#[inline]
fn check_size_u64(val: u64, max_length: usize) -> Result<(), ToolError> {
    if val >= max_for_length(max_length) {
        Err(ToolError::WriteVintOverflow(val))
    } else {
        Ok(())
    }
}

#[inline]
fn as_vint_no_check_u64(val: u64, length: usize) -> Vec<u8> {
    let bytes: [u8; 8] = val.to_be_bytes();
    let mut result: Vec<u8> = Vec::from(&bytes[(8-length)..]);
    result[0] |= 1 << (8 - length);
    result
}

///
/// Reads a vint from the beginning of the input array slice.
///
/// This method returns an option with the `None` variant used to indicate there was not enough data in the buffer to completely read a vint.
///
/// The returned tuple contains the value of the vint (`u64`) and the length of the vint (`usize`).  The length will be less than or equal to the length of the input slice.
///
/// # Errors
///
/// This method can return a `ToolError` if the input array cannot be read as a vint.
///
pub fn read_vint(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    if buffer.is_empty() {
        return Ok(None);
    }

    if buffer[0] == 0 {
        return Err(ToolError::ReadVintOverflow)
    }

    let length = 8 - buffer[0].ilog2() as usize;

    if length > buffer.len() {
        // Not enough data in the buffer to read out the vint value
        return Ok(None);
    }

    let mut value = buffer[0] as u64;
    value -= 1 << (8 - length);

    for item in buffer.iter().take(length).skip(1) {
        value <<= 8;
        value += *item as u64;
    }

    Ok(Some((value, length)))
}

///
/// Reads an element data size from the beginning of the input array slice.
///
/// Works like [`read_vint`], but reports the reserved all-ones pattern as [`EBMLSize::Unknown`].
///
pub fn read_size(buffer: &[u8]) -> Result<Option<(EBMLSize, usize)>, ToolError> {
    Ok(read_vint(buffer)?.map(|(value, length)| (EBMLSize::new(value, length), length)))
}

///
/// Reads an element id from the beginning of the input array slice.
///
/// Ids keep their length marker bits, so the returned [`ElementId`] is the raw encoded byte sequence.  Ids longer than 4 bytes are rejected.
///
/// # Errors
///
/// This method can return a `ToolError` if the input cannot be read as an id.
///
pub fn read_element_id(buffer: &[u8]) -> Result<Option<(ElementId, usize)>, ToolError> {
    if buffer.is_empty() {
        return Ok(None);
    }

    if buffer[0] == 0 {
        return Err(ToolError::ReadVintOverflow)
    }

    let length = 8 - buffer[0].ilog2() as usize;
    if length > 4 {
        return Err(ToolError::InvalidElementId(buffer[..length.min(buffer.len())].to_vec()));
    }

    if length > buffer.len() {
        return Ok(None);
    }

    let bytes = &buffer[..length];
    ElementId::from_bytes(bytes)
        .map(|id| Some((id, length)))
        .ok_or_else(|| ToolError::InvalidElementId(bytes.to_vec()))
}

///
/// Writes a `u64` as the shortest big endian array that holds it.  Zero is written as a single `0x00` byte.
///
pub fn u64_to_arr(val: u64) -> Vec<u8> {
    let bytes = val.to_be_bytes();
    let skip = bytes.iter().take(7).take_while(|b| **b == 0).count();
    bytes[skip..].to_vec()
}

///
/// Writes an `i64` as the shortest two's complement big endian array that holds it.  Zero is written as a single `0x00` byte.
///
pub fn i64_to_arr(val: i64) -> Vec<u8> {
    let bytes = val.to_be_bytes();
    let mut skip = 0;
    while skip < 7 {
        let redundant = (bytes[skip] == 0x00 && bytes[skip + 1] & 0x80 == 0)
            || (bytes[skip] == 0xff && bytes[skip + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    bytes[skip..].to_vec()
}

///
/// Reads a `u64` value from any length array slice.
///
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret a `u64` from a slice of any length <= 8.  Bytes are assumed to be least significant when reading the value - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_marshal::tools::arr_to_u64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_u64(&[16,0])?;
/// assert_eq!(result, 4096);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_u64(arr: &[u8]) -> Result<u64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadU64Overflow(Vec::from(arr)));
    }

    let mut val = 0u64;
    for byte in arr {
        val <<= 8;
        val += *byte as u64;
    }
    Ok(val)
}

///
/// Reads an `i64` value from any length array slice.
///
/// The slice is interpreted as a two's complement big endian number and sign extended.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_marshal::tools::arr_to_i64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(arr_to_i64(&[4,0])?, 1024);
/// assert_eq!(arr_to_i64(&[0xff, 0x38])?, -200);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_i64(arr: &[u8]) -> Result<i64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadI64Overflow(Vec::from(arr)));
    }

    let fill = match arr.first() {
        Some(first) if *first > 127 => 0xff,
        _ => 0x00,
    };
    let mut bytes = [fill; 8];
    bytes[(8 - arr.len())..].copy_from_slice(arr);
    Ok(i64::from_be_bytes(bytes))
}

///
/// Reads an `f64` value from an array slice of length 4 or 8.
///
/// This method wraps `f32` and `f64` conversions from big endian byte arrays and casts the result as an `f64`.
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 4 or 8.
///
pub fn arr_to_f64(arr: &[u8]) -> Result<f64, ToolError> {
    if let Ok(bytes) = arr.try_into() {
        Ok(f32::from_be_bytes(bytes) as f64)
    } else if let Ok(bytes) = arr.try_into() {
        Ok(f64::from_be_bytes(bytes))
    } else {
        Err(ToolError::ReadF64Mismatch(Vec::from(arr)))
    }
}

///
/// Reads an EBML date (signed nanoseconds since 2001-01-01T00:00:00 UTC) from an array slice of length 0 or 8.
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 0 or 8.
///
pub fn arr_to_date(arr: &[u8]) -> Result<i64, ToolError> {
    match arr.len() {
        0 => Ok(0),
        8 => arr_to_i64(arr).map_err(|_| ToolError::ReadDateMismatch(Vec::from(arr))),
        _ => Err(ToolError::ReadDateMismatch(Vec::from(arr))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn read_vint_sixteen() {
        let buffer = [144];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(16, result.0);
        assert_eq!(1, result.1);
    }

    #[test]
    fn write_vint_sixteen() {
        let result = 16u64.as_vint().expect("Writing vint failed");
        assert_eq!(vec![144u8], result);
    }

    #[test]
    fn write_vint_zero() {
        let result = 0u64.as_vint().expect("Writing vint failed");
        assert_eq!(vec![0x80], result);
    }

    #[test]
    fn one_twenty_seven_needs_two_bytes() {
        let result = 127u64.as_vint().expect("Writing vint failed");
        assert_eq!(vec![0x40, 0x7f], result);
    }

    #[test]
    fn read_vint_two_hundred() {
        let buffer = [64, 200];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(200, result.0);
        assert_eq!(2, result.1);
    }

    #[test]
    fn boundary_values_use_minimal_length() {
        let cases: [(u64, usize); 7] = [
            (0, 1),
            (126, 1),
            (127, 2),
            (128, 2),
            ((1 << 14) - 1, 3),
            (1 << 14, 3),
            ((1 << 21) - 1, 4),
        ];

        for (value, expected_length) in cases {
            let bytes = value.as_vint().unwrap();
            assert_eq!(expected_length, bytes.len(), "length of {}", value);
            let (size, length) = read_size(&bytes).unwrap().unwrap();
            assert_eq!(EBMLSize::Known(value), size);
            assert_eq!(expected_length, length);
        }
    }

    #[test]
    fn all_ones_is_unknown_size() {
        assert_eq!(Some((EBMLSize::Unknown, 1)), read_size(&[0xff]).unwrap());
        assert_eq!(Some((EBMLSize::Unknown, 2)), read_size(&[0x7f, 0xff]).unwrap());
        assert_eq!(Some((EBMLSize::Unknown, 8)), read_size(&UNKNOWN_SIZE).unwrap());
    }

    #[test]
    fn read_vint_very_long() {
        let buffer = [1, 0, 0, 0, 0, 0, 0, 1];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(1, result.0);
        assert_eq!(8, result.1);
    }

    #[test]
    fn write_vint_very_long() {
        let result = 1u64.as_vint_with_length(8).expect("Writing vint failed");
        assert_eq!(vec![1, 0, 0, 0, 0, 0, 0, 1], result);
    }

    #[test]
    fn fixed_length_rejects_reserved_pattern() {
        assert_eq!(Err(ToolError::WriteVintOverflow(127)), 127u64.as_vint_with_length(1));
        assert_eq!(Err(ToolError::InvalidVintLength(9)), 1u64.as_vint_with_length(9));
        assert_eq!(vec![0x40, 0x7f], 127u64.as_vint_with_length(2).unwrap());
    }

    #[test]
    fn read_vint_needs_more_data() {
        let buffer = [1, 0, 0, 0];
        let result = read_vint(&buffer).expect("Reading vint failed");

        assert!(result.is_none());
    }

    #[test]
    fn read_vint_zero_byte_is_corrupt() {
        assert_eq!(Err(ToolError::ReadVintOverflow), read_vint(&[0x00, 0x01]));
    }

    #[test]
    fn too_big_for_vint() {
        assert_eq!(Err(ToolError::WriteVintOverflow((1 << 56) - 1)), ((1u64 << 56) - 1).as_vint());
        assert_eq!(8, ((1u64 << 56) - 2).as_vint().unwrap().len());
    }

    #[test]
    fn read_element_id_keeps_marker() {
        let buffer = [0x1a, 0x45, 0xdf, 0xa3, 0x80];
        let (id, length) = read_element_id(&buffer).unwrap().unwrap();
        assert_eq!(4, length);
        assert_eq!(0x1a45dfa3, id.value());
    }

    #[test]
    fn read_element_id_rejects_long_ids() {
        let buffer = [0x08, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(read_element_id(&buffer), Err(ToolError::InvalidElementId(_))));
    }

    #[test]
    fn minimal_unsigned_arrays() {
        assert_eq!(vec![0x00], u64_to_arr(0));
        assert_eq!(vec![0x02], u64_to_arr(2));
        assert_eq!(vec![0x01, 0x00], u64_to_arr(256));
        assert_eq!(vec![0x0f, 0x42, 0x40], u64_to_arr(1_000_000));
        assert_eq!(u64::MAX.to_be_bytes().to_vec(), u64_to_arr(u64::MAX));
    }

    #[test]
    fn minimal_signed_arrays() {
        assert_eq!(vec![0x00], i64_to_arr(0));
        assert_eq!(vec![0xff], i64_to_arr(-1));
        assert_eq!(vec![0x7f], i64_to_arr(127));
        assert_eq!(vec![0x00, 0x80], i64_to_arr(128));
        assert_eq!(vec![0x80], i64_to_arr(-128));
        assert_eq!(vec![0xff, 0x38], i64_to_arr(-200));
    }

    #[test]
    fn read_u64_values() {
        let mut buffer = vec![];
        let mut expected = 0;
        for _ in 0..8 {
            buffer.push(0x25);
            expected = (expected << 8) + 0x25;

            let result = arr_to_u64(&buffer).unwrap();
            assert_eq!(expected, result);
        }
        assert_eq!(0, arr_to_u64(&[]).unwrap());
    }

    #[test]
    fn read_i64_values() {
        let mut buffer = vec![];
        let mut expected = 0;
        for _ in 0..8 {
            buffer.push(0x0a);
            expected = (expected << 8) + 0x0a;

            let result = arr_to_i64(&buffer).unwrap();
            assert_eq!(expected, result);

            let neg_result = arr_to_i64(&(buffer.iter().map(|b| !b).collect::<Vec<u8>>())).unwrap() + 1;
            assert_eq!(-expected, neg_result);
        }
        assert_eq!(0, arr_to_i64(&[]).unwrap());
    }

    #[test]
    fn read_float_lengths() {
        assert_eq!(1.5, arr_to_f64(&1.5f32.to_be_bytes()).unwrap());
        assert_eq!(2.25, arr_to_f64(&2.25f64.to_be_bytes()).unwrap());
        assert!(arr_to_f64(&[0x01, 0x02, 0x03]).is_err());
        assert!(arr_to_f64(&[]).is_err());
    }

    #[test]
    fn read_date_lengths() {
        assert_eq!(0, arr_to_date(&[]).unwrap());
        assert_eq!(-1, arr_to_date(&[0xff; 8]).unwrap());
        assert!(arr_to_date(&[0x01, 0x02]).is_err());
    }

    proptest! {
        #[test]
        fn vint_encode_decode(value in 0u64..((1u64 << 56) - 1)) {
            let bytes = value.as_vint().unwrap();
            let (decoded, length) = read_vint(&bytes).unwrap().unwrap();
            prop_assert_eq!(value, decoded);
            prop_assert_eq!(bytes.len(), length);
            prop_assert_eq!(EBMLSize::Known(value), EBMLSize::new(decoded, length));
        }

        #[test]
        fn signed_arrays_round_trip(value in any::<i64>()) {
            prop_assert_eq!(value, arr_to_i64(&i64_to_arr(value)).unwrap());
        }

        #[test]
        fn unsigned_arrays_round_trip(value in any::<u64>()) {
            prop_assert_eq!(value, arr_to_u64(&u64_to_arr(value)).unwrap());
        }
    }
}
