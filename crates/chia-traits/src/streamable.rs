use crate::chia_error::{Error, Result};
use chia_sha2::Sha256;
use std::io::Cursor;

/// Chia's wire/storage serialization is a fixed big-endian encoding with no
/// self-describing framing beyond length-prefixed variable-size fields
/// (strings, blobs, vectors). `Streamable` is the trait every such type
/// implements, either by hand (primitives, byte arrays) or via
/// `#[derive(Streamable)]` (structs and C-like enums).
pub trait Streamable {
    fn update_digest(&self, digest: &mut Sha256);
    fn stream(&self, out: &mut Vec<u8>) -> Result<()>;
    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self>
    where
        Self: Sized;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut ret = Vec::new();
        self.stream(&mut ret)?;
        Ok(ret)
    }

    fn stream_to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes()
    }

    fn get_hash(&self) -> [u8; 32] {
        let mut digest = Sha256::new();
        self.update_digest(&mut digest);
        digest.finalize()
    }

    /// Parses untrusted input: length-prefixed containers are bounded so a
    /// malicious buffer can't force an unbounded allocation.
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut input = Cursor::new(bytes);
        let ret = Self::parse::<false>(&mut input)?;
        if input.position() as usize != bytes.len() {
            return Err(Error::InputTooLarge);
        }
        Ok(ret)
    }

    /// Parses input that's already known to come from a trusted source
    /// (e.g. our own database), skipping some bounds checks that only
    /// matter against adversarial input.
    fn from_bytes_unchecked(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut input = Cursor::new(bytes);
        let ret = Self::parse::<true>(&mut input)?;
        if input.position() as usize != bytes.len() {
            return Err(Error::InputTooLarge);
        }
        Ok(ret)
    }

    fn parse_rust<const TRUSTED: bool>(buffer: &[u8]) -> Result<(Self, usize)>
    where
        Self: Sized,
    {
        let mut input = Cursor::new(buffer);
        let ret = Self::parse::<TRUSTED>(&mut input)?;
        Ok((ret, input.position() as usize))
    }
}

/// Caps the size of a single length-prefixed allocation when parsing
/// untrusted input, independent of how much of the input buffer remains.
pub const MAX_SINGLE_ALLOCATION_SIZE: u64 = 64 * 1024 * 1024;

pub fn read_bytes<'a>(input: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8]> {
    let buf = *input.get_ref();
    let pos = input.position() as usize;
    if len as u64 > MAX_SINGLE_ALLOCATION_SIZE {
        return Err(Error::InputTooLarge);
    }
    if pos + len > buf.len() {
        return Err(Error::EndOfBuffer);
    }
    input.set_position((pos + len) as u64);
    Ok(&buf[pos..pos + len])
}

macro_rules! streamable_primitive {
    ($t:ty) => {
        impl Streamable for $t {
            fn update_digest(&self, digest: &mut Sha256) {
                digest.update(self.to_be_bytes());
            }

            fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
                out.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }

            fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
                let sz = std::mem::size_of::<$t>();
                let bytes = read_bytes(input, sz)?;
                Ok(<$t>::from_be_bytes(bytes.try_into().unwrap()))
            }
        }
    };
}

streamable_primitive!(u8);
streamable_primitive!(i8);
streamable_primitive!(u16);
streamable_primitive!(i16);
streamable_primitive!(u32);
streamable_primitive!(i32);
streamable_primitive!(u64);
streamable_primitive!(i64);
streamable_primitive!(u128);
streamable_primitive!(i128);

impl Streamable for bool {
    fn update_digest(&self, digest: &mut Sha256) {
        (*self as u8).update_digest(digest);
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        (*self as u8).stream(out)
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        match u8::parse::<TRUSTED>(input)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

impl Streamable for String {
    fn update_digest(&self, digest: &mut Sha256) {
        (self.len() as u32).update_digest(digest);
        digest.update(self.as_bytes());
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.len() > u32::MAX as usize {
            return Err(Error::SequenceTooLarge);
        }
        (self.len() as u32).stream(out)?;
        out.extend_from_slice(self.as_bytes());
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        let len = u32::parse::<TRUSTED>(input)?;
        let bytes = read_bytes(input, len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidString)
    }
}

impl<T: Streamable> Streamable for Vec<T> {
    fn update_digest(&self, digest: &mut Sha256) {
        (self.len() as u32).update_digest(digest);
        for item in self {
            item.update_digest(digest);
        }
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.len() > u32::MAX as usize {
            return Err(Error::SequenceTooLarge);
        }
        (self.len() as u32).stream(out)?;
        for item in self {
            item.stream(out)?;
        }
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        let len = u32::parse::<TRUSTED>(input)?;
        let mut ret = Vec::new();
        if !TRUSTED {
            // an upper bound that doesn't require actually allocating len items
            if len as u64 > MAX_SINGLE_ALLOCATION_SIZE {
                return Err(Error::SequenceTooLarge);
            }
        }
        for _ in 0..len {
            ret.push(T::parse::<TRUSTED>(input)?);
        }
        Ok(ret)
    }
}

impl<T: Streamable> Streamable for Option<T> {
    fn update_digest(&self, digest: &mut Sha256) {
        match self {
            None => false.update_digest(digest),
            Some(v) => {
                true.update_digest(digest);
                v.update_digest(digest);
            }
        }
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            None => false.stream(out),
            Some(v) => {
                true.stream(out)?;
                v.stream(out)
            }
        }
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        match bool::parse::<TRUSTED>(input)? {
            false => Ok(None),
            true => Ok(Some(T::parse::<TRUSTED>(input)?)),
        }
    }
}

impl<T: Streamable> Streamable for Box<T> {
    fn update_digest(&self, digest: &mut Sha256) {
        self.as_ref().update_digest(digest);
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_ref().stream(out)
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Box::new(T::parse::<TRUSTED>(input)?))
    }
}

impl<T: Streamable, const N: usize> Streamable for [T; N] {
    fn update_digest(&self, digest: &mut Sha256) {
        for item in self {
            item.update_digest(digest);
        }
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        for item in self {
            item.stream(out)?;
        }
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        let mut ret: [Option<T>; N] = std::array::from_fn(|_| None);
        for slot in &mut ret {
            *slot = Some(T::parse::<TRUSTED>(input)?);
        }
        Ok(ret.map(|v| v.expect("every slot was filled above")))
    }
}

macro_rules! streamable_tuple {
    ( $( $name:ident )+ ) => {
        impl< $( $name: Streamable, )+ > Streamable for ( $( $name, )+ ) {
            #[allow(non_snake_case)]
            fn update_digest(&self, digest: &mut Sha256) {
                let ( $( $name, )+ ) = self;
                $( $name.update_digest(digest); )+
            }

            #[allow(non_snake_case)]
            fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
                let ( $( $name, )+ ) = self;
                $( $name.stream(out)?; )+
                Ok(())
            }

            fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
                Ok(( $( $name::parse::<TRUSTED>(input)?, )+ ))
            }
        }
    };
}

streamable_tuple!(A);
streamable_tuple!(A B);
streamable_tuple!(A B C);
streamable_tuple!(A B C D);
streamable_tuple!(A B C D E);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_primitives() {
        let v: u32 = 0x0102_0304;
        let bytes = v.to_bytes().unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
        assert_eq!(u32::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn roundtrip_vec() {
        let v: Vec<u16> = vec![1, 2, 3];
        let bytes = v.to_bytes().unwrap();
        assert_eq!(Vec::<u16>::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn roundtrip_option() {
        let v: Option<u8> = Some(7);
        let bytes = v.to_bytes().unwrap();
        assert_eq!(Option::<u8>::from_bytes(&bytes).unwrap(), v);

        let v: Option<u8> = None;
        let bytes = v.to_bytes().unwrap();
        assert_eq!(Option::<u8>::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn truncated_input_fails() {
        let bytes: Vec<u8> = vec![0, 0];
        assert_eq!(u32::from_bytes(&bytes), Err(Error::EndOfBuffer));
    }

    #[test]
    fn trailing_bytes_fail() {
        let bytes: Vec<u8> = vec![0, 0, 0, 1, 0xff];
        assert_eq!(u32::from_bytes(&bytes), Err(Error::InputTooLarge));
    }
}
